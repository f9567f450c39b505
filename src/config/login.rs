//! Login config
//!
//! The `login` config carries the credentials a client needs to sign in;
//! the only mandatory field is `token`.

use super::required::ConfigBuilder;
use crate::error::Result;
use crate::store::ValueStore;
use serde_json::Value as JsonValue;
use std::ops::Deref;
use std::sync::Arc;

pub const LOGIN_CONFIG_NAME: &str = "login";
pub const TOKEN_FIELD: &str = "token";

#[derive(Debug, Clone)]
pub struct LoginConfig {
    store: Arc<ValueStore>,
}

impl LoginConfig {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new(LOGIN_CONFIG_NAME).require(TOKEN_FIELD)
    }

    /// Build from a JSON object, failing if `token` is missing
    pub fn from_json(data: &JsonValue, immutable: bool) -> Result<Self> {
        let store = Self::builder().frozen(immutable).build(data)?;
        Ok(Self { store })
    }

    pub fn token(&self) -> Result<String> {
        self.store.get_string(TOKEN_FIELD)
    }

    pub fn store(&self) -> &Arc<ValueStore> {
        &self.store
    }

    pub fn into_store(self) -> Arc<ValueStore> {
        self.store
    }
}

impl Deref for LoginConfig {
    type Target = ValueStore;

    fn deref(&self) -> &ValueStore {
        &self.store
    }
}
