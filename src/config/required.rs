//! Required-field validation for specialized configs
//!
//! A specialized config is an ordinary [`ValueStore`] with a fixed name
//! that was populated from JSON and then checked for mandatory fields.
//! [`ConfigBuilder`] captures that recipe so each config type only has to
//! declare its name and requirements.

use crate::error::{KvconfError, Result};
use crate::registry::ConfigRegistry;
use crate::store::{ValueStore, ValueType};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::debug;

/// A field that must be present, optionally with an exact type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRequirement {
    pub field: String,
    pub value_type: Option<ValueType>,
}

impl FieldRequirement {
    pub fn present<S: Into<String>>(field: S) -> Self {
        Self {
            field: field.into(),
            value_type: None,
        }
    }

    pub fn typed<S: Into<String>>(field: S, value_type: ValueType) -> Self {
        Self {
            field: field.into(),
            value_type: Some(value_type),
        }
    }
}

/// Check every requirement against `store`, stopping at the first failure
pub fn validate_required(store: &ValueStore, requirements: &[FieldRequirement]) -> Result<()> {
    for requirement in requirements {
        if !store.has(&requirement.field) {
            return Err(KvconfError::missing_field(store.name(), &requirement.field));
        }
        if let Some(ty) = requirement.value_type {
            if !store.has_type(&requirement.field, ty) {
                return Err(KvconfError::wrong_type(&requirement.field, ty.name()));
            }
        }
    }
    Ok(())
}

/// Builds a named config from a JSON payload and validates it
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    name: String,
    requirements: Vec<FieldRequirement>,
    frozen: bool,
}

impl ConfigBuilder {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            requirements: Vec::new(),
            frozen: false,
        }
    }

    /// Require `field` to be present
    pub fn require<S: Into<String>>(mut self, field: S) -> Self {
        self.requirements.push(FieldRequirement::present(field));
        self
    }

    /// Require `field` to be present with exactly type `value_type`
    pub fn require_type<S: Into<String>>(mut self, field: S, value_type: ValueType) -> Self {
        self.requirements
            .push(FieldRequirement::typed(field, value_type));
        self
    }

    /// Freeze the store after import
    pub fn frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requirements(&self) -> &[FieldRequirement] {
        &self.requirements
    }

    /// Create an unregistered store, import `payload`, optionally freeze,
    /// then validate the requirements
    pub fn build(&self, payload: &JsonValue) -> Result<Arc<ValueStore>> {
        let store = ValueStore::new(self.name.as_str());
        store.put_all_from_structured(payload)?;

        let store = if self.frozen {
            store.into_frozen()
        } else {
            store
        };

        validate_required(&store, &self.requirements)?;
        debug!(config = %self.name, entries = store.len(), frozen = self.frozen, "built config");
        Ok(Arc::new(store))
    }

    /// Like [`ConfigBuilder::build`], then register the result
    pub fn build_registered(
        &self,
        payload: &JsonValue,
        registry: &ConfigRegistry,
    ) -> Result<Arc<ValueStore>> {
        let store = self.build(payload)?;
        registry.register(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_field_names_field() {
        let builder = ConfigBuilder::new("db").require("host").require("port");
        let err = builder.build(&json!({"host": "localhost"})).unwrap_err();

        match err {
            KvconfError::MissingField { config, field } => {
                assert_eq!(config, "db");
                assert_eq!(field, "port");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_counts_as_missing() {
        let builder = ConfigBuilder::new("db").require("host");
        assert!(matches!(
            builder.build(&json!({"host": null})),
            Err(KvconfError::MissingField { .. })
        ));
    }

    #[test]
    fn test_typed_requirement() {
        let builder = ConfigBuilder::new("db").require_type("port", ValueType::Integer);

        assert!(builder.build(&json!({"port": 5432})).is_ok());
        assert!(matches!(
            builder.build(&json!({"port": "5432"})),
            Err(KvconfError::WrongType { ref key, .. }) if key == "port"
        ));
    }

    #[test]
    fn test_frozen_build() {
        let store = ConfigBuilder::new("db")
            .frozen(true)
            .build(&json!({"host": "h"}))
            .unwrap();

        assert!(store.is_frozen());
        assert!(store.put("host", "other").is_err());
    }

    #[test]
    fn test_build_registered() {
        let registry = ConfigRegistry::new();
        let builder = ConfigBuilder::new("db").require("host");

        let store = builder.build_registered(&json!({"host": "h"}), &registry).unwrap();
        assert!(registry.is_registered_under("db", &store));

        let err = builder
            .build_registered(&json!({"host": "h2"}), &registry)
            .unwrap_err();
        assert!(matches!(err, KvconfError::DuplicateName { .. }));
    }
}
