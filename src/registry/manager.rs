//! Config registry
//!
//! A [`ConfigRegistry`] owns the name -> store mapping for one process or
//! test. It only grows; there is no unregister operation.

use crate::error::{KvconfError, Result};
use crate::store::ValueStore;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of config stores keyed by name
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    stores: DashMap<String, Arc<ValueStore>>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the store registered under `name`, creating and registering
    /// an empty mutable one if there is none.
    ///
    /// Creation happens under the map's entry lock, so concurrent callers
    /// for the same new name all receive the same store.
    pub fn get_or_create(&self, name: &str) -> Arc<ValueStore> {
        let entry = self.stores.entry(name.to_string()).or_insert_with(|| {
            debug!(config = %name, "creating config");
            Arc::new(ValueStore::new(name))
        });
        Arc::clone(entry.value())
    }

    /// Register `store` under its own name
    pub fn register(&self, store: Arc<ValueStore>) -> Result<Arc<ValueStore>> {
        match self.stores.entry(store.name().to_string()) {
            Entry::Occupied(_) => Err(KvconfError::duplicate_name(store.name())),
            Entry::Vacant(vacant) => {
                debug!(config = %store.name(), frozen = store.is_frozen(), "registering config");
                vacant.insert(Arc::clone(&store));
                Ok(store)
            }
        }
    }

    /// Lookup without creation
    pub fn get(&self, name: &str) -> Option<Arc<ValueStore>> {
        self.stores.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stores.contains_key(name)
    }

    /// Whether this exact store instance is registered under any name
    pub fn contains_store(&self, store: &Arc<ValueStore>) -> bool {
        self.stores
            .iter()
            .any(|entry| Arc::ptr_eq(entry.value(), store))
    }

    /// Whether `store` is the instance registered under `name`
    pub fn is_registered_under(&self, name: &str, store: &Arc<ValueStore>) -> bool {
        self.stores
            .get(name)
            .is_some_and(|entry| Arc::ptr_eq(entry.value(), store))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stores.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
