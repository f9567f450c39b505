//! Named, freezable key-value store
//!
//! A [`ValueStore`] holds heterogeneous [`Value`]s under string keys. Stores
//! are mutable unless frozen; freezing never happens in place, it always
//! produces a distinct frozen instance.

use super::convert::{convert_object, convert_structured};
use super::value::{FromValue, Value, ValueType};
use crate::error::{KvconfError, Result};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Previous values returned by bulk operations, in input order.
/// `None` means the key was absent.
pub type PreviousValues = IndexMap<String, Option<Value>>;

/// A named heterogeneous key-value container
#[derive(Debug)]
pub struct ValueStore {
    name: String,
    entries: RwLock<BTreeMap<String, Value>>,
    frozen: bool,
}

impl ValueStore {
    /// Create an empty, mutable store
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self::with_entries(name.into(), BTreeMap::new(), false)
    }

    /// Create an empty, frozen store
    pub fn new_frozen<S: Into<String>>(name: S) -> Self {
        Self::with_entries(name.into(), BTreeMap::new(), true)
    }

    /// Copy another store's name and entries
    pub fn from_store(other: &ValueStore, frozen: bool) -> Self {
        Self::with_entries(other.name.clone(), other.snapshot(), frozen)
    }

    /// Rebuild a mutable store from the `{ "name": ..., "map": {...} }`
    /// envelope produced by [`ValueStore::serialize`]
    pub fn from_serialized(envelope: &JsonValue) -> Result<Self> {
        let (name, map) = split_envelope(envelope)?;
        let store = Self::new(name);
        store.put_all_from_structured(map)?;
        Ok(store)
    }

    fn with_entries(name: String, entries: BTreeMap<String, Value>, frozen: bool) -> Self {
        Self {
            name,
            entries: RwLock::new(entries),
            frozen,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Return a frozen version of this store.
    ///
    /// A frozen store is returned as the same `Arc`; a mutable one is
    /// snapshotted into a new frozen store and left untouched itself.
    pub fn freeze(self: &Arc<Self>) -> Arc<Self> {
        if self.frozen {
            return Arc::clone(self);
        }
        debug!(store = %self.name, "freezing config snapshot");
        Arc::new(Self::from_store(self, true))
    }

    /// Consume a store and return it frozen.
    ///
    /// Frozen and mutable stores share one type because registered stores
    /// are shared as `Arc<ValueStore>` and cannot be consumed; mutators on a
    /// frozen store fail with `Immutable` instead.
    pub fn into_frozen(self) -> Self {
        if !self.frozen {
            debug!(store = %self.name, "freezing owned config");
        }
        Self {
            frozen: true,
            ..self
        }
    }

    /* -- Modifiers -- */

    fn check_mutable(&self) -> Result<()> {
        if self.frozen {
            return Err(KvconfError::immutable(&self.name));
        }
        Ok(())
    }

    fn apply(entries: &mut BTreeMap<String, Value>, key: String, value: Value) -> Option<Value> {
        if value.is_null() {
            entries.remove(&key)
        } else {
            entries.insert(key, value)
        }
    }

    /// Store `value` under `key`, returning the previous value.
    ///
    /// Putting [`Value::Null`] removes the key. Values holding a non-finite
    /// float are rejected with `InvalidValue`.
    pub fn put<K: Into<String>, V: Into<Value>>(&self, key: K, value: V) -> Result<Option<Value>> {
        self.check_mutable()?;
        let key = key.into();
        let value = value.into();
        value.validate(&key)?;
        debug!(store = %self.name, key = %key, kind = %value.value_type(), "put");
        let mut entries = self.entries.write();
        Ok(Self::apply(&mut entries, key, value))
    }

    /// Apply `put` for every pair, in iteration order, under one lock.
    ///
    /// Every value is validated first; if any is non-storable the call
    /// fails with `InvalidValue` and nothing is applied.
    pub fn put_all<I, K>(&self, values: I) -> Result<PreviousValues>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.check_mutable()?;
        let batch: Vec<(String, Value)> = values
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();
        for (key, value) in &batch {
            value.validate(key).inspect_err(|e| {
                warn!(store = %self.name, error = %e, "rejected batch");
            })?;
        }

        let mut previous = PreviousValues::new();
        let mut entries = self.entries.write();
        for (key, value) in batch {
            let old = Self::apply(&mut entries, key.clone(), value);
            previous.insert(key, old);
        }
        debug!(store = %self.name, count = previous.len(), "put_all");
        Ok(previous)
    }

    /// Import the members of a JSON object.
    ///
    /// The whole object is converted before anything is stored, so a
    /// non-storable member leaves the store unchanged.
    pub fn put_all_json(&self, object: &JsonMap<String, JsonValue>) -> Result<PreviousValues> {
        self.check_mutable()?;
        let converted = convert_object(object).inspect_err(|e| {
            warn!(store = %self.name, error = %e, "rejected JSON import");
        })?;
        self.put_all(converted)
    }

    /// Import a parsed JSON tree whose root is an object
    pub fn put_all_from_structured(&self, tree: &JsonValue) -> Result<PreviousValues> {
        self.check_mutable()?;
        let converted = convert_structured(tree).inspect_err(|e| {
            warn!(store = %self.name, error = %e, "rejected JSON import");
        })?;
        self.put_all(converted)
    }

    pub fn remove(&self, key: &str) -> Result<Option<Value>> {
        self.put(key, Value::Null)
    }

    /// Remove every key, in iteration order, under one lock
    pub fn remove_all<I, K>(&self, keys: I) -> Result<PreviousValues>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.put_all(keys.into_iter().map(|key| (key, Value::Null)))
    }

    /* -- Getters -- */

    pub fn has(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn has_all(&self, keys: &[&str]) -> bool {
        let entries = self.entries.read();
        keys.iter().all(|key| entries.contains_key(*key))
    }

    pub fn has_type(&self, key: &str, ty: ValueType) -> bool {
        self.entries
            .read()
            .get(key)
            .is_some_and(|value| value.is_type(ty))
    }

    pub fn has_all_types<'a, I>(&self, types: I) -> bool
    where
        I: IntoIterator<Item = (&'a str, ValueType)>,
    {
        let entries = self.entries.read();
        types
            .into_iter()
            .all(|(key, ty)| entries.get(key).is_some_and(|value| value.is_type(ty)))
    }

    pub fn get(&self, key: &str) -> Result<Value> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| KvconfError::not_found(key))
    }

    /// Get a value and extract it as `T`, failing on any type mismatch
    pub fn get_typed<T: FromValue>(&self, key: &str) -> Result<T> {
        let entries = self.entries.read();
        let value = entries.get(key).ok_or_else(|| KvconfError::not_found(key))?;
        T::from_value(value).ok_or_else(|| KvconfError::wrong_type(key, T::expected()))
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get_typed(key)
    }

    pub fn get_boolean(&self, key: &str) -> Result<bool> {
        self.get_typed(key)
    }

    pub fn get_integer(&self, key: &str) -> Result<i32> {
        self.get_typed(key)
    }

    pub fn get_long(&self, key: &str) -> Result<i64> {
        self.get_typed(key)
    }

    pub fn get_float(&self, key: &str) -> Result<f32> {
        self.get_typed(key)
    }

    pub fn get_map(&self, key: &str) -> Result<BTreeMap<String, Value>> {
        self.get_typed(key)
    }

    pub fn get_list(&self, key: &str) -> Result<Vec<Value>> {
        self.get_typed(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Consistent copy of all entries
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.entries.read().clone()
    }

    /* -- Export -- */

    /// Structural form: `{ "name": <name>, "map": { ...entries... } }`.
    ///
    /// Returns a JSON tree; not to be confused with the `serde::Serialize`
    /// impl below. [`ValueStore::to_json_string`] renders the same tree as
    /// text, identical to `serde_json::to_string(&store)`.
    pub fn serialize(&self) -> JsonValue {
        let map: JsonMap<String, JsonValue> = {
            let entries = self.entries.read();
            entries
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect()
        };
        json!({ "name": self.name, "map": map })
    }

    pub fn to_json_string(&self) -> String {
        self.serialize().to_string()
    }
}

/// Split a serialized envelope into its store name and entry map
pub fn split_envelope(envelope: &JsonValue) -> Result<(&str, &JsonValue)> {
    let name = envelope
        .get("name")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| KvconfError::invalid_value("name", "expected a string store name"))?;
    let map = envelope
        .get("map")
        .ok_or_else(|| KvconfError::invalid_value("map", "envelope has no entry map"))?;
    Ok((name, map))
}

impl fmt::Display for ValueStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_string())
    }
}

impl Serialize for ValueStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entries = self.entries.read();
        let mut state = serializer.serialize_struct("ValueStore", 2)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("map", &*entries)?;
        state.end()
    }
}
