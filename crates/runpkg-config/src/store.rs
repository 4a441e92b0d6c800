//! Typed key/value configuration store
//!
//! A `ConfigStore` maps keys to string, integer or boolean values. Lookups
//! are typed and never fail: an absent key, or a key holding a value of a
//! different kind, yields the caller's default.
//!
//! Documents are loaded permissively. Every top-level field whose value is a
//! string, integer or boolean is kept; nested tables, arrays, nulls and
//! floats are skipped.
//!
//! Because every key holds exactly one value, saving a store and loading
//! the document back reproduces it exactly.

use crate::error::{Error, Result};
use crate::value::ConfigValue;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    values: BTreeMap<String, ConfigValue>,
}

impl ConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a structured document.
    pub fn from_json(doc: &Value) -> Self {
        let mut store = Self::new();
        store.load_from_json(doc);
        store
    }

    /// Read a store from a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut store = Self::new();
        store.load_from_file(path)?;
        Ok(store)
    }

    /// Insert every primitive top-level field of `doc`.
    ///
    /// Returns the number of fields accepted. A non-object document
    /// contributes nothing.
    pub fn load_from_json(&mut self, doc: &Value) -> usize {
        let Some(fields) = doc.as_object() else {
            tracing::debug!("Ignoring non-object config document");
            return 0;
        };

        let mut accepted = 0;
        for (key, value) in fields {
            match ConfigValue::from_json(value) {
                Some(value) => {
                    self.values.insert(key.clone(), value);
                    accepted += 1;
                }
                None => tracing::debug!(key = %key, "Skipping config field with unsupported value kind"),
            }
        }
        accepted
    }

    /// Merge the fields of a config file into this store.
    ///
    /// On failure the store is left untouched and a diagnostic is logged.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let doc: Value = runpkg_fs::load_document(path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load config file");
            Error::from(e)
        })?;

        if !doc.is_object() {
            tracing::warn!(path = %path.display(), "Config file is not a key/value table");
            return Err(Error::NotAnObject {
                path: path.to_path_buf(),
            });
        }

        self.load_from_json(&doc);
        Ok(())
    }

    /// Write the store as a single document, format chosen by extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        runpkg_fs::save_document(path, &self.to_json()).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Failed to save config file");
            Error::from(e)
        })
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .and_then(ConfigValue::as_str)
            .unwrap_or(default)
            .to_string()
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values
            .get(key)
            .and_then(ConfigValue::as_int)
            .unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values
            .get(key)
            .and_then(ConfigValue::as_bool)
            .unwrap_or(default)
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, ConfigValue::String(value.into()));
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.set(key, ConfigValue::Int(value));
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, ConfigValue::Bool(value));
    }

    /// Set a value of any kind, returning the previous one.
    ///
    /// Setting a key to a different kind replaces the old value.
    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) -> Option<ConfigValue> {
        let key = key.into();
        let kind = value.kind();
        let previous = self.values.insert(key.clone(), value);
        if let Some(old) = previous.as_ref().filter(|old| old.kind() != kind) {
            tracing::debug!(key = %key, from = %old.kind(), to = %kind, "Config key changed kind");
        }
        previous
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Overwrite this store with every key present in `other`.
    pub fn overlay(&mut self, other: &ConfigStore) {
        for (key, value) in &other.values {
            self.set(key.clone(), value.clone());
        }
    }

    /// Render the store as a flat document object.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl<K: Into<String>> FromIterator<(K, ConfigValue)> for ConfigStore {
    fn from_iter<I: IntoIterator<Item = (K, ConfigValue)>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl<K: Into<String>> Extend<(K, ConfigValue)> for ConfigStore {
    fn extend<I: IntoIterator<Item = (K, ConfigValue)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}
