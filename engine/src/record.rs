//! Records: schemaless documents with per-key change tracking.
//!
//! A record remembers which of its keys were touched since it was last
//! loaded from the remote store. Nested records track their own keys, so a
//! change deep inside a tree is visible from the root through
//! [`Record::has_changes_deep`].

use crate::{error::Result, Error, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// A JSON object as sent to or received from the remote store.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// A mutable key/value document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// Field values, ordered by key for deterministic output
    fields: BTreeMap<String, Value>,
    /// Keys changed at this node since the last clean state
    dirty: BTreeSet<String>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clean record from decoded JSON.
    pub fn from_map(map: JsonMap) -> Self {
        let mut record = Self::new();
        record.set_from_map(map);
        record
    }

    /// Store `value` under `key` and mark the key dirty.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        self.dirty.insert(key.clone());
        self.fields.insert(key, value.into());
    }

    /// Append `value` to the array under `key`.
    ///
    /// A missing key starts a new array. Fails without touching the record
    /// if the key holds anything other than an array.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        let mut items = match self.fields.get(&key) {
            None => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(other) => {
                return Err(Error::TypeMismatch {
                    field: key,
                    expected: "array".into(),
                    got: other.kind().into(),
                })
            }
        };
        items.push(value.into());
        self.set(key, Value::Array(items));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_array(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_array)
    }

    pub fn get_object(&self, key: &str) -> Option<&Record> {
        self.get(key).and_then(Value::as_object)
    }

    /// Mutable access to a nested record.
    ///
    /// Changes made through it are tracked by the nested record itself, not
    /// by this one.
    pub fn get_object_mut(&mut self, key: &str) -> Option<&mut Record> {
        self.fields.get_mut(key).and_then(Value::as_object_mut)
    }

    /// Remove `key`. The removal is recorded as a change even if the key was
    /// absent.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.dirty.insert(key.to_string());
        self.fields.remove(key)
    }

    /// Get the nested record under `key`, creating an empty one if the key
    /// is absent.
    pub fn assert_object(&mut self, key: &str) -> Result<&mut Record> {
        if !self.fields.contains_key(key) {
            self.set(key, Record::new());
        }
        match self.fields.get_mut(key) {
            Some(Value::Object(record)) => Ok(record),
            other => Err(Error::TypeConflict {
                key: key.to_string(),
                found: other.map_or("null", |v| v.kind()).into(),
            }),
        }
    }

    /// Merge data loaded from the remote store.
    ///
    /// Nested JSON objects become nested records. Listed keys are
    /// overwritten, others are kept. Afterwards the whole tree is clean.
    pub fn set_from_map(&mut self, map: JsonMap) {
        for (key, json) in map {
            self.fields.insert(key, Value::from_json(json));
        }
        self.clear_changes();
    }

    /// Forget every change marker in this record and all nested records.
    pub fn clear_changes(&mut self) {
        self.dirty.clear();
        for value in self.fields.values_mut() {
            if let Value::Object(nested) = value {
                nested.clear_changes();
            }
        }
    }

    /// Whether any key was changed directly on this node.
    pub fn has_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Whether this node or any nested record has changes.
    pub fn has_changes_deep(&self) -> bool {
        self.has_changes()
            || self
                .fields
                .values()
                .filter_map(Value::as_object)
                .any(Record::has_changes_deep)
    }

    /// Whether `key` was changed directly on this node.
    pub fn is_dirty(&self, key: &str) -> bool {
        self.dirty.contains(key)
    }

    /// Keys changed directly on this node, including removed ones.
    pub fn changed_keys(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    /// Build a JSON map of the fields accepted by `predicate`.
    ///
    /// The predicate runs only on the top-level keys of this record and
    /// receives `self` as its first argument. It never sees the keys of
    /// nested records: a nested record whose key passes is emitted whole.
    pub fn to_filtered_map<F>(&self, predicate: F) -> JsonMap
    where
        F: Fn(&Record, &str) -> bool,
    {
        self.fields
            .iter()
            .filter(|(key, _)| predicate(self, key.as_str()))
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect()
    }

    /// All fields as a JSON map.
    pub fn to_map(&self) -> JsonMap {
        self.to_filtered_map(|_, _| true)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(&self.fields)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        JsonMap::deserialize(deserializer).map(Record::from_map)
    }
}
