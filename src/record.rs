// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The canonical log record.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;
use serde_json::Value;

use crate::Level;

pub(crate) const LEVEL: &str = "level";
pub(crate) const MESSAGE: &str = "message";
pub(crate) const TIMESTAMP: &str = "timestamp";

/// One normalized log entry.
///
/// A record is a mapping from field name to JSON value. It always carries a `level` field
/// once normalized, plus a `message` field that is either text or a structured value. Any other
/// field is caller metadata. Fields are kept in lexicographic key order, so serializing a record
/// always produces the same output for the same content.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create a record with the given level and message and no metadata.
    pub fn new(level: Level, message: impl Into<Value>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(MESSAGE.to_string(), message.into());
        fields.insert(LEVEL.to_string(), Value::String(level.name().to_string()));
        Self { fields }
    }

    /// Build a record from caller input.
    ///
    /// The message is kept as-is under `message`; a structured message stays nested. Metadata
    /// fields are merged at the top level and may shadow `message`, but never `level`. Returns
    /// `None` if the metadata is neither null nor a mapping.
    pub(crate) fn normalize(level: Level, message: Value, metadata: Value) -> Option<Self> {
        let mut fields = BTreeMap::new();
        fields.insert(MESSAGE.to_string(), message);
        match metadata {
            Value::Null => {}
            Value::Object(map) => fields.extend(map),
            _ => return None,
        }
        fields.insert(LEVEL.to_string(), Value::String(level.name().to_string()));
        Some(Self { fields })
    }

    /// Set a field, returning this record.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// The `level` field, if present and textual.
    pub fn level(&self) -> Option<&str> {
        self.fields.get(LEVEL).and_then(Value::as_str)
    }

    /// The `message` field.
    pub fn message(&self) -> Option<&Value> {
        self.fields.get(MESSAGE)
    }

    /// The `message` field if it is text.
    ///
    /// Filters only ever see records for which this returns `Some`.
    pub fn text(&self) -> Option<&str> {
        self.message().and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over all fields in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    /// Iterate over the caller metadata, i.e. every field except `level`, `message` and
    /// `timestamp`, in key order.
    pub fn metadata(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), LEVEL | MESSAGE | TIMESTAMP))
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
