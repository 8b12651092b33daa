use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One attribute's value before and after a change, serialized as `[old, new]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change(pub Value, pub Value);

impl Change {
    pub fn new(old: Value, new: Value) -> Self {
        Change(old, new)
    }

    pub fn old(&self) -> &Value {
        &self.0
    }

    pub fn new_value(&self) -> &Value {
        &self.1
    }
}

/// Attribute name -> (old, new) payload of a version record.
///
/// Ordered by attribute name so payloads serialize deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet(BTreeMap<String, Change>);

impl ChangeSet {
    pub fn new() -> Self {
        ChangeSet::default()
    }

    pub fn insert(&mut self, attribute: impl Into<String>, change: Change) {
        self.0.insert(attribute.into(), change);
    }

    pub fn get(&self, attribute: &str) -> Option<&Change> {
        self.0.get(attribute)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.0.contains_key(attribute)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Change)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Change)> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = (K, Change)>>(iter: I) -> Self {
        ChangeSet(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
