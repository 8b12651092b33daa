use serde_json::Value;

use super::{Change, ChangeSet};

/// Changes buffered on one entity instance between saves.
///
/// Filled from the baseline diff, so each attribute is recorded at most once
/// per save. A value equal to its baseline is not a change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingChangeSet {
    changes: ChangeSet,
}

impl PendingChangeSet {
    pub fn new() -> Self {
        PendingChangeSet::default()
    }

    pub fn record(&mut self, attribute: &str, old: Value, new: Value) {
        if old != new {
            self.changes.insert(attribute, Change::new(old, new));
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&Change> {
        self.changes.get(attribute)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn clear(&mut self) {
        self.changes = ChangeSet::new();
    }

    pub fn as_change_set(&self) -> &ChangeSet {
        &self.changes
    }
}
