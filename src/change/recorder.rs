use std::collections::BTreeMap;

use serde_json::Value;

use super::PendingChangeSet;
use crate::attribute::{Property, Versionable};

/// Last persisted value of each versioned attribute.
pub type Baseline = BTreeMap<String, Value>;

fn current_value<T: Versionable>(record: &T, property: &Property) -> Value {
    property.typecast(&record.read_attribute(property.name).unwrap_or(Value::Null))
}

/// Capture the typecast value of every given property.
pub fn snapshot<T: Versionable>(record: &T, properties: &[Property]) -> Baseline {
    properties
        .iter()
        .map(|p| (p.name.to_string(), current_value(record, p)))
        .collect()
}

/// Compare the current attribute values against a baseline.
///
/// `null -> null` is unchanged; `null -> value` is a change.
pub fn diff<T: Versionable>(
    record: &T,
    baseline: &Baseline,
    properties: &[Property],
) -> PendingChangeSet {
    let mut pending = PendingChangeSet::new();
    for property in properties {
        let old = baseline.get(property.name).cloned().unwrap_or(Value::Null);
        let new = current_value(record, property);
        if old != new {
            pending.record(property.name, old, new);
        }
    }
    pending
}
