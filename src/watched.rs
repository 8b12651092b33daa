use std::fmt;
use std::ops::{Deref, DerefMut};

use serde_json::Value;

use crate::attribute::{AttributeError, Property, Versionable};
use crate::change::{diff, snapshot, Baseline, ChangeSet, PendingChangeSet};

/// An entity instance under version tracking.
///
/// Holds the entity plus the bookkeeping that lives between saves: the
/// baseline of last persisted attribute values, the pending changes captured
/// at save time, the just-created flag and the attribution override.
pub struct Watched<T> {
    record: T,
    baseline: Option<Baseline>,
    pending: PendingChangeSet,
    updated_by: Option<String>,
    just_created: bool,
}

impl<T: fmt::Debug> fmt::Debug for Watched<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watched")
            .field("record", &self.record)
            .field("persisted", &self.baseline.is_some())
            .field("pending", &self.pending)
            .field("updated_by", &self.updated_by)
            .finish()
    }
}

impl<T: Clone> Clone for Watched<T> {
    fn clone(&self) -> Self {
        Watched {
            record: self.record.clone(),
            baseline: self.baseline.clone(),
            pending: self.pending.clone(),
            updated_by: self.updated_by.clone(),
            just_created: self.just_created,
        }
    }
}

impl<T> Deref for Watched<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

impl<T> DerefMut for Watched<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.record
    }
}

impl<T: Versionable> Watched<T> {
    /// Wrap an entity that has not been persisted yet.
    pub fn new(record: T) -> Self {
        Watched {
            record,
            baseline: None,
            pending: PendingChangeSet::new(),
            updated_by: None,
            just_created: false,
        }
    }

    /// Wrap an entity loaded from storage; its current values become the baseline.
    pub(crate) fn persisted(record: T, properties: &[Property]) -> Self {
        let baseline = snapshot(&record, properties);
        Watched {
            record,
            baseline: Some(baseline),
            pending: PendingChangeSet::new(),
            updated_by: None,
            just_created: false,
        }
    }

    pub fn id(&self) -> String {
        self.record.id()
    }

    pub fn record(&self) -> &T {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut T {
        &mut self.record
    }

    pub fn into_inner(self) -> T {
        self.record
    }

    /// True until the first successful save.
    pub fn is_new(&self) -> bool {
        self.baseline.is_none()
    }

    pub fn read(&self, attribute: &str) -> Option<Value> {
        self.record.read_attribute(attribute)
    }

    /// Assign an attribute, coercing the value to the attribute's declared kind.
    pub fn assign(&mut self, attribute: &str, value: Value) -> Result<(), AttributeError> {
        let property = T::property(attribute).ok_or_else(|| AttributeError::Unknown {
            entity_type: T::TYPE_NAME.to_string(),
            attribute: attribute.to_string(),
        })?;
        self.record
            .write_attribute(attribute, property.typecast(&value))
    }

    pub fn assign_all<I, K>(&mut self, attributes: I) -> Result<(), AttributeError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        for (attribute, value) in attributes {
            self.assign(attribute.as_ref(), value)?;
        }
        Ok(())
    }

    /// The explicitly set attribution, if any.
    pub fn updated_by(&self) -> Option<&str> {
        self.updated_by.as_deref()
    }

    pub fn set_updated_by(&mut self, user: impl Into<String>) {
        self.updated_by = Some(user.into());
    }

    pub fn clear_updated_by(&mut self) {
        self.updated_by = None;
    }

    /// Changes captured by the save in progress.
    pub fn pending_changes(&self) -> &PendingChangeSet {
        &self.pending
    }

    /// Preview what a save would record for the given versioned properties.
    pub fn dirty_changes(&self, properties: &[Property]) -> PendingChangeSet {
        match &self.baseline {
            Some(baseline) => diff(&self.record, baseline, properties),
            None => PendingChangeSet::new(),
        }
    }

    pub fn is_just_created(&self) -> bool {
        self.just_created
    }

    pub(crate) fn before_create(&mut self) {
        self.just_created = true;
    }

    /// Fill the pending change set from the baseline diff.
    pub(crate) fn capture(&mut self, properties: &[Property]) {
        self.pending = self.dirty_changes(properties);
    }

    pub(crate) fn pending_change_set(&self) -> ChangeSet {
        self.pending.as_change_set().clone()
    }

    /// The entity write committed: current values become the new baseline.
    pub(crate) fn mark_persisted(&mut self, properties: &[Property]) {
        self.baseline = Some(snapshot(&self.record, properties));
    }

    pub(crate) fn finish_save(&mut self) {
        self.pending.clear();
        self.just_created = false;
    }

    /// The entity was deleted; a later save inserts it afresh.
    pub(crate) fn mark_destroyed(&mut self) {
        self.baseline = None;
        self.pending.clear();
        self.just_created = false;
    }
}
