use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::change::ChangeSet;
use crate::model::{Model, ModelError, ModelStore};

/// One immutable entry in an entity's version history.
///
/// `number == 0` is the creation event and carries an empty changeset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: u64,
    pub versionable_type: String,
    pub versionable_id: String,
    pub number: u64,
    pub data: ChangeSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_reference: Option<String>,
    pub created_at: SystemTime,
}

impl VersionRecord {
    pub fn is_initial(&self) -> bool {
        self.number == 0
    }

    pub fn changeset(&self) -> &ChangeSet {
        &self.data
    }

    pub fn belongs_to(&self, versionable_type: &str, versionable_id: &str) -> bool {
        self.versionable_type == versionable_type && self.versionable_id == versionable_id
    }

    /// Load the entity this version was recorded for.
    ///
    /// Returns `None` when the record belongs to another type or the entity
    /// no longer exists.
    pub fn object<M, S>(&self, store: &S) -> Result<Option<M>, ModelError>
    where
        M: Model,
        S: ModelStore,
    {
        if self.versionable_type != M::TYPE_NAME {
            return Ok(None);
        }
        store.get_model::<M>(&self.versionable_id)
    }
}

/// A version about to be written. The store assigns `id`, `created_at`
/// and, through `append`, the `number`.
#[derive(Clone, Debug, PartialEq)]
pub struct NewVersion {
    pub versionable_type: String,
    pub versionable_id: String,
    pub data: ChangeSet,
    pub user_reference: Option<String>,
    pub scope_reference: Option<String>,
}

impl NewVersion {
    pub fn new(versionable_type: impl Into<String>, versionable_id: impl Into<String>) -> Self {
        NewVersion {
            versionable_type: versionable_type.into(),
            versionable_id: versionable_id.into(),
            data: ChangeSet::new(),
            user_reference: None,
            scope_reference: None,
        }
    }

    pub fn with_data(mut self, data: ChangeSet) -> Self {
        self.data = data;
        self
    }

    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user_reference = user;
        self
    }

    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope_reference = scope;
        self
    }

    pub(crate) fn into_record(self, id: u64, number: u64) -> VersionRecord {
        VersionRecord {
            id,
            versionable_type: self.versionable_type,
            versionable_id: self.versionable_id,
            number,
            data: self.data,
            user_reference: self.user_reference,
            scope_reference: self.scope_reference,
            created_at: SystemTime::now(),
        }
    }
}
