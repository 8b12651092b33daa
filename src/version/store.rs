use super::{NewVersion, Order, StoreError, VersionQuery, VersionRecord};

/// The secondary foreign key a scoped store stamps on its records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeDefinition {
    /// Association name on the versioned entity, e.g. `rifle`.
    pub association: String,
    /// Column holding the scope target's id, e.g. `rifle_id`.
    pub foreign_key: String,
    /// Entity type the scope points at, e.g. `Rifle`.
    pub target_type: String,
}

impl ScopeDefinition {
    pub fn new(association: impl Into<String>, target_type: impl Into<String>) -> Self {
        let association = association.into();
        ScopeDefinition {
            foreign_key: format!("{}_id", association),
            association,
            target_type: target_type.into(),
        }
    }
}

/// Append-only storage for version records.
///
/// Records are never updated. They are removed only by `destroy_all` when
/// their entity is destroyed, or by an explicit `clear`.
pub trait VersionStore: Send + Sync {
    /// Number of versions recorded for an entity.
    fn count(&self, versionable_type: &str, versionable_id: &str) -> Result<u64, StoreError>;

    /// Persist a version with an explicit number.
    ///
    /// Fails with `ConstraintViolation` if the entity already has that number.
    fn create(&self, version: NewVersion, number: u64) -> Result<VersionRecord, StoreError>;

    /// Persist a version numbered after the entity's existing versions.
    ///
    /// Counting and inserting happen as one atomic step.
    fn append(&self, version: NewVersion) -> Result<VersionRecord, StoreError>;

    fn all(&self, query: &VersionQuery) -> Result<Vec<VersionRecord>, StoreError>;

    /// Delete every version of an entity, whatever its scope. Returns the number removed.
    fn destroy_all(&self, versionable_type: &str, versionable_id: &str)
        -> Result<usize, StoreError>;

    /// Delete every record in the store.
    fn clear(&self) -> Result<usize, StoreError>;

    fn scope(&self) -> Result<Option<ScopeDefinition>, StoreError>;

    /// Add the scope foreign key to this store's schema.
    fn add_scope(&self, scope: ScopeDefinition) -> Result<(), StoreError>;

    fn is_scoped(&self) -> Result<bool, StoreError> {
        Ok(self.scope()?.is_some())
    }

    fn scope_key(&self) -> Result<Option<String>, StoreError> {
        Ok(self.scope()?.map(|s| s.foreign_key))
    }

    fn scoped_on(&self) -> Result<Option<String>, StoreError> {
        Ok(self.scope()?.map(|s| s.target_type))
    }

    /// Every version of one entity, merged over `query`.
    fn for_entity(
        &self,
        versionable_type: &str,
        versionable_id: &str,
        query: VersionQuery,
    ) -> Result<Vec<VersionRecord>, StoreError> {
        let defaults = VersionQuery::new().for_entity(versionable_type, versionable_id);
        self.all(&defaults.merge(query))
    }

    /// Recent activity across all entities: newest first, 20 by default.
    fn latest(&self, query: VersionQuery) -> Result<Vec<VersionRecord>, StoreError> {
        let defaults = VersionQuery::new()
            .order(Order::created_at_desc())
            .limit(20);
        self.all(&defaults.merge(query))
    }

    /// Versions stamped with a scope target's id, newest first.
    fn scoped(&self, scope_reference: &str, query: VersionQuery) -> Result<Vec<VersionRecord>, StoreError> {
        let defaults = VersionQuery::new()
            .scoped_to(scope_reference)
            .order(Order::created_at_desc());
        self.all(&defaults.merge(query))
    }
}
