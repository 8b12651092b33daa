use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::{NewVersion, ScopeDefinition, StoreError, VersionQuery, VersionRecord, VersionStore};

/// In-memory version store backed by `Arc<RwLock<Vec>>`.
///
/// Clone-friendly (cloning shares the same underlying storage).
#[derive(Clone)]
pub struct InMemoryVersionStore {
    records: Arc<RwLock<Vec<VersionRecord>>>,
    sequence: Arc<AtomicU64>,
    scope: Arc<RwLock<Option<ScopeDefinition>>>,
}

impl Default for InMemoryVersionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryVersionStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            sequence: Arc::new(AtomicU64::new(1)),
            scope: Arc::new(RwLock::new(None)),
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("version read"))?;
        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }
}

fn count_for(records: &[VersionRecord], versionable_type: &str, versionable_id: &str) -> u64 {
    records
        .iter()
        .filter(|r| r.belongs_to(versionable_type, versionable_id))
        .count() as u64
}

/// One past the highest number recorded for the entity, so explicit
/// `create` gaps are never reused.
fn next_number(records: &[VersionRecord], versionable_type: &str, versionable_id: &str) -> u64 {
    records
        .iter()
        .filter(|r| r.belongs_to(versionable_type, versionable_id))
        .map(|r| r.number + 1)
        .max()
        .unwrap_or(0)
}

impl VersionStore for InMemoryVersionStore {
    fn count(&self, versionable_type: &str, versionable_id: &str) -> Result<u64, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("version read"))?;
        Ok(count_for(&records, versionable_type, versionable_id))
    }

    fn create(&self, version: NewVersion, number: u64) -> Result<VersionRecord, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::LockPoisoned("version write"))?;

        let duplicate = records.iter().any(|r| {
            r.number == number && r.belongs_to(&version.versionable_type, &version.versionable_id)
        });
        if duplicate {
            return Err(StoreError::ConstraintViolation {
                versionable_type: version.versionable_type,
                versionable_id: version.versionable_id,
                number,
            });
        }

        let record = version.into_record(self.next_id(), number);
        records.push(record.clone());
        Ok(record)
    }

    fn append(&self, version: NewVersion) -> Result<VersionRecord, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::LockPoisoned("version write"))?;

        let number = next_number(&records, &version.versionable_type, &version.versionable_id);
        let record = version.into_record(self.next_id(), number);
        records.push(record.clone());
        Ok(record)
    }

    fn all(&self, query: &VersionQuery) -> Result<Vec<VersionRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("version read"))?;
        Ok(query.apply(records.iter()))
    }

    fn destroy_all(
        &self,
        versionable_type: &str,
        versionable_id: &str,
    ) -> Result<usize, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::LockPoisoned("version write"))?;
        let before = records.len();
        records.retain(|r| !r.belongs_to(versionable_type, versionable_id));
        Ok(before - records.len())
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::LockPoisoned("version write"))?;
        let removed = records.len();
        records.clear();
        Ok(removed)
    }

    fn scope(&self) -> Result<Option<ScopeDefinition>, StoreError> {
        let scope = self
            .scope
            .read()
            .map_err(|_| StoreError::LockPoisoned("scope read"))?;
        Ok(scope.clone())
    }

    fn add_scope(&self, scope: ScopeDefinition) -> Result<(), StoreError> {
        let mut current = self
            .scope
            .write()
            .map_err(|_| StoreError::LockPoisoned("scope write"))?;
        *current = Some(scope);
        Ok(())
    }
}
