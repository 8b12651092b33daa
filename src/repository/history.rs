use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use super::VersionedRepository;
use crate::error::VersioningError;
use crate::model::{Model, ModelStore};
use crate::version::{Order, VersionQuery, VersionRecord};
use crate::watched::Watched;

impl<S, T> VersionedRepository<S, T>
where
    S: ModelStore,
    T: Model,
{
    /// Versions of the entity newest first, without the creation event.
    ///
    /// `query` is merged over the defaults, so callers can set a limit or
    /// a different order. An unsaved entity has no versions.
    pub fn versions(
        &self,
        watched: &Watched<T>,
        query: VersionQuery,
    ) -> Result<Vec<VersionRecord>, VersioningError> {
        if watched.is_new() {
            return Ok(Vec::new());
        }

        let defaults = VersionQuery::new()
            .after_number(0)
            .order(Order::number_desc());
        let versions = self.version_store().for_entity(
            T::TYPE_NAME,
            &watched.id(),
            defaults.merge(query),
        )?;
        Ok(versions)
    }

    pub fn previous_version(
        &self,
        watched: &Watched<T>,
    ) -> Result<Option<VersionRecord>, VersioningError> {
        let versions = self.versions(watched, VersionQuery::new().limit(1))?;
        Ok(versions.into_iter().next())
    }

    /// Undo the last `depth` versions in memory. Nothing is saved.
    pub fn revert(&self, watched: &mut Watched<T>, depth: usize) -> Result<(), VersioningError> {
        let history = self.versions(watched, VersionQuery::new().limit(depth))?;
        let restored = reverted_values(&history);

        debug!(
            entity_type = T::TYPE_NAME,
            id = %watched.id(),
            depth,
            attributes = restored.len(),
            "reverting"
        );

        let mut staged = watched.clone();
        for (attribute, value) in restored {
            staged.assign(&attribute, value)?;
        }
        *watched = staged;
        Ok(())
    }

    /// Revert then save. The revert is recorded as a new version.
    pub fn revert_and_save(
        &self,
        watched: &mut Watched<T>,
        depth: usize,
    ) -> Result<Option<VersionRecord>, VersioningError> {
        self.revert(watched, depth)?;
        self.save(watched)
    }

    /// Versions stamped with this entity's id by stores scoped on its type,
    /// newest first.
    pub fn scoped_versions(
        &self,
        target: &Watched<T>,
        query: VersionQuery,
    ) -> Result<Vec<VersionRecord>, VersioningError> {
        if target.is_new() {
            return Ok(Vec::new());
        }

        let id = target.id();
        let stores = self.scoped_stores()?;
        let mut versions = Vec::new();
        for store in &stores {
            versions.extend(store.scoped(&id, query.clone())?);
        }

        if stores.len() > 1 {
            let combined = VersionQuery::new()
                .order(Order::created_at_desc())
                .merge(VersionQuery {
                    order: query.order,
                    limit: query.limit,
                    ..VersionQuery::default()
                });
            versions = combined.apply(versions.iter());
        }
        Ok(versions)
    }

    /// Recent activity across every entity in this type's store.
    pub fn latest(&self, query: VersionQuery) -> Result<Vec<VersionRecord>, VersioningError> {
        Ok(self.version_store().latest(query)?)
    }
}

/// Old values to restore for a window of versions given newest first.
///
/// Older versions overwrite newer ones, so each attribute returns to its
/// value before the oldest change in the window.
fn reverted_values(history: &[VersionRecord]) -> BTreeMap<String, Value> {
    let mut restored = BTreeMap::new();
    for version in history {
        for (attribute, change) in version.data.iter() {
            restored.insert(attribute.to_string(), change.old().clone());
        }
    }
    restored
}
