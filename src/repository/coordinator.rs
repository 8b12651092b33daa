use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::attribute::Property;
use crate::config::VersioningConfig;
use crate::error::VersioningError;
use crate::model::{Model, ModelError, ModelStore};
use crate::policy::should_create_version;
use crate::registry::StoreCatalog;
use crate::version::{NewVersion, StoreError, VersionRecord, VersionStore};
use crate::watched::Watched;

/// Versioning coordinator for one entity type over an entity store.
pub struct VersionedRepository<S, T> {
    models: S,
    store: Arc<dyn VersionStore>,
    config: Arc<VersioningConfig<T>>,
    catalog: StoreCatalog,
    properties: Vec<Property>,
}

impl<S, T> VersionedRepository<S, T>
where
    S: ModelStore,
    T: Model,
{
    pub(crate) fn new(
        models: S,
        store: Arc<dyn VersionStore>,
        config: Arc<VersioningConfig<T>>,
        catalog: StoreCatalog,
    ) -> Self {
        let properties = config.versioned_properties();
        VersionedRepository {
            models,
            store,
            config,
            catalog,
            properties,
        }
    }

    pub fn models(&self) -> &S {
        &self.models
    }

    /// The version store this type writes to.
    pub fn version_store(&self) -> &Arc<dyn VersionStore> {
        &self.store
    }

    pub fn config(&self) -> &VersioningConfig<T> {
        &self.config
    }

    /// Properties whose changes are recorded.
    pub fn versioned_properties(&self) -> &[Property] {
        &self.properties
    }

    /// Stores scoped on this type, resolved at call time.
    pub(crate) fn scoped_stores(&self) -> Result<Vec<Arc<dyn VersionStore>>, StoreError> {
        self.catalog.scoped_on(T::TYPE_NAME)
    }

    /// Start tracking an entity that has not been saved yet.
    pub fn build(&self, record: T) -> Watched<T> {
        Watched::new(record)
    }

    pub fn find(&self, id: &str) -> Result<Option<Watched<T>>, VersioningError> {
        let record = self.models.get_model::<T>(id)?;
        Ok(record.map(|record| Watched::persisted(record, &self.properties)))
    }

    /// Replace the in-memory state with the stored entity, dropping unsaved changes.
    pub fn reload(&self, watched: &mut Watched<T>) -> Result<(), VersioningError> {
        let id = watched.id();
        let record = self
            .models
            .get_model::<T>(&id)?
            .ok_or_else(|| ModelError::NotFound {
                entity_type: T::TYPE_NAME.to_string(),
                id,
            })?;
        *watched = Watched::persisted(record, &self.properties);
        Ok(())
    }

    /// Save a new entity, recording version 0.
    pub fn create(&self, record: T) -> Result<Watched<T>, VersioningError> {
        let mut watched = self.build(record);
        self.save(&mut watched)?;
        Ok(watched)
    }

    /// Assign attributes then save.
    pub fn update<I, K>(
        &self,
        watched: &mut Watched<T>,
        attributes: I,
    ) -> Result<Option<VersionRecord>, VersioningError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        watched.assign_all(attributes)?;
        self.save(watched)
    }

    /// Persist the entity and append a version if the save warrants one.
    ///
    /// Returns the version written, if any. A failed entity write runs no
    /// version logic. A failed version write is returned after the entity
    /// write has already committed.
    pub fn save(&self, watched: &mut Watched<T>) -> Result<Option<VersionRecord>, VersioningError> {
        let written = if watched.is_new() {
            watched.before_create();
            self.models.insert_model(watched.record())
        } else {
            watched.capture(&self.properties);
            self.models.save_model(watched.record())
        };

        if let Err(err) = written {
            watched.finish_save();
            return Err(err.into());
        }

        watched.mark_persisted(&self.properties);
        let version = self.write_version(watched);
        watched.finish_save();
        version
    }

    fn write_version(&self, watched: &Watched<T>) -> Result<Option<VersionRecord>, VersioningError> {
        let record = watched.record();
        let create = should_create_version(
            &*self.config,
            record,
            watched.is_just_created(),
            watched.pending_changes(),
        )?;

        if !create {
            debug!(entity_type = T::TYPE_NAME, id = %record.id(), "save produced no version");
            return Ok(None);
        }

        let version = NewVersion::new(T::TYPE_NAME, record.id())
            .with_data(watched.pending_change_set())
            .with_user(self.resolve_user(watched))
            .with_scope(self.scope_reference(record)?);
        let version = self.store.append(version)?;

        debug!(
            entity_type = T::TYPE_NAME,
            id = %version.versionable_id,
            number = version.number,
            changes = version.data.len(),
            "version written"
        );
        Ok(Some(version))
    }

    /// Explicit attribution first, then the configured resolver.
    fn resolve_user(&self, watched: &Watched<T>) -> Option<String> {
        watched
            .updated_by()
            .map(str::to_string)
            .or_else(|| self.config.user_resolver().and_then(|resolve| resolve()))
    }

    /// The scope target id, when the store is scoped and the entity carries the key.
    fn scope_reference(&self, record: &T) -> Result<Option<String>, StoreError> {
        let Some(key) = self.store.scope_key()? else {
            return Ok(None);
        };

        if let Some(scope) = self.config.scope_config() {
            if scope.definition().foreign_key == key {
                return Ok(scope.extract(record));
            }
        }

        Ok(match record.read_attribute(&key) {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id),
            Some(other) => Some(other.to_string()),
        })
    }

    /// Delete the entity and, first, all of its versions.
    ///
    /// Returns whether the entity existed. An unsaved entity is left alone.
    /// Once destroyed the handle is unsaved again, so saving it recreates the
    /// entity with a fresh initial version.
    pub fn destroy(&self, watched: &mut Watched<T>) -> Result<bool, VersioningError> {
        if watched.is_new() {
            return Ok(false);
        }

        let id = watched.id();
        let removed = self.store.destroy_all(T::TYPE_NAME, &id)?;
        debug!(entity_type = T::TYPE_NAME, %id, removed, "versions destroyed");

        let existed = self.models.delete_model::<T>(&id)?;
        watched.mark_destroyed();
        Ok(existed)
    }
}
