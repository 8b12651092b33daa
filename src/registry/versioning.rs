use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, warn};

use crate::attribute::Versionable;
use crate::config::{Defaults, VersioningConfig, DEFAULT_STORE};
use crate::error::{ConfigurationError, VersioningError};
use crate::model::{Model, ModelStore};
use crate::repository::VersionedRepository;
use crate::version::{InMemoryVersionStore, StoreError, VersionStore};

use super::catalog::StoreCatalog;

/// Registry of version stores, entity types and versioning configuration.
pub struct Versioning {
    defaults: Defaults,
    stores: StoreCatalog,
    types: HashSet<String>,
    configs: HashMap<&'static str, Arc<dyn Any + Send + Sync>>,
}

impl Default for Versioning {
    fn default() -> Self {
        Self::new()
    }
}

impl Versioning {
    /// A registry with an in-memory store registered under the default name.
    pub fn new() -> Self {
        let stores = StoreCatalog::default();
        let default_store: Arc<dyn VersionStore> = Arc::new(InMemoryVersionStore::new());
        // a fresh catalog lock cannot be poisoned
        let _ = stores.insert(DEFAULT_STORE.to_string(), default_store);

        Versioning {
            defaults: Defaults::default(),
            stores,
            types: HashSet::new(),
            configs: HashMap::new(),
        }
    }

    /// Replace the process-wide defaults. Applies to types enabled afterwards.
    pub fn setup(&mut self, defaults: Defaults) -> &mut Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn register_store<V>(
        &mut self,
        name: impl Into<String>,
        store: V,
    ) -> Result<&mut Self, StoreError>
    where
        V: VersionStore + 'static,
    {
        self.register_shared_store(name, Arc::new(store))
    }

    /// Register a store. Repositories already built see it too.
    pub fn register_shared_store(
        &mut self,
        name: impl Into<String>,
        store: Arc<dyn VersionStore>,
    ) -> Result<&mut Self, StoreError> {
        self.stores.insert(name.into(), store)?;
        Ok(self)
    }

    /// Make an entity type known, so it can be named as a user model or scope target.
    pub fn register_type(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.types.insert(type_name.into());
        self
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.types.contains(type_name)
    }

    pub fn store(&self, name: &str) -> Result<Option<Arc<dyn VersionStore>>, StoreError> {
        self.stores.get(name)
    }

    /// Opt an entity type into versioning.
    ///
    /// Resolves the config against the registry defaults, checks the store,
    /// user model and scope target exist, and adds the scope key to the store.
    pub fn enable<T>(&mut self, config: VersioningConfig<T>) -> Result<(), VersioningError>
    where
        T: Versionable + 'static,
    {
        let config = config.with_defaults(&self.defaults);
        let entity_type = T::TYPE_NAME;

        let store = self
            .stores
            .get(config.store_name())?
            .ok_or_else(|| ConfigurationError::UnknownStore {
                entity_type: entity_type.to_string(),
                store: config.store_name().to_string(),
            })?;

        if let Some(user_model) = config.user_model_name() {
            if !self.types.contains(user_model) {
                return Err(ConfigurationError::UnknownUserModel {
                    entity_type: entity_type.to_string(),
                    user_model: user_model.to_string(),
                }
                .into());
            }
        }

        if let Some(scope) = config.scope_config() {
            let definition = scope.definition();
            if !self.types.contains(&definition.target_type) {
                return Err(ConfigurationError::UnknownScopeTarget {
                    entity_type: entity_type.to_string(),
                    target_type: definition.target_type.clone(),
                }
                .into());
            }

            match store.scope()? {
                Some(existing) if existing != *definition => {
                    return Err(ConfigurationError::ConflictingScope {
                        store: config.store_name().to_string(),
                        existing: existing.foreign_key,
                        requested: definition.foreign_key.clone(),
                    }
                    .into());
                }
                Some(_) => {}
                None => {
                    store.add_scope(definition.clone())?;
                    info!(
                        store = config.store_name(),
                        key = %definition.foreign_key,
                        target = %definition.target_type,
                        "version store scoped"
                    );
                }
            }
        }

        warn_suspicious(&config);

        info!(
            entity_type,
            store = config.store_name(),
            attributes = config.versioned_properties().len(),
            "versioning enabled"
        );

        self.types.insert(entity_type.to_string());
        self.configs.insert(entity_type, Arc::new(config));
        Ok(())
    }

    pub fn is_versioned(&self, type_name: &str) -> bool {
        self.configs.contains_key(type_name)
    }

    pub fn config<T>(&self) -> Result<Arc<VersioningConfig<T>>, ConfigurationError>
    where
        T: Versionable + 'static,
    {
        self.configs
            .get(T::TYPE_NAME)
            .cloned()
            .and_then(|config| config.downcast::<VersioningConfig<T>>().ok())
            .ok_or_else(|| ConfigurationError::NotVersioned {
                entity_type: T::TYPE_NAME.to_string(),
            })
    }

    /// Name of the store a versioned type writes to.
    pub fn config_store_name<T>(&self) -> Result<String, ConfigurationError>
    where
        T: Versionable + 'static,
    {
        self.config::<T>().map(|config| config.store_name().to_string())
    }

    /// The store a versioned type writes to.
    pub fn store_for<T>(&self) -> Result<Arc<dyn VersionStore>, VersioningError>
    where
        T: Versionable + 'static,
    {
        let config = self.config::<T>()?;
        let store = self.stores.get(config.store_name())?.ok_or_else(|| {
            ConfigurationError::UnknownStore {
                entity_type: T::TYPE_NAME.to_string(),
                store: config.store_name().to_string(),
            }
        })?;
        Ok(store)
    }

    /// Stores scoped on `type_name`, i.e. whose records can be listed per instance of it.
    pub fn stores_scoped_on(&self, type_name: &str) -> Result<Vec<Arc<dyn VersionStore>>, StoreError> {
        self.stores.scoped_on(type_name)
    }

    /// Build the coordinator for a versioned type over an entity store.
    ///
    /// The repository shares the registry's store catalog, so scopes added
    /// by types enabled later still show up in `scoped_versions`.
    pub fn repository<T, S>(&self, models: S) -> Result<VersionedRepository<S, T>, VersioningError>
    where
        T: Model + 'static,
        S: ModelStore,
    {
        let config = self.config::<T>()?;
        let store = self.store_for::<T>()?;
        Ok(VersionedRepository::new(models, store, config, self.stores.clone()))
    }
}

fn warn_suspicious<T: Versionable>(config: &VersioningConfig<T>) {
    if config.only_attributes().is_some() && config.except_attributes().is_some() {
        warn!(entity_type = T::TYPE_NAME, "both only and except given, except is ignored");
    }
    if config.if_condition().is_some() && config.unless_condition().is_some() {
        warn!(entity_type = T::TYPE_NAME, "both if and unless given, unless is ignored");
    }
    for attribute in config.unknown_filter_attributes() {
        warn!(entity_type = T::TYPE_NAME, %attribute, "filter names no attribute");
    }
}
