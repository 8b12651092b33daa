use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::version::{StoreError, VersionStore};

/// Named version stores, shared between the registry and the repositories
/// it builds so later registrations and scopes are visible to both.
#[derive(Clone, Default)]
pub(crate) struct StoreCatalog {
    stores: Arc<RwLock<HashMap<String, Arc<dyn VersionStore>>>>,
}

impl StoreCatalog {
    pub(crate) fn insert(&self, name: String, store: Arc<dyn VersionStore>) -> Result<(), StoreError> {
        self.stores
            .write()
            .map_err(|_| StoreError::LockPoisoned("catalog write"))?
            .insert(name, store);
        Ok(())
    }

    pub(crate) fn get(&self, name: &str) -> Result<Option<Arc<dyn VersionStore>>, StoreError> {
        let stores = self
            .stores
            .read()
            .map_err(|_| StoreError::LockPoisoned("catalog read"))?;
        Ok(stores.get(name).cloned())
    }

    /// Stores currently scoped on `type_name`.
    pub(crate) fn scoped_on(&self, type_name: &str) -> Result<Vec<Arc<dyn VersionStore>>, StoreError> {
        let stores = self
            .stores
            .read()
            .map_err(|_| StoreError::LockPoisoned("catalog read"))?;

        let mut scoped = Vec::new();
        for store in stores.values() {
            if store.scoped_on()?.as_deref() == Some(type_name) {
                scoped.push(Arc::clone(store));
            }
        }
        Ok(scoped)
    }
}
