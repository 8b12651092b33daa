use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use super::{Model, ModelError, ModelStore};

type Tables = HashMap<&'static str, BTreeMap<String, Value>>;

/// Entity store holding one table of JSON documents per entity type.
///
/// Rows are kept in id order. Cloning shares the tables.
#[derive(Clone, Default)]
pub struct InMemoryModelStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entities of type `M`.
    pub fn count<M: Model>(&self) -> Result<usize, ModelError> {
        Ok(self.read()?.get(M::TYPE_NAME).map_or(0, BTreeMap::len))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, ModelError> {
        self.tables
            .read()
            .map_err(|_| ModelError::Storage("model store lock poisoned during read".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, ModelError> {
        self.tables
            .write()
            .map_err(|_| ModelError::Storage("model store lock poisoned during write".into()))
    }
}

fn to_document<M: Model>(model: &M) -> Result<Value, ModelError> {
    serde_json::to_value(model).map_err(|e| ModelError::Serde(e.to_string()))
}

fn from_document<M: Model>(document: &Value) -> Result<M, ModelError> {
    serde_json::from_value(document.clone()).map_err(|e| ModelError::Serde(e.to_string()))
}

impl ModelStore for InMemoryModelStore {
    fn get_model<M: Model>(&self, id: &str) -> Result<Option<M>, ModelError> {
        let tables = self.read()?;
        tables
            .get(M::TYPE_NAME)
            .and_then(|table| table.get(id))
            .map(from_document::<M>)
            .transpose()
    }

    fn insert_model<M: Model>(&self, model: &M) -> Result<(), ModelError> {
        let id = model.id();
        let document = to_document(model)?;

        let mut tables = self.write()?;
        let table = tables.entry(M::TYPE_NAME).or_default();
        if table.contains_key(&id) {
            return Err(ModelError::AlreadyExists {
                entity_type: M::TYPE_NAME.to_string(),
                id,
            });
        }
        table.insert(id, document);
        Ok(())
    }

    fn save_model<M: Model>(&self, model: &M) -> Result<(), ModelError> {
        let document = to_document(model)?;
        self.write()?
            .entry(M::TYPE_NAME)
            .or_default()
            .insert(model.id(), document);
        Ok(())
    }

    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, ModelError> {
        let mut tables = self.write()?;
        Ok(tables
            .get_mut(M::TYPE_NAME)
            .and_then(|table| table.remove(id))
            .is_some())
    }

    fn find_models<M: Model>(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<M>, ModelError> {
        let tables = self.read()?;
        let Some(table) = tables.get(M::TYPE_NAME) else {
            return Ok(Vec::new());
        };

        let mut found = Vec::new();
        for document in table.values() {
            let model = from_document::<M>(document)?;
            if predicate(&model) {
                found.push(model);
            }
        }
        Ok(found)
    }
}
