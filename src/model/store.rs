//! ModelStore - Abstract CRUD storage for versioned entities.

use super::{Model, ModelError};

/// Abstract CRUD storage for models.
pub trait ModelStore: Send + Sync {
    /// Get a model by ID. Returns None if not found.
    fn get_model<M: Model>(&self, id: &str) -> Result<Option<M>, ModelError>;

    /// Insert a new model. Fails if it already exists.
    fn insert_model<M: Model>(&self, model: &M) -> Result<(), ModelError>;

    /// Upsert a model.
    fn save_model<M: Model>(&self, model: &M) -> Result<(), ModelError>;

    /// Delete a model by ID. Returns true if it existed.
    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, ModelError>;

    /// Find models matching a predicate.
    fn find_models<M: Model>(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<M>, ModelError>;
}
