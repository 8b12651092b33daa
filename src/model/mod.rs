//! Models - the persisted entities that versioning observes.
//!
//! Entity persistence belongs to the host application; `ModelStore` is the
//! narrow CRUD surface the versioning coordinator drives. The in-memory
//! store is provided for tests and embedding.
//!
//! ## Example
//!
//! ```ignore
//! use versioned_rust::{InMemoryModelStore, ModelStore, Versionable};
//!
//! #[derive(Clone, Serialize, Deserialize, Versionable)]
//! struct Article {
//!     id: String,
//!     title: String,
//! }
//!
//! let store = InMemoryModelStore::new();
//! store.insert_model(&article)?;
//! let loaded: Option<Article> = store.get_model("a1")?;
//! ```

mod in_memory;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::attribute::Versionable;

/// Types that can be persisted in a `ModelStore`.
pub trait Model: Versionable + Serialize + DeserializeOwned + Clone + Send + Sync {}

impl<T> Model for T where T: Versionable + Serialize + DeserializeOwned + Clone + Send + Sync {}

/// Error type for model store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("model already exists: {entity_type}:{id}")]
    AlreadyExists { entity_type: String, id: String },
    #[error("model not found: {entity_type}:{id}")]
    NotFound { entity_type: String, id: String },
    #[error("model serialization error: {0}")]
    Serde(String),
    #[error("model storage error: {0}")]
    Storage(String),
}

pub use in_memory::InMemoryModelStore;
pub use store::ModelStore;
