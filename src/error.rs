use thiserror::Error;

use crate::attribute::AttributeError;
use crate::config::BoxError;
use crate::model::ModelError;
use crate::version::StoreError;

/// Invalid versioning setup, detected when a type is enabled or a store is used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{entity_type} names unknown version store `{store}`")]
    UnknownStore { entity_type: String, store: String },
    #[error("{entity_type} names unknown user model `{user_model}`")]
    UnknownUserModel {
        entity_type: String,
        user_model: String,
    },
    #[error("{entity_type} scopes on unknown type `{target_type}`")]
    UnknownScopeTarget {
        entity_type: String,
        target_type: String,
    },
    #[error("version store `{store}` is already scoped by `{existing}`, cannot scope by `{requested}`")]
    ConflictingScope {
        store: String,
        existing: String,
        requested: String,
    },
    #[error("{entity_type} is not versioned")]
    NotVersioned { entity_type: String },
}

/// A user-supplied version condition failed to evaluate.
#[derive(Debug, Error)]
#[error("version condition for {entity_type} {id} failed: {cause}")]
pub struct PredicateError {
    pub entity_type: String,
    pub id: String,
    pub cause: BoxError,
}

#[derive(Debug, Error)]
pub enum VersioningError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("version {number} already exists for {versionable_type} {versionable_id}")]
    ConstraintViolation {
        versionable_type: String,
        versionable_id: String,
        number: u64,
    },
    #[error(transparent)]
    Predicate(#[from] PredicateError),
    #[error(transparent)]
    Attribute(#[from] AttributeError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("version store error: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for VersioningError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation {
                versionable_type,
                versionable_id,
                number,
            } => VersioningError::ConstraintViolation {
                versionable_type,
                versionable_id,
                number,
            },
            other => VersioningError::Store(other),
        }
    }
}
