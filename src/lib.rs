extern crate self as versioned_rust;

mod attribute;
mod change;
mod config;
mod error;
mod model;
mod policy;
mod registry;
mod repository;
mod version;
mod watched;

pub use attribute::{
    decode_attribute, encode_attribute, AttributeError, AttributeKind, Property, Versionable,
};
pub use change::{Change, ChangeSet, PendingChangeSet};
pub use config::{
    BoxError, Defaults, Predicate, Scope, ScopeExtractor, UserResolver, VersioningConfig,
    DEFAULT_STORE,
};
pub use error::{ConfigurationError, PredicateError, VersioningError};
pub use model::{InMemoryModelStore, Model, ModelError, ModelStore};
pub use policy::{condition_passes, is_versioning_event, should_create_version};
pub use registry::Versioning;
pub use repository::VersionedRepository;
pub use version::{
    Direction, InMemoryVersionStore, NewVersion, Order, OrderField, ScopeDefinition, StoreError,
    VersionQuery, VersionRecord, VersionStore,
};
pub use watched::Watched;

// Derive for the `Versionable` trait
pub use versioned_rust_macros::Versionable;

pub use serde_json::Value;
