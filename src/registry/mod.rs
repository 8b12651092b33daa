//! Registry - which entity types are versioned, and where their versions go.
//!
//! `Versioning` is an explicit, process-owned registry of version stores,
//! known entity types and per-type configuration. Enabling a type validates
//! its configuration against the registry up front, so a misconfigured type
//! fails at setup rather than on its first save.
//!
//! ## Example
//!
//! ```ignore
//! use versioned_rust::{InMemoryModelStore, Scope, Versioning, VersioningConfig};
//!
//! let mut versioning = Versioning::new();
//! versioning.register_store("ScopedVersion", InMemoryVersionStore::new())?;
//! versioning.enable::<Rifle>(VersioningConfig::new().store("ScopedVersion"))?;
//! versioning.enable::<Ammo>(
//!     VersioningConfig::new()
//!         .store("ScopedVersion")
//!         .scope(Scope::new("rifle", "Rifle", |ammo: &Ammo| ammo.rifle_id.clone())),
//! )?;
//!
//! let ammo = versioning.repository::<Ammo, _>(InMemoryModelStore::new())?;
//! ```

mod catalog;
mod versioning;

pub(crate) use catalog::StoreCatalog;

pub use versioning::Versioning;
