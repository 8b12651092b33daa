//! Typed property introspection.
//!
//! Every versioned entity exposes its attributes as named, kinded,
//! JSON-valued properties. Values are compared after typecasting to the
//! property's declared kind, so `"1"` assigned to an integer attribute that
//! already holds `1` is not a change.

mod error;
mod kind;
mod versionable;

pub use error::AttributeError;
pub use kind::{AttributeKind, Property};
pub use versionable::{decode_attribute, encode_attribute, Versionable};
