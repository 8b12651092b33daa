use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{AttributeError, Property};

/// Trait for entities whose attributes can be versioned.
///
/// Usually derived with `#[derive(Versionable)]`.
pub trait Versionable {
    /// The type tag stored on every version record of this entity type.
    const TYPE_NAME: &'static str;

    /// Returns the unique identifier for this entity instance.
    fn id(&self) -> String;

    /// All attributes of this entity type, excluding the identity.
    fn properties() -> &'static [Property];

    /// Read an attribute as a JSON value. `None` for unknown names.
    fn read_attribute(&self, name: &str) -> Option<Value>;

    /// Overwrite an attribute from a JSON value.
    fn write_attribute(&mut self, name: &str, value: Value) -> Result<(), AttributeError>;

    fn property(name: &str) -> Option<&'static Property> {
        Self::properties().iter().find(|p| p.name == name)
    }
}

/// Encode a field value for diffing. Used by the derive macro.
pub fn encode_attribute<V: Serialize>(value: &V) -> Option<Value> {
    serde_json::to_value(value).ok()
}

/// Decode a JSON value into a field. Used by the derive macro.
pub fn decode_attribute<V: DeserializeOwned>(
    attribute: &str,
    value: Value,
) -> Result<V, AttributeError> {
    serde_json::from_value(value).map_err(|e| AttributeError::Invalid {
        attribute: attribute.to_string(),
        message: e.to_string(),
    })
}
