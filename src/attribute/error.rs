use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("{entity_type} has no attribute named {attribute}")]
    Unknown {
        entity_type: String,
        attribute: String,
    },
    #[error("invalid value for attribute {attribute}: {message}")]
    Invalid { attribute: String, message: String },
}
