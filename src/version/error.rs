use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("version {number} already exists for {versionable_type} {versionable_id}")]
    ConstraintViolation {
        versionable_type: String,
        versionable_id: String,
        number: u64,
    },
    #[error("version store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("version storage error: {0}")]
    Storage(String),
}
