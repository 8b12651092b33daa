//! Decides whether a completed save produces a version record.

use tracing::trace;

use crate::attribute::Versionable;
use crate::change::PendingChangeSet;
use crate::config::VersioningConfig;
use crate::error::PredicateError;

/// A save is a versioning event if it created the entity or changed a
/// versioned attribute.
pub fn is_versioning_event(just_created: bool, pending: &PendingChangeSet) -> bool {
    just_created || !pending.is_empty()
}

/// Evaluate the configured condition. `if` wins over `unless`; with neither
/// the condition passes.
pub fn condition_passes<T: Versionable>(
    config: &VersioningConfig<T>,
    record: &T,
) -> Result<bool, PredicateError> {
    let wrap = |cause| PredicateError {
        entity_type: T::TYPE_NAME.to_string(),
        id: record.id(),
        cause,
    };

    if let Some(predicate) = config.if_condition() {
        return predicate(record).map_err(wrap);
    }
    if let Some(predicate) = config.unless_condition() {
        return predicate(record).map(|skip| !skip).map_err(wrap);
    }
    Ok(true)
}

pub fn should_create_version<T: Versionable>(
    config: &VersioningConfig<T>,
    record: &T,
    just_created: bool,
    pending: &PendingChangeSet,
) -> Result<bool, PredicateError> {
    if !is_versioning_event(just_created, pending) {
        trace!(entity_type = T::TYPE_NAME, "no versioned changes");
        return Ok(false);
    }

    let passes = condition_passes(config, record)?;
    if !passes {
        trace!(entity_type = T::TYPE_NAME, id = %record.id(), "version condition rejected save");
    }
    Ok(passes)
}
