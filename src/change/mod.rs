mod change_set;
mod pending;
mod recorder;

pub use change_set::{Change, ChangeSet};
pub use pending::PendingChangeSet;
pub use recorder::{diff, snapshot, Baseline};
