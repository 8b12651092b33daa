//! Version records and the append-only stores that hold them.

mod error;
mod in_memory;
mod query;
mod record;
mod store;

pub use error::StoreError;
pub use in_memory::InMemoryVersionStore;
pub use query::{Direction, Order, OrderField, VersionQuery};
pub use record::{NewVersion, VersionRecord};
pub use store::{ScopeDefinition, VersionStore};
