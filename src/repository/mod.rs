//! VersionedRepository - drives entity persistence and writes version history.
//!
//! The coordinator wraps a `ModelStore` and runs the versioning lifecycle
//! around every write:
//!
//! - create: the save is remembered as a creation event (version 0)
//! - save: versioned attribute changes are captured, the entity is written,
//!   and a version is appended if the creation policy allows it
//! - destroy: every version of the entity is deleted before the entity
//!
//! The history half lists versions and reverts entities to earlier values.
//!
//! ## Example
//!
//! ```ignore
//! let articles = versioning.repository::<Article, _>(InMemoryModelStore::new())?;
//!
//! let mut article = articles.create(Article::new("a1", "article"))?;
//! article.title = "changed".into();
//! articles.save(&mut article)?;
//!
//! assert_eq!(articles.versions(&article, VersionQuery::new())?.len(), 1);
//! articles.revert(&mut article, 1)?;
//! assert_eq!(article.title, "article");
//! ```

mod coordinator;
mod history;

pub use coordinator::VersionedRepository;
