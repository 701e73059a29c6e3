//! Project persistence for Hokusai.
//!
//! Two [`KeyValueStore`](hokusai_interface::KeyValueStore) backends are
//! provided, plus [`ProjectStore`], which maps a whole
//! [`Project`](hokusai_core::Project) onto a fixed set of logical keys.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod key;
mod memory;
mod project;

pub use filesystem::FileSystemStore;
pub use key::StorageKey;
pub use memory::InMemoryStore;
pub use project::ProjectStore;
