mod api;
mod codec;
mod error;
mod maintenance;
mod memory;
mod redb_store;
mod repository;

pub use api::*;
pub use error::*;
pub use memory::{MemoryBackend, MemoryStore};
pub use redb_store::{RedbBackend, RedbStore};
pub use repository::RallyStore;
