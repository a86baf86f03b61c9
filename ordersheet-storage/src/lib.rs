//! Local cache store for the ordersheet pipeline.
//!
//! The cache is a flat key/value store of JSON values behind the
//! [`CacheStore`] trait. Two backends are provided:
//!
//! - [`MemoryCache`], an ordered map for tests and short-lived processes
//! - [`SqliteCache`], a single `kv` table in a SQLite file
//!
//! [`RecordCache`] layers typed, namespaced accessors for the three record
//! kinds on top of any backend.

mod error;
mod memory;
mod records;
mod sqlite;
mod store;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryCache;
pub use records::{CacheCounts, CachedRecord, RecordCache, DEFAULT_NAMESPACE};
pub use sqlite::SqliteCache;
pub use store::CacheStore;
