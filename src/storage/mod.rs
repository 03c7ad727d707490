//! Key-value persistence and the typed records SplitBite keeps in it.

pub mod json_backend;
pub mod memory;
pub mod records;

use crate::errors::SplitError;

pub type Result<T> = std::result::Result<T, SplitError>;

/// Minimal string key-value capability the persistence adapter is built on.
///
/// Values are opaque strings; callers own the encoding. `remove` on a missing
/// key succeeds.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
pub use records::{LoadReport, SplitStore, ADMIN_FLAG_KEY, EXPENSES_KEY, MEMBERS_KEY};
