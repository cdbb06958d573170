pub mod file_storage;
pub mod memory_storage;

pub use file_storage::JsonFileStorage;
pub use memory_storage::MemoryStorage;

/// Error type for persisted state operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to access state file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key/value blob storage for the growth state.
///
/// The engine reads one blob at start-up and overwrites it after every
/// mutation. `load` returns `Ok(None)` when nothing has been stored yet.
pub trait StateStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&mut self, key: &str, blob: &str) -> Result<(), StorageError>;
}
