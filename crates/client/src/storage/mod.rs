//! Key-value persistence for client state.
//!
//! The cart store persists its snapshot through the [`CartStorage`] trait:
//! a blob of serialized state stored under a fixed key. Two implementations
//! are provided:
//!
//! - [`FileStorage`] - one file per key under a data directory (durable)
//! - [`MemoryStorage`] - in-process map (ephemeral sessions and tests)

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A key-value store for serialized client state.
///
/// Implementations must treat an absent key as `Ok(None)`, not an error;
/// only genuine I/O failures are reported as `Err`.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails for a reason other
    /// than the key being absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying write fails.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
