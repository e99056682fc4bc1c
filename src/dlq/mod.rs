//! Dead-Letter Queue
//!
//! Durable storage for batches that failed sink delivery, layered over a
//! narrow blob-store collaborator. Keys embed the epoch-millisecond put
//! time, so lexicographic listing order is chronological order and replay
//! can always take the oldest batches first.

mod fs;
mod memory;
mod store;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;
pub use store::{DeadLetterStore, DlqError};

use async_trait::async_trait;
use thiserror::Error;

/// Blob store failures.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The key does not exist (possibly any more).
    #[error("blob not found: {0}")]
    NotFound(String),
    /// Backend failure (I/O, remote error, ...).
    #[error("blob store error: {0}")]
    Backend(String),
}

/// Durable key-value blob collaborator backing the DLQ.
///
/// Keys are slash-separated paths. `delete` is idempotent: deleting an
/// absent key succeeds, which is what makes concurrent replay safe.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under a key, overwriting any existing value.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), BlobError>;

    /// Fetch the bytes under a key, or `NotFound`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobError>;

    /// List up to `limit` keys under a prefix, ascending lexicographic.
    async fn list(&self, prefix: &str, limit: usize) -> Result<Vec<String>, BlobError>;

    /// Delete a key. Absent keys are not an error.
    async fn delete(&self, key: &str) -> Result<(), BlobError>;
}
