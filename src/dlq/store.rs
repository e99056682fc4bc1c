//! The dead-letter store proper: serialization and key discipline over a
//! blob backend.

use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::{BlobError, BlobStore};
use crate::event::LogBatch;

/// Dead-letter store failures.
#[derive(Debug, Error)]
pub enum DlqError {
    /// The record vanished between list and get (concurrent replay).
    #[error("dead-letter record not found: {0}")]
    NotFound(String),
    /// A stored record no longer decodes as a batch.
    #[error("dead-letter record corrupt at {key}: {reason}")]
    Corrupt {
        /// Storage key of the bad record.
        key: String,
        /// Decode failure.
        reason: String,
    },
    /// A batch failed to serialize before storage.
    #[error("failed to encode batch: {0}")]
    Encode(String),
    /// The underlying blob store failed.
    #[error(transparent)]
    Blob(#[from] BlobError),
}

/// Durable store of failed batches under time-ordered keys.
pub struct DeadLetterStore {
    blob: Arc<dyn BlobStore>,
    prefix: String,
}

impl DeadLetterStore {
    /// Create a store writing under `prefix/` in the given blob backend.
    pub fn new(blob: Arc<dyn BlobStore>, prefix: impl Into<String>) -> Self {
        Self { blob, prefix: prefix.into() }
    }

    /// Key for a record stored now: `<prefix>/<epoch-millis>-<8 hex>`.
    ///
    /// Millisecond timestamp plus 32 bits of randomness makes collisions
    /// negligible; records are never deduplicated.
    fn next_key(&self) -> String {
        let millis = Utc::now().timestamp_millis();
        let suffix: u32 = rand::random();
        format!("{}/{}-{}", self.prefix, millis, hex::encode(suffix.to_be_bytes()))
    }

    /// Persist a failed batch. Returns the storage key.
    ///
    /// If the blob store itself is down, the error propagates: this is the
    /// one path with no further fallback, and the caller must surface it as
    /// a fatal ingest error.
    pub async fn put(&self, batch: &LogBatch) -> Result<String, DlqError> {
        let bytes =
            serde_json::to_vec(batch).map_err(|e| DlqError::Encode(e.to_string()))?;
        let key = self.next_key();
        self.blob.put(&key, &bytes).await?;
        info!(
            %key,
            request_id = %batch.request_id,
            events = batch.events.len(),
            "batch dead-lettered"
        );
        Ok(key)
    }

    /// List up to `limit` record keys, oldest first.
    pub async fn list(&self, limit: usize) -> Result<Vec<String>, DlqError> {
        Ok(self.blob.list(&self.prefix, limit).await?)
    }

    /// Fetch and decode a record.
    pub async fn get(&self, key: &str) -> Result<LogBatch, DlqError> {
        let bytes = match self.blob.get(key).await {
            Ok(bytes) => bytes,
            Err(BlobError::NotFound(k)) => return Err(DlqError::NotFound(k)),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes).map_err(|e| DlqError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Delete a record. Idempotent: an already-absent key is success.
    pub async fn delete(&self, key: &str) -> Result<(), DlqError> {
        self.blob.delete(key).await?;
        debug!(%key, "dead-letter record deleted");
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
