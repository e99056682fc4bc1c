//! Dead-letter replay.
//!
//! Re-attempts delivery for a bounded number of dead-lettered batches per
//! invocation, oldest first. Fail-forward: one bad batch never aborts the
//! run, it just stays in the DLQ for the next pass. Concurrent invocations
//! are safe without locks because a vanished record is a benign skip and
//! deletes are idempotent.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::dlq::{DeadLetterStore, DlqError};
use crate::sink::{dispatch, DispatchOutcome, LogSink};

/// Outcome counts for one replay invocation.
///
/// `attempted = succeeded + failed`; records that vanished before fetch
/// (already replayed elsewhere) count toward none of the three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Batches for which delivery was attempted.
    pub attempted: usize,
    /// Batches delivered and removed from the DLQ.
    pub succeeded: usize,
    /// Batches that failed again and remain in the DLQ.
    pub failed: usize,
}

/// Scans the dead-letter store and re-dispatches batches to the sink.
pub struct ReplayProcessor {
    store: Arc<DeadLetterStore>,
    sink: Arc<dyn LogSink>,
}

impl ReplayProcessor {
    /// Create a processor over the given store and sink.
    pub fn new(store: Arc<DeadLetterStore>, sink: Arc<dyn LogSink>) -> Self {
        Self { store, sink }
    }

    /// Replay up to `max_batches` of the oldest dead-lettered batches.
    ///
    /// Strictly sequential within one invocation; `max_batches` is the sole
    /// bound on how long a run takes. Only the initial listing can fail;
    /// per-batch errors are absorbed into the summary.
    pub async fn replay(&self, max_batches: usize) -> Result<ReplaySummary, DlqError> {
        let keys = self.store.list(max_batches).await?;
        let mut summary = ReplaySummary::default();

        for key in keys {
            let batch = match self.store.get(&key).await {
                Ok(batch) => batch,
                Err(DlqError::NotFound(_)) => {
                    // Another replay got here first.
                    info!(%key, "record already replayed, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(%key, error = %e, "failed to fetch record, leaving in place");
                    summary.attempted += 1;
                    summary.failed += 1;
                    continue;
                }
            };

            summary.attempted += 1;
            match dispatch(&batch, self.sink.as_ref()).await {
                DispatchOutcome::Delivered => {
                    // A failed delete only means the record may be
                    // re-delivered next pass; at-least-once permits that.
                    if let Err(e) = self.store.delete(&key).await {
                        warn!(%key, error = %e, "delivered but failed to delete record");
                    }
                    summary.succeeded += 1;
                }
                DispatchOutcome::Failed { reason, .. } => {
                    warn!(%key, %reason, "replay delivery failed, leaving in place");
                    summary.failed += 1;
                }
            }
        }

        info!(
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "replay pass complete"
        );
        Ok(summary)
    }
}

// =============================================================================
// TESTS
// =============================================================================
