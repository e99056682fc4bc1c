//! Batch dispatch.
//!
//! One logical sink write per batch. A batch is atomic from the client's
//! perspective: either every event is represented at the sink, or the whole
//! undelivered remainder is handed back for dead-lettering. No event is
//! silently dropped on a partial write.

use tracing::{debug, warn};

use super::LogSink;
use crate::event::LogBatch;

/// Result of one dispatch attempt.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Every event in the batch reached the sink.
    Delivered,
    /// The sink failed or accepted only a prefix; `undelivered` is the
    /// batch the caller must persist to the DLQ.
    Failed {
        /// Why the write failed.
        reason: String,
        /// The events that did not reach the sink, under the original
        /// request metadata.
        undelivered: LogBatch,
    },
}

/// Attempt delivery of a batch to the sink. Never retries, never sleeps.
pub async fn dispatch(batch: &LogBatch, sink: &dyn LogSink) -> DispatchOutcome {
    match sink.write(&batch.events).await {
        Ok(ack) if ack.accepted >= batch.events.len() => {
            debug!(
                request_id = %batch.request_id,
                events = batch.events.len(),
                "batch delivered to sink"
            );
            DispatchOutcome::Delivered
        }
        Ok(ack) => {
            warn!(
                request_id = %batch.request_id,
                accepted = ack.accepted,
                total = batch.events.len(),
                "sink accepted partial batch"
            );
            DispatchOutcome::Failed {
                reason: format!(
                    "partial write: sink accepted {} of {} events",
                    ack.accepted,
                    batch.events.len()
                ),
                undelivered: batch.tail(ack.accepted),
            }
        }
        Err(e) => {
            warn!(request_id = %batch.request_id, error = %e, "sink write failed");
            DispatchOutcome::Failed {
                reason: e.to_string(),
                undelivered: batch.clone(),
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
