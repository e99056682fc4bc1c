//! Per-request log batches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::NormalizedLogEvent;
use crate::auth::ClientIdentity;

/// All events of one ingest request, plus the request metadata needed to
/// replay them later.
///
/// Immutable after creation. Ownership transfers from the request pipeline
/// to either "delivered" (dropped) or the dead-letter store (persisted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogBatch {
    /// Ordered events; non-empty by construction at the API boundary.
    pub events: Vec<NormalizedLogEvent>,
    /// When the relay accepted the request.
    pub received_at: DateTime<Utc>,
    /// Server-assigned id for this ingest request.
    pub request_id: String,
    /// The authenticated identity the batch was ingested under.
    pub client: ClientIdentity,
}

impl LogBatch {
    /// Create a batch for a freshly ingested request.
    pub fn new(events: Vec<NormalizedLogEvent>, client: ClientIdentity) -> Self {
        Self {
            events,
            received_at: Utc::now(),
            request_id: Uuid::new_v4().to_string(),
            client,
        }
    }

    /// Derive a batch carrying only the events from `start` on, under the
    /// same request metadata. Used when a sink accepts a prefix of a batch:
    /// the unaccepted suffix becomes the batch for DLQ purposes.
    pub fn tail(&self, start: usize) -> Self {
        Self {
            events: self.events[start..].to_vec(),
            received_at: self.received_at,
            request_id: self.request_id.clone(),
            client: self.client.clone(),
        }
    }
}
