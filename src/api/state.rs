//! Shared application state.

use std::sync::Arc;

use crate::dlq::DeadLetterStore;
use crate::replay::ReplayProcessor;
use crate::sink::LogSink;

/// Read-only state shared by all request handlers.
///
/// Constructed once at startup; requests never mutate it, which is what
/// keeps every ingest and replay invocation an independent unit of work.
#[derive(Clone)]
pub struct AppState {
    /// HMAC secret for token verification.
    pub secret: Arc<str>,
    /// The external log sink.
    pub sink: Arc<dyn LogSink>,
    /// The dead-letter store.
    pub dlq: Arc<DeadLetterStore>,
    /// The replay processor over `dlq` and `sink`.
    pub replay: Arc<ReplayProcessor>,
    /// Bound on batches per replay invocation.
    pub replay_max_batch: usize,
    /// Service version reported by the liveness probe.
    pub version: String,
}

impl AppState {
    /// Wire up state from its collaborators.
    pub fn new(
        secret: impl Into<Arc<str>>,
        sink: Arc<dyn LogSink>,
        dlq: Arc<DeadLetterStore>,
        replay_max_batch: usize,
    ) -> Self {
        let dlq_handle = dlq.clone();
        let sink_handle = sink.clone();
        Self {
            secret: secret.into(),
            sink,
            dlq,
            replay: Arc::new(ReplayProcessor::new(dlq_handle, sink_handle)),
            replay_max_batch,
            version: crate::VERSION.to_string(),
        }
    }
}
