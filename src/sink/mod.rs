//! Log Sink
//!
//! The external destination for normalized events, behind a narrow async
//! trait. The relay treats it as a black box that may reject, time out, or
//! accept only a prefix of a write. Retry never happens inline; failed
//! writes are routed to the DLQ and retried only via replay.

mod dispatch;
mod http;
mod memory;

pub use dispatch::{dispatch, DispatchOutcome};
pub use http::HttpSink;
pub use memory::{MemorySink, SinkScript};

use async_trait::async_trait;
use thiserror::Error;

use crate::event::NormalizedLogEvent;

/// Sink write failures.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink rejected the write.
    #[error("sink rejected write: {0}")]
    Rejected(String),
    /// The write timed out.
    #[error("sink write timed out")]
    Timeout,
    /// Transport-level failure (connect, TLS, DNS, ...).
    #[error("sink transport error: {0}")]
    Transport(String),
}

/// Acknowledgement of a sink write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkAck {
    /// How many events, counted from the front of the submitted slice, the
    /// sink accepted. Equal to the slice length for a full write.
    pub accepted: usize,
}

impl SinkAck {
    /// Full acceptance of `n` events.
    pub fn all(n: usize) -> Self {
        Self { accepted: n }
    }
}

/// External log sink collaborator.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Submit events in one logical write. May accept all, a prefix, or
    /// none; may fail outright.
    async fn write(&self, events: &[NormalizedLogEvent]) -> Result<SinkAck, SinkError>;
}
