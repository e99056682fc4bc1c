//! In-memory sink for tests and local development.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{LogSink, SinkAck, SinkError};
use crate::event::NormalizedLogEvent;

/// Scripted behavior for the next write call.
#[derive(Debug, Clone)]
pub enum SinkScript {
    /// Accept the whole write.
    Accept,
    /// Fail the write with the given reason.
    Fail(String),
    /// Accept only the first `n` events.
    AcceptPrefix(usize),
}

/// Sink that records accepted writes and can be scripted to fail or
/// partially accept. Unscripted calls accept everything.
#[derive(Default)]
pub struct MemorySink {
    written: Mutex<Vec<Vec<NormalizedLogEvent>>>,
    script: Mutex<VecDeque<SinkScript>>,
    write_calls: Mutex<usize>,
}

impl MemorySink {
    /// Create a sink that accepts every write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a behavior for the next write call. Behaviors apply in FIFO
    /// order, one per call.
    pub fn script(&self, behavior: SinkScript) {
        self.script.lock().unwrap().push_back(behavior);
    }

    /// Event slices the sink accepted, in write order. Partial acceptances
    /// record only the accepted prefix.
    pub fn written(&self) -> Vec<Vec<NormalizedLogEvent>> {
        self.written.lock().unwrap().clone()
    }

    /// Total number of events accepted across all writes.
    pub fn total_events(&self) -> usize {
        self.written.lock().unwrap().iter().map(Vec::len).sum()
    }

    /// Number of write calls observed, including failed ones.
    pub fn write_calls(&self) -> usize {
        *self.write_calls.lock().unwrap()
    }
}

#[async_trait]
impl LogSink for MemorySink {
    async fn write(&self, events: &[NormalizedLogEvent]) -> Result<SinkAck, SinkError> {
        *self.write_calls.lock().unwrap() += 1;
        let behavior = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SinkScript::Accept);

        match behavior {
            SinkScript::Accept => {
                self.written.lock().unwrap().push(events.to_vec());
                Ok(SinkAck::all(events.len()))
            }
            SinkScript::Fail(reason) => Err(SinkError::Rejected(reason)),
            SinkScript::AcceptPrefix(n) => {
                let n = n.min(events.len());
                self.written.lock().unwrap().push(events[..n].to_vec());
                Ok(SinkAck { accepted: n })
            }
        }
    }
}
