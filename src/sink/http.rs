//! HTTP sink adapter.
//!
//! POSTs each batch as a JSON array to a configured intake URL with an
//! optional service-account bearer credential. The concrete vendor protocol
//! stays behind the [`LogSink`] trait; this adapter is the narrow default.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::{LogSink, SinkAck, SinkError};
use crate::config::SinkConfig;
use crate::event::NormalizedLogEvent;

/// Sink that delivers events to an HTTP intake endpoint.
pub struct HttpSink {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpSink {
    /// Build a sink from configuration. The per-request timeout lives on
    /// the underlying client; the relay adds no retry on top.
    pub fn new(config: &SinkConfig) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: config.url.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl LogSink for HttpSink {
    async fn write(&self, events: &[NormalizedLogEvent]) -> Result<SinkAck, SinkError> {
        let mut request = self.client.post(&self.url).json(events);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SinkError::Timeout
            } else {
                SinkError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(events = events.len(), %status, "sink write accepted");
            return Ok(SinkAck::all(events.len()));
        }

        // The status line is safe to surface; the body may not be.
        Err(SinkError::Rejected(format!("intake returned {}", status)))
    }
}
