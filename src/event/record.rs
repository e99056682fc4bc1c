//! Raw and normalized event record shapes.
//!
//! `RawLogEvent` is deliberately permissive: every field optional, timestamps
//! and tag values accepted as arbitrary JSON so normalization can coerce
//! instead of reject. `NormalizedLogEvent` is the canonical record every
//! downstream consumer (sink, DLQ) sees. Wire names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Originating platform of a log event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Web frontend.
    Frontend,
    /// Unity game client.
    Unity,
    /// Backend services.
    #[default]
    Backend,
}

impl Platform {
    /// Parse a client-supplied platform string; `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "frontend" => Some(Self::Frontend),
            "unity" => Some(Self::Unity),
            "backend" => Some(Self::Backend),
            _ => None,
        }
    }
}

/// Log severity, syslog-style, DEBUG through EMERGENCY.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Verbose diagnostics.
    Debug,
    /// Routine information.
    #[default]
    Info,
    /// Normal but significant.
    Notice,
    /// Possible problem.
    Warning,
    /// Failure of an operation.
    Error,
    /// Failure needing prompt attention.
    Critical,
    /// Failure needing immediate attention.
    Alert,
    /// System unusable.
    Emergency,
}

impl Severity {
    /// Parse a client-supplied severity string, case-insensitively.
    /// `WARN` is accepted as an alias for `WARNING`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "NOTICE" => Some(Self::Notice),
            "WARNING" | "WARN" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            "CRITICAL" => Some(Self::Critical),
            "ALERT" => Some(Self::Alert),
            "EMERGENCY" => Some(Self::Emergency),
            _ => None,
        }
    }
}

/// A log event as submitted by a client. Ephemeral: lives only for the
/// duration of one ingest request, until normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLogEvent {
    /// Event time: RFC 3339 string or epoch milliseconds.
    pub timestamp: Option<Value>,
    /// Originating platform name.
    pub platform: Option<String>,
    /// Room the event belongs to.
    pub room_id: Option<String>,
    /// Viewer involved, if any.
    pub viewer_id: Option<String>,
    /// Client-side correlation id.
    pub request_id: Option<String>,
    /// Severity name.
    pub severity: Option<String>,
    /// Event type tag.
    pub event_type: Option<String>,
    /// Human-readable message.
    pub message: Option<String>,
    /// Free-form tags; values coerced to strings during normalization.
    pub tags: Option<Map<String, Value>>,
    /// Arbitrary structured metadata, passed through untouched.
    pub extra_json: Option<Map<String, Value>>,
}

/// The canonical, fully-populated event record.
///
/// `client_id` always carries the authenticated identity for the request;
/// any client-supplied value for it is discarded during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLogEvent {
    /// Event time, UTC.
    pub timestamp: DateTime<Utc>,
    /// Originating platform.
    pub platform: Platform,
    /// Room the event belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    /// Viewer involved, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer_id: Option<String>,
    /// Client-side correlation id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Severity level.
    pub severity: Severity,
    /// Event type tag.
    pub event_type: String,
    /// Human-readable message, possibly empty, never absent.
    pub message: String,
    /// String tags.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Arbitrary structured metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_json: Option<Map<String, Value>>,
    /// Authenticated client id.
    pub client_id: String,
}
