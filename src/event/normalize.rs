//! Event normalization.
//!
//! Total function: every defaulting rule applies independently and nothing
//! a client sends can make it fail. Malformed request JSON is a transport
//! error handled by the API layer before this code runs.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::record::{NormalizedLogEvent, Platform, RawLogEvent, Severity};
use crate::auth::ClientIdentity;

/// Convert a raw client event into the canonical record, stamping the
/// verified identity.
pub fn normalize(raw: RawLogEvent, identity: &ClientIdentity) -> NormalizedLogEvent {
    let timestamp = raw
        .timestamp
        .as_ref()
        .and_then(parse_timestamp)
        .unwrap_or_else(Utc::now);

    let platform = raw
        .platform
        .as_deref()
        .and_then(Platform::parse)
        .unwrap_or_default();

    let severity = raw
        .severity
        .as_deref()
        .and_then(Severity::parse)
        .unwrap_or_default();

    let event_type = match raw.event_type {
        Some(s) if !s.is_empty() => s,
        _ => "unknown".to_string(),
    };

    NormalizedLogEvent {
        timestamp,
        platform,
        room_id: raw.room_id.or_else(|| identity.room_id.clone()),
        viewer_id: raw.viewer_id,
        request_id: raw.request_id,
        severity,
        event_type,
        message: raw.message.unwrap_or_default(),
        tags: raw.tags.map(coerce_tags).unwrap_or_default(),
        extra_json: raw.extra_json,
        client_id: identity.client_id.clone(),
    }
}

/// Parse a client-supplied timestamp: RFC 3339 string or epoch milliseconds.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

/// Coerce arbitrary JSON tag values to strings: strings verbatim, everything
/// else as compact JSON.
fn coerce_tags(tags: Map<String, Value>) -> BTreeMap<String, String> {
    tags.into_iter()
        .map(|(k, v)| {
            let s = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, s)
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn identity() -> ClientIdentity {
        ClientIdentity {
            client_id: "c1".into(),
            room_id: None,
            scopes: BTreeSet::from(["log:write".to_string()]),
        }
    }

    fn identity_with_room(room: &str) -> ClientIdentity {
        ClientIdentity {
            room_id: Some(room.into()),
            ..identity()
        }
    }

    #[test]
    fn test_minimal_event_gets_all_defaults() {
        let raw = RawLogEvent {
            message: Some("hello".into()),
            ..Default::default()
        };
        let before = Utc::now();
        let event = normalize(raw, &identity());
        let after = Utc::now();

        assert_eq!(event.platform, Platform::Backend);
        assert_eq!(event.severity, Severity::Info);
        assert_eq!(event.event_type, "unknown");
        assert_eq!(event.message, "hello");
        assert!(event.tags.is_empty());
        assert_eq!(event.client_id, "c1");
        assert!(event.timestamp >= before && event.timestamp <= after);
        assert_eq!(event.room_id, None);
    }

    #[test]
    fn test_populated_fields_pass_through() {
        let raw = RawLogEvent {
            timestamp: Some(json!("2026-01-02T03:04:05Z")),
            platform: Some("unity".into()),
            room_id: Some("r9".into()),
            viewer_id: Some("v3".into()),
            request_id: Some("req-1".into()),
            severity: Some("CRITICAL".into()),
            event_type: Some("crash".into()),
            message: Some("boom".into()),
            tags: None,
            extra_json: Some(
                json!({"stack": ["a", "b"], "depth": 2})
                    .as_object()
                    .cloned()
                    .unwrap(),
            ),
        };
        let event = normalize(raw, &identity());
        assert_eq!(event.timestamp.to_rfc3339(), "2026-01-02T03:04:05+00:00");
        assert_eq!(event.platform, Platform::Unity);
        assert_eq!(event.room_id.as_deref(), Some("r9"));
        assert_eq!(event.viewer_id.as_deref(), Some("v3"));
        assert_eq!(event.request_id.as_deref(), Some("req-1"));
        assert_eq!(event.severity, Severity::Critical);
        assert_eq!(event.event_type, "crash");
        assert_eq!(event.extra_json.unwrap()["depth"], 2);
    }

    #[test]
    fn test_epoch_millis_timestamp_accepted() {
        let raw = RawLogEvent {
            timestamp: Some(json!(1_700_000_000_000_i64)),
            ..Default::default()
        };
        let event = normalize(raw, &identity());
        assert_eq!(event.timestamp.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let raw = RawLogEvent {
            timestamp: Some(json!("yesterday")),
            platform: Some("commodore64".into()),
            severity: Some("LOUD".into()),
            event_type: Some(String::new()),
            ..Default::default()
        };
        let before = Utc::now();
        let event = normalize(raw, &identity());

        assert!(event.timestamp >= before);
        assert_eq!(event.platform, Platform::Backend);
        assert_eq!(event.severity, Severity::Info);
        assert_eq!(event.event_type, "unknown");
        assert_eq!(event.message, "");
    }

    #[test]
    fn test_tags_coerced_to_strings() {
        let raw = RawLogEvent {
            tags: Some(
                json!({"plain": "text", "count": 7, "flag": true, "obj": {"a": 1}})
                    .as_object()
                    .cloned()
                    .unwrap(),
            ),
            ..Default::default()
        };
        let event = normalize(raw, &identity());
        assert_eq!(event.tags["plain"], "text");
        assert_eq!(event.tags["count"], "7");
        assert_eq!(event.tags["flag"], "true");
        assert_eq!(event.tags["obj"], r#"{"a":1}"#);
    }

    #[test]
    fn test_room_id_falls_back_to_identity() {
        let raw = RawLogEvent::default();
        let event = normalize(raw, &identity_with_room("lobby"));
        assert_eq!(event.room_id.as_deref(), Some("lobby"));

        // The event's own room wins over the identity's.
        let raw = RawLogEvent {
            room_id: Some("arena".into()),
            ..Default::default()
        };
        let event = normalize(raw, &identity_with_room("lobby"));
        assert_eq!(event.room_id.as_deref(), Some("arena"));
    }

    #[test]
    fn test_client_id_cannot_be_spoofed() {
        // A clientId in the body is not even a RawLogEvent field; it is
        // dropped at deserialization and the identity's id always wins.
        let raw: RawLogEvent =
            serde_json::from_value(json!({"clientId": "attacker", "message": "x"})).unwrap();
        let event = normalize(raw, &identity());
        assert_eq!(event.client_id, "c1");
    }

    #[test]
    fn test_idempotent_on_canonical_input() {
        let raw = RawLogEvent {
            timestamp: Some(json!("2026-05-06T07:08:09Z")),
            platform: Some("frontend".into()),
            severity: Some("WARNING".into()),
            event_type: Some("click".into()),
            message: Some("m".into()),
            tags: Some(json!({"k": "v"}).as_object().cloned().unwrap()),
            ..Default::default()
        };
        let first = normalize(raw, &identity());

        // Cast the normalized event back to the raw shape and re-normalize.
        let as_raw: RawLogEvent =
            serde_json::from_value(serde_json::to_value(&first).unwrap()).unwrap();
        let second = normalize(as_raw, &identity());
        assert_eq!(first, second);
    }

    #[test]
    fn test_expired_timestamp_is_not_rejected() {
        // Normalization never validates recency; an old timestamp passes
        // through untouched.
        let old = Utc::now() - Duration::days(400);
        let raw = RawLogEvent {
            timestamp: Some(json!(old.to_rfc3339())),
            ..Default::default()
        };
        let event = normalize(raw, &identity());
        assert_eq!(event.timestamp.timestamp(), old.timestamp());
    }
}
