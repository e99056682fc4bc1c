//! Token verification.
//!
//! Checks run in a fixed order so every malformed input maps to exactly one
//! error variant: header shape, token shape, signature, payload, clientId,
//! scope, expiry. The signature comparison is constant-time over the full
//! length of both strings; it never short-circuits on the first differing
//! byte.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::collections::BTreeSet;
use subtle::ConstantTimeEq;
use thiserror::Error;

use super::claims::{signature_for, ClientIdentity};
use crate::WRITE_SCOPE;

/// Token verification errors, one per check.
///
/// Messages never echo the secret or the supplied signature.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// No `Authorization` header, or it is not a bearer header.
    #[error("missing token")]
    MissingToken,
    /// Token is not two non-empty dot-separated parts.
    #[error("malformed token")]
    Malformed,
    /// Recomputed HMAC does not match the supplied signature.
    #[error("invalid signature")]
    InvalidSignature,
    /// Payload is not base64url-encoded JSON.
    #[error("invalid payload")]
    InvalidPayload,
    /// `clientId` claim absent or empty.
    #[error("missing clientId")]
    MissingClientId,
    /// `scopes` claim does not grant `log:write`.
    #[error("insufficient scope")]
    InsufficientScope,
    /// `expiresAt` claim absent or not a timestamp.
    #[error("missing expiry")]
    MissingExpiry,
    /// `expiresAt` is not in the future.
    #[error("token expired")]
    Expired,
}

/// Verify a bearer token against the shared secret, using the current time
/// for the expiry check.
pub fn verify(
    authorization_header: Option<&str>,
    secret: &str,
) -> Result<ClientIdentity, TokenError> {
    verify_at(authorization_header, secret, Utc::now())
}

/// Verify a bearer token against the shared secret at an explicit instant.
pub fn verify_at(
    authorization_header: Option<&str>,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<ClientIdentity, TokenError> {
    // 1. Header shape.
    let token = authorization_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(TokenError::MissingToken)?;

    // 2. Token shape: exactly two non-empty parts.
    let mut parts = token.splitn(2, '.');
    let payload_b64 = parts.next().unwrap_or("");
    let signature_b64 = parts.next().unwrap_or("");
    if payload_b64.is_empty() || signature_b64.is_empty() || signature_b64.contains('.') {
        return Err(TokenError::Malformed);
    }

    // 3. Signature, compared in constant time over the full length.
    let expected = signature_for(payload_b64, secret);
    let matches: bool = expected
        .as_bytes()
        .ct_eq(signature_b64.as_bytes())
        .into();
    if !matches {
        return Err(TokenError::InvalidSignature);
    }

    // 4. Payload decodes to a JSON object.
    let raw = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| TokenError::InvalidPayload)?;
    let payload: Value =
        serde_json::from_slice(&raw).map_err(|_| TokenError::InvalidPayload)?;
    if !payload.is_object() {
        return Err(TokenError::InvalidPayload);
    }

    // 5. clientId is a non-empty string.
    let client_id = match payload.get("clientId").and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => return Err(TokenError::MissingClientId),
    };

    // 6. scopes grants log:write.
    let scopes: BTreeSet<String> = payload
        .get("scopes")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    if !scopes.contains(WRITE_SCOPE) {
        return Err(TokenError::InsufficientScope);
    }

    // 7. expiresAt is present, parseable, and strictly in the future.
    let expires_at = payload
        .get("expiresAt")
        .and_then(parse_expiry)
        .ok_or(TokenError::MissingExpiry)?;
    if expires_at <= now {
        return Err(TokenError::Expired);
    }

    let room_id = payload
        .get("roomId")
        .and_then(Value::as_str)
        .map(String::from);

    Ok(ClientIdentity { client_id, room_id, scopes })
}

/// Parse an expiry claim: RFC 3339 string or integer epoch milliseconds.
fn parse_expiry(value: &Value) -> Option<DateTime<Utc>> {
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

// =============================================================================
// TESTS
// =============================================================================
