//! Token claims, verified identity, and token minting.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::BTreeSet;

type HmacSha256 = Hmac<Sha256>;

/// The identity a verified token proves.
///
/// Produced once per request by [`verify`](super::verify); immutable; never
/// persisted on its own, only embedded into batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientIdentity {
    /// Authenticated client id. Always taken from the token, never from
    /// client-supplied event fields.
    pub client_id: String,
    /// Room the client is bound to, if the token carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    /// Permission scopes granted by the token issuer.
    pub scopes: BTreeSet<String>,
}

/// Claims embedded in a token payload.
///
/// Used by [`sign`] to mint tokens; verification reads the payload
/// field-by-field instead so that each missing claim maps to its own error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Client identifier.
    pub client_id: String,
    /// Optional room binding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// Expiry, epoch milliseconds.
    pub expires_at: i64,
    /// Issue time, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,
}

/// Compute the base64url-encoded HMAC-SHA256 of the payload text.
pub(crate) fn signature_for(payload_b64: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload_b64.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

/// Mint a compact `payload.signature` token for the given claims.
pub fn sign(claims: &TokenClaims, secret: &str) -> String {
    let json = serde_json::to_vec(claims).expect("claims serialize to JSON");
    let payload = URL_SAFE_NO_PAD.encode(json);
    let signature = signature_for(&payload, secret);
    format!("{}.{}", payload, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_has_two_parts() {
        let claims = TokenClaims {
            client_id: "c1".into(),
            room_id: None,
            scopes: vec!["log:write".into()],
            expires_at: 4_102_444_800_000,
            issued_at: None,
        };
        let token = sign(&claims, "secret");
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 2);
        assert!(!parts[0].is_empty());
        assert!(!parts[1].is_empty());

        // Payload decodes back to the claims JSON.
        let raw = URL_SAFE_NO_PAD.decode(parts[0]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["clientId"], "c1");
        assert_eq!(value["scopes"][0], "log:write");
    }

    #[test]
    fn test_signature_depends_on_secret() {
        assert_ne!(signature_for("abc", "s1"), signature_for("abc", "s2"));
        assert_eq!(signature_for("abc", "s1"), signature_for("abc", "s1"));
    }
}
