//! Bearer Token Authentication
//!
//! Compact two-part tokens: `payload.signature`, where `payload` is the
//! base64url-encoded JSON claims and `signature` is the base64url-encoded
//! HMAC-SHA256 of the payload text. Stateless: validity is purely a function
//! of the signature and the embedded expiry. The relay only verifies tokens;
//! issuing happens out-of-band (the [`sign`] helper exists for tests and
//! operational tooling).

mod claims;
mod verify;

pub use claims::{sign, ClientIdentity, TokenClaims};
pub use verify::{verify, verify_at, TokenError};
