//! # Log Relay
//!
//! Edge-deployed log ingestion and replay service: a stateless HTTP boundary
//! that authenticates clients via signed bearer tokens, normalizes log events
//! from three platforms, forwards them to an external sink, and recovers from
//! sink failures via a durable dead-letter queue (DLQ) with bounded replay.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       LOG RELAY                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  auth/           - Bearer token verification                 │
//! │  ├── claims.rs   - Token claims, identity, signing           │
//! │  └── verify.rs   - Ordered checks, constant-time compare     │
//! │                                                              │
//! │  event/          - Event records and normalization           │
//! │  ├── record.rs   - Raw and normalized event shapes           │
//! │  ├── normalize.rs- Defaulting and identity stamping          │
//! │  └── batch.rs    - Per-request log batches                   │
//! │                                                              │
//! │  sink/           - Delivery to the external log sink         │
//! │  ├── dispatch.rs - Atomic batch dispatch                     │
//! │  ├── http.rs     - HTTP sink adapter                         │
//! │  └── memory.rs   - In-memory sink (tests, local dev)         │
//! │                                                              │
//! │  dlq/            - Dead-letter queue over a blob store       │
//! │  ├── store.rs    - Time-ordered keys, put/list/get/delete    │
//! │  ├── fs.rs       - Filesystem blob backend                   │
//! │  └── memory.rs   - In-memory blob backend                    │
//! │                                                              │
//! │  replay.rs       - Bounded, fail-forward DLQ replay          │
//! │  api/            - HTTP surface (axum)                       │
//! │  config.rs       - Immutable service configuration           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Delivery Guarantee
//!
//! At-least-once to either the sink or the DLQ:
//! - A batch is atomic: every event reaches the sink, or the whole
//!   undelivered remainder lands in the DLQ.
//! - Sink failures never fail the ingest request; the DLQ substitutes
//!   durability for synchronous delivery.
//! - Replay is oldest-first, bounded per invocation, and fail-forward;
//!   concurrent replays are safe (NotFound-skip + idempotent delete).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod config;
pub mod dlq;
pub mod event;
pub mod replay;
pub mod sink;

// Re-export commonly used types
pub use auth::{sign, verify, ClientIdentity, TokenClaims, TokenError};
pub use config::ServiceConfig;
pub use dlq::{BlobStore, DeadLetterStore};
pub use event::{normalize, LogBatch, NormalizedLogEvent, RawLogEvent};
pub use replay::{ReplayProcessor, ReplaySummary};
pub use sink::{dispatch, DispatchOutcome, LogSink};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scope a token must carry to ingest logs
pub const WRITE_SCOPE: &str = "log:write";

/// Default bound on batches processed per replay invocation
pub const DEFAULT_REPLAY_MAX_BATCH: usize = 10;
