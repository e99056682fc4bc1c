//! Service Configuration
//!
//! All configuration is read once at startup from environment variables into
//! an immutable `ServiceConfig`, then passed down by plain constructor
//! parameters. Nothing re-reads the environment after initialization.

use thiserror::Error;

use crate::DEFAULT_REPLAY_MAX_BATCH;

/// Configuration errors surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    /// An environment variable is set but not parseable.
    #[error("invalid value for {var}: {reason}")]
    InvalidVar {
        /// Variable name.
        var: &'static str,
        /// Why it failed to parse.
        reason: String,
    },
}

/// Token verification configuration.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret shared with the token issuer. Never logged.
    pub secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig").field("secret", &"<redacted>").finish()
    }
}

/// External log sink configuration.
#[derive(Clone, Debug)]
pub struct SinkConfig {
    /// Intake URL events are POSTed to.
    pub url: String,
    /// Service-account bearer credential, sent out-of-band from client tokens.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Dead-letter queue configuration.
#[derive(Clone, Debug)]
pub struct DlqConfig {
    /// Root directory of the filesystem blob store.
    pub dir: String,
    /// Key prefix for dead-letter records.
    pub prefix: String,
}

/// Complete service configuration, read-only after startup.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Token verification settings.
    pub auth: AuthConfig,
    /// External sink settings.
    pub sink: SinkConfig,
    /// Dead-letter queue settings.
    pub dlq: DlqConfig,
    /// Bound on batches processed per replay invocation.
    pub replay_max_batch: usize,
}

impl ServiceConfig {
    /// Build configuration from environment variables.
    ///
    /// `AUTH_SECRET` and `SINK_URL` are required; everything else has a
    /// development-friendly default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret =
            std::env::var("AUTH_SECRET").map_err(|_| ConfigError::MissingVar("AUTH_SECRET"))?;
        let sink_url =
            std::env::var("SINK_URL").map_err(|_| ConfigError::MissingVar("SINK_URL"))?;

        let timeout_secs = match std::env::var("SINK_TIMEOUT_SECS") {
            Ok(v) => v.parse().map_err(|e| ConfigError::InvalidVar {
                var: "SINK_TIMEOUT_SECS",
                reason: format!("{}", e),
            })?,
            Err(_) => 10,
        };

        let replay_max_batch = match std::env::var("REPLAY_MAX_BATCH") {
            Ok(v) => v.parse().map_err(|e| ConfigError::InvalidVar {
                var: "REPLAY_MAX_BATCH",
                reason: format!("{}", e),
            })?,
            Err(_) => DEFAULT_REPLAY_MAX_BATCH,
        };

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            auth: AuthConfig { secret },
            sink: SinkConfig {
                url: sink_url,
                token: std::env::var("SINK_TOKEN").ok(),
                timeout_secs,
            },
            dlq: DlqConfig {
                dir: std::env::var("DLQ_DIR").unwrap_or_else(|_| "./dlq-data".to_string()),
                prefix: std::env::var("DLQ_PREFIX").unwrap_or_else(|_| "dlq".to_string()),
            },
            replay_max_batch,
        })
    }
}
