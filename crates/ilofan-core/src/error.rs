// ── Core error types ──
//
// Domain-level errors from ilofan-core. Consumers never see raw process
// exit codes or HTTP bodies; the `From<ilofan_api::Error>` impl folds
// transport failures into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Management controller is not configured")]
    NotConfigured,

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Connection to management controller was reset: {reason}")]
    ConnectionReset { reason: String },

    #[error("Cannot reach management controller: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Device command timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Status API request timed out: {reason}")]
    RequestTimeout { reason: String },

    // ── Device errors ────────────────────────────────────────────────
    #[error("Device rejected `{command}`: {message}")]
    CommandFailed { command: String, message: String },

    #[error("Device reported no usable temperature readings")]
    NoSensorReadings,

    #[error("Status API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Connection-reset class failures are the only ones the scheduler
    /// retries.
    pub fn is_connection_reset(&self) -> bool {
        matches!(self, Self::ConnectionReset { .. })
    }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ilofan_api::Error> for CoreError {
    fn from(err: ilofan_api::Error) -> Self {
        if err.is_connection_reset() {
            return CoreError::ConnectionReset {
                reason: err.to_string(),
            };
        }

        match err {
            ilofan_api::Error::NotConfigured => CoreError::NotConfigured,
            ilofan_api::Error::Command { command, stderr } => CoreError::CommandFailed {
                command,
                message: stderr,
            },
            ilofan_api::Error::CommandTimeout { timeout_secs, .. } => {
                CoreError::Timeout { timeout_secs }
            }
            ilofan_api::Error::Session { .. } | ilofan_api::Error::Spawn { .. } => {
                CoreError::ConnectionFailed {
                    reason: err.to_string(),
                }
            }
            ilofan_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::RequestTimeout {
                        reason: e.to_string(),
                    }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ilofan_api::Error::Status { status, ref path } => CoreError::Api {
                message: format!("HTTP {status} for {path}"),
                status: Some(status),
            },
            ilofan_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ilofan_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                reason: format!("TLS error: {msg}"),
            },
            ilofan_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
