use std::io;

use thiserror::Error;

/// Top-level error type for the `ilofan-api` crate.
///
/// Covers every failure mode of both device surfaces: missing
/// configuration, the per-command SSH session, and the Redfish client.
/// `ilofan-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// No management credentials are configured. Raised before any
    /// connection is attempted.
    #[error("Management controller is not configured")]
    NotConfigured,

    // ── Command channel ─────────────────────────────────────────────
    /// The session helper could not be launched at all.
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The device (or the session) wrote to stderr.
    #[error("Command `{command}` failed: {stderr}")]
    Command { command: String, stderr: String },

    /// The session exited non-zero without explaining itself on stderr.
    #[error("Session for `{command}` exited with status {code}")]
    Session { command: String, code: i32 },

    /// The command did not finish within the configured deadline.
    #[error("Command `{command}` timed out after {timeout_secs}s")]
    CommandTimeout { command: String, timeout_secs: u64 },

    // ── Status API ──────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the status API.
    #[error("Status API returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

/// Markers that identify a dropped or reset connection in `ssh` stderr.
const RESET_MARKERS: &[&str] = &[
    "connection reset",
    "reset by peer",
    "connection closed by",
    "kex_exchange_identification",
    "broken pipe",
    "econnreset",
];

impl Error {
    /// Returns `true` for connection-reset class failures.
    ///
    /// Management controllers drop sessions under load; these are the
    /// only failures callers are expected to retry.
    pub fn is_connection_reset(&self) -> bool {
        match self {
            Self::Command { stderr, .. } => {
                let lower = stderr.to_ascii_lowercase();
                RESET_MARKERS.iter().any(|m| lower.contains(m))
            }
            Self::Spawn { source, .. } => is_reset_kind(source.kind()),
            Self::Transport(e) => {
                let mut cause: Option<&(dyn std::error::Error + 'static)> = Some(e);
                while let Some(err) = cause {
                    if let Some(io) = err.downcast_ref::<io::Error>() {
                        if is_reset_kind(io.kind()) {
                            return true;
                        }
                    }
                    cause = err.source();
                }
                false
            }
            _ => false,
        }
    }

    /// Returns `true` if credentials were absent.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }
}

fn is_reset_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted | io::ErrorKind::BrokenPipe
    )
}
