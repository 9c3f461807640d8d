//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and a stable process exit code.

use miette::Diagnostic;
use thiserror::Error;

use ilofan_config::ConfigError;
use ilofan_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_CONFIGURED: i32 = 3;
    pub const DEVICE: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Management controller is not configured")]
    #[diagnostic(
        code(ilofan::not_configured),
        help(
            "Set [device] host and username in {path},\n\
             or export ILOFAN_DEVICE__HOST and ILOFAN_DEVICE__USERNAME."
        )
    )]
    NotConfigured { path: String },

    #[error("No password configured for {host}")]
    #[diagnostic(
        code(ilofan::no_credentials),
        help(
            "Store one with: ilofan config set-password\n\
             Or set the ILOFAN_PASSWORD environment variable."
        )
    )]
    NoCredentials { host: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(ilofan::config))]
    Config { message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the management controller")]
    #[diagnostic(
        code(ilofan::connection_failed),
        help(
            "Check that the host is reachable and ssh/sshpass are installed.\n\
             Older iLO firmware may need device.legacy_algorithms = true."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Timed out after {seconds}s waiting for the device")]
    #[diagnostic(
        code(ilofan::timeout),
        help("Raise device.command_timeout_secs if the device is slow to answer.")
    )]
    Timeout { seconds: u64 },

    #[error("Timed out waiting for the status API: {reason}")]
    #[diagnostic(
        code(ilofan::request_timeout),
        help("Raise device.status_timeout_secs if the status API is slow to answer.")
    )]
    RequestTimeout { reason: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Device rejected `{command}`: {message}")]
    #[diagnostic(code(ilofan::command_failed))]
    CommandFailed { command: String, message: String },

    #[error("Device reported no usable temperature readings")]
    #[diagnostic(
        code(ilofan::no_readings),
        help("Run: ilofan sensors to inspect what the device reports")
    )]
    NoReadings,

    #[error("Status API error: {message}")]
    #[diagnostic(code(ilofan::api_error))]
    Api { message: String },

    // ── Usage ────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(ilofan::validation))]
    Validation { message: String },

    // ── Output / IO ──────────────────────────────────────────────────
    #[error("Failed to render output: {message}")]
    #[diagnostic(code(ilofan::output))]
    Output { message: String },

    #[error(transparent)]
    #[diagnostic(code(ilofan::io))]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(ilofan::internal))]
    Internal(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotConfigured { .. } | Self::NoCredentials { .. } => exit_code::NOT_CONFIGURED,
            Self::Config { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } | Self::RequestTimeout { .. } => exit_code::TIMEOUT,
            Self::CommandFailed { .. } | Self::NoReadings | Self::Api { .. } => exit_code::DEVICE,
            Self::Output { .. } | Self::Io(_) | Self::Internal(_) => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotConfigured => CliError::NotConfigured {
                path: ilofan_config::config_path().display().to_string(),
            },
            CoreError::Config { message } => CliError::Config { message },
            CoreError::ConnectionReset { reason } | CoreError::ConnectionFailed { reason } => {
                CliError::ConnectionFailed { reason }
            }
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::RequestTimeout { reason } => CliError::RequestTimeout { reason },
            CoreError::CommandFailed { command, message } => {
                CliError::CommandFailed { command, message }
            }
            CoreError::NoSensorReadings => CliError::NoReadings,
            CoreError::Api { message, .. } => CliError::Api { message },
            CoreError::ValidationFailed { message } => CliError::Validation { message },
            CoreError::Internal(msg) => CliError::Internal(msg),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { host } => CliError::NoCredentials { host },
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
