//! CLI configuration: thin wrapper around `ilofan_config`.
//!
//! Resolves the config file from `--config` / `ILOFAN_CONFIG` and builds
//! the gateway every device-facing command runs against.

use std::path::PathBuf;

use ilofan_core::{CoreError, Gateway};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use ilofan_config::Config;

/// The config file in effect: the flag wins over the platform default.
pub fn effective_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(ilofan_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = effective_path(global);
    tracing::debug!(path = %path.display(), "loading config");
    Ok(ilofan_config::load_config_from(&path)?)
}

/// A loaded config plus the gateway built from it.
pub struct Context {
    pub config: Config,
    pub path: PathBuf,
    pub gateway: Gateway,
}

impl Context {
    pub fn build(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = load(global)?;
        let gateway_config = ilofan_config::to_gateway_config(&config)?;
        let credentials = ilofan_config::resolve_credentials(&config)?;
        let gateway = Gateway::new(gateway_config, credentials)?;
        Ok(Self {
            config,
            path: effective_path(global),
            gateway,
        })
    }

    /// Like `CliError::from`, but points "not configured" help at the
    /// file actually in use.
    pub fn error(&self, err: CoreError) -> CliError {
        if err.is_not_configured() {
            return CliError::NotConfigured {
                path: self.path.display().to_string(),
            };
        }
        err.into()
    }

    pub fn require_configured(&self) -> Result<(), CliError> {
        if self.gateway.is_configured() {
            Ok(())
        } else {
            Err(self.error(CoreError::NotConfigured))
        }
    }
}
