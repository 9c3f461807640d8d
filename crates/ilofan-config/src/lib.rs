//! Configuration for ilofan.
//!
//! One TOML file plus `ILOFAN_*` environment overrides, password
//! resolution (env, keyring, plaintext), and translation into
//! `ilofan_core::GatewayConfig`. A missing host or username is not an
//! error: the gateway simply starts unconfigured.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ilofan_core::{
    AutomationConfig, DeviceSettings, GatewayConfig, ManagementCredentials, SchedulerConfig,
    ShellConfig, Thresholds, TlsMode, TransportConfig,
};

/// Keyring service name; entries are `<host>/password`.
pub const KEYRING_SERVICE: &str = "ilofan";

/// Environment variable that overrides every other password source.
pub const PASSWORD_ENV: &str = "ILOFAN_PASSWORD";

/// Upper bound on extra power attempts after a connection reset.
pub const MAX_POWER_RETRIES: u32 = 2;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for {host}")]
    NoCredentials { host: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceSection,
    #[serde(default)]
    pub scheduler: SchedulerSection,
    #[serde(default)]
    pub automation: AutomationSection,
}

/// `[device]`: where the management controller is and how to reach it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceSection {
    /// Hostname or IP, no scheme.
    pub host: Option<String>,
    pub username: Option<String>,
    /// Plaintext password (prefer keyring or env var).
    pub password: Option<String>,
    /// Name of an environment variable holding the password.
    pub password_env: Option<String>,
    pub ssh_port: u16,
    /// `sshpass`-compatible wrapper around `ssh`.
    pub ssh_program: PathBuf,
    pub connect_timeout_secs: u64,
    pub command_timeout_secs: u64,
    /// Re-enable SHA-1 key exchange and RSA/DSS host keys.
    pub legacy_algorithms: bool,
    pub status_path: String,
    pub status_timeout_secs: u64,
    /// Verify the status API certificate against this CA instead of
    /// accepting any certificate.
    pub ca_cert: Option<PathBuf>,
    pub fan_count: u8,
}

impl Default for DeviceSection {
    fn default() -> Self {
        let device = DeviceSettings::default();
        Self {
            host: None,
            username: None,
            password: None,
            password_env: None,
            ssh_port: device.shell.port,
            ssh_program: device.shell.program,
            connect_timeout_secs: device.shell.connect_timeout.as_secs(),
            command_timeout_secs: device.shell.command_timeout.as_secs(),
            legacy_algorithms: device.shell.legacy_algorithms,
            status_path: device.status_path,
            status_timeout_secs: device.transport.timeout.as_secs(),
            ca_cert: None,
            fan_count: device.fan_count,
        }
    }
}

/// `[scheduler]`: telemetry fetch cadence.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerSection {
    pub interval_secs: u64,
    pub domain_delay_ms: u64,
    pub power_retries: u32,
    pub power_backoff_ms: u64,
    pub log_window: usize,
}

impl Default for SchedulerSection {
    fn default() -> Self {
        let scheduler = SchedulerConfig::default();
        Self {
            interval_secs: scheduler.interval.as_secs(),
            domain_delay_ms: duration_ms(scheduler.domain_delay),
            power_retries: scheduler.power_retries,
            power_backoff_ms: duration_ms(scheduler.power_backoff),
            log_window: scheduler.log_window,
        }
    }
}

/// `[automation]`: closed-loop fan control.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AutomationSection {
    pub enabled: bool,
    pub interval_secs: u64,
    pub low: f64,
    pub med: f64,
}

impl Default for AutomationSection {
    fn default() -> Self {
        let automation = AutomationConfig::default();
        Self {
            enabled: automation.enabled,
            interval_secs: automation.interval.as_secs(),
            low: automation.thresholds.low,
            med: automation.thresholds.med,
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl Config {
    /// Copy with the plaintext password masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.device.password.is_some() {
            copy.device.password = Some("********".into());
        }
        copy
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "ilofan", "ilofan").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("ilofan");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

fn defaults() -> Figment {
    Figment::new().merge(Serialized::defaults(Config::default()))
}

/// Load from `path` (a missing file is fine) plus `ILOFAN_*` env vars.
/// `ILOFAN_DEVICE__HOST` sets `device.host`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = defaults()
        .merge(Toml::file(path))
        .merge(Env::prefixed("ILOFAN_").split("__"));
    Ok(figment.extract()?)
}

/// Parse TOML text over the defaults, ignoring the environment.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    Ok(defaults().merge(Toml::string(toml)).extract()?)
}

// ── Credential resolution ───────────────────────────────────────────

/// Password lookup order: `ILOFAN_PASSWORD`, the variable named by
/// `password_env`, the system keyring, then plaintext `password`.
fn resolve_password_with(
    device: &DeviceSection,
    host: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    env(PASSWORD_ENV)
        .or_else(|| device.password_env.as_deref().and_then(&env))
        .or_else(|| keyring(&format!("{host}/password")))
        .or_else(|| device.password.clone())
        .map(SecretString::from)
}

fn keyring_password(entry: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, entry)
        .ok()?
        .get_password()
        .ok()
}

fn credentials_with(
    device: &DeviceSection,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<Option<ManagementCredentials>, ConfigError> {
    let (Some(host), Some(username)) = (
        device.host.as_deref().filter(|h| !h.trim().is_empty()),
        device.username.as_deref().filter(|u| !u.trim().is_empty()),
    ) else {
        return Ok(None);
    };

    let secret = resolve_password_with(device, host, env, keyring).ok_or_else(|| {
        ConfigError::NoCredentials {
            host: host.to_owned(),
        }
    })?;
    Ok(Some(ManagementCredentials::new(host.trim(), username, secret)))
}

/// Credentials for the configured device, or `None` when no host or
/// username is set.
pub fn resolve_credentials(
    config: &Config,
) -> Result<Option<ManagementCredentials>, ConfigError> {
    credentials_with(&config.device, |name| std::env::var(name).ok(), keyring_password)
}

/// Store a password in the system keyring for `host`.
pub fn store_password(host: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{host}/password"))
        .and_then(|entry| entry.set_password(password))
        .map_err(|e| invalid("keyring", e.to_string()))
}

// ── Translation ─────────────────────────────────────────────────────

fn positive_secs(field: &str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(invalid(field, "must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

/// Validate and translate into the core's runtime config.
pub fn to_gateway_config(config: &Config) -> Result<GatewayConfig, ConfigError> {
    let d = &config.device;
    if d.fan_count == 0 {
        return Err(invalid("device.fan_count", "must be at least 1"));
    }
    if !d.status_path.starts_with('/') {
        return Err(invalid(
            "device.status_path",
            format!("must be an absolute path, got '{}'", d.status_path),
        ));
    }

    let s = &config.scheduler;
    if s.log_window == 0 {
        return Err(invalid("scheduler.log_window", "must be at least 1"));
    }
    if s.power_retries > MAX_POWER_RETRIES {
        return Err(invalid(
            "scheduler.power_retries",
            format!("must be at most {MAX_POWER_RETRIES}, got {}", s.power_retries),
        ));
    }

    let a = &config.automation;
    let thresholds =
        Thresholds::new(a.low, a.med).map_err(|e| invalid("automation.low/med", e.to_string()))?;

    let tls = d
        .ca_cert
        .clone()
        .map_or(TlsMode::DangerAcceptInvalid, TlsMode::CustomCa);

    Ok(GatewayConfig {
        device: DeviceSettings {
            shell: ShellConfig {
                program: d.ssh_program.clone(),
                port: d.ssh_port,
                connect_timeout: positive_secs("device.connect_timeout_secs", d.connect_timeout_secs)?,
                command_timeout: positive_secs("device.command_timeout_secs", d.command_timeout_secs)?,
                legacy_algorithms: d.legacy_algorithms,
            },
            transport: TransportConfig {
                tls,
                timeout: positive_secs("device.status_timeout_secs", d.status_timeout_secs)?,
            },
            status_path: d.status_path.clone(),
            fan_count: d.fan_count,
        },
        scheduler: SchedulerConfig {
            interval: positive_secs("scheduler.interval_secs", s.interval_secs)?,
            domain_delay: Duration::from_millis(s.domain_delay_ms),
            power_retries: s.power_retries,
            power_backoff: Duration::from_millis(s.power_backoff_ms),
            log_window: s.log_window,
        },
        automation: AutomationConfig {
            enabled: a.enabled,
            interval: positive_secs("automation.interval_secs", a.interval_secs)?,
            thresholds,
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write as _;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn device(toml: &str) -> DeviceSection {
        parse_config(toml).unwrap().device
    }

    #[test]
    fn defaults_match_core_defaults() {
        let cfg = parse_config("").unwrap();
        let gateway = to_gateway_config(&cfg).unwrap();
        assert_eq!(gateway.scheduler.interval, Duration::from_secs(180));
        assert_eq!(gateway.scheduler.domain_delay, Duration::from_millis(1000));
        assert_eq!(gateway.scheduler.power_backoff, Duration::from_millis(2000));
        assert_eq!(gateway.device.shell.command_timeout, Duration::from_secs(60));
        assert_eq!(gateway.device.fan_count, 6);
        assert!(!gateway.automation.enabled);
        assert!(matches!(gateway.device.transport.tls, TlsMode::DangerAcceptInvalid));
    }

    #[test]
    fn toml_overrides_defaults_per_field() {
        let cfg = parse_config(
            r#"
            [device]
            host = "10.0.0.5"
            fan_count = 4
            ca_cert = "/etc/ilo-ca.pem"

            [scheduler]
            interval_secs = 60

            [automation]
            enabled = true
            low = 35.0
            med = 45.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.device.ssh_port, 22);
        assert_eq!(cfg.scheduler.log_window, 5);

        let gateway = to_gateway_config(&cfg).unwrap();
        assert_eq!(gateway.device.fan_count, 4);
        assert_eq!(gateway.scheduler.interval, Duration::from_secs(60));
        assert_eq!(gateway.automation.thresholds, Thresholds { low: 35.0, med: 45.0 });
        assert!(matches!(gateway.device.transport.tls, TlsMode::CustomCa(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[device]\nhost = \"ilo.lab\"\nusername = \"admin\"").unwrap();
        let cfg = load_config_from(file.path()).unwrap();
        assert_eq!(cfg.device.host.as_deref(), Some("ilo.lab"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.scheduler.interval_secs, 180);
    }

    #[test]
    fn unordered_thresholds_are_rejected() {
        let cfg = parse_config("[automation]\nlow = 50.0\nmed = 40.0").unwrap();
        assert!(matches!(
            to_gateway_config(&cfg),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let cfg = parse_config("[scheduler]\ninterval_secs = 0").unwrap();
        assert!(to_gateway_config(&cfg).is_err());
        let cfg = parse_config("[scheduler]\nlog_window = 0").unwrap();
        assert!(to_gateway_config(&cfg).is_err());
    }

    #[test]
    fn power_retries_are_capped() {
        let cfg = parse_config("[scheduler]\npower_retries = 500").unwrap();
        match to_gateway_config(&cfg) {
            Err(ConfigError::Validation { field, .. }) => {
                assert_eq!(field, "scheduler.power_retries");
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let cfg = parse_config("[scheduler]\npower_retries = 0").unwrap();
        assert_eq!(to_gateway_config(&cfg).unwrap().scheduler.power_retries, 0);
        let cfg = parse_config("[scheduler]\npower_retries = 2").unwrap();
        assert_eq!(to_gateway_config(&cfg).unwrap().scheduler.power_retries, 2);
    }

    #[test]
    fn missing_host_is_not_configured() {
        let d = device("[device]\nusername = \"admin\"\npassword = \"pw\"");
        assert!(credentials_with(&d, no_env, no_env).unwrap().is_none());
    }

    #[test]
    fn host_without_password_is_an_error() {
        let d = device("[device]\nhost = \"ilo\"\nusername = \"admin\"");
        assert!(matches!(
            credentials_with(&d, no_env, no_env),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn password_resolution_order() {
        let d = device(
            "[device]\nhost = \"ilo\"\nusername = \"admin\"\npassword = \"plain\"\npassword_env = \"MY_PW\"",
        );
        let secret = |env: &dyn Fn(&str) -> Option<String>, keyring: &dyn Fn(&str) -> Option<String>| {
            credentials_with(&d, env, keyring)
                .unwrap()
                .unwrap()
                .secret
                .expose_secret()
                .to_owned()
        };

        let all_env = |name: &str| match name {
            PASSWORD_ENV => Some("global".to_owned()),
            "MY_PW" => Some("named".to_owned()),
            _ => None,
        };
        let named_env = |name: &str| (name == "MY_PW").then(|| "named".to_owned());
        let keyring = |entry: &str| (entry == "ilo/password").then(|| "keyring".to_owned());

        assert_eq!(secret(&all_env, &keyring), "global");
        assert_eq!(secret(&named_env, &keyring), "named");
        assert_eq!(secret(&no_env, &keyring), "keyring");
        assert_eq!(secret(&no_env, &no_env), "plain");
    }

    #[test]
    fn redacted_masks_password() {
        let cfg = parse_config("[device]\npassword = \"hunter2\"").unwrap();
        let shown = cfg.redacted().to_toml_string().unwrap();
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("********"));
    }
}
