// ── Runtime configuration ──
//
// These types describe how to talk to the management controller and how
// often to poll it. They never touch disk: `ilofan-config` (or any other
// embedder) builds a `GatewayConfig` and hands it in. Credentials are
// supplied separately because their absence is a valid runtime state.

use std::time::Duration;

use ilofan_api::status::THERMAL_PATH;
use ilofan_api::{ShellConfig, TlsMode, TransportConfig};

use crate::error::CoreError;

/// Device-facing settings shared by every domain fetcher.
#[derive(Debug, Clone)]
pub struct DeviceSettings {
    pub shell: ShellConfig,
    pub transport: TransportConfig,
    /// Redfish thermal resource path.
    pub status_path: String,
    /// Number of fan slots addressed by `SetAll`.
    pub fan_count: u8,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            shell: ShellConfig::default(),
            transport: TransportConfig {
                tls: TlsMode::DangerAcceptInvalid,
                timeout: Duration::from_secs(15),
            },
            status_path: THERMAL_PATH.into(),
            fan_count: 6,
        }
    }
}

/// Fetch-cycle tuning.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Time between cycles. The first cycle runs immediately on start.
    pub interval: Duration,
    /// Pause between consecutive domains inside one cycle.
    pub domain_delay: Duration,
    /// Extra attempts for the power domain on connection resets.
    pub power_retries: u32,
    /// Fixed wait between power attempts.
    pub power_backoff: Duration,
    /// How many of the most recent log records to keep.
    pub log_window: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(180),
            domain_delay: Duration::from_secs(1),
            power_retries: 2,
            power_backoff: Duration::from_secs(2),
            log_window: 5,
        }
    }
}

/// Two ordered temperature thresholds, `low < med`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Thresholds {
    pub low: f64,
    pub med: f64,
}

impl Thresholds {
    pub fn new(low: f64, med: f64) -> Result<Self, CoreError> {
        if !low.is_finite() || !med.is_finite() {
            return Err(CoreError::ValidationFailed {
                message: format!("thresholds must be finite, got low={low} med={med}"),
            });
        }
        if low >= med {
            return Err(CoreError::ValidationFailed {
                message: format!("low threshold ({low}) must be below med threshold ({med})"),
            });
        }
        Ok(Self { low, med })
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: 30.0,
            med: 40.0,
        }
    }
}

/// Automation control loop settings.
#[derive(Debug, Clone)]
pub struct AutomationConfig {
    /// Start the loop together with the gateway.
    pub enabled: bool,
    pub interval: Duration,
    pub thresholds: Thresholds,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: Duration::from_secs(60),
            thresholds: Thresholds::default(),
        }
    }
}

/// Everything the gateway needs except the credentials.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub device: DeviceSettings,
    pub scheduler: SchedulerConfig,
    pub automation: AutomationConfig,
}
