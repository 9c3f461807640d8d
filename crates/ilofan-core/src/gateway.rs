// ── Gateway ──
//
// The one context object a process builds: credentials, device handle,
// fetch scheduler and automation loop, with an explicit start/stop
// lifecycle. Embedders (the CLI, a routing layer) hold a `Gateway` and
// never reach for globals.

use chrono::Utc;
use tracing::info;

use ilofan_api::{CredentialStore, ManagementCredentials};

use crate::automation::AutomationLoop;
use crate::command::FanCommand;
use crate::config::GatewayConfig;
use crate::device::Device;
use crate::error::CoreError;
use crate::scheduler::FetchScheduler;
use crate::store::{Availability, Domain, DomainSummary};

pub struct Gateway {
    config: GatewayConfig,
    device: Device,
    scheduler: FetchScheduler,
    automation: AutomationLoop,
}

impl Gateway {
    /// Build the real transports. `credentials` may be absent; the gateway
    /// then reports "not configured" until `set_credentials` is called.
    pub fn new(
        config: GatewayConfig,
        credentials: Option<ManagementCredentials>,
    ) -> Result<Self, CoreError> {
        let store = credentials.map_or_else(CredentialStore::new, CredentialStore::with);
        let device = Device::new(&config.device, store)?;
        Ok(Self::with_device(config, device))
    }

    /// Build around an existing device handle.
    pub fn with_device(config: GatewayConfig, device: Device) -> Self {
        let scheduler = FetchScheduler::new(device.clone(), config.scheduler.clone());
        let automation = AutomationLoop::new(device.clone(), &config.automation);
        Self {
            config,
            device,
            scheduler,
            automation,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn scheduler(&self) -> &FetchScheduler {
        &self.scheduler
    }

    pub fn automation(&self) -> &AutomationLoop {
        &self.automation
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Start the scheduler, and the automation loop if enabled.
    pub async fn start(&self) {
        self.scheduler.start().await;
        if self.config.automation.enabled {
            self.automation.start().await;
        }
    }

    pub async fn stop(&self) {
        self.automation.stop().await;
        self.scheduler.stop().await;
    }

    // ── Credentials ──────────────────────────────────────────────────

    pub fn is_configured(&self) -> bool {
        self.device.is_configured()
    }

    /// Picked up by the next command; no restart needed.
    pub fn set_credentials(&self, credentials: ManagementCredentials) {
        info!(host = %credentials.host, "management credentials updated");
        self.device.credentials().set(credentials);
    }

    pub fn clear_credentials(&self) {
        info!("management credentials cleared");
        self.device.credentials().clear();
    }

    // ── Reads & writes ───────────────────────────────────────────────

    /// Availability of one domain, distinguishing "not configured" from
    /// "still initializing" and "unavailable".
    pub fn domain_status(&self, domain: Domain) -> DomainSummary {
        let mut summary = self.scheduler.cache().summary(domain, Utc::now());
        if !self.is_configured() && summary.availability != Availability::Ready {
            summary.availability = Availability::NotConfigured;
        }
        summary
    }

    pub async fn apply(&self, command: FanCommand) -> Result<(), CoreError> {
        self.device.apply(command).await
    }
}
