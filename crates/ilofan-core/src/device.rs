// ── Device facade ──
//
// Domain-level reads and writes on top of the two transports. Every call
// opens its own session (shell) or request (status API); nothing here
// caches. The scheduler and the automation loop both go through this.

use std::sync::Arc;

use tracing::debug;

use ilofan_api::{
    CommandChannel, CredentialStore, ShellClient, StatusApi, StatusClient, ThermalResponse,
};

use crate::command::{FanCommand, FanInfoKind};
use crate::config::DeviceSettings;
use crate::convert;
use crate::error::CoreError;
use crate::model::{
    ControllerEntry, FanReading, PowerSnapshot, SensorReading, SystemIdentity, SystemLogRecord,
};
use crate::parse;

// ── Command vocabulary ──────────────────────────────────────────────

const SHOW_SYSTEM: &str = "show system1";
const SHOW_CONTROLLER_FIRMWARE: &str = "show /map1/firmware1";
const SHOW_HOST_FIRMWARE: &str = "show system1/firmware1";
const SHOW_POWER: &str = "show /system1/oemhp_power1";
const SHOW_LOG: &str = "show system1/log1";

fn show_log_record(number: u32) -> String {
    format!("{SHOW_LOG}/record{number}")
}

/// Handle to one management controller.
#[derive(Clone)]
pub struct Device {
    shell: Arc<dyn CommandChannel>,
    status: Arc<dyn StatusApi>,
    credentials: CredentialStore,
    status_path: String,
    fan_count: u8,
}

impl Device {
    /// Build the real SSH and HTTPS transports from settings.
    pub fn new(settings: &DeviceSettings, credentials: CredentialStore) -> Result<Self, CoreError> {
        let shell = ShellClient::new(settings.shell.clone(), credentials.clone());
        let status = StatusClient::new(&settings.transport, credentials.clone())?;
        Ok(Self::with_transports(
            Arc::new(shell),
            Arc::new(status),
            credentials,
            settings,
        ))
    }

    /// Use caller-supplied transports (scripted devices in tests).
    pub fn with_transports(
        shell: Arc<dyn CommandChannel>,
        status: Arc<dyn StatusApi>,
        credentials: CredentialStore,
        settings: &DeviceSettings,
    ) -> Self {
        Self {
            shell,
            status,
            credentials,
            status_path: settings.status_path.clone(),
            fan_count: settings.fan_count,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_configured()
    }

    pub fn fan_count(&self) -> u8 {
        self.fan_count
    }

    async fn run(&self, command: &str) -> Result<String, CoreError> {
        debug!(command, "executing device command");
        Ok(self.shell.execute(command).await?)
    }

    // ── Telemetry domains ────────────────────────────────────────────

    /// `None` when the device answered without a model or serial.
    pub async fn fetch_identity(&self) -> Result<Option<SystemIdentity>, CoreError> {
        let system = self.run(SHOW_SYSTEM).await?;
        let controller_fw = self.run(SHOW_CONTROLLER_FIRMWARE).await?;
        let host_fw = self.run(SHOW_HOST_FIRMWARE).await?;
        Ok(parse::parse_identity(&system, &controller_fw, &host_fw))
    }

    pub async fn fetch_power(&self) -> Result<Option<PowerSnapshot>, CoreError> {
        let text = self.run(SHOW_POWER).await?;
        Ok(parse::parse_power(&text))
    }

    /// Record numbers currently on the device, in emission order.
    pub async fn list_log_records(&self) -> Result<Vec<u32>, CoreError> {
        let text = self.run(SHOW_LOG).await?;
        Ok(parse::record_numbers(&text))
    }

    pub async fn fetch_log_record(&self, number: u32) -> Result<Option<SystemLogRecord>, CoreError> {
        let text = self.run(&show_log_record(number)).await?;
        Ok(parse::parse_log_record(&text, number))
    }

    pub async fn fetch_controllers(&self) -> Result<Option<Vec<ControllerEntry>>, CoreError> {
        let text = self.run(FanInfoKind::Controllers.command()).await?;
        Ok(parse::parse_controller_entries(&text))
    }

    // ── Live reads ───────────────────────────────────────────────────

    async fn read_thermal(&self) -> Result<ThermalResponse, CoreError> {
        debug!(path = %self.status_path, "reading thermal status");
        let value = self.status.fetch_status(&self.status_path).await?;
        serde_json::from_value(value.clone()).map_err(|e| {
            ilofan_api::Error::Deserialization {
                message: e.to_string(),
                body: value.to_string(),
            }
            .into()
        })
    }

    /// Present temperature sensors followed by present fans.
    pub async fn read_sensors(&self) -> Result<Vec<SensorReading>, CoreError> {
        let thermal = self.read_thermal().await?;
        let fans = convert::fans(thermal.clone());
        let mut sensors = convert::temperatures(thermal);
        sensors.extend(fans.iter().map(SensorReading::from));
        Ok(sensors)
    }

    pub async fn read_fans(&self) -> Result<Vec<FanReading>, CoreError> {
        Ok(convert::fans(self.read_thermal().await?))
    }

    /// Raw `fan info` dump.
    pub async fn fan_info(&self, kind: FanInfoKind) -> Result<String, CoreError> {
        self.run(kind.command()).await
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Validate, then execute each rendered line in its own session.
    /// Stops at the first line the device rejects.
    pub async fn apply(&self, command: FanCommand) -> Result<(), CoreError> {
        command.validate(self.fan_count)?;
        if !self.is_configured() {
            return Err(CoreError::NotConfigured);
        }
        for line in command.render(self.fan_count) {
            self.run(&line).await?;
        }
        Ok(())
    }
}
