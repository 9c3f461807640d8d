// ── System identity ──

use serde::{Deserialize, Serialize};

/// Firmware name/version/date triple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareInfo {
    /// Product generation, e.g. `iLO 4`. Only known for the controller.
    pub generation: Option<String>,
    pub version: Option<String>,
    pub date: Option<String>,
}

/// Server model, serial, and firmware levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemIdentity {
    pub model: Option<String>,
    pub serial_number: Option<String>,
    /// Management controller firmware.
    pub controller_firmware: FirmwareInfo,
    /// Host system ROM.
    pub host_firmware: FirmwareInfo,
}
