// Redfish thermal wire types
//
// Field names differ between DMTF Redfish and the older management
// controller schema (`CurrentReading` / `FanName`), so both spellings are
// accepted via serde aliases. Everything is optional: firmware omits
// fields for absent sensors.

use serde::{Deserialize, Serialize};

/// Body of `GET /redfish/v1/chassis/1/Thermal/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ThermalResponse {
    #[serde(default)]
    pub temperatures: Vec<RawTemperature>,
    #[serde(default)]
    pub fans: Vec<RawFan>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTemperature {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "CurrentReading")]
    pub reading_celsius: Option<f64>,
    #[serde(default)]
    pub physical_context: Option<String>,
    #[serde(default)]
    pub upper_threshold_critical: Option<f64>,
    #[serde(default)]
    pub upper_threshold_fatal: Option<f64>,
    #[serde(default)]
    pub status: RawStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawFan {
    #[serde(default, alias = "FanName")]
    pub name: Option<String>,
    #[serde(default, alias = "CurrentReading")]
    pub reading: Option<f64>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub status: RawStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawStatus {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub health: Option<String>,
}

impl RawStatus {
    /// `Enabled` or `Present` (case-insensitive). Absent and disabled
    /// sensors are not surfaced.
    pub fn is_present(&self) -> bool {
        self.state.as_deref().is_some_and(|s| {
            s.eq_ignore_ascii_case("enabled") || s.eq_ignore_ascii_case("present")
        })
    }
}
