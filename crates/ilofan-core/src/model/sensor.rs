// ── Live sensor readings ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[non_exhaustive]
pub enum SensorCategory {
    Temperature,
    Fan,
}

/// One sensor as reported by the device at read time. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub name: String,
    pub category: SensorCategory,
    pub status: String,
    /// `None` when the device reports no numeric value.
    pub reading: Option<f64>,
    /// Physical location tag (e.g. `Intake`, `CPU`).
    pub context: Option<String>,
    pub critical: Option<f64>,
    pub fatal: Option<f64>,
}

impl SensorReading {
    /// The reading, if it is a usable number.
    pub fn numeric(&self) -> Option<f64> {
        self.reading.filter(|r| r.is_finite())
    }
}

/// One fan as reported by the device at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanReading {
    pub name: String,
    /// Current speed, in the unit the device reports (usually percent).
    pub speed: Option<f64>,
    pub status: String,
    pub health: Option<String>,
}
