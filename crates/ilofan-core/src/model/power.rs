// ── Power snapshot ──

use serde::{Deserialize, Serialize};

/// Power warning trigger configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerWarning {
    pub kind: Option<String>,
    pub threshold_watts: Option<f64>,
    pub duration_minutes: Option<f64>,
}

/// Flat power record from one `oemhp_power1` query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerSnapshot {
    pub regulation_mode: Option<String>,
    pub capacity_watts: Option<f64>,
    pub present_watts: Option<f64>,
    pub average_watts: Option<f64>,
    pub min_watts: Option<f64>,
    pub max_watts: Option<f64>,
    pub warning: PowerWarning,
    pub firmware_version: Option<String>,
    pub auto_restore: Option<String>,
}
