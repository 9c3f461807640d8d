// ── Fan controller bank ──
//
// Observed state of the device's own control loops ("PID entries").
// Nothing here implements a control law.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerEntry {
    pub index: u32,
    pub active: bool,
    pub set_point: Option<f64>,
    pub reading: Option<f64>,
    pub output: Option<f64>,
}
