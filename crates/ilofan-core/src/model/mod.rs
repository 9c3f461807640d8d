// ── Domain model ──
//
// Typed records parsed from device output. All of them are re-derived on
// every fetch; only the cache wrappers live longer.

pub mod controller;
pub mod identity;
pub mod log;
pub mod power;
pub mod sensor;

pub use controller::ControllerEntry;
pub use identity::{FirmwareInfo, SystemIdentity};
pub use log::{LogSeverity, SystemLogRecord};
pub use power::{PowerSnapshot, PowerWarning};
pub use sensor::{FanReading, SensorCategory, SensorReading};
