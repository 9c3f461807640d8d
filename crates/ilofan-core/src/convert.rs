// ── Status-API to domain conversions ──
//
// Bridges raw `ilofan_api::thermal` wire types into `crate::model`. Only
// entries whose state is enabled/present survive; unnamed entries get a
// positional name so tables stay readable.

use ilofan_api::{RawFan, RawStatus, RawTemperature, ThermalResponse};

use crate::model::{FanReading, SensorCategory, SensorReading};

fn status_text(status: &RawStatus) -> String {
    status
        .health
        .clone()
        .or_else(|| status.state.clone())
        .unwrap_or_else(|| "Unknown".into())
}

impl From<RawTemperature> for SensorReading {
    fn from(raw: RawTemperature) -> Self {
        Self {
            status: status_text(&raw.status),
            name: raw.name.unwrap_or_default(),
            category: SensorCategory::Temperature,
            reading: raw.reading_celsius,
            context: raw.physical_context,
            critical: raw.upper_threshold_critical,
            fatal: raw.upper_threshold_fatal,
        }
    }
}

impl From<RawFan> for FanReading {
    fn from(raw: RawFan) -> Self {
        Self {
            name: raw.name.unwrap_or_default(),
            speed: raw.reading,
            status: raw.status.state.unwrap_or_else(|| "Unknown".into()),
            health: raw.status.health,
        }
    }
}

impl From<&FanReading> for SensorReading {
    fn from(fan: &FanReading) -> Self {
        Self {
            name: fan.name.clone(),
            category: SensorCategory::Fan,
            status: fan.health.clone().unwrap_or_else(|| fan.status.clone()),
            reading: fan.speed,
            context: None,
            critical: None,
            fatal: None,
        }
    }
}

fn named<T>(items: Vec<T>, prefix: &str, name: impl Fn(&mut T) -> &mut String) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, mut item)| {
            let slot = name(&mut item);
            if slot.is_empty() {
                *slot = format!("{prefix} {}", i + 1);
            }
            item
        })
        .collect()
}

/// Present temperature sensors, in device order.
pub(crate) fn temperatures(thermal: ThermalResponse) -> Vec<SensorReading> {
    let present: Vec<SensorReading> = thermal
        .temperatures
        .into_iter()
        .filter(|t| t.status.is_present())
        .map(SensorReading::from)
        .collect();
    named(present, "Sensor", |s| &mut s.name)
}

/// Present fans, in device order.
pub(crate) fn fans(thermal: ThermalResponse) -> Vec<FanReading> {
    let present: Vec<FanReading> = thermal
        .fans
        .into_iter()
        .filter(|f| f.status.is_present())
        .map(FanReading::from)
        .collect();
    named(present, "Fan", |f| &mut f.name)
}
