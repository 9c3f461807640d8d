// ── Per-domain parsers ──
//
// Each function takes the raw output of the command(s) for one domain and
// returns a typed record, or `None` when the minimum fields are missing.

use crate::model::{
    ControllerEntry, FirmwareInfo, LogSeverity, PowerSnapshot, PowerWarning, SystemIdentity,
    SystemLogRecord,
};

use super::property::{leading_number, property};
use super::table::{TableSpec, parse_field, table_rows};

/// Controller bank table as printed by `fan info a`.
pub const CONTROLLER_TABLE: TableSpec = TableSpec {
    markers: &["PID", "SP", "OUT"],
    min_fields: 5,
};

fn non_empty(text: &str, key: &str) -> Option<String> {
    property(text, key).filter(|v| !v.is_empty())
}

fn number(text: &str, key: &str) -> Option<f64> {
    property(text, key).as_deref().and_then(leading_number)
}

// ── Identity ─────────────────────────────────────────────────────────

/// Build identity from `show system1`, `show /map1/firmware1` and
/// `show system1/firmware1`. Requires a model or a serial number.
pub fn parse_identity(system: &str, controller_fw: &str, host_fw: &str) -> Option<SystemIdentity> {
    let model = non_empty(system, "name");
    let serial_number = non_empty(system, "number");
    if model.is_none() && serial_number.is_none() {
        return None;
    }

    Some(SystemIdentity {
        model,
        serial_number,
        controller_firmware: FirmwareInfo {
            generation: non_empty(controller_fw, "name"),
            version: non_empty(controller_fw, "version"),
            date: non_empty(controller_fw, "date"),
        },
        host_firmware: FirmwareInfo {
            generation: None,
            version: non_empty(host_fw, "version"),
            date: non_empty(host_fw, "date"),
        },
    })
}

// ── Power ────────────────────────────────────────────────────────────

/// Parse `show /system1/oemhp_power1`. Requires present power or the
/// regulation mode.
pub fn parse_power(text: &str) -> Option<PowerSnapshot> {
    let present_watts = number(text, "oemhp_PresentPower");
    let regulation_mode = non_empty(text, "oemhp_powerreg");
    if present_watts.is_none() && regulation_mode.is_none() {
        return None;
    }

    Some(PowerSnapshot {
        regulation_mode,
        capacity_watts: number(text, "oemhp_pwrcap"),
        present_watts,
        average_watts: number(text, "oemhp_AvgPower"),
        min_watts: number(text, "oemhp_MinPower"),
        max_watts: number(text, "oemhp_MaxPower"),
        warning: PowerWarning {
            kind: non_empty(text, "warning_type"),
            threshold_watts: number(text, "warning_threshold"),
            duration_minutes: number(text, "warning_duration"),
        },
        firmware_version: non_empty(text, "oemhp_power_micro_ver"),
        auto_restore: non_empty(text, "oemhp_auto_pwr"),
    })
}

// ── Event log ────────────────────────────────────────────────────────

/// Parse `show system1/log1/record<N>`. Date, time and description are
/// required; the number falls back to the one that was requested.
pub fn parse_log_record(text: &str, requested: u32) -> Option<SystemLogRecord> {
    let date = non_empty(text, "date")?;
    let time = non_empty(text, "time")?;
    let description = non_empty(text, "description")?;

    Some(SystemLogRecord {
        number: property(text, "number")
            .and_then(|n| n.parse().ok())
            .unwrap_or(requested),
        severity: property(text, "severity")
            .map_or(LogSeverity::Unknown, |s| LogSeverity::from_device(&s)),
        date,
        time,
        description,
    })
}

// ── Controller bank ──────────────────────────────────────────────────

fn parse_active(flag: &str) -> Option<bool> {
    match flag.to_ascii_lowercase().as_str() {
        "y" | "yes" | "1" | "on" | "active" | "true" => Some(true),
        "n" | "no" | "0" | "off" | "inactive" | "false" => Some(false),
        _ => None,
    }
}

/// Parse the `fan info a` table. Malformed rows are skipped; `None` when the
/// output carries no table header at all.
pub fn parse_controller_entries(text: &str) -> Option<Vec<ControllerEntry>> {
    let rows = table_rows(text, &CONTROLLER_TABLE)?;
    let entries = rows
        .into_iter()
        .filter_map(|fields| match fields.as_slice() {
            [index, active, set_point, reading, output, ..] => Some(ControllerEntry {
                index: index.parse().ok()?,
                active: parse_active(active)?,
                set_point: parse_field(set_point),
                reading: parse_field(reading),
                output: parse_field(output),
            }),
            _ => None,
        })
        .collect();
    Some(entries)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SYSTEM1: &str = "\
status=0
status_tag=COMMAND COMPLETED
/system1
  Targets
    firmware1
    log1
    oemhp_power1
  Properties
    name=ProLiant DL380p Gen8
    number=CZ12345678
    enabled_state=enabled
";

    const MAP_FW: &str = "\
/map1/firmware1
  Properties
    version=2.82
    date=Feb 06 2023
    name=iLO 4
";

    const SYS_FW: &str = "\
/system1/firmware1
  Properties
    version=P70
    date=05/21/2019
";

    const POWER: &str = "\
/system1/oemhp_power1
  Properties
    oemhp_powerreg=dynamic
    oemhp_pwrcap=0
    oemhp_PresentPower=142 Watts
    oemhp_AvgPower=138 Watts
    oemhp_MaxPower=210 Watts
    oemhp_MinPower=120 Watts
    warning_type=disabled
    warning_threshold=0 Watts
    warning_duration=0 Minutes
    oemhp_power_micro_ver=3.3
    oemhp_auto_pwr=ON (Minimum delay)
";

    const RECORD: &str = "\
/system1/log1/record18
  Properties
    number=18
    severity=Caution
    date=10/18/2026
    time=11:28
    description=Server Power Restored.
";

    #[test]
    fn identity_from_three_queries() {
        let id = parse_identity(SYSTEM1, MAP_FW, SYS_FW).unwrap();
        assert_eq!(id.model.as_deref(), Some("ProLiant DL380p Gen8"));
        assert_eq!(id.serial_number.as_deref(), Some("CZ12345678"));
        assert_eq!(id.controller_firmware.generation.as_deref(), Some("iLO 4"));
        assert_eq!(id.controller_firmware.version.as_deref(), Some("2.82"));
        assert_eq!(id.host_firmware.version.as_deref(), Some("P70"));
        assert_eq!(id.host_firmware.date.as_deref(), Some("05/21/2019"));
    }

    #[test]
    fn identity_needs_model_or_serial() {
        assert!(parse_identity("status=0", MAP_FW, SYS_FW).is_none());
        let id = parse_identity("number=ABC", "", "").unwrap();
        assert_eq!(id.model, None);
        assert_eq!(id.controller_firmware, FirmwareInfo::default());
    }

    #[test]
    fn power_parses_wattages_and_strings() {
        let power = parse_power(POWER).unwrap();
        assert_eq!(power.regulation_mode.as_deref(), Some("dynamic"));
        assert_eq!(power.present_watts, Some(142.0));
        assert_eq!(power.average_watts, Some(138.0));
        assert_eq!(power.min_watts, Some(120.0));
        assert_eq!(power.max_watts, Some(210.0));
        assert_eq!(power.capacity_watts, Some(0.0));
        assert_eq!(power.warning.kind.as_deref(), Some("disabled"));
        assert_eq!(power.warning.duration_minutes, Some(0.0));
        assert_eq!(power.firmware_version.as_deref(), Some("3.3"));
        assert_eq!(power.auto_restore.as_deref(), Some("ON (Minimum delay)"));
    }

    #[test]
    fn power_without_minimum_fields_is_none() {
        assert!(parse_power("status=0\noemhp_AvgPower=100 Watts").is_none());
    }

    #[test]
    fn log_record_parses() {
        let record = parse_log_record(RECORD, 99).unwrap();
        assert_eq!(record.number, 18);
        assert_eq!(record.severity, LogSeverity::Caution);
        assert_eq!(record.date, "10/18/2026");
        assert_eq!(record.time, "11:28");
        assert_eq!(record.description, "Server Power Restored.");
    }

    #[test]
    fn log_record_falls_back_to_requested_number() {
        let text = "date=10/18/2026\ntime=11:28\ndescription=x\nseverity=weird";
        let record = parse_log_record(text, 7).unwrap();
        assert_eq!(record.number, 7);
        assert_eq!(record.severity, LogSeverity::Unknown);
    }

    #[test]
    fn log_record_without_description_is_none() {
        assert!(parse_log_record("date=10/18/2026\ntime=11:28", 1).is_none());
    }

    #[test]
    fn controller_table_skips_malformed_rows() {
        let text = "\
fan info a
PID  ACTIVE  SP     READING  OUT
---  ------  -----  -------  ---
0    Y       40.00  35.50    24
1    N       45.00  N/A      0
x    Y       1      2        3
2    maybe   1      2        3
3    Y       50
4    on      55     41.0     35%
";
        let entries = parse_controller_entries(text).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0],
            ControllerEntry {
                index: 0,
                active: true,
                set_point: Some(40.0),
                reading: Some(35.5),
                output: Some(24.0),
            }
        );
        assert!(!entries[1].active);
        assert_eq!(entries[1].reading, None);
        assert_eq!(entries[2].index, 4);
        assert_eq!(entries[2].output, Some(35.0));
    }

    #[test]
    fn controller_table_without_header_is_none() {
        assert_eq!(parse_controller_entries("status=2\nerror"), None);
    }
}
