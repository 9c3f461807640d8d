// ── System event log ──

use std::cmp::Reverse;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum LogSeverity {
    Informational,
    Caution,
    Critical,
    Repaired,
    Unknown,
}

impl LogSeverity {
    /// Lenient parse: anything outside the enumeration is `Unknown`.
    pub fn from_device(raw: &str) -> Self {
        raw.trim().parse().unwrap_or(Self::Unknown)
    }
}

/// One event log record, identified by its sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemLogRecord {
    pub number: u32,
    pub severity: LogSeverity,
    /// `MM/DD/YYYY` as reported.
    pub date: String,
    /// `HH:MM` or `HH:MM:SS` as reported.
    pub time: String,
    pub description: String,
}

impl SystemLogRecord {
    /// Parsed date/time, or `None` if the device text is malformed.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%m/%d/%Y").ok()?;
        let time = self.time.trim();
        let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
            .ok()?;
        Some(date.and_time(time))
    }
}

/// Sort newest first. Records without a parseable timestamp share one
/// rank after all dated records; the stable sort keeps their relative
/// order.
pub fn sort_newest_first(records: &mut [SystemLogRecord]) {
    records.sort_by_cached_key(|r| Reverse(r.timestamp()));
}
