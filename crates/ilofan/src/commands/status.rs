//! `ilofan status`: one fetch cycle, then the cached domains.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tabled::Tabled;

use ilofan_core::model::{ControllerEntry, PowerSnapshot, SystemIdentity, SystemLogRecord};
use ilofan_core::{CacheEntry, Domain, DomainSummary, Gateway};

use crate::cli::{DomainArg, GlobalOpts, OutputFormat, StatusArgs};
use crate::config::Context;
use crate::error::CliError;
use crate::output::{self, detail_lines, opt, opt_num};

// ── Report shapes ────────────────────────────────────────────────────

#[derive(Serialize)]
struct DomainReport<T> {
    #[serde(flatten)]
    summary: DomainSummary,
    data: Option<Arc<T>>,
}

impl<T> DomainReport<T> {
    fn new(gateway: &Gateway, domain: Domain, entry: CacheEntry<T>) -> Self {
        Self {
            summary: gateway.domain_status(domain),
            data: entry.data,
        }
    }
}

#[derive(Serialize)]
struct StatusReport {
    configured: bool,
    last_cycle: Option<DateTime<Utc>>,
    identity: DomainReport<SystemIdentity>,
    power: DomainReport<PowerSnapshot>,
    logs: DomainReport<Vec<SystemLogRecord>>,
    controllers: DomainReport<Vec<ControllerEntry>>,
}

impl StatusReport {
    fn collect(gateway: &Gateway) -> Self {
        let scheduler = gateway.scheduler();
        Self {
            configured: gateway.is_configured(),
            last_cycle: scheduler.last_cycle(),
            identity: DomainReport::new(gateway, Domain::Identity, scheduler.identity()),
            power: DomainReport::new(gateway, Domain::Power, scheduler.power()),
            logs: DomainReport::new(gateway, Domain::Logs, scheduler.logs()),
            controllers: DomainReport::new(gateway, Domain::Controllers, scheduler.controllers()),
        }
    }

    fn summaries(&self) -> [&DomainSummary; 4] {
        [
            &self.identity.summary,
            &self.power.summary,
            &self.logs.summary,
            &self.controllers.summary,
        ]
    }
}

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Updated")]
    updated: String,
    #[tabled(rename = "Error")]
    error: String,
}

fn summary_row(summary: &DomainSummary, color: bool) -> SummaryRow {
    SummaryRow {
        domain: summary.domain.to_string(),
        status: output::paint_availability(summary.availability, color),
        updated: local_time(summary.last_updated),
        error: summary.error.clone().unwrap_or_default(),
    }
}

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "#")]
    number: u32,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&SystemLogRecord> for LogRow {
    fn from(r: &SystemLogRecord) -> Self {
        Self {
            number: r.number,
            severity: r.severity.to_string(),
            date: r.date.clone(),
            time: r.time.clone(),
            description: r.description.clone(),
        }
    }
}

#[derive(Tabled)]
struct ControllerRow {
    #[tabled(rename = "PID")]
    index: u32,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Set point")]
    set_point: String,
    #[tabled(rename = "Reading")]
    reading: String,
    #[tabled(rename = "Output")]
    output: String,
}

impl From<&ControllerEntry> for ControllerRow {
    fn from(c: &ControllerEntry) -> Self {
        Self {
            index: c.index,
            active: if c.active { "yes".into() } else { "no".into() },
            set_point: opt_num(c.set_point),
            reading: opt_num(c.reading),
            output: opt_num(c.output),
        }
    }
}

// ── Detail views ─────────────────────────────────────────────────────

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

fn identity_detail(id: &SystemIdentity) -> String {
    let fw = |f: &ilofan_core::model::FirmwareInfo| {
        format!(
            "{} ({})",
            opt(f.version.as_deref()),
            opt(f.date.as_deref())
        )
    };
    detail_lines(&[
        ("Model", opt(id.model.as_deref())),
        ("Serial", opt(id.serial_number.as_deref())),
        ("iLO", opt(id.controller_firmware.generation.as_deref())),
        ("iLO firmware", fw(&id.controller_firmware)),
        ("System ROM", fw(&id.host_firmware)),
    ])
}

fn watts(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |w| format!("{w:.0} W"))
}

fn power_detail(p: &PowerSnapshot) -> String {
    let warning = match (&p.warning.kind, p.warning.threshold_watts) {
        (Some(kind), Some(threshold)) => format!(
            "{kind} above {threshold:.0} W for {} min",
            opt_num(p.warning.duration_minutes)
        ),
        (Some(kind), None) => kind.clone(),
        _ => "-".into(),
    };
    detail_lines(&[
        ("Present", watts(p.present_watts)),
        ("Average", watts(p.average_watts)),
        ("Min / Max", format!("{} / {}", watts(p.min_watts), watts(p.max_watts))),
        ("Capacity", watts(p.capacity_watts)),
        ("Regulation", opt(p.regulation_mode.as_deref())),
        ("Warning", warning),
        ("Auto restore", opt(p.auto_restore.as_deref())),
        ("Firmware", opt(p.firmware_version.as_deref())),
    ])
}

fn logs_detail(records: &[SystemLogRecord]) -> String {
    let rows: Vec<LogRow> = records.iter().map(LogRow::from).collect();
    output::render_table(&rows)
}

fn controllers_detail(entries: &[ControllerEntry]) -> String {
    let rows: Vec<ControllerRow> = entries.iter().map(ControllerRow::from).collect();
    output::render_table(&rows)
}

/// Section for one domain: its summary line plus the payload if any.
fn section<T>(
    title: &str,
    report: &DomainReport<T>,
    detail: impl Fn(&T) -> String,
    color: bool,
) -> String {
    let mut out = format!(
        "{title}: {}",
        output::paint_availability(report.summary.availability, color)
    );
    if let Some(err) = &report.summary.error {
        out.push_str(&format!(" ({err})"));
    }
    if let Some(data) = &report.data {
        out.push('\n');
        out.push_str(&detail(data));
    }
    out
}

fn full_detail(report: &StatusReport, color: bool) -> String {
    let rows: Vec<SummaryRow> = report
        .summaries()
        .into_iter()
        .map(|s| summary_row(s, color))
        .collect();
    let mut parts = vec![output::render_table(&rows)];
    if let Some(data) = &report.identity.data {
        parts.push(identity_detail(data));
    }
    if let Some(data) = &report.power.data {
        parts.push(power_detail(data));
    }
    if let Some(data) = report.logs.data.as_deref().filter(|l| !l.is_empty()) {
        parts.push(logs_detail(data));
    }
    if let Some(data) = report.controllers.data.as_deref().filter(|c| !c.is_empty()) {
        parts.push(controllers_detail(data));
    }
    parts.join("\n\n")
}

fn plain_lines(report: &StatusReport) -> String {
    report
        .summaries()
        .into_iter()
        .map(|s| format!("{}\t{}", s.domain, s.availability))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ──────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: StatusArgs, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.gateway.scheduler().refresh().await;
    let report = StatusReport::collect(&ctx.gateway);
    let color = output::should_color(global.color);
    let format = global.output;

    let out = match args.domain {
        None => output::render_single(format, &report, |r| full_detail(r, color), plain_lines)?,
        Some(DomainArg::Identity) => {
            render_domain(format, "identity", &report.identity, identity_detail, color)?
        }
        Some(DomainArg::Power) => render_domain(format, "power", &report.power, power_detail, color)?,
        Some(DomainArg::Logs) => render_domain(format, "logs", &report.logs, |l| logs_detail(l), color)?,
        Some(DomainArg::Pid) => render_domain(
            format,
            "controllers",
            &report.controllers,
            |c| controllers_detail(c),
            color,
        )?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

fn render_domain<T: Serialize>(
    format: OutputFormat,
    title: &str,
    report: &DomainReport<T>,
    detail: impl Fn(&T) -> String,
    color: bool,
) -> Result<String, CliError> {
    output::render_single(
        format,
        report,
        |r| section(title, r, &detail, color),
        |r| r.summary.availability.to_string(),
    )
}
