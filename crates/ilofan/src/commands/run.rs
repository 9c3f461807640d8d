//! `ilofan run`: the long-running gateway until Ctrl-C.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::{info, warn};

use ilofan_core::{Domain, DomainSummary, Gateway};

use crate::cli::{GlobalOpts, RunArgs};
use crate::commands::auto;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct CycleEvent {
    at: DateTime<Utc>,
    domains: Vec<DomainSummary>,
}

fn cycle_event(gateway: &Gateway, at: DateTime<Utc>) -> CycleEvent {
    CycleEvent {
        at,
        domains: Domain::iter().map(|d| gateway.domain_status(d)).collect(),
    }
}

fn cycle_line(event: &CycleEvent, color: bool) -> String {
    let domains = event
        .domains
        .iter()
        .map(|s| format!("{}={}", s.domain, output::paint_availability(s.availability, color)))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{} {domains}", event.at.format("%H:%M:%S"))
}

pub async fn handle(ctx: &Context, args: RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let gateway = &ctx.gateway;
    if !gateway.is_configured() {
        warn!(path = %ctx.path.display(), "device not configured; every domain will report not_configured");
    }

    // Subscribe first so the immediate cycle started below is not marked seen.
    let mut cycles = gateway.scheduler().cache().subscribe_last_cycle();
    let mut decisions = gateway.automation().subscribe_decisions();

    gateway.start().await;
    if args.automation && !gateway.automation().is_running() {
        gateway.automation().start().await;
    }
    info!("gateway running, Ctrl-C to stop");

    let color = output::should_color(global.color);

    let outcome = loop {
        let emitted = tokio::select! {
            signal = tokio::signal::ctrl_c() => break signal.map_err(CliError::from),
            changed = cycles.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let Some(at) = *cycles.borrow_and_update() else { continue };
                let event = cycle_event(gateway, at);
                output::render_single(
                    global.output,
                    &event,
                    |e| cycle_line(e, color),
                    |e| e.at.to_rfc3339(),
                )
            }
            changed = decisions.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let Some(decision) = decisions.borrow_and_update().clone() else { continue };
                output::render_single(
                    global.output,
                    &decision,
                    |d| format!("auto: {}", auto::describe(d)),
                    |d| d.percent.to_string(),
                )
            }
        };
        match emitted {
            Ok(out) => output::print_output(&out, global.quiet),
            Err(e) => break Err(e),
        }
    };

    info!("stopping");
    gateway.stop().await;
    outcome
}
