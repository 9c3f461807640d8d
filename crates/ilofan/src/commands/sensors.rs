//! `ilofan sensors` / `ilofan fans`: live reads from the status API.

use tabled::Tabled;

use ilofan_core::model::{FanReading, SensorReading};

use crate::cli::GlobalOpts;
use crate::config::Context;
use crate::error::CliError;
use crate::output::{self, opt};

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    category: String,
    #[tabled(rename = "Reading")]
    reading: String,
    #[tabled(rename = "Context")]
    context: String,
    #[tabled(rename = "Critical")]
    critical: String,
    #[tabled(rename = "Fatal")]
    fatal: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn sensor_row(s: &SensorReading) -> SensorRow {
    SensorRow {
        name: s.name.clone(),
        category: s.category.to_string(),
        reading: opt(s.numeric()),
        context: s.context.clone().unwrap_or_default(),
        critical: opt(s.critical),
        fatal: opt(s.fatal),
        status: s.status.clone(),
    }
}

#[derive(Tabled)]
struct FanRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Speed %")]
    speed: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Health")]
    health: String,
}

fn fan_row(f: &FanReading) -> FanRow {
    FanRow {
        name: f.name.clone(),
        speed: opt(f.speed),
        status: f.status.clone(),
        health: f.health.clone().unwrap_or_default(),
    }
}

pub async fn handle_sensors(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.require_configured()?;
    let sensors = ctx
        .gateway
        .device()
        .read_sensors()
        .await
        .map_err(|e| ctx.error(e))?;

    let out = output::render_list(global.output, &sensors, sensor_row, |s| s.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_fans(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.require_configured()?;
    let fans = ctx
        .gateway
        .device()
        .read_fans()
        .await
        .map_err(|e| ctx.error(e))?;

    let out = output::render_list(global.output, &fans, fan_row, |f| f.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
