//! `ilofan auto once`: a single automation evaluation.

use ilofan_core::{AutomationDecision, Thresholds};

use crate::cli::{AutoArgs, AutoCommand, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

pub fn describe(d: &AutomationDecision) -> String {
    format!(
        "mean {:.1}°C over {} sensors -> {} ({}%)",
        d.mean, d.sensors, d.tier, d.percent
    )
}

pub async fn handle(ctx: &Context, args: AutoArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AutoCommand::Once { low, med } => {
            ctx.require_configured()?;
            let automation = ctx.gateway.automation();

            let current = automation.thresholds();
            let thresholds = Thresholds::new(low.unwrap_or(current.low), med.unwrap_or(current.med))?;
            automation.set_thresholds(thresholds);

            let decision = automation.tick().await.map_err(|e| ctx.error(e))?;
            let out = output::render_single(global.output, &decision, describe, |d| {
                d.percent.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
