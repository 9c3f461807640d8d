//! `ilofan fan ...`: manual fan writes and raw info dumps.

use serde::Serialize;

use ilofan_core::{FanCommand, FanInfoKind};

use crate::cli::{FanArgs, FanCommand as FanCmd, GlobalOpts, InfoKindArg};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

/// What a write did, for structured output.
#[derive(Serialize)]
struct WriteResult {
    command: FanCommand,
    lines: Vec<String>,
}

fn info_kind(kind: InfoKindArg) -> FanInfoKind {
    match kind {
        InfoKindArg::Fans => FanInfoKind::Fans,
        InfoKindArg::Pid => FanInfoKind::Controllers,
        InfoKindArg::Groups => FanInfoKind::Groups,
    }
}

pub async fn handle(ctx: &Context, args: FanArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let command = match args.command {
        FanCmd::Info { kind } => return show_info(ctx, info_kind(kind), global).await,
        FanCmd::Lock { fan, pwm } => FanCommand::Lock { fan, pwm },
        FanCmd::Override { fan, percent } => FanCommand::Override { fan, percent },
        FanCmd::SetAll { percent } => FanCommand::SetAll { percent },
        FanCmd::Unlock => FanCommand::Unlock,
        FanCmd::PidLow { pid, value } => FanCommand::PidLowLimit { pid, value },
    };
    let lines = command.render(ctx.gateway.device().fan_count());

    ctx.gateway.apply(command).await.map_err(|e| ctx.error(e))?;
    tracing::info!(commands = lines.len(), "fan write applied");

    let result = WriteResult { command, lines };
    let out = output::render_single(
        global.output,
        &result,
        |r| format!("ok: {}", r.lines.join("; ")),
        |r| r.lines.join("\n"),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn show_info(ctx: &Context, kind: FanInfoKind, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.require_configured()?;
    let text = ctx
        .gateway
        .device()
        .fan_info(kind)
        .await
        .map_err(|e| ctx.error(e))?;
    output::print_output(text.trim_end(), global.quiet);
    Ok(())
}
