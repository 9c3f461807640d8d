//! Command dispatch: bridges CLI args -> gateway calls -> output formatting.

pub mod auto;
pub mod config_cmd;
pub mod fan;
pub mod run;
pub mod sensors;
pub mod status;

use crate::cli::{Command, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a device-bound command to its handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Run(args) => run::handle(ctx, args, global).await,
        Command::Status(args) => status::handle(ctx, args, global).await,
        Command::Sensors => sensors::handle_sensors(ctx, global).await,
        Command::Fans => sensors::handle_fans(ctx, global).await,
        Command::Fan(args) => fan::handle(ctx, args, global).await,
        Command::Auto(args) => auto::handle(ctx, args, global).await,
        // Config is handled before dispatch
        Command::Config(_) => unreachable!(),
    }
}
