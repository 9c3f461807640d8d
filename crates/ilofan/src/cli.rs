//! Clap derive structures for the `ilofan` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ilofan -- thermal telemetry and fan control for HPE iLO
#[derive(Debug, Parser)]
#[command(
    name = "ilofan",
    version,
    about = "Monitor and control server fans through an HPE iLO management controller",
    long_about = "Reads identity, power, event log and fan controller state over the iLO\n\
        command shell, reads live temperatures over Redfish, and writes fan\n\
        speeds and controller limits back to the device.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "ILOFAN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ILOFAN_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format on stderr
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// One identifier per line (for piping)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the telemetry scheduler (and optionally automation) until Ctrl-C
    Run(RunArgs),

    /// Fetch every telemetry domain once and show the cache
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Read live temperature and fan sensors
    Sensors,

    /// Read live fan speeds
    Fans,

    /// Write fan speeds and controller limits
    Fan(FanArgs),

    /// Temperature-driven fan automation
    Auto(AutoArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

// ── Run ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Enable the automation loop regardless of config
    #[arg(long)]
    pub automation: bool,
}

// ── Status ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Show only one domain
    pub domain: Option<DomainArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DomainArg {
    Identity,
    Power,
    Logs,
    #[value(alias = "controllers")]
    Pid,
}

// ── Fan ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FanArgs {
    #[command(subcommand)]
    pub command: FanCommand,
}

#[derive(Debug, Subcommand)]
pub enum FanCommand {
    /// Pin one fan to a raw duty cycle (0-255)
    Lock { fan: u8, pwm: u8 },

    /// Pin one fan to a percentage
    Override {
        fan: u8,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },

    /// Pin every fan to a percentage
    SetAll {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },

    /// Release all manual overrides
    Unlock,

    /// Set a fan controller's low limit
    PidLow { pid: u8, value: f64 },

    /// Print a raw `fan info` dump
    Info {
        #[arg(default_value = "fans")]
        kind: InfoKindArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InfoKindArg {
    Fans,
    #[value(alias = "controllers")]
    Pid,
    Groups,
}

// ── Auto ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AutoArgs {
    #[command(subcommand)]
    pub command: AutoCommand,
}

#[derive(Debug, Subcommand)]
pub enum AutoCommand {
    /// Evaluate temperatures once and write the resulting speed
    Once {
        /// Upper bound of the baseline tier (overrides config)
        #[arg(long)]
        low: Option<f64>,
        /// Upper bound of the mid tier (overrides config)
        #[arg(long)]
        med: Option<f64>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (password masked)
    Show,

    /// Print the config file path
    Path,

    /// Store the device password in the system keyring (read from stdin)
    SetPassword,
}
