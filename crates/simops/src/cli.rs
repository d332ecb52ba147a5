//! Clap derive structures for the `simops` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// simops -- reseller connectivity reporting from the command line
#[derive(Debug, Parser)]
#[command(
    name = "simops",
    version,
    about = "Inspect bundle, endpoint, and usage reporting data",
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
    /// Reporting API base URL
    #[arg(long, env = "SIMOPS_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Restrict data to one tenant (admin sessions only)
    #[arg(long, env = "SIMOPS_TENANT", global = true)]
    pub tenant: Option<String>,

    /// Restrict data to one customer
    #[arg(long, env = "SIMOPS_CUSTOMER", global = true)]
    pub customer: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SIMOPS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in (email/password + OTP, or a service token)
    Login(LoginArgs),

    /// Sign out and discard the stored session
    Logout,

    /// Dashboard overview: KPIs, bundle health, alerts
    #[command(alias = "ov")]
    Overview(OverviewArgs),

    /// Bundle instances with lifecycle classification
    #[command(alias = "inst", alias = "i")]
    Instances(InstancesArgs),

    /// SIM endpoints with health and anomaly flags
    #[command(alias = "ep", alias = "e")]
    Endpoints(EndpointsArgs),

    /// Usage aggregates over a date range
    #[command(alias = "u")]
    Usage(UsageArgs),

    /// Export a dataset and save the file
    Export(ExportArgs),
}

// ── Command Args ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompts for password and OTP code)
    #[arg(long, conflicts_with = "service_token")]
    pub email: Option<String>,

    /// Use a service token instead of the OTP flow (prompts for it)
    #[arg(long)]
    pub service_token: bool,

    /// Organization label for a service-token session
    #[arg(long, requires = "service_token")]
    pub org: Option<String>,
}

#[derive(Debug, Args)]
pub struct OverviewArgs {
    /// Date range for the usage KPI, in days
    #[arg(long, default_value = "30")]
    pub days: i64,
}

#[derive(Debug, Args)]
pub struct InstancesArgs {
    /// Filter by backend status (e.g. Active)
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by ICCID
    #[arg(long)]
    pub iccid: Option<String>,

    /// Only instances ending before this ISO date
    #[arg(long)]
    pub expiring_before: Option<String>,

    /// Only final instances (last in their renewal chain)
    #[arg(long)]
    pub final_only: bool,

    #[arg(long, default_value = "1")]
    pub page: u32,

    #[arg(long, default_value = "50")]
    pub per_page: u32,
}

#[derive(Debug, Args)]
pub struct EndpointsArgs {
    /// Filter by endpoint status
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long, default_value = "1")]
    pub page: u32,

    #[arg(long, default_value = "50")]
    pub per_page: u32,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupBy {
    Daily,
    Monthly,
    Annual,
}

#[derive(Debug, Args)]
pub struct UsageArgs {
    #[arg(long, value_enum, default_value = "daily")]
    pub group_by: GroupBy,

    /// Start date (ISO); defaults to `--days` ago
    #[arg(long)]
    pub from: Option<String>,

    /// End date (ISO); defaults to today
    #[arg(long)]
    pub to: Option<String>,

    /// Date range in days when `--from` is absent
    #[arg(long, default_value = "30")]
    pub days: i64,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Dataset to export (e.g. usage, bundle-instances)
    pub dataset: String,

    /// Export format
    #[arg(long, default_value = "csv")]
    pub format: String,

    #[arg(long)]
    pub from: Option<String>,

    #[arg(long)]
    pub to: Option<String>,

    /// Output file (defaults to the server-suggested filename)
    #[arg(long)]
    pub out: Option<std::path::PathBuf>,
}
