mod cli;
mod core;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::workload_cmd::{AddItem, ClearKind};
use crate::core::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "lakecost",
    about = "Monthly cost estimator for a layered Databricks data platform",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Workload file (default: from config, else ~/.config/lakecost/workload.toml)
    #[arg(short, long, global = true)]
    workload: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate monthly cost for the configured layers
    Estimate {
        /// Layer to estimate (landing|raw|conf|pb, default: all configured)
        #[arg(short, long)]
        layer: Option<String>,

        /// Show per-layer detail with cost shares
        #[arg(short, long)]
        all: bool,
    },
    /// Show the unit price table
    Prices {
        /// Restrict to one category (storage|compute|dbu)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Manage the workload file
    Workload {
        #[command(subcommand)]
        action: WorkloadAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum WorkloadAction {
    /// Generate a workload template for selected layers
    Init {
        /// Overwrite an existing workload file
        #[arg(long)]
        force: bool,
    },
    /// Validate the workload and list labels that fall back to defaults
    Check,
    /// Add an itemized entry
    Add {
        #[command(subcommand)]
        item: AddItem,
    },
    /// Remove itemized entries of one kind
    Clear {
        kind: ClearKind,

        /// Engine whose PB items are cleared (default: the workload's engine)
        #[arg(long)]
        engine: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
}

/// Log to stderr; `RUST_LOG` wins, then `--verbose`, then warnings only.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config");
        AppConfig::default()
    });

    let output_opts = cli::output::OutputOptions::resolve(
        cli.json,
        cli.format.as_deref(),
        cli.pretty,
        cli.no_color,
        &config.settings,
    );

    let workload_path = cli.workload.clone().unwrap_or_else(|| config.workload_path());
    tracing::debug!(path = %workload_path.display(), "workload file");

    match cli.command {
        None => cli::estimate_cmd::run(&workload_path, None, false, &output_opts)?,
        Some(Commands::Estimate { layer, all }) => {
            cli::estimate_cmd::run(&workload_path, layer, all, &output_opts)?
        }
        Some(Commands::Prices { category }) => cli::prices_cmd::run(category, &output_opts)?,
        Some(Commands::Workload { action }) => match action {
            WorkloadAction::Init { force } => cli::workload_cmd::init(&workload_path, force)?,
            WorkloadAction::Check => cli::workload_cmd::check(&workload_path, &output_opts)?,
            WorkloadAction::Add { item } => cli::workload_cmd::add(&workload_path, item)?,
            WorkloadAction::Clear { kind, engine } => {
                cli::workload_cmd::clear(&workload_path, kind, engine)?
            }
        },
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init()?,
            ConfigAction::Check => cli::config_cmd::check(&output_opts)?,
        },
    }

    Ok(())
}
