//! PriceVault CLI: keep and inspect the local price snapshot cache.
//!
//! Commands:
//! - `sync`: load today's snapshot per asset, downloading it on a miss
//! - `latest`: load the newest snapshot per asset without touching the network
//! - `status`: list current and archived snapshots per asset

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use pricevault_core::data::{
    date_span, load_latest_asset_data, parse_date, scan, update_and_load_asset_data,
    AssetOutcome, DataFrame, SyncOptions, YahooProvider,
};
use pricevault_core::PriceVaultConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pricevault",
    about = "PriceVault CLI: local snapshot cache of daily price histories"
)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Path to the TOML config listing the tracked assets.
    #[arg(long, default_value = "pricevault.toml")]
    config: PathBuf,

    /// Data directory. Overrides `data_folder` from the config.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load today's snapshot for every asset, downloading missing ones.
    Sync {
        #[command(flatten)]
        common: CommonArgs,

        /// As-of date (YYYYMMDD or YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Load the newest local snapshot for every asset. No network access.
    Latest {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Report current and archived snapshots per asset.
    Status {
        #[command(flatten)]
        common: CommonArgs,

        /// Print the inventory as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Sync { common, as_of } => run_sync(common, as_of),
        Commands::Latest { common } => run_latest(common),
        Commands::Status { common, json } => run_status(common, json),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config and resolve the effective data directory.
fn load_config(common: &CommonArgs) -> Result<(PriceVaultConfig, PathBuf)> {
    let config = PriceVaultConfig::from_file(&common.config)
        .with_context(|| format!("loading {}", common.config.display()))?;
    let data_dir = common
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data_folder.clone());
    tracing::debug!(
        config = %common.config.display(),
        data_dir = %data_dir.display(),
        assets = config.assets.len(),
        "config loaded"
    );
    Ok((config, data_dir))
}

fn run_sync(common: CommonArgs, as_of: Option<String>) -> Result<()> {
    let (config, data_dir) = load_config(&common)?;

    let as_of_date = match as_of.as_deref() {
        Some(s) => parse_date(s)
            .with_context(|| format!("invalid --as-of '{s}' (expected YYYYMMDD or YYYY-MM-DD)"))?,
        None => chrono::Local::now().date_naive(),
    };

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    let client = config.http.build_client()?;
    let provider = YahooProvider::new(client);
    let opts = SyncOptions {
        settle_delay: config.settle_delay(),
    };

    let report =
        update_and_load_asset_data(&config.assets, &data_dir, as_of_date, &provider, &opts)?;

    println!("Snapshots as of {as_of_date} in {}", data_dir.display());
    for (name, outcome) in &report.outcomes {
        let detail = match outcome {
            AssetOutcome::Cached => format!("cached   {}", describe(&report.data[name])),
            AssetOutcome::Fetched => format!("fetched  {}", describe(&report.data[name])),
            AssetOutcome::Empty => "empty    provider returned no rows".to_string(),
            AssetOutcome::Failed(e) => format!("failed   {e}"),
        };
        println!("  {name:<10} {detail}");
    }

    let missing = report.missing();
    if !missing.is_empty() {
        println!(
            "\n{} of {} assets without data: {}",
            missing.len(),
            report.outcomes.len(),
            missing.join(", ")
        );
    }

    Ok(())
}

fn run_latest(common: CommonArgs) -> Result<()> {
    let (config, data_dir) = load_config(&common)?;

    let data = load_latest_asset_data(&config.assets, &data_dir)?;

    println!("Latest snapshots in {}", data_dir.display());
    for (name, df) in &data {
        println!("  {name:<10} {}", describe(df));
    }
    Ok(())
}

fn run_status(common: CommonArgs, json: bool) -> Result<()> {
    let (config, data_dir) = load_config(&common)?;

    let inventory = scan(&config.assets, &data_dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&inventory)?);
        return Ok(());
    }

    println!("Cache: {}", data_dir.display());
    println!();
    println!(
        "{:<10} {:<12} {:>8} {:>9} {:>10}",
        "Asset", "As of", "Current", "Archived", "Size"
    );
    println!("{}", "-".repeat(53));
    for asset in &inventory {
        let newest = asset.current.last();
        let as_of = newest
            .and_then(|e| e.as_of)
            .map(|d: NaiveDate| d.to_string())
            .unwrap_or_else(|| "-".into());
        let size = newest.map(|e| format_size(e.size_bytes)).unwrap_or_else(|| "-".into());
        let flag = if asset.needs_archiving() { " *" } else { "" };
        println!(
            "{:<10} {:<12} {:>8} {:>9} {:>10}{flag}",
            asset.asset,
            as_of,
            asset.current.len(),
            asset.archived,
            size
        );
    }
    if inventory.iter().any(|a| a.needs_archiving()) {
        println!("\n* more than one current snapshot; the next successful sync archives the extras");
    }

    Ok(())
}

/// One-line shape of a snapshot: row count and date span.
fn describe(df: &DataFrame) -> String {
    match date_span(df) {
        Some((first, last)) => format!("{:>6} rows  {first} to {last}", df.height()),
        None => format!("{:>6} rows", df.height()),
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
