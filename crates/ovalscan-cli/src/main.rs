//! OVALScan - evaluates OVAL info tests against host inventories
//!
//! This is the main entry point for the `ovalscan` binary.

mod report;

use anyhow::{Context, Result};
use clap::Parser;
use ovalscan_catalog::{load_tests_from_dir, Inventory, InventoryRunner, LoadOptions};
use ovalscan_common::logging::{init_logging_with_config, LogConfig, LogFormat};
use ovalscan_eval::TracingObserver;
use report::OutputFormat;
use std::sync::Arc;
use tracing::{info, warn};

/// OVALScan inventory evaluator
#[derive(Parser, Debug)]
#[command(name = "ovalscan")]
#[command(author = "Forge Cyber Defense")]
#[command(version)]
#[command(about = "Evaluate OVAL info tests against host inventories", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/ovalscan/ovalscan.toml")]
    config: String,

    /// Test definitions directory (overrides config)
    #[arg(short, long)]
    tests: Option<String>,

    /// Inventory JSON file (repeatable)
    #[arg(short, long = "inventory", required = true)]
    inventories: Vec<String>,

    /// Fail on malformed test files instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Log level (overrides config)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format: pretty, json, compact (overrides config)
    #[arg(long)]
    log_format: Option<String>,

    /// Log file (overrides config; defaults to stderr)
    #[arg(long)]
    log_file: Option<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "pretty")]
    output: OutputFormat,

    /// Worker threads (defaults to available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Configuration is read before logging so its levels apply
    let config_missing = !std::path::Path::new(&args.config).exists();
    let config = if config_missing {
        ovalscan_common::Config::default()
    } else {
        ovalscan_common::Config::from_file(&args.config)?
    };
    let config = config.merge_env();

    let level = args.log_level.unwrap_or(config.logging.level.clone());
    let format = args
        .log_format
        .unwrap_or(config.logging.format.clone())
        .parse::<LogFormat>()
        .unwrap_or_default();
    let mut log_config = LogConfig::new().level(level).format(format);
    if let Some(file) = args.log_file.or(config.logging.file.clone()) {
        log_config = log_config.file(file);
    }
    init_logging_with_config(log_config)?;

    info!("OVALScan starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    if config_missing {
        info!("Config file not found, using defaults");
    }

    let tests_dir = args
        .tests
        .or(config.catalog.tests_dir.clone())
        .context("no tests directory configured")?;
    let options = LoadOptions {
        strict: args.strict || config.catalog.strict,
    };

    let registry = load_tests_from_dir(&tests_dir, options)
        .with_context(|| format!("failed to load tests from {}", tests_dir))?;
    if registry.is_empty() {
        warn!("No tests loaded from {}", tests_dir);
    }

    let inventories = args
        .inventories
        .iter()
        .map(|path| {
            Inventory::from_file(path).with_context(|| format!("failed to load inventory {}", path))
        })
        .collect::<Result<Vec<_>>>()?;

    let workers = args.workers.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });

    let runner = InventoryRunner::new(Arc::new(registry)).with_observer(Arc::new(TracingObserver));
    let reports = runner.run_all(&inventories, workers);

    println!("{}", report::render(&reports, args.output)?);

    let failed = reports.iter().filter(|r| r.has_errors()).count();
    if failed > 0 {
        warn!("{} of {} hosts had test errors", failed, reports.len());
        std::process::exit(1);
    }

    Ok(())
}
