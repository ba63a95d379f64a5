//! Consistency checker for generated call logs.
//!
//! Re-reads a fixture directory and verifies awake windows, ordering,
//! duration bounds, weekday labels and internal-call pairing.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{bail, Context, Result};

use cdrsim::analysis;
use cdrsim::config::Config;
use cdrsim::config_loader;

#[derive(Parser)]
#[command(name = "cdr-check")]
#[command(about = "Consistency checks for generated call logs")]
#[command(version)]
struct Cli {
    /// Directory containing log<N>.csv and network.json
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Configuration the fixtures were generated with (defaults if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the full report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Number of parallel workers (0 = auto-detect)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    // Set thread pool size
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = match &cli.config {
        Some(path) => {
            let config = config_loader::load_config(path)?;
            config.validate()?;
            config
        }
        None => Config::default(),
    };

    log::info!("Checking logs in {}...", cli.data_dir.display());
    let report = analysis::check_directory(&cli.data_dir, &config.calls)?;

    if let Some(path) = &cli.json {
        analysis::generate_json_report(&report, path)?;
    }
    analysis::print_summary(&report);

    if !report.is_clean() {
        bail!("{} violations found in {}", report.violations.len(), cli.data_dir.display());
    }
    Ok(())
}
