use clap::{Parser, ValueEnum};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use cdrsim::config::{Config, Strategy};
use cdrsim::config_loader::{self, CliOverrides};
use cdrsim::orchestrator;

/// Sampling strategy as spelled on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    TimeWalk,
    GlobalSampling,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::TimeWalk => Strategy::TimeWalk,
            StrategyArg::GlobalSampling => Strategy::GlobalSampling,
        }
    }
}

/// Synthetic call-detail-record fixture generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file (built-in defaults if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for log<N>.csv files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seed for the random source
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of participants (one log file each)
    #[arg(short, long)]
    participants: Option<u32>,

    /// Approximate total number of records over all files
    #[arg(short, long)]
    target_records: Option<u64>,

    /// Call sampling strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            output_dir: self.output.clone(),
            seed: self.seed,
            participants: self.participants,
            target_records: self.target_records,
            strategy: self.strategy.map(Strategy::from),
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting CDRSim fixture generator");

    let mut config = match &args.config {
        Some(path) => config_loader::load_config(path)?,
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };
    config_loader::apply_overrides(&mut config, &args.overrides())?;

    info!("Output directory: {:?}", config.general.output_dir);
    let summary = orchestrator::generate(&config)?;

    info!(
        "Generated {} records in {} files (seed {})",
        summary.total_records(),
        summary.logs.len(),
        summary.seed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["cdrsim", "--config", "fixture.yaml"]);

        assert_eq!(args.config, Some(PathBuf::from("fixture.yaml")));
        assert_eq!(args.output, None);
        assert!(args.overrides().seed.is_none());
    }

    #[test]
    fn test_override_args() {
        let args = Args::parse_from([
            "cdrsim",
            "--output", "out",
            "--seed", "42",
            "--participants", "3",
            "--target-records", "900",
            "--strategy", "global-sampling",
        ]);

        let overrides = args.overrides();
        assert_eq!(overrides.output_dir, Some(PathBuf::from("out")));
        assert_eq!(overrides.seed, Some(42));
        assert_eq!(overrides.participants, Some(3));
        assert_eq!(overrides.target_records, Some(900));
        assert_eq!(overrides.strategy, Some(Strategy::GlobalSampling));
    }
}
