//! Fixture generation orchestrator.
//!
//! This module coordinates one generation run: seeding the random source,
//! building the network, sampling calls into the participants' buffers,
//! and finally sorting and writing the logs plus the manifest.

use std::path::PathBuf;

use color_eyre::Result;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::finalizer::{self, WrittenLog};
use crate::manifest::{Manifest, MANIFEST_FILE};
use crate::network::{build_network, Network};
use crate::sampler::{self, SamplingStats};

/// Outcome of a generation run
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub seed: u64,
    pub stats: SamplingStats,
    pub logs: Vec<WrittenLog>,
    pub manifest: Option<PathBuf>,
}

impl GenerationSummary {
    pub fn total_records(&self) -> usize {
        self.logs.iter().map(|l| l.records).sum()
    }
}

/// Seed from the configuration, or a fresh one from the OS
pub fn resolve_seed(config: &Config) -> u64 {
    config.general.seed.unwrap_or_else(rand::random)
}

/// Build the network and sample all calls into memory
///
/// Nothing is written; the returned network carries unsorted log buffers.
pub fn simulate<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> (Network, SamplingStats) {
    let mut network = build_network(&config.network, rng);
    let stats = sampler::run(&mut network, &config.calls, rng);
    (network, stats)
}

/// Run a full generation into `config.general.output_dir`
///
/// The configuration must already be validated.
pub fn generate(config: &Config) -> Result<GenerationSummary> {
    let seed = resolve_seed(config);
    info!("Using seed {}", seed);
    info!(
        "Simulating {} participants from {} to {}",
        config.network.participants, config.calls.start_date, config.calls.end_date
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let (mut network, stats) = simulate(config, &mut rng);

    let output_dir = &config.general.output_dir;
    info!("Writing logs to {:?}", output_dir);
    let logs = finalizer::finalize(&mut network, output_dir)?;

    let manifest = if config.general.write_manifest {
        let path = output_dir.join(MANIFEST_FILE);
        Manifest::from_network(&network, seed).write(&path)?;
        info!("Wrote network manifest: {:?}", path);
        Some(path)
    } else {
        None
    };

    let summary = GenerationSummary {
        seed,
        stats,
        logs,
        manifest,
    };
    info!(
        "Done: {} records in {} files",
        summary.total_records(),
        summary.logs.len()
    );
    Ok(summary)
}
