//! # CDRSim - Synthetic call-detail-record fixtures
//!
//! This library generates realistic call logs for a set of simulated phone
//! network participants ("suspects"). The logs serve as test fixtures for
//! call log analysis tooling.
//!
//! ## Overview
//!
//! A run builds a social graph of participants and their external contacts,
//! walks simulated time while respecting sleep windows, call durations and
//! internal/external ratios, and writes one chronologically sorted CSV log
//! per participant. Calls between two participants appear in both logs,
//! with small independent timing and duration jitter on the receiving leg.
//! Shared "shadow" contacts are injected into random sub-clans so that a
//! hidden common associate is statistically visible across several logs.
//!
//! ## Architecture
//!
//! - `config`: Typed configuration sections and validation
//! - `config_loader`: YAML loading and CLI overrides
//! - `phone`: Raw number generation, prefix formatting and normalisation
//! - `network`: Participant arena and network builder
//! - `sampler`: Time-walk and global timestamp sampling, call drawing
//! - `record`: CDR line layout and record emission
//! - `finalizer`: Sorting and writing the per-participant logs
//! - `manifest`: Ground-truth `network.json`
//! - `orchestrator`: One complete generation run
//! - `analysis`: Reading fixtures back and checking their invariants
//! - `utils`: `MM:SS` duration helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cdrsim::{config::Config, orchestrator};
//!
//! let mut config = Config::default();
//! config.general.output_dir = "fixtures".into();
//! config.general.seed = Some(42);
//! config.validate()?;
//!
//! let summary = orchestrator::generate(&config)?;
//! println!("{} records written", summary.total_records());
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Output Format
//!
//! ```text
//! Datum;Zeit;Anrufer;Angerufener;Typ;Richtung;Dauer
//! Sa. 06.01.2018;08:12:00;+491701234567;015112345678;SPRACHE;S;02:35
//! Sa. 06.01.2018;08:31:44;00491609876543;+491701234567;SPRACHE;E;00:48
//! ```
//!
//! ## Error Handling
//!
//! Configuration problems surface as typed `ValidationError`s before any
//! simulation work starts. I/O failures are reported through `color_eyre`
//! with the affected path attached.

pub mod config;
pub mod config_loader;
pub mod phone;
pub mod network;
pub mod sampler;
pub mod record;
pub mod finalizer;
pub mod manifest;
pub mod orchestrator;
pub mod analysis;
pub mod utils;
