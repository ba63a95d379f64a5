//! Consistency report for a generated fixture directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use super::checks::check_log;
use super::log_parser::parse_all_logs;
use super::pairing::{check_ownership, check_pairing};
use super::types::*;
use crate::config::CallConfig;
use crate::manifest::{Manifest, MANIFEST_FILE};

/// Aggregated findings over all log files
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub files: usize,
    pub records: usize,
    /// `None` when no manifest was available to identify participants
    pub paired_calls: Option<usize>,
    pub violations: Vec<Violation>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violation counts keyed by kind name
    pub fn counts_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for v in &self.violations {
            let name = match v.kind {
                ViolationKind::SleepWindow { .. } => "sleep_window",
                ViolationKind::OutOfOrder { .. } => "out_of_order",
                ViolationKind::DurationOutOfBounds { .. } => "duration_out_of_bounds",
                ViolationKind::WeekdayMismatch { .. } => "weekday_mismatch",
                ViolationKind::ForeignRecord => "foreign_record",
                ViolationKind::UnpairedLeg { .. } => "unpaired_leg",
            };
            *counts.entry(name).or_insert(0) += 1;
        }
        counts
    }
}

/// Run all checks over already parsed logs
pub fn run_checks(logs: &[ParsedLog], calls: &CallConfig, manifest: Option<&Manifest>) -> CheckReport {
    let mut report = CheckReport {
        files: logs.len(),
        records: logs.iter().map(|l| l.records.len()).sum(),
        ..Default::default()
    };

    for log in logs {
        report.violations.extend(check_log(log, calls));
    }

    if let Some(manifest) = manifest {
        for info in &manifest.participants {
            if let Some(log) = logs.iter().find(|l| l.file_number == info.id.file_number()) {
                report.violations.extend(check_ownership(log, &info.number));
            }
        }
        let pairing = check_pairing(logs, manifest, &calls.jitter);
        report.paired_calls = Some(pairing.paired_calls);
        report.violations.extend(pairing.violations);
    }

    report
}

/// Parse and check every log in `dir`, using `network.json` when present
pub fn check_directory(dir: &Path, calls: &CallConfig) -> Result<CheckReport> {
    let logs = parse_all_logs(dir)?;

    let manifest_path = dir.join(MANIFEST_FILE);
    let manifest = if manifest_path.exists() {
        Some(Manifest::load(&manifest_path)?)
    } else {
        log::warn!("No {} in {}, skipping pairing checks", MANIFEST_FILE, dir.display());
        None
    };

    Ok(run_checks(&logs, calls, manifest.as_ref()))
}

/// Generate JSON report
pub fn generate_json_report(report: &CheckReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Print summary to console
pub fn print_summary(report: &CheckReport) {
    println!("\n=== CALL LOG CONSISTENCY SUMMARY ===\n");
    println!("Files: {}", report.files);
    println!("Records: {}", report.records);
    if let Some(paired) = report.paired_calls {
        println!("Paired internal calls: {}", paired);
    }

    if report.is_clean() {
        println!("\nNo violations found.");
    } else {
        println!("\nViolations: {}", report.violations.len());
        for (kind, count) in report.counts_by_kind() {
            println!("  {}: {}", kind, count);
        }
        for v in report.violations.iter().take(10) {
            println!("  log{}.csv:{} {:?}", v.file_number, v.line, v.kind);
        }
    }

    println!();
}
