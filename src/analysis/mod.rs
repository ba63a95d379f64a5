//! Consistency analysis for generated call logs.
//!
//! This module reads generated fixtures back and checks the properties
//! downstream tooling relies on: awake-window placement, chronological
//! order, duration bounds, weekday labels and internal-call pairing.

pub mod types;
pub mod log_parser;
pub mod checks;
pub mod pairing;
pub mod report;

pub use types::*;
pub use log_parser::{parse_all_logs, parse_log_file};
pub use checks::check_log;
pub use pairing::{check_ownership, check_pairing};
pub use report::{check_directory, generate_json_report, print_summary, run_checks, CheckReport};
