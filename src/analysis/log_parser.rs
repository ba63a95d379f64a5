//! Parsing of generated call logs.
//!
//! Reads `log<N>.csv` files back into [`ParsedRecord`]s, normalising every
//! phone number to its raw digits. Files are parsed in parallel.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use color_eyre::eyre::{Context, Result};
use rayon::prelude::*;
use regex::Regex;

use super::types::*;
use crate::phone::normalize;
use crate::record::HEADER;
use crate::sampler::Direction;
use crate::utils::duration::parse_mm_ss;

/// Compiled regex patterns for log parsing
pub struct LogPatterns {
    /// Match: "Mo. 06.01.2018;08:05:00;+49170...;0151...;SPRACHE;S;02:35"
    pub record: Regex,
    /// Match: "log12.csv"
    pub file_name: Regex,
}

impl LogPatterns {
    pub fn new() -> Self {
        Self {
            record: Regex::new(
                r"^(Mo|Di|Mi|Do|Fr|Sa|So)\. (\d{2}\.\d{2}\.\d{4});(\d{2}:\d{2}:\d{2});([^;]+);([^;]+);SPRACHE;([SE]);(\d{2}:\d{2})$"
            ).expect("Invalid record regex"),
            file_name: Regex::new(r"^log(\d+)\.csv$").expect("Invalid file_name regex"),
        }
    }
}

impl Default for LogPatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global patterns instance
pub static PATTERNS: LazyLock<LogPatterns> = LazyLock::new(LogPatterns::new);

/// Parse a single record line; `None` if it does not match the layout
pub fn parse_record_line(line: &str, line_number: usize) -> Option<ParsedRecord> {
    let caps = PATTERNS.record.captures(line)?;

    let weekday = format!("{}.", caps.get(1)?.as_str());
    let stamp = format!("{} {}", caps.get(2)?.as_str(), caps.get(3)?.as_str());
    let timestamp = NaiveDateTime::parse_from_str(&stamp, "%d.%m.%Y %H:%M:%S").ok()?;
    let caller = normalize(caps.get(4)?.as_str())?;
    let receiver = normalize(caps.get(5)?.as_str())?;
    let direction = Direction::from_char(caps.get(6)?.as_str().chars().next()?)?;
    let duration_secs = parse_mm_ss(caps.get(7)?.as_str())?;

    Some(ParsedRecord {
        line: line_number,
        timestamp,
        weekday,
        caller,
        receiver,
        direction,
        duration_secs,
    })
}

/// Parse the contents of one log file
pub fn parse_log_content(content: &str, path: &str) -> Result<Vec<ParsedRecord>, ParseError> {
    let mut lines = content.lines();
    match lines.next() {
        Some(HEADER) => {}
        other => {
            return Err(ParseError::BadHeader {
                path: path.to_string(),
                found: other.unwrap_or_default().to_string(),
            })
        }
    }

    lines
        .enumerate()
        .map(|(i, line)| {
            // Line 1 is the header
            let line_number = i + 2;
            parse_record_line(line, line_number).ok_or_else(|| ParseError::MalformedRecord {
                path: path.to_string(),
                line: line_number,
                content: line.to_string(),
            })
        })
        .collect()
}

/// `N` in `log<N>.csv`
pub fn file_number(path: &Path) -> Option<usize> {
    let name = path.file_name()?.to_str()?;
    let caps = PATTERNS.file_name.captures(name)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Parse a single log file
pub fn parse_log_file(path: &Path) -> Result<ParsedLog> {
    let file_number = file_number(path).ok_or_else(|| ParseError::BadFileName {
        path: path.display().to_string(),
    })?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    let records = parse_log_content(&content, &path.display().to_string())?;

    Ok(ParsedLog {
        file_number,
        path: path.to_path_buf(),
        records,
    })
}

/// Every `log<N>.csv` in `dir`, ordered by `N`
pub fn find_log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<(usize, PathBuf)> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter_map(|path| file_number(&path).map(|n| (n, path)))
        .collect();
    files.sort_by_key(|(n, _)| *n);
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Parse all log files in `dir` in parallel
pub fn parse_all_logs(dir: &Path) -> Result<Vec<ParsedLog>> {
    let files = find_log_files(dir)?;
    log::info!("Parsing {} log files in parallel...", files.len());

    let logs: Vec<ParsedLog> = files
        .par_iter()
        .map(|path| parse_log_file(path))
        .collect::<Result<_>>()?;

    let total: usize = logs.iter().map(|l| l.records.len()).sum();
    log::info!("Parsed {} files, {} total records", logs.len(), total);
    Ok(logs)
}
