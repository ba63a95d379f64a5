//! Data types for fixture consistency analysis.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::phone::RawNumber;
use crate::sampler::Direction;

/// One parsed record of a generated log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    /// One-based line number in the file, header included
    pub line: usize,
    pub timestamp: NaiveDateTime,
    /// Weekday abbreviation as written, e.g. `Mo.`
    pub weekday: String,
    pub caller: RawNumber,
    pub receiver: RawNumber,
    pub direction: Direction,
    pub duration_secs: u32,
}

/// All records of one `log<N>.csv`
#[derive(Debug, Clone)]
pub struct ParsedLog {
    /// `N` from the file name
    pub file_number: usize,
    pub path: PathBuf,
    pub records: Vec<ParsedRecord>,
}

/// What is wrong with a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// Record placed inside the sleep window
    SleepWindow { hour: u32 },
    /// Record earlier than the one before it
    OutOfOrder { previous: String, current: String },
    DurationOutOfBounds { seconds: u32 },
    WeekdayMismatch { found: String, expected: String },
    /// Neither caller nor receiver is the file's owner
    ForeignRecord,
    /// An internal call leg without its counterpart in the partner's file
    UnpairedLeg { counterpart_file: usize },
}

/// A single finding, located by file and line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub file_number: usize,
    pub line: usize,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(file_number: usize, line: usize, kind: ViolationKind) -> Self {
        Self { file_number, line, kind }
    }
}

/// Errors raised while reading a generated log
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{path}: missing or unexpected header '{found}'")]
    BadHeader { path: String, found: String },

    #[error("{path}:{line}: malformed record '{content}'")]
    MalformedRecord { path: String, line: usize, content: String },

    #[error("{path}: not a log<N>.csv file name")]
    BadFileName { path: String },
}
