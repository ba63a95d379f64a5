//! Per-file invariant checks.

use chrono::{Datelike, Timelike};

use super::types::*;
use crate::config::{Bounds, CallConfig, SleepConfig};
use crate::record::WEEKDAYS;

/// Every record must start inside `[sleep.end_hour, sleep.start_hour)`
pub fn check_awake_window(log: &ParsedLog, sleep: &SleepConfig) -> Vec<Violation> {
    log.records
        .iter()
        .filter_map(|r| {
            let hour = r.timestamp.hour();
            let awake = hour >= sleep.end_hour && hour < sleep.start_hour;
            (!awake).then(|| Violation::new(log.file_number, r.line, ViolationKind::SleepWindow { hour }))
        })
        .collect()
}

/// Records must be non-decreasing in time
pub fn check_ordering(log: &ParsedLog) -> Vec<Violation> {
    log.records
        .windows(2)
        .filter(|pair| pair[1].timestamp < pair[0].timestamp)
        .map(|pair| {
            Violation::new(
                log.file_number,
                pair[1].line,
                ViolationKind::OutOfOrder {
                    previous: pair[0].timestamp.to_string(),
                    current: pair[1].timestamp.to_string(),
                },
            )
        })
        .collect()
}

/// Durations a record may carry: the sampled range widened by the receiver jitter
pub fn allowed_durations(calls: &CallConfig) -> Bounds {
    let delta = calls.jitter.max_duration_delta_secs;
    Bounds::new(
        calls.duration.min.saturating_sub(delta).max(1),
        calls.duration.max.saturating_add(delta),
    )
}

pub fn check_durations(log: &ParsedLog, allowed: Bounds) -> Vec<Violation> {
    log.records
        .iter()
        .filter(|r| r.duration_secs < allowed.min || r.duration_secs > allowed.max)
        .map(|r| {
            Violation::new(
                log.file_number,
                r.line,
                ViolationKind::DurationOutOfBounds { seconds: r.duration_secs },
            )
        })
        .collect()
}

/// The weekday abbreviation must match the date it precedes
pub fn check_weekdays(log: &ParsedLog) -> Vec<Violation> {
    log.records
        .iter()
        .filter_map(|r| {
            let expected = WEEKDAYS[r.timestamp.weekday().num_days_from_monday() as usize];
            (r.weekday != expected).then(|| {
                Violation::new(
                    log.file_number,
                    r.line,
                    ViolationKind::WeekdayMismatch {
                        found: r.weekday.clone(),
                        expected: expected.to_string(),
                    },
                )
            })
        })
        .collect()
}

/// Run every per-file check
pub fn check_log(log: &ParsedLog, calls: &CallConfig) -> Vec<Violation> {
    let mut violations = check_awake_window(log, &calls.sleep);
    violations.extend(check_ordering(log));
    violations.extend(check_durations(log, allowed_durations(calls)));
    violations.extend(check_weekdays(log));
    violations
}
