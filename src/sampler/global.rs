//! Global sampling.
//!
//! Draws every call timestamp up front, uniformly over the whole date range
//! at one-second resolution. Inadmissible draws are discarded and redrawn.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use rand::Rng;

use crate::config::CallConfig;
use crate::sampler::window::AwakeWindow;
use crate::sampler::TimestampSource;

#[derive(Debug, Clone)]
pub struct GlobalSampler {
    timestamps: std::vec::IntoIter<NaiveDateTime>,
}

impl GlobalSampler {
    /// Draw `count` admissible timestamps in ascending order
    pub fn new<R: Rng + ?Sized>(calls: &CallConfig, window: AwakeWindow, count: usize, rng: &mut R) -> Self {
        let start = calls.start_date.and_time(NaiveTime::MIN);
        let span = (super::end_limit(calls) - start).num_seconds();

        let mut timestamps = Vec::with_capacity(count);
        while timestamps.len() < count {
            let candidate = start + Duration::seconds(rng.gen_range(0..=span));
            if window.admits(candidate) {
                timestamps.push(candidate);
            }
        }
        timestamps.sort();

        Self {
            timestamps: timestamps.into_iter(),
        }
    }

    /// Number of calls to draw so that the expected record count meets `target_records`
    pub fn calls_needed(calls: &CallConfig) -> usize {
        let records_per_call = 1.0 + calls.internal_ratio;
        (calls.target_records as f64 / records_per_call).ceil() as usize
    }
}

impl TimestampSource for GlobalSampler {
    fn next_timestamp<R: Rng + ?Sized>(&mut self, _rng: &mut R) -> Option<NaiveDateTime> {
        self.timestamps.next()
    }
}
