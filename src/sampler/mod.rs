//! Call sampling.
//!
//! A [`TimestampSource`] decides *when* calls happen (time-walk or global
//! sampling); [`draw_call`] decides *who* calls *whom* and for how long.
//! Accepted calls are handed to the record emitter immediately, so both
//! legs of an internal call land in their buffers before the next draw.

pub mod types;
pub mod window;
pub mod time_walk;
pub mod global;

pub use types::{CallEvent, CallKind, Direction, SampledCall};
pub use window::AwakeWindow;
pub use time_walk::TimeWalk;
pub use global::GlobalSampler;

use chrono::{NaiveDateTime, NaiveTime};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{CallConfig, Strategy};
use crate::network::Network;
use crate::record;

/// Produces candidate call start times in ascending order
pub trait TimestampSource {
    /// Next admissible timestamp, or `None` once the range is exhausted
    fn next_timestamp<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<NaiveDateTime>;

    /// Called after a call starting at the last timestamp was emitted
    fn complete(&mut self, _duration_secs: u32) {}
}

/// Totals of one sampling run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplingStats {
    pub internal_calls: u64,
    pub external_calls: u64,
    /// Draws dropped because the chosen candidate pool was empty
    pub skipped_calls: u64,
    pub records: u64,
    /// The timestamp source ran dry before the record target was met
    pub exhausted: bool,
}

impl SamplingStats {
    pub fn calls(&self) -> u64 {
        self.internal_calls + self.external_calls
    }
}

/// Last second of the configured date range
pub fn end_limit(calls: &CallConfig) -> NaiveDateTime {
    let last = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    calls.end_date.and_time(last)
}

/// Choose caller, counterpart and duration for a call at `timestamp`
///
/// Returns `None` when the chosen branch has no candidates (no partners for
/// an internal call, no external contacts for an external one).
pub fn draw_call<R: Rng + ?Sized>(
    network: &Network,
    timestamp: NaiveDateTime,
    calls: &CallConfig,
    rng: &mut R,
) -> Option<SampledCall> {
    let caller = network.participants.choose(rng)?;
    let duration_secs = rng.gen_range(calls.duration.min..=calls.duration.max);

    let kind = if rng.gen_bool(calls.internal_ratio) {
        let receiver = *caller.partners.choose(rng)?;
        CallKind::Internal { receiver }
    } else {
        let number = caller.externals.choose(rng)?.clone();
        let direction = if rng.gen_bool(0.5) {
            Direction::Incoming
        } else {
            Direction::Outgoing
        };
        CallKind::External { number, direction }
    };

    Some(SampledCall {
        timestamp,
        caller: caller.id,
        kind,
        duration_secs,
    })
}

/// Sample calls into the participants' log buffers using the configured strategy
pub fn run<R: Rng + ?Sized>(network: &mut Network, calls: &CallConfig, rng: &mut R) -> SamplingStats {
    let window = AwakeWindow::from_config(calls);
    let stats = match calls.strategy {
        Strategy::TimeWalk => {
            info!("Sampling with time walk, target {} records", calls.target_records);
            let mut walk = TimeWalk::new(calls, window);
            let stats = drive(&mut walk, network, calls, Some(calls.target_records), rng);
            if stats.exhausted {
                warn!(
                    "Reached end date {} after {} of {} target records",
                    calls.end_date, stats.records, calls.target_records
                );
            }
            stats
        }
        Strategy::GlobalSampling => {
            let needed = GlobalSampler::calls_needed(calls);
            info!(
                "Sampling {} global timestamps for about {} records",
                needed, calls.target_records
            );
            let mut sampler = GlobalSampler::new(calls, window, needed, rng);
            drive(&mut sampler, network, calls, None, rng)
        }
    };

    info!(
        "Sampled {} calls ({} internal, {} external, {} skipped), {} records",
        stats.calls(),
        stats.internal_calls,
        stats.external_calls,
        stats.skipped_calls,
        stats.records
    );
    stats
}

fn drive<S: TimestampSource, R: Rng + ?Sized>(
    source: &mut S,
    network: &mut Network,
    calls: &CallConfig,
    target_records: Option<u64>,
    rng: &mut R,
) -> SamplingStats {
    let mut stats = SamplingStats::default();

    while target_records.map_or(true, |target| stats.records < target) {
        let Some(timestamp) = source.next_timestamp(rng) else {
            stats.exhausted = target_records.is_some();
            break;
        };

        let Some(call) = draw_call(network, timestamp, calls, rng) else {
            debug!("No candidate for call at {}, skipping", timestamp);
            stats.skipped_calls += 1;
            continue;
        };

        let legs = record::emit(network, &call, &calls.jitter, rng);
        if legs == 0 {
            stats.skipped_calls += 1;
            continue;
        }

        stats.records += legs as u64;
        if call.is_internal() {
            stats.internal_calls += 1;
        } else {
            stats.external_calls += 1;
        }
        source.complete(call.duration_secs);
    }

    stats
}
