//! Time-walk sampling.
//!
//! Starts at 08:00 on the first day and moves forward: a short pause before
//! every call, a jump to the next wake-up (plus a small jitter) whenever the
//! walk runs into the sleep window, and the call's own duration after it.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use rand::Rng;

use crate::config::CallConfig;
use crate::sampler::window::AwakeWindow;
use crate::sampler::TimestampSource;

/// Hour of the first day the walk starts from
pub const WALK_START_HOUR: u32 = 8;

#[derive(Debug, Clone)]
pub struct TimeWalk {
    current: NaiveDateTime,
    end: NaiveDateTime,
    window: AwakeWindow,
    pause_minutes: (u64, u64),
    wake_jitter_minutes: (u64, u64),
}

impl TimeWalk {
    pub fn new(calls: &CallConfig, window: AwakeWindow) -> Self {
        let start = NaiveTime::from_hms_opt(WALK_START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
        Self {
            current: calls.start_date.and_time(start),
            end: super::end_limit(calls),
            window,
            pause_minutes: calls.pause.whole_minutes(),
            wake_jitter_minutes: calls.wake_jitter.whole_minutes(),
        }
    }

    pub fn current(&self) -> NaiveDateTime {
        self.current
    }
}

impl TimestampSource for TimeWalk {
    fn next_timestamp<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<NaiveDateTime> {
        let (pause_min, pause_max) = self.pause_minutes;
        self.current = after_minutes(self.current, rng.gen_range(pause_min..=pause_max))?;

        if !self.window.admits(self.current) {
            let (jitter_min, jitter_max) = self.wake_jitter_minutes;
            let wake = self.window.next_wake(self.current);
            self.current = after_minutes(wake, rng.gen_range(jitter_min..=jitter_max))?;
        }

        if self.current > self.end {
            return None;
        }
        Some(self.current)
    }

    fn complete(&mut self, duration_secs: u32) {
        self.current += Duration::seconds(i64::from(duration_secs));
    }
}

/// `None` once the step leaves the representable calendar
fn after_minutes(t: NaiveDateTime, m: u64) -> Option<NaiveDateTime> {
    let step = i64::try_from(m).ok().and_then(Duration::try_minutes)?;
    t.checked_add_signed(step)
}
