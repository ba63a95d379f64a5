//! Awake window arithmetic.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

use crate::config::CallConfig;

/// Hours `[wake_hour, sleep_hour)` during which calls may happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AwakeWindow {
    pub wake_hour: u32,
    pub sleep_hour: u32,
    /// Seconds that must still be awake after a call start
    pub slack_secs: u32,
}

impl AwakeWindow {
    pub fn from_config(calls: &CallConfig) -> Self {
        Self {
            wake_hour: calls.sleep.end_hour,
            sleep_hour: calls.sleep.start_hour,
            slack_secs: calls.jitter.max_offset_secs,
        }
    }

    pub fn is_awake(&self, t: NaiveDateTime) -> bool {
        let hour = t.hour();
        hour >= self.wake_hour && hour < self.sleep_hour
    }

    /// A call may start at `t` only if a receiver leg jittered by up to
    /// `slack_secs` is still awake too
    pub fn admits(&self, t: NaiveDateTime) -> bool {
        self.is_awake(t) && self.is_awake(t + Duration::seconds(i64::from(self.slack_secs)))
    }

    /// The next wake-up boundary at or after the sleep period containing `t`
    pub fn next_wake(&self, t: NaiveDateTime) -> NaiveDateTime {
        let day = if t.hour() < self.wake_hour {
            t.date()
        } else {
            t.date() + Duration::days(1)
        };
        let wake = NaiveTime::from_hms_opt(self.wake_hour, 0, 0).unwrap_or(NaiveTime::MIN);
        day.and_time(wake)
    }
}
