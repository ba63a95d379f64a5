use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Longest duration representable as `MM:SS`
pub const MAX_RENDERABLE_DURATION_SECS: u32 = 59 * 60 + 59;

/// Sampling strategy used to place calls on the timeline
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Walk forward through time with short pauses between calls
    TimeWalk,
    /// Draw all call timestamps uniformly over the date range up front
    GlobalSampling,
}

/// Top-level configuration structure that mirrors the YAML configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub network: NetworkConfig,
    pub calls: CallConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.network.validate()?;
        self.calls.validate()?;

        // Sub-clans are only injected with at least two participants
        let network = &self.network;
        let ratio = self.calls.internal_ratio;
        let can_call_internal = network.participants >= 2 && ratio > 0.0;
        let has_externals = network.private_contacts.max > 0
            || (network.sub_clans.count > 0 && network.participants >= 2);
        let can_call_external = has_externals && ratio < 1.0;
        if !can_call_internal && !can_call_external {
            return Err(ValidationError::InvalidNetwork(format!(
                "no call can ever be placed: {} participant(s), internal_ratio {}, \
                 private_contacts.max {}, {} sub-clan(s)",
                network.participants, ratio, network.private_contacts.max, network.sub_clans.count
            )));
        }

        Ok(())
    }
}

/// General output settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory receiving `log<N>.csv`
    pub output_dir: PathBuf,
    /// Seed for the random source; drawn at startup when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Write `network.json` next to the logs
    pub write_manifest: bool,
}

/// Inclusive integer range
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn check(&self, name: &str) -> Result<(), String> {
        if self.min > self.max {
            return Err(format!("{name}: min ({}) is greater than max ({})", self.min, self.max));
        }
        Ok(())
    }
}

/// Inclusive range of wall-clock durations, written as humantime strings
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DurationBounds {
    #[serde(with = "humantime_serde")]
    pub min: Duration,
    #[serde(with = "humantime_serde")]
    pub max: Duration,
}

impl DurationBounds {
    pub const fn from_minutes(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_secs(min * 60),
            max: Duration::from_secs(max * 60),
        }
    }

    /// Bounds in whole minutes, the resolution the sampler draws at
    pub fn whole_minutes(&self) -> (u64, u64) {
        (self.min.as_secs() / 60, self.max.as_secs() / 60)
    }
}

/// Shared "shadow" contacts injected into random participant subsets
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct SubClanConfig {
    /// Number of shadow numbers to create
    pub count: u32,
    /// Smallest subset of participants sharing one shadow number
    pub min_size: u32,
    /// Largest subset; clamped to the participant count
    pub max_size: u32,
    /// How many times a shadow number is appended to each member's contacts
    pub repetition: u32,
}

/// Shape of the participant graph
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NetworkConfig {
    pub participants: u32,
    /// Partners added on top of the ring, per participant
    pub extra_partners: Bounds,
    /// Exclusive external contacts per participant
    pub private_contacts: Bounds,
    pub sub_clans: SubClanConfig,
}

impl NetworkConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.participants == 0 {
            return Err(ValidationError::InvalidNetwork(
                "participants must be at least 1".to_string(),
            ));
        }
        self.extra_partners
            .check("extra_partners")
            .map_err(ValidationError::InvalidNetwork)?;
        self.private_contacts
            .check("private_contacts")
            .map_err(ValidationError::InvalidNetwork)?;

        let clans = &self.sub_clans;
        if clans.count > 0 {
            if clans.min_size < 2 {
                return Err(ValidationError::InvalidNetwork(format!(
                    "sub_clans.min_size must be at least 2, got {}",
                    clans.min_size
                )));
            }
            if clans.min_size > clans.max_size {
                return Err(ValidationError::InvalidNetwork(format!(
                    "sub_clans: min_size ({}) is greater than max_size ({})",
                    clans.min_size, clans.max_size
                )));
            }
            if clans.repetition == 0 {
                return Err(ValidationError::InvalidNetwork(
                    "sub_clans.repetition must be at least 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Hours during which nobody places calls: `[start_hour, 24)` and `[0, end_hour)`
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SleepConfig {
    pub start_hour: u32,
    pub end_hour: u32,
}

/// Perturbation applied to the receiving leg of an internal call
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct JitterConfig {
    /// Receiver timestamp is shifted by `0..=max_offset_secs`
    pub max_offset_secs: u32,
    /// Receiver duration is shifted by `-max..=max`, floored at one second
    pub max_duration_delta_secs: u32,
}

/// Call sampling parameters
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CallConfig {
    pub strategy: Strategy,
    /// Approximate total number of records over all files
    pub target_records: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Probability that a sampled call goes to another participant
    pub internal_ratio: f64,
    /// Call duration in seconds
    pub duration: Bounds,
    pub pause: DurationBounds,
    pub wake_jitter: DurationBounds,
    pub sleep: SleepConfig,
    pub jitter: JitterConfig,
}

impl CallConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.end_date < self.start_date {
            return Err(ValidationError::InvalidCalls(format!(
                "end_date {} is before start_date {}",
                self.end_date, self.start_date
            )));
        }
        if !(0.0..=1.0).contains(&self.internal_ratio) {
            return Err(ValidationError::InvalidCalls(format!(
                "internal_ratio must be within [0, 1], got {}",
                self.internal_ratio
            )));
        }

        self.duration
            .check("duration")
            .map_err(ValidationError::InvalidCalls)?;
        if self.duration.min == 0 {
            return Err(ValidationError::InvalidCalls(
                "duration.min must be at least 1 second".to_string(),
            ));
        }
        let longest = self
            .duration
            .max
            .checked_add(self.jitter.max_duration_delta_secs)
            .filter(|&secs| secs <= MAX_RENDERABLE_DURATION_SECS);
        if longest.is_none() {
            return Err(ValidationError::InvalidCalls(format!(
                "duration.max ({}s) plus jitter.max_duration_delta_secs ({}s) does not fit into MM:SS",
                self.duration.max, self.jitter.max_duration_delta_secs
            )));
        }

        let (pause_min, pause_max) = self.pause.whole_minutes();
        if pause_min == 0 {
            return Err(ValidationError::InvalidCalls(
                "pause.min must be at least one minute".to_string(),
            ));
        }
        if pause_min > pause_max {
            return Err(ValidationError::InvalidCalls(
                "pause: min is greater than max".to_string(),
            ));
        }
        let span_days = (self.end_date - self.start_date).num_days() + 1;
        let span_minutes = span_days.unsigned_abs() * 24 * 60;
        if pause_max > span_minutes {
            return Err(ValidationError::InvalidCalls(format!(
                "pause.max ({pause_max}m) exceeds the {span_minutes}m date range"
            )));
        }
        let (wake_min, wake_max) = self.wake_jitter.whole_minutes();
        if wake_min > wake_max {
            return Err(ValidationError::InvalidCalls(
                "wake_jitter: min is greater than max".to_string(),
            ));
        }

        let sleep = &self.sleep;
        if sleep.start_hour > 24 || sleep.end_hour >= sleep.start_hour {
            return Err(ValidationError::InvalidSleepWindow {
                start_hour: sleep.start_hour,
                end_hour: sleep.end_hour,
            });
        }

        let awake_secs = u64::from(sleep.start_hour - sleep.end_hour) * 3600;
        let slack = wake_max
            .saturating_mul(60)
            .saturating_add(u64::from(self.jitter.max_offset_secs));
        if slack >= awake_secs {
            return Err(ValidationError::InvalidCalls(format!(
                "wake_jitter.max plus jitter.max_offset_secs ({slack}s) does not fit into the {awake_secs}s awake window"
            )));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
    #[error("Invalid call configuration: {0}")]
    InvalidCalls(String),
    #[error("Invalid sleep window: awake hours [{end_hour}, {start_hour}) are empty or out of range")]
    InvalidSleepWindow { start_hour: u32, end_hour: u32 },
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
            seed: None,
            write_manifest: true,
        }
    }
}

impl Default for SubClanConfig {
    fn default() -> Self {
        Self {
            count: 3,
            min_size: 2,
            max_size: 15,
            repetition: 5,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            participants: 15,
            extra_partners: Bounds::new(2, 4),
            private_contacts: Bounds::new(15, 20),
            sub_clans: SubClanConfig::default(),
        }
    }
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            max_offset_secs: 10,
            max_duration_delta_secs: 5,
        }
    }
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::TimeWalk,
            target_records: 50_000,
            start_date: NaiveDate::from_ymd_opt(2018, 1, 6).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 11).unwrap_or_default(),
            internal_ratio: 0.75,
            duration: Bounds::new(10, 300),
            pause: DurationBounds::from_minutes(1, 15),
            wake_jitter: DurationBounds::from_minutes(5, 45),
            sleep: SleepConfig {
                start_hour: 23,
                end_hour: 7,
            },
            jitter: JitterConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.network.participants, 15);
        assert_eq!(config.calls.strategy, Strategy::TimeWalk);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
general:
  output_dir: "fixtures"
  seed: 7
network:
  participants: 4
calls:
  strategy: global_sampling
  start_date: 2024-03-01
  end_date: 2024-03-02
  pause: { min: "2m", max: "10m" }
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.general.output_dir, PathBuf::from("fixtures"));
        assert_eq!(config.general.seed, Some(7));
        assert!(config.general.write_manifest);
        assert_eq!(config.network.participants, 4);
        assert_eq!(config.network.extra_partners, Bounds::new(2, 4));
        assert_eq!(config.calls.strategy, Strategy::GlobalSampling);
        assert_eq!(config.calls.pause.whole_minutes(), (2, 10));
        assert_eq!(config.calls.sleep.start_hour, 23);
    }

    #[test]
    fn test_empty_document_parses() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_participants_rejected() {
        let mut config = Config::default();
        config.network.participants = 0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidNetwork(_))
        ));
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut config = Config::default();
        config.calls.end_date = NaiveDate::from_ymd_opt(2017, 12, 31).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("before start_date"));
    }

    #[test]
    fn test_sleep_window_validation() {
        let mut config = Config::default();
        config.calls.sleep = SleepConfig { start_hour: 7, end_hour: 7 };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidSleepWindow { .. })
        ));

        config.calls.sleep = SleepConfig { start_hour: 25, end_hour: 7 };
        assert!(config.validate().is_err());

        // Awake until midnight is allowed
        config.calls.sleep = SleepConfig { start_hour: 24, end_hour: 6 };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_wake_jitter_must_fit_awake_window() {
        let mut config = Config::default();
        config.calls.sleep = SleepConfig { start_hour: 8, end_hour: 7 };
        config.calls.wake_jitter = DurationBounds::from_minutes(5, 60);
        assert!(config.validate().is_err());

        config.calls.wake_jitter = DurationBounds::from_minutes(5, 45);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duration_bounds_validation() {
        let mut config = Config::default();
        config.calls.duration = Bounds::new(0, 300);
        assert!(config.validate().is_err());

        config.calls.duration = Bounds::new(300, 10);
        assert!(config.validate().is_err());

        config.calls.duration = Bounds::new(10, MAX_RENDERABLE_DURATION_SECS);
        assert!(config.validate().is_err());

        config.calls.jitter.max_duration_delta_secs = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_internal_ratio_range() {
        let mut config = Config::default();
        config.calls.internal_ratio = 1.5;
        assert!(config.validate().is_err());
        config.calls.internal_ratio = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lone_participant_needs_contacts() {
        let mut config = Config::default();
        config.network.participants = 1;
        config.network.private_contacts = Bounds::new(0, 0);
        config.network.sub_clans.count = 0;
        assert!(config.validate().is_err());

        config.network.private_contacts = Bounds::new(1, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lone_participant_with_sub_clans_rejected() {
        // Sub-clans are never injected for a single participant
        let mut config = Config::default();
        config.network.participants = 1;
        config.network.private_contacts = Bounds::new(0, 0);
        assert_eq!(config.network.sub_clans.count, 3);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidNetwork(_))
        ));
    }

    #[test]
    fn test_internal_ratio_must_reach_a_pool() {
        let mut config = Config::default();
        config.network.participants = 5;
        config.network.private_contacts = Bounds::new(0, 0);
        config.network.sub_clans.count = 0;

        config.calls.internal_ratio = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidNetwork(_))
        ));

        config.calls.internal_ratio = 0.5;
        assert!(config.validate().is_ok());

        // Only external contacts, but every draw is internal
        let mut config = Config::default();
        config.network.participants = 1;
        config.network.private_contacts = Bounds::new(3, 3);
        config.calls.internal_ratio = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_durations_rejected_without_overflow() {
        let mut config = Config::default();
        config.calls.duration = Bounds::new(10, u32::MAX);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidCalls(_))
        ));

        let mut config = Config::default();
        config.calls.jitter.max_duration_delta_secs = u32::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pause_capped_to_date_range() {
        let mut config = Config::default();
        config.calls.start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        config.calls.end_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        config.calls.pause = DurationBounds {
            min: Duration::from_secs(60),
            max: Duration::from_secs(u64::MAX),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidCalls(_))
        ));

        config.calls.pause = DurationBounds::from_minutes(1, 24 * 60);
        assert!(config.validate().is_ok());
        config.calls.pause = DurationBounds::from_minutes(1, 24 * 60 + 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_wake_jitter_rejected_without_overflow() {
        let mut config = Config::default();
        config.calls.wake_jitter = DurationBounds {
            min: Duration::from_secs(0),
            max: Duration::from_secs(u64::MAX),
        };
        config.calls.jitter.max_offset_secs = u32::MAX;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidCalls(_))
        ));
    }

    #[test]
    fn test_sub_clan_validation() {
        let mut config = Config::default();
        config.network.sub_clans.min_size = 1;
        assert!(config.validate().is_err());

        config.network.sub_clans.count = 0;
        assert!(config.validate().is_ok());
    }
}
