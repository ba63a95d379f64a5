use crate::config::{Config, Strategy};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Load and parse configuration from a YAML file
///
/// The result is not validated yet: CLI overrides are applied on top of it
/// first, see [`apply_overrides`].
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration file '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration file '{}'", config_path.display()))?;

    Ok(config)
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub participants: Option<u32>,
    pub target_records: Option<u64>,
    pub strategy: Option<Strategy>,
}

/// Apply CLI overrides and validate the resulting configuration
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(dir) = &overrides.output_dir {
        info!("Output directory override: {:?}", dir);
        config.general.output_dir = dir.clone();
    }
    if let Some(seed) = overrides.seed {
        info!("Seed override: {}", seed);
        config.general.seed = Some(seed);
    }
    if let Some(participants) = overrides.participants {
        info!("Participant count override: {}", participants);
        config.network.participants = participants;
    }
    if let Some(target) = overrides.target_records {
        info!("Target record count override: {}", target);
        config.calls.target_records = target;
    }
    if let Some(strategy) = overrides.strategy {
        info!("Sampling strategy override: {:?}", strategy);
        config.calls.strategy = strategy;
    }

    config.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let yaml = r#"
general:
  output_dir: "out"
network:
  participants: 3
  sub_clans: { count: 1, min_size: 2, max_size: 3, repetition: 5 }
calls:
  target_records: 500
  start_date: 2024-01-01
  end_date: 2024-01-31
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.network.participants, 3);
        assert_eq!(config.network.sub_clans.count, 1);
        assert_eq!(config.calls.target_records, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/cdrsim.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to open configuration file"));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        let overrides = CliOverrides {
            output_dir: Some(PathBuf::from("elsewhere")),
            seed: Some(99),
            participants: Some(5),
            target_records: Some(1_000),
            strategy: Some(Strategy::GlobalSampling),
        };

        apply_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.general.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(config.general.seed, Some(99));
        assert_eq!(config.network.participants, 5);
        assert_eq!(config.calls.target_records, 1_000);
        assert_eq!(config.calls.strategy, Strategy::GlobalSampling);
    }

    #[test]
    fn test_overrides_are_validated() {
        let mut config = Config::default();
        let overrides = CliOverrides {
            participants: Some(0),
            ..Default::default()
        };
        assert!(apply_overrides(&mut config, &overrides).is_err());
    }
}
