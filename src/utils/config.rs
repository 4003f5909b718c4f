use crate::cannibalization::DetectionRules;
use crate::segmentation::{GroupType, MetricUnit, SegmentationConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::path::Path;

/// Default location when `CONFIG_FILE` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main configuration structure
///
/// The section types speak camelCase on the JSON side and accept snake_case
/// keys as aliases. `Config` serializes through a snake_case view so saved
/// files use the same snake_case keys as `config/default.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionRules,
    pub segmentation: SegmentationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "json" or "pretty"
    pub output: String,
    /// Empty for stderr
    pub file_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: "pretty".to_string(),
            file_path: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variable or default path
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(path)
    }

    pub fn validate(&self) -> Result<()> {
        self.detection.validate().context("invalid [detection] section")?;
        self.segmentation
            .validate()
            .context("invalid [segmentation] section")?;
        Ok(())
    }

    /// Render as TOML with the key layout of `config/default.toml`
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

/// On-disk layout of [`Config`]
#[derive(Serialize)]
struct ConfigFile<'a> {
    detection: DetectionSection,
    segmentation: SegmentationSection,
    logging: &'a LoggingConfig,
}

#[derive(Serialize)]
struct DetectionSection {
    drop_threshold: f64,
    growth_threshold: f64,
    min_volume: f64,
    split_month: u32,
}

#[derive(Serialize)]
struct SegmentationSection {
    group_type: GroupType,
    unit: MetricUnit,
    pareto_target: f64,
}

impl<'a> From<&'a Config> for ConfigFile<'a> {
    fn from(config: &'a Config) -> Self {
        let rules = &config.detection;
        let segmentation = &config.segmentation;
        Self {
            detection: DetectionSection {
                drop_threshold: rules.drop_threshold,
                growth_threshold: rules.growth_threshold,
                min_volume: rules.min_volume,
                split_month: rules.split_month,
            },
            segmentation: SegmentationSection {
                group_type: segmentation.group_type,
                unit: segmentation.unit,
                pareto_target: segmentation.pareto_target,
            },
            logging: &config.logging,
        }
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ConfigFile::from(self).serialize(serializer)
    }
}
