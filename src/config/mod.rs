//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::core::{Error, Language, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exclude patterns (glob), matched against paths relative to the root.
    #[serde(rename = "exclude")]
    pub exclude_patterns: Vec<String>,
    /// Analysis run settings.
    pub analysis: AnalysisConfig,
    /// Metric thresholds used by the scorer and concern detectors.
    pub thresholds: ThresholdConfig,
    /// Score gating.
    pub score: ScoreConfig,
    /// Ownership rules, evaluated in order; the last matching rule wins.
    pub owners: Vec<OwnerRule>,
}

impl Config {
    /// Load configuration from an explicit file path.
    ///
    /// Errors if the file does not exist. Use this for explicit `--config` flags.
    /// Env vars with `HEALTHSCAN_` prefix override file values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file_exact(path))
            .merge(Env::prefixed("HEALTHSCAN_").split("__"))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.thresholds.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, looking for healthscan.toml or
    /// .healthscan/healthscan.toml.
    ///
    /// Missing files are silently skipped (defaults are used).
    pub fn load_default(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(dir.join("healthscan.toml")))
            .merge(Toml::file(dir.join(".healthscan/healthscan.toml")))
            .merge(Env::prefixed("HEALTHSCAN_").split("__"))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.thresholds.validate()?;
        Ok(config)
    }

    /// Default config file content.
    pub fn default_toml() -> &'static str {
        include_str!("default_config.toml")
    }
}

/// Analysis run settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Languages to analyze; empty means every supported language.
    pub languages: Vec<String>,
    /// Ignore churn data even when a churn file is available.
    pub skip_churn: bool,
    /// Worker threads for parsing (0 = rayon default).
    pub max_workers: usize,
    /// Churn data file, relative to the analyzed root unless absolute.
    pub churn_file: Option<PathBuf>,
}

impl AnalysisConfig {
    /// Resolve configured language names.
    pub fn resolved_languages(&self) -> Result<Vec<Language>> {
        self.languages
            .iter()
            .map(|name| {
                Language::from_name(name)
                    .ok_or_else(|| Error::config(format!("unknown language: {name}")))
            })
            .collect()
    }
}

/// An `{info, warning, critical}` triple for metrics where larger is worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub info: u32,
    pub warning: u32,
    pub critical: u32,
}

impl SeverityThresholds {
    pub const fn new(info: u32, warning: u32, critical: u32) -> Self {
        Self {
            info,
            warning,
            critical,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.info > self.warning || self.warning > self.critical {
            return Err(Error::config(format!(
                "thresholds.{name} must satisfy info <= warning <= critical (got {}/{}/{})",
                self.info, self.warning, self.critical
            )));
        }
        Ok(())
    }
}

/// Maintainability index thresholds. Lower is worse, so the ordering is
/// inverted: critical <= warning <= info.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaintainabilityThresholds {
    pub info: f64,
    pub warning: f64,
    pub critical: f64,
}

impl Default for MaintainabilityThresholds {
    fn default() -> Self {
        Self {
            info: 60.0,
            warning: 40.0,
            critical: 20.0,
        }
    }
}

/// Many parameters combined with many callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GodFunctionThresholds {
    pub min_parameters: u32,
    pub min_fan_in: u32,
}

impl Default for GodFunctionThresholds {
    fn default() -> Self {
        Self {
            min_parameters: 6,
            min_fan_in: 10,
        }
    }
}

/// Complex code that also changes often.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotspotThresholds {
    pub min_complexity: u32,
    pub min_churn: u32,
}

impl Default for HotspotThresholds {
    fn default() -> Self {
        Self {
            min_complexity: 10,
            min_churn: 10,
        }
    }
}

/// Fan-in levels at which a changed function is flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlastRadiusThresholds {
    pub warning: u32,
    pub critical: u32,
}

impl Default for BlastRadiusThresholds {
    fn default() -> Self {
        Self {
            warning: 5,
            critical: 15,
        }
    }
}

/// The resolved threshold set handed to the scorer and concern detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub complexity: SeverityThresholds,
    pub cognitive_complexity: SeverityThresholds,
    pub function_length: SeverityThresholds,
    pub nesting_depth: SeverityThresholds,
    pub parameter_count: SeverityThresholds,
    pub churn: SeverityThresholds,
    pub maintainability_index: MaintainabilityThresholds,
    pub god_function: GodFunctionThresholds,
    pub hotspot: HotspotThresholds,
    pub blast_radius: BlastRadiusThresholds,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            complexity: SeverityThresholds::new(5, 10, 20),
            cognitive_complexity: SeverityThresholds::new(10, 15, 25),
            function_length: SeverityThresholds::new(30, 50, 100),
            nesting_depth: SeverityThresholds::new(4, 5, 7),
            parameter_count: SeverityThresholds::new(5, 7, 10),
            churn: SeverityThresholds::new(5, 10, 20),
            maintainability_index: MaintainabilityThresholds::default(),
            god_function: GodFunctionThresholds::default(),
            hotspot: HotspotThresholds::default(),
            blast_radius: BlastRadiusThresholds::default(),
        }
    }
}

impl ThresholdConfig {
    /// Check that every tier triple is ordered.
    pub fn validate(&self) -> Result<()> {
        self.complexity.validate("complexity")?;
        self.cognitive_complexity.validate("cognitive_complexity")?;
        self.function_length.validate("function_length")?;
        self.nesting_depth.validate("nesting_depth")?;
        self.parameter_count.validate("parameter_count")?;
        self.churn.validate("churn")?;

        let mi = &self.maintainability_index;
        if !(mi.critical <= mi.warning && mi.warning <= mi.info) {
            return Err(Error::config(format!(
                "thresholds.maintainability_index must satisfy critical <= warning <= info (got {}/{}/{})",
                mi.critical, mi.warning, mi.info
            )));
        }

        if self.blast_radius.warning > self.blast_radius.critical {
            return Err(Error::config(
                "thresholds.blast_radius must satisfy warning <= critical",
            ));
        }
        Ok(())
    }
}

/// Score gating configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Fail `score` when the overall score is below this value.
    pub fail_under: Option<f64>,
}

/// Maps a path glob to the owners of matching files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRule {
    pub pattern: String,
    pub owners: Vec<String>,
}
