use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Only LogNormal is supported as a fallback family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackKind {
    #[default]
    LogNormal,
}

/// Severity used when the fitting stage reports no severity model.
/// Target arithmetic moments of the claim size, in currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackSeverityConfig {
    #[serde(rename = "type")]
    pub kind: FallbackKind,
    pub mean: f64,
    pub sd: f64,
}

impl Default for FallbackSeverityConfig {
    fn default() -> Self {
        Self { kind: FallbackKind::LogNormal, mean: 20_000.0, sd: 30_000.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Number of simulated policy years.
    pub n_sim: usize,
    /// Write the loss table and summary to `output_dir` after the run.
    pub save_output: bool,
    pub output_dir: PathBuf,
    pub losses_file: String,
    pub summary_file: String,
    pub fallback_severity: FallbackSeverityConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::canonical()
    }
}

impl SimulationConfig {
    pub fn canonical() -> Self {
        Self {
            seed: 42,
            n_sim: 50_000,
            save_output: true,
            output_dir: PathBuf::from("results"),
            losses_file: "simulated_losses.csv".to_string(),
            summary_file: "summary.json".to_string(),
            fallback_severity: FallbackSeverityConfig::default(),
        }
    }

    /// Load overrides from a JSON file. Keys not present keep their canonical value.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_sim == 0 {
            return Err(Error::InvalidConfig("n_sim must be at least 1".to_string()));
        }
        let fb = &self.fallback_severity;
        if !fb.mean.is_finite() || fb.mean <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "fallback severity mean must be positive, got {}",
                fb.mean
            )));
        }
        if !fb.sd.is_finite() || fb.sd < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "fallback severity sd must be non-negative, got {}",
                fb.sd
            )));
        }
        Ok(())
    }

    pub fn losses_path(&self) -> PathBuf {
        self.output_dir.join(&self.losses_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(&self.summary_file)
    }
}
