use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::de::DeserializeOwned;

use crate::error::FitError;
use crate::types::{FrequencyParams, SeverityParams};

/// Boundary to the statistical fitting stage. The simulation only relies on
/// the parameter mappings returned here, never on how they were produced.
pub trait ParameterSource {
    fn fit_frequency(&self) -> Result<FrequencyParams, FitError>;
    fn fit_severity(&self) -> Result<SeverityParams, FitError>;
}

/// Parameters already in memory.
#[derive(Debug, Clone, Default)]
pub struct FixedParams {
    pub frequency: FrequencyParams,
    pub severity: SeverityParams,
}

impl FixedParams {
    pub fn new(frequency: FrequencyParams, severity: SeverityParams) -> Self {
        Self { frequency, severity }
    }
}

impl ParameterSource for FixedParams {
    fn fit_frequency(&self) -> Result<FrequencyParams, FitError> {
        Ok(self.frequency.clone())
    }

    fn fit_severity(&self) -> Result<SeverityParams, FitError> {
        Ok(self.severity.clone())
    }
}

pub const DEFAULT_FREQUENCY_PATH: &str = "results/frequency_results.json";
pub const DEFAULT_SEVERITY_PATH: &str = "results/severity_results.json";

/// Reads the JSON documents the fitting stage writes for each model.
#[derive(Debug, Clone)]
pub struct JsonParamFiles {
    pub frequency_path: PathBuf,
    pub severity_path: PathBuf,
}

impl Default for JsonParamFiles {
    fn default() -> Self {
        Self::new(DEFAULT_FREQUENCY_PATH, DEFAULT_SEVERITY_PATH)
    }
}

impl JsonParamFiles {
    pub fn new(frequency_path: impl Into<PathBuf>, severity_path: impl Into<PathBuf>) -> Self {
        Self { frequency_path: frequency_path.into(), severity_path: severity_path.into() }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FitError> {
    let text = fs::read_to_string(path)
        .map_err(|source| FitError::Read { path: path.to_path_buf(), source })?;
    let value = serde_json::from_str(&text)
        .map_err(|source| FitError::Parse { path: path.to_path_buf(), source })?;
    info!("loaded fitted parameters from {}", path.display());
    Ok(value)
}

impl ParameterSource for JsonParamFiles {
    fn fit_frequency(&self) -> Result<FrequencyParams, FitError> {
        read_json(&self.frequency_path)
    }

    fn fit_severity(&self) -> Result<SeverityParams, FitError> {
        read_json(&self.severity_path)
    }
}
