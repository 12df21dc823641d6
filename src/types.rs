use std::fmt;

use serde::{Deserialize, Serialize};

/// Claim-count distribution named by the fitting stage.
///
/// Labels are matched case-insensitively and recognised ones are normalised
/// on display ("negative_binomial" and "nb" both print as `NegBin`). Only
/// unrecognised labels are kept verbatim in `Unknown` and echoed into the
/// summary; a missing, null or blank label becomes [`UNKNOWN_FREQUENCY_LABEL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum FrequencyModel {
    Poisson,
    NegativeBinomial,
    Unknown(String),
}

/// Summary label for a frequency fit that named no model.
pub const UNKNOWN_FREQUENCY_LABEL: &str = "unknown";

impl Default for FrequencyModel {
    fn default() -> Self {
        FrequencyModel::Unknown(UNKNOWN_FREQUENCY_LABEL.to_string())
    }
}

impl From<Option<String>> for FrequencyModel {
    fn from(label: Option<String>) -> Self {
        let Some(label) = label else {
            return FrequencyModel::default();
        };
        match label.trim().to_ascii_lowercase().as_str() {
            "poisson" => FrequencyModel::Poisson,
            "negbin" | "nb" | "negativebinomial" | "negative_binomial" => {
                FrequencyModel::NegativeBinomial
            }
            "" => FrequencyModel::default(),
            _ => FrequencyModel::Unknown(label),
        }
    }
}

impl From<&str> for FrequencyModel {
    fn from(label: &str) -> Self {
        FrequencyModel::from(Some(label.to_string()))
    }
}

impl From<FrequencyModel> for String {
    fn from(model: FrequencyModel) -> Self {
        model.to_string()
    }
}

impl fmt::Display for FrequencyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrequencyModel::Poisson => f.write_str("Poisson"),
            FrequencyModel::NegativeBinomial => f.write_str("NegBin"),
            FrequencyModel::Unknown(label) => f.write_str(label),
        }
    }
}

/// Claim-size distribution named by the fitting stage.
/// `None` means the severity fit failed or was not available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum SeverityModel {
    Gamma,
    LogNormal,
    #[default]
    None,
    Unknown(String),
}

impl From<Option<String>> for SeverityModel {
    fn from(label: Option<String>) -> Self {
        let Some(label) = label else {
            return SeverityModel::None;
        };
        match label.trim().to_ascii_lowercase().as_str() {
            "gamma" => SeverityModel::Gamma,
            "lognormal" | "lnorm" => SeverityModel::LogNormal,
            "none" | "" => SeverityModel::None,
            _ => SeverityModel::Unknown(label),
        }
    }
}

impl From<&str> for SeverityModel {
    fn from(label: &str) -> Self {
        SeverityModel::from(Some(label.to_string()))
    }
}

impl From<SeverityModel> for String {
    fn from(model: SeverityModel) -> Self {
        model.to_string()
    }
}

impl fmt::Display for SeverityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityModel::Gamma => f.write_str("gamma"),
            SeverityModel::LogNormal => f.write_str("lognormal"),
            SeverityModel::None => f.write_str("none"),
            SeverityModel::Unknown(label) => f.write_str(label),
        }
    }
}

/// Fitted claim-count parameters. `theta` is only meaningful for
/// `NegativeBinomial`, where Var[N] = mu + mu²/theta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyParams {
    #[serde(default)]
    pub model: FrequencyModel,
    #[serde(default)]
    pub mu: Option<f64>,
    #[serde(default)]
    pub theta: Option<f64>,
}

impl FrequencyParams {
    pub fn poisson(mu: f64) -> Self {
        Self { model: FrequencyModel::Poisson, mu: Some(mu), theta: None }
    }

    pub fn negative_binomial(mu: f64, theta: Option<f64>) -> Self {
        Self { model: FrequencyModel::NegativeBinomial, mu: Some(mu), theta }
    }
}

/// Fitted claim-size parameters. Gamma uses `shape`/`rate` (scale = 1/rate),
/// LogNormal uses `meanlog`/`sdlog` of the underlying normal. Both pairs may
/// be present; `model` selects which one is sampled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityParams {
    #[serde(default)]
    pub model: SeverityModel,
    #[serde(default, alias = "gamma_shape")]
    pub shape: Option<f64>,
    #[serde(default, alias = "gamma_rate")]
    pub rate: Option<f64>,
    #[serde(default, alias = "ln_meanlog")]
    pub meanlog: Option<f64>,
    #[serde(default, alias = "ln_sdlog")]
    pub sdlog: Option<f64>,
}

impl SeverityParams {
    pub fn gamma(shape: f64, rate: f64) -> Self {
        Self {
            model: SeverityModel::Gamma,
            shape: Some(shape),
            rate: Some(rate),
            ..Self::default()
        }
    }

    pub fn lognormal(meanlog: f64, sdlog: f64) -> Self {
        Self {
            model: SeverityModel::LogNormal,
            meanlog: Some(meanlog),
            sdlog: Some(sdlog),
            ..Self::default()
        }
    }

    /// No usable severity fit; the configured fallback applies.
    pub fn unavailable() -> Self {
        Self::default()
    }
}
