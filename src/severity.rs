use log::{debug, info, warn};
use rand::Rng;
use rand_distr::{Distribution, Gamma, LogNormal};

use crate::config::{FallbackKind, FallbackSeverityConfig};
use crate::types::{SeverityModel, SeverityParams};

/// Placeholder claim size for severity states that cannot be sampled.
pub const PLACEHOLDER_SEVERITY: f64 = 1.0;

/// Underlying-normal parameters of a LogNormal with the given arithmetic
/// mean `m` and standard deviation `s`:
/// σ² = ln(1 + s²/m²), μ = ln(m) − σ²/2.
///
/// Returns `(mu, sigma)`.
pub fn lognormal_from_moments(mean: f64, sd: f64) -> (f64, f64) {
    let sigma2 = (1.0 + (sd * sd) / (mean * mean)).ln();
    let mu = mean.ln() - sigma2 / 2.0;
    (mu, sigma2.sqrt())
}

/// Claim-size sampler resolved from fitted parameters and the fallback config.
#[derive(Debug, Clone)]
pub enum SeveritySampler {
    Gamma(Gamma<f64>),
    LogNormal(LogNormal<f64>),
    /// Constant 1.0 claims. Results from a run using this must not be
    /// trusted for economic conclusions; it exists only so a batch completes.
    Placeholder,
}

impl SeveritySampler {
    pub fn from_params(params: &SeverityParams, fallback: &FallbackSeverityConfig) -> Self {
        let sampler = match &params.model {
            SeverityModel::Gamma => Self::gamma(params.shape, params.rate),
            SeverityModel::LogNormal => Self::lognormal(params.meanlog, params.sdlog),
            SeverityModel::None => Self::fallback(fallback),
            SeverityModel::Unknown(label) => {
                warn!("unrecognised severity model {label:?}; using placeholder severities");
                SeveritySampler::Placeholder
            }
        };
        debug!("severity sampler resolved to {sampler:?}");
        sampler
    }

    fn gamma(shape: Option<f64>, rate: Option<f64>) -> Self {
        let (Some(shape), Some(rate)) = (shape, rate) else {
            warn!("gamma severity fit missing shape/rate ({shape:?}, {rate:?}); using placeholder severities");
            return SeveritySampler::Placeholder;
        };
        if !(shape.is_finite() && shape > 0.0 && rate.is_finite() && rate > 0.0) {
            warn!("gamma severity (shape {shape}, rate {rate}) out of domain; using placeholder severities");
            return SeveritySampler::Placeholder;
        }
        match Gamma::new(shape, 1.0 / rate) {
            Ok(dist) => SeveritySampler::Gamma(dist),
            Err(e) => {
                warn!("gamma severity (shape {shape}, rate {rate}) rejected: {e}; using placeholder severities");
                SeveritySampler::Placeholder
            }
        }
    }

    fn lognormal(meanlog: Option<f64>, sdlog: Option<f64>) -> Self {
        let (Some(meanlog), Some(sdlog)) = (meanlog, sdlog) else {
            warn!("lognormal severity fit missing meanlog/sdlog ({meanlog:?}, {sdlog:?}); using placeholder severities");
            return SeveritySampler::Placeholder;
        };
        if !(meanlog.is_finite() && sdlog.is_finite() && sdlog >= 0.0) {
            warn!("lognormal severity (meanlog {meanlog}, sdlog {sdlog}) out of domain; using placeholder severities");
            return SeveritySampler::Placeholder;
        }
        match LogNormal::new(meanlog, sdlog) {
            Ok(dist) => SeveritySampler::LogNormal(dist),
            Err(e) => {
                warn!("lognormal severity (meanlog {meanlog}, sdlog {sdlog}) rejected: {e}; using placeholder severities");
                SeveritySampler::Placeholder
            }
        }
    }

    fn fallback(config: &FallbackSeverityConfig) -> Self {
        match config.kind {
            FallbackKind::LogNormal => {
                let (mu, sigma) = lognormal_from_moments(config.mean, config.sd);
                info!(
                    "no severity fit; fallback lognormal(mean {}, sd {}) -> meanlog {mu:.4}, sdlog {sigma:.4}",
                    config.mean, config.sd
                );
                Self::lognormal(Some(mu), Some(sigma))
            }
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, SeveritySampler::Placeholder)
    }

    /// Draw `n` claim sizes in one batch. `n == 0` never touches the rng.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        if n == 0 {
            return Vec::new();
        }
        match self {
            SeveritySampler::Gamma(dist) => (0..n).map(|_| dist.sample(rng)).collect(),
            SeveritySampler::LogNormal(dist) => (0..n).map(|_| dist.sample(rng)).collect(),
            SeveritySampler::Placeholder => vec![PLACEHOLDER_SEVERITY; n],
        }
    }
}

/// Sample `n` independent claim sizes from the fitted severity model, or
/// from `fallback` when no fit is available.
pub fn sample_severities<R: Rng + ?Sized>(
    n: usize,
    params: &SeverityParams,
    fallback: &FallbackSeverityConfig,
    rng: &mut R,
) -> Vec<f64> {
    SeveritySampler::from_params(params, fallback).sample(n, rng)
}
