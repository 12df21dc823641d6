use log::{debug, info, warn};
use rand::Rng;
use rand_distr::{Distribution, Gamma, Poisson};

use crate::error::{Error, Result};
use crate::types::{FrequencyModel, FrequencyParams};

/// Claim-count sampler resolved from fitted parameters.
///
/// Missing or degenerate parameters degrade to the nearest defined default
/// (Poisson, or zero claims when mu is 0). A mean the Poisson sampler
/// cannot represent is an error, never a silent zero.
#[derive(Debug, Clone)]
pub enum FrequencySampler {
    /// mu == 0: every year has zero claims.
    Zero,
    Poisson(Poisson<f64>),
    /// Negative binomial as a Gamma–Poisson mixture: λ ~ Gamma(θ, mu/θ), N ~ Poisson(λ).
    GammaPoisson(Gamma<f64>),
}

impl FrequencySampler {
    pub fn from_params(params: &FrequencyParams) -> Result<Self> {
        let mu = match params.mu {
            None => 0.0,
            Some(mu) if mu.is_finite() && mu >= 0.0 => mu,
            Some(mu) => {
                warn!("frequency mu {mu} is not a valid mean; treating as 0");
                0.0
            }
        };

        let sampler = match &params.model {
            FrequencyModel::Poisson => Self::poisson(mu)?,
            FrequencyModel::NegativeBinomial => match params.theta {
                Some(theta) if theta.is_finite() && theta > 0.0 => Self::gamma_poisson(mu, theta)?,
                theta => {
                    info!("degenerate negative binomial fit (theta = {theta:?}); sampling Poisson({mu})");
                    Self::poisson(mu)?
                }
            },
            FrequencyModel::Unknown(label) => {
                warn!("unrecognised frequency model {label:?}; sampling Poisson({mu})");
                Self::poisson(mu)?
            }
        };
        debug!("frequency sampler resolved to {sampler:?}");
        Ok(sampler)
    }

    fn poisson(mu: f64) -> Result<Self> {
        if mu == 0.0 {
            return Ok(FrequencySampler::Zero);
        }
        Poisson::new(mu)
            .map(FrequencySampler::Poisson)
            .map_err(|e| Error::InvalidParams(format!("Poisson mean {mu} rejected: {e}")))
    }

    fn gamma_poisson(mu: f64, theta: f64) -> Result<Self> {
        if mu == 0.0 {
            return Ok(FrequencySampler::Zero);
        }
        // The mixture mean is mu, so it must lie in the Poisson sampler's range too.
        Self::poisson(mu)?;
        Gamma::new(theta, mu / theta)
            .map(FrequencySampler::GammaPoisson)
            .map_err(|e| {
                Error::InvalidParams(format!("Gamma({theta}, {}) mixing rejected: {e}", mu / theta))
            })
    }

    /// Draw one count per simulated year.
    pub fn sample<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Result<Vec<u64>> {
        match self {
            FrequencySampler::Zero => Ok(vec![0; size]),
            FrequencySampler::Poisson(dist) => {
                Ok((0..size).map(|_| dist.sample(rng) as u64).collect())
            }
            FrequencySampler::GammaPoisson(mixing) => (0..size)
                .map(|_| poisson_count(mixing.sample(rng), rng))
                .collect(),
        }
    }
}

/// One Poisson(λ) draw for a latent rate. A rate of 0 (Gamma underflow)
/// is zero claims; a rate beyond the sampler's range is an error.
pub fn poisson_count<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> Result<u64> {
    if lambda == 0.0 {
        return Ok(0);
    }
    let dist = Poisson::new(lambda)
        .map_err(|e| Error::InvalidParams(format!("latent claim rate {lambda} rejected: {e}")))?;
    Ok(dist.sample(rng) as u64)
}

/// Sample `size` independent claim counts from the fitted frequency model.
pub fn sample_counts<R: Rng + ?Sized>(
    params: &FrequencyParams,
    size: usize,
    rng: &mut R,
) -> Result<Vec<u64>> {
    FrequencySampler::from_params(params)?.sample(size, rng)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(42)
    }

    fn mean(xs: &[u64]) -> f64 {
        xs.iter().sum::<u64>() as f64 / xs.len() as f64
    }

    fn variance(xs: &[u64]) -> f64 {
        let m = mean(xs);
        xs.iter().map(|&x| (x as f64 - m).powi(2)).sum::<f64>() / (xs.len() - 1) as f64
    }

    #[test]
    fn poisson_mean_converges() {
        let counts = sample_counts(&FrequencyParams::poisson(2.0), 50_000, &mut rng()).unwrap();
        assert_eq!(counts.len(), 50_000);
        let m = mean(&counts);
        assert!((m - 2.0).abs() < 0.05, "Poisson mean {m:.4} far from 2.0");
    }

    #[test]
    fn small_mu_produces_mostly_zero_years() {
        let counts = sample_counts(&FrequencyParams::poisson(0.05), 20_000, &mut rng()).unwrap();
        let zeros = counts.iter().filter(|&&c| c == 0).count();
        // P(N = 0) = exp(-0.05) ≈ 0.951
        let frac = zeros as f64 / counts.len() as f64;
        assert!((0.94..=0.96).contains(&frac), "zero fraction {frac:.4}");
    }

    /// Var = mu + mu²/theta = 2 + 4/0.5 = 10.
    #[test]
    fn negative_binomial_is_overdispersed() {
        let params = FrequencyParams::negative_binomial(2.0, Some(0.5));
        let counts = sample_counts(&params, 50_000, &mut rng()).unwrap();
        let m = mean(&counts);
        let v = variance(&counts);
        assert!((m - 2.0).abs() < 0.1, "NB mean {m:.4}");
        assert!((8.5..=11.5).contains(&v), "NB variance {v:.3} outside [8.5, 11.5]");
    }

    #[test]
    fn degenerate_theta_matches_poisson_exactly() {
        let poisson = sample_counts(&FrequencyParams::poisson(1.5), 5_000, &mut rng()).unwrap();
        for theta in [None, Some(f64::NAN), Some(0.0), Some(-3.0)] {
            let params = FrequencyParams::negative_binomial(1.5, theta);
            let counts = sample_counts(&params, 5_000, &mut rng()).unwrap();
            assert_eq!(counts, poisson, "theta = {theta:?} should fall back to Poisson");
        }
    }

    #[test]
    fn unknown_model_falls_back_to_poisson() {
        let poisson = sample_counts(&FrequencyParams::poisson(0.7), 2_000, &mut rng()).unwrap();
        let params = FrequencyParams {
            model: FrequencyModel::from("ZeroInflatedPoisson"),
            mu: Some(0.7),
            theta: Some(2.0),
        };
        assert_eq!(sample_counts(&params, 2_000, &mut rng()).unwrap(), poisson);
    }

    #[test]
    fn missing_or_invalid_mu_gives_zero_claims() {
        let missing = FrequencyParams { model: FrequencyModel::Poisson, mu: None, theta: None };
        assert_eq!(sample_counts(&missing, 100, &mut rng()).unwrap(), vec![0; 100]);

        let nan = FrequencyParams::poisson(f64::NAN);
        assert_eq!(sample_counts(&nan, 100, &mut rng()).unwrap(), vec![0; 100]);

        let negative = FrequencyParams::negative_binomial(-1.0, Some(2.0));
        assert_eq!(sample_counts(&negative, 100, &mut rng()).unwrap(), vec![0; 100]);
    }

    #[test]
    fn zero_size_is_empty() {
        assert!(sample_counts(&FrequencyParams::poisson(3.0), 0, &mut rng()).unwrap().is_empty());
    }

    #[test]
    fn mean_beyond_poisson_range_is_an_error() {
        let err = sample_counts(&FrequencyParams::poisson(1e20), 5, &mut rng()).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)), "{err:?}");

        let err = FrequencySampler::from_params(&FrequencyParams::negative_binomial(1e20, Some(2.0)))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)), "{err:?}");
    }

    /// theta = 1e-3 puts almost all Gamma mass at (or underflowing to) zero.
    #[test]
    fn tiny_theta_gives_mostly_zero_counts() {
        let params = FrequencyParams::negative_binomial(1.0, Some(1e-3));
        let counts = sample_counts(&params, 2_000, &mut rng()).unwrap();
        assert_eq!(counts.len(), 2_000);
        let zeros = counts.iter().filter(|&&c| c == 0).count();
        assert!(zeros >= 1_900, "only {zeros} zero years with theta = 1e-3");
    }

    #[test]
    fn zero_latent_rate_is_zero_claims() {
        let mut a = rng();
        assert_eq!(poisson_count(0.0, &mut a).unwrap(), 0);
        // rng untouched
        let mut b = rng();
        assert_eq!(poisson_count(3.0, &mut a).unwrap(), poisson_count(3.0, &mut b).unwrap());
    }

    #[test]
    fn latent_rate_beyond_poisson_range_is_an_error() {
        assert!(matches!(poisson_count(1e20, &mut rng()), Err(Error::InvalidParams(_))));
        assert!(matches!(poisson_count(f64::NAN, &mut rng()), Err(Error::InvalidParams(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_counts_have_requested_length(
            seed in any::<u64>(),
            mu in 0.0f64..20.0,
            theta in 0.05f64..50.0,
            size in 0usize..500,
        ) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let params = FrequencyParams::negative_binomial(mu, Some(theta));
            let counts = sample_counts(&params, size, &mut rng).unwrap();
            prop_assert_eq!(counts.len(), size);
        }
    }
}
