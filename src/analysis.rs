use serde::Serialize;

/// Confidence levels reported in every [`SummaryRecord`].
pub const DEFAULT_CONFIDENCE_LEVELS: [f64; 2] = [0.95, 0.99];

/// Quantile and tail expectation at one confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TailMetrics {
    pub level: f64,
    pub var: f64,
    pub tvar: f64,
}

/// Reduction of a simulated aggregate-loss vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMetrics {
    pub n: usize,
    pub mean: f64,
    /// Bessel-corrected; NaN when fewer than two observations.
    pub stdev: f64,
    pub tail: Vec<TailMetrics>,
}

impl RiskMetrics {
    pub fn at(&self, level: f64) -> Option<&TailMetrics> {
        self.tail.iter().find(|t| t.level == level)
    }
}

/// Fixed-shape summary of one run. Field names follow the published
/// summary artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub sims: usize,
    pub frequency_model: String,
    pub severity_model: String,
    pub mean: f64,
    pub stdev: f64,
    #[serde(rename = "VaR95")]
    pub var95: f64,
    #[serde(rename = "TVaR95")]
    pub tvar95: f64,
    #[serde(rename = "VaR99")]
    pub var99: f64,
    #[serde(rename = "TVaR99")]
    pub tvar99: f64,
}

impl SummaryRecord {
    /// Build the record from losses; labels are echoed as given.
    pub fn from_losses(
        losses: &[f64],
        frequency_model: impl Into<String>,
        severity_model: impl Into<String>,
    ) -> Self {
        let metrics = summarize(losses, &DEFAULT_CONFIDENCE_LEVELS);
        let tail = |level: f64| {
            metrics
                .at(level)
                .copied()
                .unwrap_or(TailMetrics { level, var: f64::NAN, tvar: f64::NAN })
        };
        let (t95, t99) = (tail(0.95), tail(0.99));
        Self {
            sims: losses.len(),
            frequency_model: frequency_model.into(),
            severity_model: severity_model.into(),
            mean: metrics.mean,
            stdev: metrics.stdev,
            var95: t95.var,
            tvar95: t95.tvar,
            var99: t99.var,
            tvar99: t99.tvar,
        }
    }
}

/// Linear-interpolation percentile of an ascending slice: position
/// h = p·(n−1) between order statistics. `p` is clamped to [0, 1].
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let h = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Mean of all losses at or above `var`; `var` itself when none qualify.
pub fn tail_value_at_risk(losses: &[f64], var: f64) -> f64 {
    let (count, excess) = losses
        .iter()
        .filter(|&&x| x >= var)
        .fold((0usize, 0.0), |(n, sum), &x| (n + 1, sum + (x - var)));
    if count == 0 {
        return var;
    }
    // Accumulated as excess over VaR so rounding can never put TVaR below VaR.
    var + excess / count as f64
}

/// Mean, sample standard deviation, and VaR/TVaR at each confidence level.
/// Levels are computed independently of one another.
pub fn summarize(losses: &[f64], confidence_levels: &[f64]) -> RiskMetrics {
    let n = losses.len();
    let mean = if n == 0 { f64::NAN } else { losses.iter().sum::<f64>() / n as f64 };
    let stdev = if n > 1 {
        let ss = losses.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
        (ss / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    let mut sorted = losses.to_vec();
    sorted.sort_by(f64::total_cmp);

    let tail = confidence_levels
        .iter()
        .map(|&level| {
            let var = percentile(&sorted, level);
            let tvar = if n == 0 { f64::NAN } else { tail_value_at_risk(&sorted, var) };
            TailMetrics { level, var, tvar }
        })
        .collect();

    RiskMetrics { n, mean, stdev, tail }
}
