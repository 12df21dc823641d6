use std::fs;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

use crate::aggregate::aggregate_with;
use crate::analysis::SummaryRecord;
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::fitting::ParameterSource;
use crate::frequency::FrequencySampler;
use crate::output::{write_losses_csv, write_summary_json};
use crate::severity::SeveritySampler;
use crate::types::{FrequencyParams, SeverityParams};

/// Losses and summary of one completed run.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    /// One aggregate loss per simulated year, in year order.
    pub losses: Vec<f64>,
    pub summary: SummaryRecord,
}

/// A fitted, ready-to-run aggregate-loss simulation.
///
/// Parameters are fetched from the fitting stage once in [`Simulation::fit`];
/// every call to [`Simulation::run`] is independent and reseeds from the config.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    frequency_params: FrequencyParams,
    severity_params: SeverityParams,
    frequency: FrequencySampler,
    severity: SeveritySampler,
}

impl Simulation {
    /// Fetch fitted parameters and resolve the samplers. Fitting failures
    /// are returned unchanged.
    pub fn fit(config: SimulationConfig, source: &dyn ParameterSource) -> Result<Self> {
        config.validate()?;
        let frequency_params = source.fit_frequency()?;
        let severity_params = source.fit_severity()?;
        Self::from_params(config, frequency_params, severity_params)
    }

    /// Build from parameters already in hand. The config is assumed valid;
    /// a frequency mean the samplers cannot represent is rejected here.
    pub fn from_params(
        config: SimulationConfig,
        frequency_params: FrequencyParams,
        severity_params: SeverityParams,
    ) -> Result<Self> {
        let frequency = FrequencySampler::from_params(&frequency_params)?;
        let severity = SeveritySampler::from_params(&severity_params, &config.fallback_severity);
        Ok(Self { config, frequency_params, severity_params, frequency, severity })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn frequency_params(&self) -> &FrequencyParams {
        &self.frequency_params
    }

    pub fn severity_params(&self) -> &SeverityParams {
        &self.severity_params
    }

    /// Override the seed (used for sweeps and tests).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Simulate `n_sim` years and summarise, writing artifacts if configured.
    pub fn run(&self) -> Result<SimulationRun> {
        let run = self.simulate(self.config.seed)?;
        if self.config.save_output {
            fs::create_dir_all(&self.config.output_dir)?;
            write_losses_csv(&self.config.losses_path(), &run.losses)?;
            write_summary_json(&self.config.summary_path(), &run.summary)?;
        }
        Ok(run)
    }

    fn simulate(&self, seed: u64) -> Result<SimulationRun> {
        let n_sim = self.config.n_sim;
        info!(
            "simulating {n_sim} years (seed {seed}, frequency {}, severity {})",
            self.frequency_params.model, self.severity_params.model
        );
        if self.severity.is_placeholder() {
            warn!("severity draws are placeholders; loss figures are not economically meaningful");
        }

        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let counts = self.frequency.sample(n_sim, &mut rng)?;
        debug!(
            "{} of {n_sim} years have at least one claim",
            counts.iter().filter(|&&c| c > 0).count()
        );
        let losses = aggregate_with(&counts, &self.severity, &mut rng)?;

        let summary = SummaryRecord::from_losses(
            &losses,
            self.frequency_params.model.to_string(),
            self.severity_params.model.to_string(),
        );
        info!(
            "mean {:.2}, stdev {:.2}, VaR95 {:.2}, TVaR95 {:.2}, VaR99 {:.2}, TVaR99 {:.2}",
            summary.mean, summary.stdev, summary.var95, summary.tvar95, summary.var99, summary.tvar99
        );
        Ok(SimulationRun { losses, summary })
    }

    /// Run each seed independently in parallel over the same fitted
    /// parameters. No artifacts are written. Results are in `seeds` order.
    pub fn sweep(&self, seeds: &[u64]) -> Result<Vec<(u64, SummaryRecord)>> {
        seeds
            .par_iter()
            .map(|&seed| self.simulate(seed).map(|run| (seed, run.summary)))
            .collect()
    }
}

/// Fetch parameters, simulate `config.n_sim` years, and summarise.
pub fn run_simulation(
    config: &SimulationConfig,
    source: &dyn ParameterSource,
) -> Result<(Vec<f64>, SummaryRecord)> {
    let run = Simulation::fit(config.clone(), source)?.run()?;
    Ok((run.losses, run.summary))
}
