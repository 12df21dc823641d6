use aggloss::config::SimulationConfig;
use aggloss::simulation::Simulation;
use aggloss::types::{FrequencyParams, SeverityParams};

pub struct Scenario {
    pub n_sim: usize,
    pub mu: f64,
    /// `None` samples plain Poisson counts.
    pub theta: Option<f64>,
}

pub const SMALL: Scenario = Scenario { n_sim: 10_000, mu: 0.05, theta: None };

pub const MEDIUM: Scenario = Scenario { n_sim: 50_000, mu: 0.05, theta: Some(1.5) };

/// Attritional-style book: several claims per year.
pub const LARGE: Scenario = Scenario { n_sim: 200_000, mu: 4.0, theta: Some(1.5) };

pub fn frequency_params(scenario: &Scenario) -> FrequencyParams {
    match scenario.theta {
        Some(theta) => FrequencyParams::negative_binomial(scenario.mu, Some(theta)),
        None => FrequencyParams::poisson(scenario.mu),
    }
}

/// LogNormal with arithmetic mean 2000.
pub fn severity_params() -> SeverityParams {
    SeverityParams::lognormal(2_000_f64.ln() - 0.5, 1.0)
}

/// Build a `Simulation` that never writes artifacts.
pub fn build_simulation(scenario: &Scenario, seed: u64) -> Simulation {
    let config = SimulationConfig {
        seed,
        n_sim: scenario.n_sim,
        save_output: false,
        ..SimulationConfig::canonical()
    };
    Simulation::from_params(config, frequency_params(scenario), severity_params())
        .expect("benchmark parameters are valid")
}
