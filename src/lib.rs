//! Aggregate annual loss simulation.
//!
//! Combines a fitted claim-frequency model with a fitted claim-severity model
//! in a Monte Carlo over simulated policy years, then reduces the resulting
//! loss distribution to mean, standard deviation, VaR and TVaR.

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod error;
pub mod fitting;
pub mod frequency;
pub mod output;
pub mod severity;
pub mod simulation;
pub mod types;

pub use analysis::{RiskMetrics, SummaryRecord, summarize};
pub use config::{FallbackSeverityConfig, SimulationConfig};
pub use error::{Error, FitError, Result};
pub use fitting::{FixedParams, JsonParamFiles, ParameterSource};
pub use simulation::{Simulation, SimulationRun, run_simulation};
pub use types::{FrequencyModel, FrequencyParams, SeverityModel, SeverityParams};
