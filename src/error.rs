use std::path::PathBuf;

use thiserror::Error;

/// Failure of the upstream fitting stage. Always fatal to a run.
#[derive(Error, Debug)]
pub enum FitError {
    #[error("fitting collaborator unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read fitted parameters from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse fitted parameters in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fit(#[from] FitError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid fitted parameters: {0}")]
    InvalidParams(String),
    #[error("severity batch holds {actual} draws but {expected} claims were simulated")]
    SeverityBatch { expected: usize, actual: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
