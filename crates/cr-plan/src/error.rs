use thiserror::Error;

use cr_core::CoreError;
use cr_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("malformed delivery data at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
