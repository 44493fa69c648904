//! Spatial-subsystem error type.

use thiserror::Error;

use cr_core::{CoreError, Location};

/// Errors produced by `cr-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The location has no outgoing links in the street map.
    #[error("location {0} is not on the street map")]
    InvalidCoordinate(Location),

    #[error("no route from {from} to {to}")]
    NoRoute { from: Location, to: Location },

    #[error("search gave up after {expansions} node expansions")]
    ResourceExhausted { expansions: usize },

    #[error("malformed map data at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
