use thiserror::Error;

use ct_core::CtError;
use ct_grid::GridError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("topology error: {0}")]
    Grid(#[from] GridError),

    #[error("{requested} vehicles need {} parking spots, only {available} available", .requested.saturating_mul(2))]
    InsufficientParking { requested: usize, available: usize },

    #[error("vehicle {index}: {reason}")]
    InvalidVehicle { index: usize, reason: String },

    #[error(transparent)]
    Core(#[from] CtError),
}

pub type SimResult<T> = Result<T, SimError>;
