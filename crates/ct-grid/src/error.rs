//! Grid-subsystem error type.

use thiserror::Error;

use ct_core::{Coord, CtError, LightState};

/// Errors produced while building or loading a city topology.
///
/// All of these are fatal at construction: a simulation never starts on a
/// topology that failed validation.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: u32, height: u32 },

    #[error("{what} at {coord} is outside the {width}x{height} grid")]
    OutOfBounds {
        what:   &'static str,
        coord:  Coord,
        width:  u32,
        height: u32,
    },

    #[error("parking spot {0} is on a building cell")]
    ParkingOnBuilding(Coord),

    #[error("parking spot {0} is listed more than once")]
    DuplicateParking(Coord),

    #[error("traffic light lane {0} is on a building cell")]
    LightOnBuilding(Coord),

    #[error("traffic light lane {0} is already occupied by another light")]
    LightCellTaken(Coord),

    #[error("light group {group} starts {first} in one definition and {second} in another")]
    ConflictingInitialState {
        group:  String,
        first:  LightState,
        second: LightState,
    },

    #[error("traffic light {0} has no lane cells")]
    LightWithoutLanes(usize),

    #[error(transparent)]
    Core(#[from] CtError),

    #[error("topology JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GridResult<T> = Result<T, GridError>;
