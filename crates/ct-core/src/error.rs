//! Framework error type.
//!
//! Sub-crates define their own error enums (`GridError`, `SimError`, …) and
//! either convert `CtError` into them via `From` or wrap it as one variant.

use thiserror::Error;

use crate::Coord;

/// The top-level error type for `ct-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CtError {
    #[error("cell {0} is outside the grid")]
    OutOfGrid(Coord),
}

/// Shorthand result type for all `ct-*` crates.
pub type CtResult<T> = Result<T, CtError>;
