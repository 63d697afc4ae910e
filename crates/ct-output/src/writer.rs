//! The `OutputWriter` trait implemented by all backend writers.

use crate::{LightSnapshotRow, OutputResult, TickSummaryRow, VehicleSnapshotRow};

/// Trait implemented by output backends.
///
/// [`SimOutputObserver`][crate::SimOutputObserver] keeps the first error a
/// writer returns; read it with
/// [`take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of vehicle positions.
    fn write_vehicles(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()>;

    /// Write a batch of light group states.
    fn write_lights(&mut self, rows: &[LightSnapshotRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
