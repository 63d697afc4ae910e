//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use ct_core::Tick;
use ct_sim::{SimObserver, Snapshot, TickSummary};

use crate::row::{LightSnapshotRow, TickSummaryRow, VehicleSnapshotRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes snapshots and tick summaries to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  `Sim::run` does this through `on_sim_end`; call it
    /// yourself after driving the sim with `run_ticks` or `step`.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        let row = TickSummaryRow {
            tick:            tick.0,
            moved:           summary.moved as u64,
            blocked:         summary.blocked as u64,
            arrived:         summary.arrived as u64,
            light_changes:   summary.light_changes as u64,
            active_vehicles: summary.active_vehicles as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, snapshot: &Snapshot) {
        let vehicles: Vec<VehicleSnapshotRow> = snapshot
            .vehicles
            .iter()
            .enumerate()
            .map(|(i, v)| VehicleSnapshotRow {
                tick:       tick.0,
                vehicle_id: i as u32,
                x:          v.x,
                y:          v.y,
                active:     v.active,
            })
            .collect();
        if !vehicles.is_empty() {
            let result = self.writer.write_vehicles(&vehicles);
            self.store_err(result);
        }

        let lights: Vec<LightSnapshotRow> = snapshot
            .traffic_lights
            .iter()
            .map(|(name, &state)| LightSnapshotRow { tick: tick.0, light: name.clone(), state })
            .collect();
        if !lights.is_empty() {
            let result = self.writer.write_lights(&lights);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
