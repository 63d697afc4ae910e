//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `vehicle_snapshots.csv` — `tick,vehicle_id,x,y,active`
//! - `light_snapshots.csv`   — `tick,light,state`
//! - `tick_summaries.csv`    — `tick,moved,blocked,arrived,light_changes,active_vehicles`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{LightSnapshotRow, OutputResult, TickSummaryRow, VehicleSnapshotRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    vehicles:  Writer<File>,
    lights:    Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open (or truncate) the three CSV files in it,
    /// and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut vehicles = Writer::from_path(dir.join("vehicle_snapshots.csv"))?;
        vehicles.write_record(["tick", "vehicle_id", "x", "y", "active"])?;

        let mut lights = Writer::from_path(dir.join("light_snapshots.csv"))?;
        lights.write_record(["tick", "light", "state"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "moved", "blocked", "arrived", "light_changes", "active_vehicles"])?;

        Ok(Self {
            vehicles,
            lights,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_vehicles(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.vehicles.write_record(&[
                row.tick.to_string(),
                row.vehicle_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                (row.active as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_lights(&mut self, rows: &[LightSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.lights.write_record([row.tick.to_string().as_str(), row.light.as_str(), row.state.as_str()])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.moved.to_string(),
            row.blocked.to_string(),
            row.arrived.to_string(),
            row.light_changes.to_string(),
            row.active_vehicles.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.vehicles.flush()?;
        self.lights.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
