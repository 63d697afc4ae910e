//! Integration tests for ct-output.

#[cfg(test)]
mod csv_tests {
    use ct_core::LightState;
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{LightSnapshotRow, TickSummaryRow, VehicleSnapshotRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn vehicle_row(vehicle_id: u32, tick: u64) -> VehicleSnapshotRow {
        VehicleSnapshotRow { tick, vehicle_id, x: vehicle_id as i32, y: 2, active: vehicle_id != 1 }
    }

    fn summary_row(tick: u64) -> TickSummaryRow {
        TickSummaryRow { tick, moved: 4, blocked: 1, arrived: 0, light_changes: 2, active_vehicles: 5 }
    }

    fn headers(path: std::path::PathBuf) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("vehicle_snapshots.csv").exists());
        assert!(dir.path().join("light_snapshots.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_creates_missing_dir() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("a");
        let mut w = CsvWriter::new(&nested).unwrap();
        w.finish().unwrap();
        assert!(nested.join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(headers(dir.path().join("vehicle_snapshots.csv")), ["tick", "vehicle_id", "x", "y", "active"]);
        assert_eq!(headers(dir.path().join("light_snapshots.csv")), ["tick", "light", "state"]);
        assert_eq!(
            headers(dir.path().join("tick_summaries.csv")),
            ["tick", "moved", "blocked", "arrived", "light_changes", "active_vehicles"]
        );
    }

    #[test]
    fn csv_vehicle_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_vehicles(&[vehicle_row(0, 5), vehicle_row(1, 5), vehicle_row(2, 5)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "5"); // tick
        assert_eq!(&rows[1][1], "1"); // vehicle_id
        assert_eq!(&rows[2][2], "2"); // x
        assert_eq!(&rows[0][4], "1"); // active
        assert_eq!(&rows[1][4], "0");
    }

    #[test]
    fn csv_light_rows_use_lowercase_state() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_lights(&[
            LightSnapshotRow { tick: 3, light: "sema_0".into(), state: LightState::Green },
            LightSnapshotRow { tick: 3, light: "sema_1".into(), state: LightState::Idle },
        ])
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("light_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "sema_0");
        assert_eq!(&rows[0][2], "green");
        assert_eq!(&rows[1][2], "idle");
    }

    #[test]
    fn csv_tick_summary_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        let fields: Vec<&str> = rows[0].iter().collect();
        assert_eq!(fields, ["3", "4", "1", "0", "2", "5"]);
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batches_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_vehicles(&[]).unwrap();
        w.write_lights(&[]).unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use std::collections::BTreeMap;

    use ct_core::{LightState, Tick};
    use ct_sim::{SimObserver, Snapshot, TickSummary, VehiclePosition};

    use crate::row::{LightSnapshotRow, TickSummaryRow, VehicleSnapshotRow};
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult, SimOutputObserver};

    /// Records every row in memory; optionally fails every summary write.
    #[derive(Default)]
    struct Recorder {
        vehicles:       Vec<VehicleSnapshotRow>,
        lights:         Vec<LightSnapshotRow>,
        summaries:      Vec<TickSummaryRow>,
        finishes:       usize,
        fail_summaries: bool,
    }

    impl OutputWriter for Recorder {
        fn write_vehicles(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()> {
            self.vehicles.extend_from_slice(rows);
            Ok(())
        }

        fn write_lights(&mut self, rows: &[LightSnapshotRow]) -> OutputResult<()> {
            self.lights.extend_from_slice(rows);
            Ok(())
        }

        fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
            if self.fail_summaries {
                let msg = format!("summary {}", row.tick);
                return Err(OutputError::Io(std::io::Error::other(msg)));
            }
            self.summaries.push(*row);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finishes += 1;
            Ok(())
        }
    }

    fn snapshot() -> Snapshot {
        let mut traffic_lights = BTreeMap::new();
        traffic_lights.insert("west".to_owned(), LightState::Red);
        traffic_lights.insert("east".to_owned(), LightState::Green);
        Snapshot {
            vehicles: vec![
                VehiclePosition { x: 1, y: 0, active: true },
                VehiclePosition { x: 4, y: 2, active: false },
            ],
            traffic_lights,
        }
    }

    #[test]
    fn snapshot_rows_numbered_in_vehicle_order() {
        let mut obs = SimOutputObserver::new(Recorder::default());
        obs.on_snapshot(Tick(7), &snapshot());
        let w = obs.into_writer();

        assert_eq!(w.vehicles.len(), 2);
        assert_eq!(w.vehicles[1], VehicleSnapshotRow { tick: 7, vehicle_id: 1, x: 4, y: 2, active: false });

        let names: Vec<&str> = w.lights.iter().map(|r| r.light.as_str()).collect();
        assert_eq!(names, ["east", "west"]);
        assert!(w.lights.iter().all(|r| r.tick == 7));
    }

    #[test]
    fn empty_snapshot_writes_nothing() {
        let mut obs = SimOutputObserver::new(Recorder::default());
        obs.on_snapshot(Tick(0), &Snapshot::default());
        let w = obs.into_writer();
        assert!(w.vehicles.is_empty());
        assert!(w.lights.is_empty());
    }

    #[test]
    fn first_error_is_kept() {
        let mut obs = SimOutputObserver::new(Recorder { fail_summaries: true, ..Recorder::default() });
        for t in 0..3 {
            obs.on_tick_end(Tick(t), &TickSummary { tick: Tick(t), ..TickSummary::default() });
        }
        let err = obs.take_error().expect("error stored");
        assert!(err.to_string().contains("summary 0"), "{err}");
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn sim_end_finishes_writer() {
        let mut obs = SimOutputObserver::new(Recorder::default());
        obs.on_sim_end(Tick(10));
        assert_eq!(obs.into_writer().finishes, 1);
    }
}

#[cfg(test)]
mod integration_tests {
    use ct_agent::WeightedRandom;
    use ct_core::{Coord, SimConfig};
    use ct_grid::{DirectionLists, Topology, TopologyConfig};
    use ct_sim::{SimBuilder, VehicleSpec};

    use crate::{CsvWriter, SimOutputObserver};

    /// One-lane street, four cells long, moving right.
    fn street() -> Topology {
        let mut directions = DirectionLists::default();
        directions.right = (0..4).map(|x| Coord::new(x, 0)).collect();
        Topology::from_config(&TopologyConfig {
            width: 4,
            height: 1,
            parking: vec![Coord::new(0, 0), Coord::new(3, 0)],
            directions,
            ..TopologyConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn sim_run_writes_every_tick() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimConfig {
            total_ticks:             5,
            seed:                    3,
            vehicle_count:           0,
            snapshot_interval_ticks: 1,
        };
        let mut sim = SimBuilder::new(config, street(), WeightedRandom::default())
            .vehicles(vec![VehicleSpec::new(Coord::new(0, 0), Coord::new(3, 0))])
            .build()
            .unwrap();

        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer);
        sim.run(&mut obs);
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let summaries: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(summaries.len(), 5);
        // The vehicle reaches (3,0) on tick 2.
        assert_eq!(&summaries[2][3], "1"); // arrived
        assert_eq!(&summaries[4][5], "0"); // active_vehicles

        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_snapshots.csv")).unwrap();
        let positions: Vec<(String, String, String)> = rdr
            .records()
            .map(|r| r.unwrap())
            .map(|r| (r[0].to_owned(), r[2].to_owned(), r[4].to_owned()))
            .collect();
        assert_eq!(positions.len(), 5);
        assert_eq!(positions[0], ("0".into(), "1".into(), "1".into()));
        assert_eq!(positions[4], ("4".into(), "3".into(), "0".into()));

        let mut rdr = csv::Reader::from_path(dir.path().join("light_snapshots.csv")).unwrap();
        assert_eq!(rdr.records().count(), 0);
    }
}
