//! downtown — demo for the rust_ct grid traffic simulator.
//!
//! Drives a handful of vehicles around a 12×12 downtown block with one
//! signalised junction, writes CSV output to `output/downtown/`, and prints
//! the final snapshot as JSON.
//!
//! ```text
//! cargo run -p downtown                 # built-in map
//! cargo run -p downtown -- map.json     # any topology JSON file
//! cargo run -p downtown -- --dump-map   # print the built-in map as JSON
//! RUST_LOG=debug cargo run -p downtown  # build-time decisions
//! ```

mod map;


use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use ct_agent::WeightedRandom;
use ct_core::{SimConfig, Tick};
use ct_grid::Topology;
use ct_output::{CsvWriter, OutputWriter, SimOutputObserver};
use ct_sim::{SimBuilder, SimObserver, Snapshot, TickEvent, TickSummary};

// ── Constants ─────────────────────────────────────────────────────────────────

const VEHICLE_COUNT:           usize = 6;
const SEED:                    u64   = 42;
const TOTAL_TICKS:             u64   = 200;
const SNAPSHOT_INTERVAL_TICKS: u64   = 10;
const OUTPUT_DIR:              &str  = "output/downtown";

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    snapshots:     usize,
    summary_rows:  usize,
    arrivals:      usize,
    light_changes: usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, snapshots: 0, summary_rows: 0, arrivals: 0, light_changes: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_event(&mut self, tick: Tick, event: &TickEvent) {
        match event {
            TickEvent::VehicleArrived { vehicle, at } => {
                self.arrivals += 1;
                log::info!("{tick}: {vehicle} parked at {at}");
            }
            TickEvent::LightChanged { .. } => self.light_changes += 1,
            TickEvent::WatchToggled { cell, direction, closed } => {
                log::info!("{tick}: {cell} {direction} {}", if *closed { "closed" } else { "reopened" });
            }
            _ => {}
        }
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        self.summary_rows += 1;
        self.inner.on_tick_end(tick, summary);
    }

    fn on_snapshot(&mut self, tick: Tick, snapshot: &Snapshot) {
        self.snapshots += 1;
        self.inner.on_snapshot(tick, snapshot);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--dump-map") {
        println!("{}", serde_json::to_string_pretty(&map::downtown())?);
        return Ok(());
    }

    println!("=== downtown — rust_ct traffic simulation ===");
    println!("Vehicles: {VEHICLE_COUNT}  |  Ticks: {TOTAL_TICKS}  |  Seed: {SEED}");
    println!();

    // 1. Map.
    let topology = match &arg {
        Some(path) => Topology::load_json(Path::new(path)).with_context(|| format!("loading map {path}"))?,
        None => Topology::from_config(&map::downtown())?,
    };
    println!(
        "Map: {}×{}, {} parking spots, {} lights in {} groups",
        topology.grid.width(),
        topology.grid.height(),
        topology.parking.len(),
        topology.light_count(),
        topology.groups.len(),
    );

    // 2. Sim.
    let config = SimConfig {
        total_ticks:             TOTAL_TICKS,
        seed:                    SEED,
        vehicle_count:           VEHICLE_COUNT,
        snapshot_interval_ticks: SNAPSHOT_INTERVAL_TICKS,
    };
    let mut sim = SimBuilder::new(config, topology, WeightedRandom::default()).build()?;

    // 3. Output.
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer));

    // 4. Run.
    let t0 = Instant::now();
    sim.run(&mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  arrivals            : {} of {}", obs.arrivals, sim.fleet.len());
    println!("  light changes       : {}", obs.light_changes);
    println!("  snapshots written   : {}", obs.snapshots);
    println!("  tick_summaries.csv  : {} rows", obs.summary_rows);
    println!();

    println!("{}", sim.snapshot().to_json_pretty()?);
    Ok(())
}
