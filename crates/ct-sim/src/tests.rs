//! Integration tests for ct-sim.

use std::collections::HashSet;

use ct_agent::{Greedy, VehicleStatus, WeightedRandom};
use ct_core::{Coord, Direction, LightState, SimConfig, Tick, VehicleId};
use ct_grid::{DirectionLists, LightDef, OccupiesCell, Topology, TopologyConfig, WatchDef};

use crate::{EventLog, NoopObserver, Sim, SimBuilder, SimError, SimObserver, Snapshot, TickEvent, VehicleSpec};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_ticks: u64, seed: u64) -> SimConfig {
    SimConfig {
        total_ticks,
        seed,
        vehicle_count:           0,
        snapshot_interval_ticks: 0,
    }
}

fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

fn coords(list: &[(i32, i32)]) -> Vec<Coord> {
    list.iter().map(|&p| Coord::from(p)).collect()
}

/// 8×8 open town: every non-building cell allows all eight directions, a
/// 2×2 block of buildings in the middle, sixteen parking spots, four light
/// groups in two adjacent pairs, and one congestion watch.
///
/// ```text
///   y
///   7  P  .  .  .  P  P  .  P
///   6  .  P  N  E  .  .  P  .
///   5  P  .  N  .  .  .  .  .
///   4  .  .  .  #  #  .  .  P
///   3  P  .  .  #  #  .  W  .
///   2  .  .  w  .  .  S  .  P      w = watch cell (exit right)
///   1  .  P  .  .  .  .  P  .
///   0  P  .  P  P  .  .  .  P
///      0  1  2  3  4  5  6  7  x
/// ```
fn town_config() -> TopologyConfig {
    let buildings = coords(&[(3, 3), (4, 3), (3, 4), (4, 4)]);
    let mut directions = DirectionLists::default();
    let open: Vec<Coord> = (0..8)
        .flat_map(|y| (0..8).map(move |x| Coord::new(x, y)))
        .filter(|p| !buildings.contains(p))
        .collect();
    for dir in Direction::ALL {
        *directions.get_mut(dir) = open.clone();
    }
    TopologyConfig {
        width: 8,
        height: 8,
        parking: coords(&[
            (0, 0), (7, 0), (0, 7), (7, 7), (0, 3), (7, 4), (3, 0), (4, 7),
            (6, 6), (1, 6), (1, 1), (6, 1), (0, 5), (7, 2), (5, 7), (2, 0),
        ]),
        buildings,
        traffic_lights: vec![
            LightDef {
                lanes:     coords(&[(2, 5), (2, 6)]),
                monitored: coords(&[(1, 5), (1, 6), (2, 5), (2, 6)]),
                group:     Some("north".into()),
                ..LightDef::default()
            },
            LightDef {
                lanes:     coords(&[(3, 6)]),
                monitored: coords(&[(3, 6), (3, 7)]),
                group:     Some("east".into()),
                ..LightDef::default()
            },
            LightDef {
                lanes:         coords(&[(5, 2)]),
                initial_state: LightState::Green,
                monitored:     coords(&[(5, 1), (5, 2), (6, 2)]),
                group:         Some("south".into()),
            },
            LightDef {
                lanes:     coords(&[(6, 3)]),
                monitored: coords(&[(6, 3), (6, 4)]),
                group:     Some("west".into()),
                ..LightDef::default()
            },
        ],
        directions,
        congestion_watches: vec![WatchDef {
            cell:      c(2, 2),
            direction: Direction::Right,
            area:      coords(&[(3, 2), (4, 2), (5, 2)]),
            threshold: 1,
        }],
    }
}

fn town_sim(seed: u64, vehicles: usize) -> Sim<WeightedRandom> {
    let topology = Topology::from_config(&town_config()).unwrap();
    let config = SimConfig { vehicle_count: vehicles, ..test_config(60, seed) };
    SimBuilder::new(config, topology, WeightedRandom::default()).build().unwrap()
}

/// 5×5 crossing.  Horizontal street y = 2 moving right, vertical street
/// x = 2 moving up.  Light "h" at (1,2) watches the horizontal approach,
/// light "v" at (2,1) the vertical one.
fn crossing() -> Topology {
    let mut directions = DirectionLists::default();
    directions.right = (0..5).map(|x| c(x, 2)).collect();
    directions.up = (0..5).map(|y| c(2, y)).collect();
    Topology::from_config(&TopologyConfig {
        width: 5,
        height: 5,
        parking: coords(&[(0, 2), (4, 2), (2, 4), (2, 0)]),
        traffic_lights: vec![
            LightDef {
                lanes:     vec![c(1, 2)],
                monitored: coords(&[(0, 2), (1, 2)]),
                group:     Some("h".into()),
                ..LightDef::default()
            },
            LightDef {
                lanes:     vec![c(2, 1)],
                monitored: coords(&[(2, 0), (2, 1)]),
                group:     Some("v".into()),
                ..LightDef::default()
            },
        ],
        directions,
        ..TopologyConfig::default()
    })
    .unwrap()
}

/// 6×3 grid with a single rightward street along y = 1 from A = (0,1) to
/// B = (5,1).
fn corridor() -> Topology {
    let mut directions = DirectionLists::default();
    directions.right = (0..6).map(|x| c(x, 1)).collect();
    Topology::from_config(&TopologyConfig {
        width: 6,
        height: 3,
        parking: coords(&[(0, 1), (5, 1)]),
        directions,
        ..TopologyConfig::default()
    })
    .unwrap()
}

/// Check every per-tick invariant that must hold after any tick.
fn assert_tick_invariants(sim: &Sim<WeightedRandom>, log: &EventLog, tick: Tick) {
    // No shared cells, nobody on a building, nobody parked in someone
    // else's spot, grid index in sync with vehicle positions.
    let mut seen = HashSet::new();
    for v in sim.fleet.vehicles() {
        let cell = v.cell();
        assert!(seen.insert(cell), "{tick}: two vehicles on {cell}");
        assert!(!sim.grid.is_building(cell), "{tick}: {} on building {cell}", v.id());
        if sim.grid.is_parking(cell) {
            assert!(
                cell == v.target() || (cell == v.spawn() && v.travelled() == 0),
                "{tick}: {} rests on foreign parking {cell}",
                v.id()
            );
        }
        assert_eq!(sim.grid.vehicle_at(cell), Some(v.id()));
    }

    // Every committed move followed an allowed direction.
    for event in log.tick_events(tick) {
        if let TickEvent::VehicleMoved { from, to, direction, .. } = *event {
            assert!(sim.graph.allowed(from).contains(direction), "{tick}: {direction} not allowed at {from}");
            assert_eq!(from.step(direction), to);
        }
    }

    // Siblings agree.
    for light in sim.lights.lights() {
        let state = ct_agent::SignalView::state_of(&sim.lights, light.id);
        for sibling in sim.lights.siblings(light.id) {
            assert_eq!(ct_agent::SignalView::state_of(&sim.lights, sibling), state);
        }
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn generated_population_uses_distinct_spots() {
        let sim = town_sim(7, 8);
        assert_eq!(sim.fleet.len(), 8);
        let mut used = HashSet::new();
        for v in sim.fleet.vehicles() {
            assert!(sim.parking.contains(v.spawn()));
            assert!(sim.parking.contains(v.target()));
            assert!(used.insert(v.spawn()));
            assert!(used.insert(v.target()));
            assert_eq!(sim.grid.vehicle_at(v.spawn()), Some(v.id()));
        }
    }

    #[test]
    fn generated_population_is_seed_deterministic() {
        let a = town_sim(3, 5);
        let b = town_sim(3, 5);
        let spots = |s: &Sim<WeightedRandom>| -> Vec<(Coord, Coord)> {
            s.fleet.vehicles().iter().map(|v| (v.spawn(), v.target())).collect()
        };
        assert_eq!(spots(&a), spots(&b));
    }

    #[test]
    fn insufficient_parking_errors() {
        let topology = Topology::from_config(&town_config()).unwrap();
        let config = SimConfig { vehicle_count: 9, ..test_config(10, 0) };
        let result = SimBuilder::new(config, topology, WeightedRandom::default()).build();
        assert!(matches!(
            result,
            Err(SimError::InsufficientParking { requested: 9, available: 16 })
        ));
    }

    #[test]
    fn huge_vehicle_count_is_insufficient_parking() {
        let topology = Topology::from_config(&town_config()).unwrap();
        let requested = usize::MAX / 2 + 1;
        let config = SimConfig { vehicle_count: requested, ..test_config(10, 0) };
        let result = SimBuilder::new(config, topology, WeightedRandom::default()).build();
        assert!(matches!(
            result,
            Err(SimError::InsufficientParking { requested: r, available: 16 }) if r == requested
        ));
    }

    #[test]
    fn invalid_explicit_vehicles_error() {
        let cases = [
            VehicleSpec::new(c(9, 9), c(4, 2)),
            VehicleSpec::new(c(1, 2), c(3, 2)),
            VehicleSpec::new(c(4, 2), c(4, 2)),
        ];
        for spec in cases {
            let result = SimBuilder::new(test_config(1, 0), crossing(), Greedy).vehicles(vec![spec]).build();
            assert!(matches!(result, Err(SimError::InvalidVehicle { index: 0, .. })), "{spec:?}");
        }

        let shared = vec![VehicleSpec::new(c(0, 2), c(4, 2)), VehicleSpec::new(c(0, 2), c(2, 4))];
        let result = SimBuilder::new(test_config(1, 0), crossing(), Greedy).vehicles(shared).build();
        assert!(matches!(result, Err(SimError::InvalidVehicle { index: 1, .. })));
    }

    #[test]
    fn vehicle_count_conflict_errors() {
        let config = SimConfig { vehicle_count: 3, ..test_config(1, 0) };
        let result = SimBuilder::new(config, crossing(), Greedy)
            .vehicles(vec![VehicleSpec::new(c(0, 2), c(4, 2))])
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn topology_errors_convert() {
        let mut cfg = town_config();
        cfg.traffic_lights[0].lanes.push(c(8, 0));
        let err: SimError = Topology::from_config(&cfg).unwrap_err().into();
        assert!(matches!(err, SimError::Grid(ct_grid::GridError::OutOfBounds { .. })));
    }

    #[test]
    fn lights_are_registered_in_grid() {
        let sim = town_sim(0, 0);
        assert_eq!(sim.lights.len(), 5);
        assert!(sim.grid.light_at(c(2, 6)).is_some());
        assert_eq!(sim.light_state("south"), Some(LightState::Green));
        assert_eq!(sim.light_state("nowhere"), None);
    }
}

// ── Invariants over many seeds ────────────────────────────────────────────────

#[cfg(test)]
mod invariant_tests {
    use super::*;

    #[test]
    fn invariants_hold_every_tick() {
        for seed in 0..40 {
            let mut sim = town_sim(seed, 8);
            let mut log = EventLog::new();
            for _ in 0..60 {
                let tick = sim.tick;
                sim.run_ticks(1, &mut log);
                assert_tick_invariants(&sim, &log, tick);
            }
        }
    }

    #[test]
    fn arrived_vehicles_never_move_again() {
        for seed in 0..40 {
            let mut sim = town_sim(seed, 8);
            let mut log = EventLog::new();
            sim.run(&mut log);

            let mut arrived: HashSet<VehicleId> = HashSet::new();
            for (_, event) in &log.events {
                match *event {
                    TickEvent::VehicleArrived { vehicle, at } => {
                        assert!(arrived.insert(vehicle), "seed {seed}: {vehicle} arrived twice");
                        assert_eq!(at, sim.fleet.get(vehicle).unwrap().target());
                    }
                    TickEvent::VehicleMoved { vehicle, .. } | TickEvent::VehicleBlocked { vehicle, .. } => {
                        assert!(!arrived.contains(&vehicle), "seed {seed}: {vehicle} acted after arriving");
                    }
                    _ => {}
                }
            }
            for v in sim.fleet.vehicles() {
                assert_eq!(arrived.contains(&v.id()), v.status() == VehicleStatus::Arrived);
            }
        }
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = town_sim(11, 8);
        let mut b = town_sim(11, 8);
        a.run(&mut NoopObserver);
        b.run(&mut NoopObserver);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn summaries_match_events() {
        let mut sim = town_sim(5, 8);
        let mut log = EventLog::new();
        sim.run_ticks(20, &mut log);
        assert_eq!(log.summaries.len(), 20);
        for summary in &log.summaries {
            let moved = log
                .tick_events(summary.tick)
                .filter(|e| matches!(e, TickEvent::VehicleMoved { .. }))
                .count();
            let changes = log
                .tick_events(summary.tick)
                .filter(|e| matches!(e, TickEvent::LightChanged { .. }))
                .count();
            assert_eq!(summary.moved, moved);
            assert_eq!(summary.light_changes, changes);
        }
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn occupied_approach_gets_green_empty_one_idles() {
        for seed in 0..50 {
            let mut sim = SimBuilder::new(test_config(1, seed), crossing(), WeightedRandom::default())
                .vehicles(vec![
                    VehicleSpec::new(c(0, 2), c(4, 2)),
                    VehicleSpec::new(c(1, 2), c(2, 4)),
                ])
                .build()
                .unwrap();
            sim.step();
            assert_eq!(sim.light_state("h"), Some(LightState::Green), "seed {seed}");
            assert_eq!(sim.light_state("v"), Some(LightState::Idle), "seed {seed}");
        }
    }

    #[test]
    fn monotone_path_takes_exactly_n_ticks() {
        const N: u64 = 5;
        for seed in 0..20 {
            let mut sim = SimBuilder::new(test_config(N, seed), corridor(), WeightedRandom::default())
                .vehicles(vec![VehicleSpec::new(c(0, 1), c(5, 1))])
                .build()
                .unwrap();
            sim.run_ticks(N - 1, &mut NoopObserver);
            let v = &sim.fleet.vehicles()[0];
            assert!(v.is_active());
            assert_eq!(v.cell(), c(4, 1));

            sim.step();
            let v = &sim.fleet.vehicles()[0];
            assert_eq!(v.status(), VehicleStatus::Arrived);
            assert_eq!(v.cell(), c(5, 1));
            assert_eq!(v.travelled(), N as u32);
        }
    }

    #[test]
    fn converging_vehicles_one_moves() {
        let mut directions = DirectionLists::default();
        directions.right = vec![c(0, 1)];
        directions.up = vec![c(1, 0)];
        let topology = Topology::from_config(&TopologyConfig {
            width: 3,
            height: 3,
            parking: coords(&[(2, 1), (1, 2)]),
            directions,
            ..TopologyConfig::default()
        })
        .unwrap();

        for seed in 0..30 {
            let mut sim = SimBuilder::new(test_config(1, seed), topology.clone(), WeightedRandom::default())
                .vehicles(vec![
                    VehicleSpec::new(c(0, 1), c(2, 1)),
                    VehicleSpec::new(c(1, 0), c(1, 2)),
                ])
                .build()
                .unwrap();
            let summary = sim.step();
            assert_eq!(summary.moved, 1, "seed {seed}");
            assert_eq!(summary.blocked, 1, "seed {seed}");
            assert!(sim.grid.vehicle_at(c(1, 1)).is_some());
        }
    }

    #[test]
    fn congestion_watch_toggles() {
        let mut cfg = town_config();
        cfg.congestion_watches[0].threshold = 0;
        let topology = Topology::from_config(&cfg).unwrap();
        let mut sim = SimBuilder::new(test_config(1, 1), topology, WeightedRandom::default())
            .vehicles(vec![VehicleSpec::new(c(4, 2), c(0, 0))])
            .build()
            .unwrap();

        let mut log = EventLog::new();
        sim.run_ticks(1, &mut log);
        assert_eq!(
            log.events.first().map(|(_, e)| *e),
            Some(TickEvent::WatchToggled { cell: c(2, 2), direction: Direction::Right, closed: true })
        );
        // Whether or not the vehicle left the area, the graph matches the
        // watch's verdict at the start of the tick.
        assert!(!sim.graph.is_allowed(c(2, 2), Direction::Right));
    }
}

// ── Snapshot & observer ───────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot_tests {
    use super::*;

    fn two_car_crossing() -> Sim<Greedy> {
        SimBuilder::new(test_config(10, 0), crossing(), Greedy)
            .vehicles(vec![VehicleSpec::new(c(0, 2), c(4, 2)), VehicleSpec::new(c(1, 2), c(2, 4))])
            .build()
            .unwrap()
    }

    #[test]
    fn snapshot_is_idempotent() {
        let mut sim = two_car_crossing();
        sim.step();
        assert_eq!(sim.snapshot(), sim.snapshot());
    }

    #[test]
    fn json_shape() {
        let sim = two_car_crossing();
        let json = sim.snapshot().to_json().unwrap();
        assert_eq!(
            json,
            r#"{"vehicles":[{"x":0,"y":2},{"x":1,"y":2}],"trafficLights":{"h":"red","v":"red"}}"#
        );
    }

    #[test]
    fn arrived_vehicles_stay_in_snapshot() {
        let mut sim = SimBuilder::new(test_config(10, 0), corridor(), Greedy)
            .vehicles(vec![VehicleSpec::new(c(0, 1), c(5, 1))])
            .build()
            .unwrap();
        sim.run(&mut NoopObserver);
        let snap = sim.snapshot();
        assert_eq!(snap.vehicles.len(), 1);
        assert_eq!(snap.vehicles[0].coord(), c(5, 1));
        assert!(!snap.vehicles[0].active);
        assert!(snap.traffic_lights.is_empty());
    }

    #[derive(Default)]
    struct Counter {
        starts:    u64,
        snapshots: Vec<Tick>,
        ends:      Vec<Tick>,
    }

    impl SimObserver for Counter {
        fn on_tick_start(&mut self, _tick: Tick) {
            self.starts += 1;
        }
        fn on_snapshot(&mut self, tick: Tick, snapshot: &Snapshot) {
            assert_eq!(snapshot.vehicles.len(), 2);
            self.snapshots.push(tick);
        }
        fn on_sim_end(&mut self, final_tick: Tick) {
            self.ends.push(final_tick);
        }
    }

    #[test]
    fn run_stops_at_end_tick_and_snapshots_on_interval() {
        let mut sim = two_car_crossing();
        sim.config.total_ticks = 5;
        sim.config.snapshot_interval_ticks = 2;
        let mut obs = Counter::default();
        sim.run(&mut obs);

        assert_eq!(obs.starts, 5);
        assert_eq!(obs.snapshots, [Tick(0), Tick(2), Tick(4)]);
        assert_eq!(obs.ends, [Tick(5)]);
        assert!(sim.is_finished());

        // Already finished: run is a no-op apart from on_sim_end.
        sim.run(&mut obs);
        assert_eq!(obs.starts, 5);
    }
}
