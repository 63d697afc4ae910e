//! The `Sim` struct and its tick loop.

use ct_agent::{AgentRef, Fleet, LightPool, NavigationPolicy, VehicleTurn};
use ct_core::{GroupId, LightState, SimConfig, SimRng, Tick};
use ct_grid::{CongestionWatch, DirectionGraph, Grid, OccupiesCell, ParkingSet};

use crate::{NoopObserver, SimObserver, Snapshot, TickEvent, TickSummary, VehiclePosition};

/// Group name → `GroupId`.
#[cfg(not(feature = "fx-hash"))]
pub(crate) type NameIndex = std::collections::HashMap<String, GroupId>;
#[cfg(feature = "fx-hash")]
pub(crate) type NameIndex = rustc_hash::FxHashMap<String, GroupId>;

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each tick:
///
/// 1. **Watches**: congestion watches close or restore their directions.
/// 2. **Roster**: every vehicle (arrived ones included) and every light
///    instance, as [`AgentRef`]s.
/// 3. **Shuffle**: the roster is shuffled with the simulation RNG.
/// 4. **Turns**: each agent acts once, in roster order, against the shared
///    grid.  Later turns see earlier moves; that is how contested cells are
///    resolved.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: NavigationPolicy> {
    /// Global configuration (total ticks, seed, vehicle count, …).
    pub config: SimConfig,

    /// The next tick to be simulated.
    pub tick: Tick,

    /// Cell flags and the occupancy index.  Every agent is registered here.
    pub grid: Grid,

    /// Allowed exits per cell, including congestion closures.
    pub graph: DirectionGraph,

    pub parking: ParkingSet,

    /// Vehicles and their per-vehicle RNGs.
    pub fleet: Fleet,

    /// Light instances and group state.
    pub lights: LightPool,

    pub watches: Vec<CongestionWatch>,

    /// Direction chooser shared by every vehicle.
    pub policy: P,

    /// Roster shuffles.
    pub(crate) rng: SimRng,

    pub(crate) group_index: NameIndex,

    /// Reused roster buffer.
    pub(crate) roster: Vec<AgentRef>,
}

impl<P: NavigationPolicy> Sim<P> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Advance one tick with no observer.
    pub fn step(&mut self) -> TickSummary {
        self.advance(&mut NoopObserver)
    }

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        while self.tick < self.config.end_tick() {
            self.advance(observer);
        }
        observer.on_sim_end(self.tick);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.advance(observer);
        }
    }

    /// Current positions and light states.  Pure read.
    pub fn snapshot(&self) -> Snapshot {
        let vehicles = self
            .fleet
            .vehicles()
            .iter()
            .map(|v| {
                let c = v.cell();
                VehiclePosition { x: c.x, y: c.y, active: v.is_active() }
            })
            .collect();
        let traffic_lights = self
            .lights
            .groups()
            .map(|(_, name, state)| (name.to_owned(), state))
            .collect();
        Snapshot { vehicles, traffic_lights }
    }

    /// `true` once `config.total_ticks` ticks have run.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.tick >= self.config.end_tick()
    }

    pub fn active_vehicles(&self) -> usize {
        self.fleet.active_count()
    }

    pub fn group_by_name(&self, name: &str) -> Option<GroupId> {
        self.group_index.get(name).copied()
    }

    /// State of the light group called `name`.
    pub fn light_state(&self, name: &str) -> Option<LightState> {
        self.group_by_name(name).map(|g| self.lights.group_state(g))
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn advance<O: SimObserver>(&mut self, observer: &mut O) -> TickSummary {
        let now = self.tick;
        observer.on_tick_start(now);
        let summary = self.process_tick(now, observer);
        observer.on_tick_end(now, &summary);

        let interval = self.config.snapshot_interval_ticks;
        if interval > 0 && now.0 % interval == 0 {
            observer.on_snapshot(now, &self.snapshot());
        }

        self.tick = now.next();
        summary
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> TickSummary {
        let mut summary = TickSummary { tick: now, ..TickSummary::default() };

        // ── Phase 1: congestion feedback ──────────────────────────────────
        for watch in &self.watches {
            let was_open = self.graph.is_allowed(watch.cell, watch.direction);
            let closed = watch.apply(&self.grid, &mut self.graph);
            if was_open == closed && self.graph.base_allowed(watch.cell).contains(watch.direction) {
                observer.on_event(now, &TickEvent::WatchToggled {
                    cell:      watch.cell,
                    direction: watch.direction,
                    closed,
                });
            }
        }

        // ── Phase 2: roster ───────────────────────────────────────────────
        let mut roster = std::mem::take(&mut self.roster);
        roster.clear();
        roster.extend(self.fleet.ids().map(AgentRef::Vehicle));
        roster.extend(self.lights.ids().map(AgentRef::Light));

        // ── Phase 3: shuffle ──────────────────────────────────────────────
        self.rng.shuffle(&mut roster);

        // ── Phase 4: turns ────────────────────────────────────────────────
        for &agent in &roster {
            match agent {
                AgentRef::Vehicle(id) => {
                    let turn = self.fleet.turn(id, &mut self.grid, &self.graph, &self.lights, &self.policy);
                    let at = self.fleet.vehicles()[id.index()].cell();
                    match turn {
                        VehicleTurn::Inactive => {}
                        VehicleTurn::Arrived => {
                            summary.arrived += 1;
                            observer.on_event(now, &TickEvent::VehicleArrived { vehicle: id, at });
                        }
                        VehicleTurn::Moved { from, to, direction, arrived } => {
                            summary.moved += 1;
                            observer.on_event(now, &TickEvent::VehicleMoved { vehicle: id, from, to, direction });
                            if arrived {
                                summary.arrived += 1;
                                observer.on_event(now, &TickEvent::VehicleArrived { vehicle: id, at });
                            }
                        }
                        VehicleTurn::Blocked(reason) => {
                            summary.blocked += 1;
                            observer.on_event(now, &TickEvent::VehicleBlocked { vehicle: id, at, reason });
                        }
                    }
                }
                AgentRef::Light(id) => {
                    for change in self.lights.turn(id, &self.grid) {
                        summary.light_changes += 1;
                        observer.on_event(now, &TickEvent::LightChanged { light: id, change });
                    }
                }
            }
        }
        self.roster = roster;

        summary.active_vehicles = self.fleet.active_count();
        log::trace!(
            "{now}: moved {} blocked {} arrived {} light changes {} active {}",
            summary.moved,
            summary.blocked,
            summary.arrived,
            summary.light_changes,
            summary.active_vehicles,
        );
        summary
    }
}
