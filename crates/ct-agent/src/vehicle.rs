//! Vehicles and the per-turn movement rule.
//!
//! # One vehicle turn
//!
//! ```text
//! Arrived already?                    → Inactive
//! On a destination cell, moved ≥ 1?   → Arrived
//! Red light on own cell?              → Blocked(Signal)
//! candidates = graph.allowed(cell)
//! loop:
//!   candidates empty / policy gives up → Blocked(NoLegalMove)
//!   dest is someone else's parking?    → drop that direction, retry
//! dest holds a vehicle?               → Blocked(Occupied)
//! move, then re-check arrival          → Moved { arrived }
//! ```
//!
//! The semaphore gate runs before any direction is chosen, so a vehicle held
//! at a red light consumes no randomness.

use ct_core::{AgentRng, Coord, VehicleId};
use ct_grid::{DirectionGraph, Grid, Occupant, OccupiesCell};

use crate::{BlockReason, NavContext, NavigationPolicy, SignalView, VehicleTurn};

// ── Vehicle ───────────────────────────────────────────────────────────────────

/// Trip lifecycle.  `Arrived` is terminal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum VehicleStatus {
    #[default]
    Active,
    Arrived,
}

/// One vehicle.  Its position is mirrored in the `Grid` occupancy index;
/// only [`Vehicle::turn`] moves it, and it moves both together.
#[derive(Clone, Debug)]
pub struct Vehicle {
    id:        VehicleId,
    cell:      Coord,
    spawn:     Coord,
    target:    Coord,
    travelled: u32,
    status:    VehicleStatus,
}

impl Vehicle {
    pub fn new(id: VehicleId, spawn: Coord, target: Coord) -> Self {
        Self {
            id,
            cell: spawn,
            spawn,
            target,
            travelled: 0,
            status: VehicleStatus::Active,
        }
    }

    #[inline]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    #[inline]
    pub fn spawn(&self) -> Coord {
        self.spawn
    }

    #[inline]
    pub fn target(&self) -> Coord {
        self.target
    }

    /// Cells moved so far.
    #[inline]
    pub fn travelled(&self) -> u32 {
        self.travelled
    }

    #[inline]
    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == VehicleStatus::Active
    }

    /// Any parking cell except the spawn, once the vehicle has moved.
    ///
    /// Non-target parking cells are never legal destinations, so in practice
    /// this only ever fires on the target.
    fn at_destination(&self, grid: &Grid) -> bool {
        self.travelled > 0 && self.cell != self.spawn && grid.is_parking(self.cell)
    }

    /// Run one turn against the live grid.
    pub fn turn<P, S>(
        &mut self,
        rng:     &mut AgentRng,
        grid:    &mut Grid,
        graph:   &DirectionGraph,
        signals: &S,
        policy:  &P,
    ) -> VehicleTurn
    where
        P: NavigationPolicy + ?Sized,
        S: SignalView + ?Sized,
    {
        if !self.is_active() {
            return VehicleTurn::Inactive;
        }
        // Guard only: a move onto the destination already marks the vehicle
        // arrived, so a vehicle reaching here active is never at its target.
        if self.at_destination(grid) {
            self.status = VehicleStatus::Arrived;
            return VehicleTurn::Arrived;
        }

        if let Some(light) = grid.light_at(self.cell) {
            if !signals.state_of(light).is_go() {
                return VehicleTurn::Blocked(BlockReason::Signal);
            }
        }

        let mut candidates = graph.allowed(self.cell);
        let (direction, dest) = loop {
            if candidates.is_empty() {
                return VehicleTurn::Blocked(BlockReason::NoLegalMove);
            }
            let ctx = NavContext {
                vehicle: self.id,
                cell: self.cell,
                target: self.target,
                candidates,
                grid: &*grid,
            };
            let Some(dir) = policy.choose(&ctx, rng) else {
                return VehicleTurn::Blocked(BlockReason::NoLegalMove);
            };
            if !candidates.contains(dir) {
                log::warn!("{}: policy chose {dir}, which is not a candidate", self.id);
                return VehicleTurn::Blocked(BlockReason::NoLegalMove);
            }
            let dest = self.cell.step(dir);
            if grid.is_parking(dest) && dest != self.target {
                candidates.remove(dir);
                continue;
            }
            break (dir, dest);
        };

        if grid.vehicle_at(dest).is_some() {
            return VehicleTurn::Blocked(BlockReason::Occupied);
        }

        let from = self.cell;
        grid.move_vehicle(self.id, from, dest);
        self.cell = dest;
        self.travelled += 1;

        let arrived = self.at_destination(grid);
        if arrived {
            self.status = VehicleStatus::Arrived;
        }
        VehicleTurn::Moved { from, to: dest, direction, arrived }
    }
}

impl OccupiesCell for Vehicle {
    #[inline]
    fn cell(&self) -> Coord {
        self.cell
    }

    #[inline]
    fn occupant(&self) -> Occupant {
        Occupant::Vehicle(self.id)
    }
}

// ── Fleet ─────────────────────────────────────────────────────────────────────

/// All vehicles plus one deterministic RNG per vehicle.
///
/// The RNGs sit in their own `Vec` so a turn can borrow a vehicle and its RNG
/// mutably at the same time.  `VehicleId` is the index into both.
pub struct Fleet {
    seed:     u64,
    vehicles: Vec<Vehicle>,
    rngs:     Vec<AgentRng>,
}

impl Fleet {
    /// An empty fleet whose vehicles will seed their RNGs from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { seed, vehicles: Vec::new(), rngs: Vec::new() }
    }

    /// Add a vehicle at `spawn` heading for `target`.  Does not touch the
    /// grid; place it with [`Grid::place`] afterwards.
    pub fn push(&mut self, spawn: Coord, target: Coord) -> VehicleId {
        let id = VehicleId(self.vehicles.len() as u32);
        self.vehicles.push(Vehicle::new(id, spawn, target));
        self.rngs.push(AgentRng::new(self.seed, id));
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    #[inline]
    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id.index())
    }

    /// Vehicles in `VehicleId` order.
    #[inline]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn ids(&self) -> impl Iterator<Item = VehicleId> + '_ {
        (0..self.vehicles.len() as u32).map(VehicleId)
    }

    pub fn active_count(&self) -> usize {
        self.vehicles.iter().filter(|v| v.is_active()).count()
    }

    /// Run vehicle `id`'s turn.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in this fleet.
    pub fn turn<P, S>(
        &mut self,
        id:      VehicleId,
        grid:    &mut Grid,
        graph:   &DirectionGraph,
        signals: &S,
        policy:  &P,
    ) -> VehicleTurn
    where
        P: NavigationPolicy + ?Sized,
        S: SignalView + ?Sized,
    {
        let i = id.index();
        self.vehicles[i].turn(&mut self.rngs[i], grid, graph, signals, policy)
    }
}
