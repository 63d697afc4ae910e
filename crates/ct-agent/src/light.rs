//! Traffic lights and decentralised right-of-way negotiation.
//!
//! # Model
//!
//! Every lane cell of a light definition is one [`TrafficLight`] instance.
//! Instances sharing a `GroupId` are *siblings*; their state is stored once
//! per group, so siblings can never disagree.
//!
//! # One light turn
//!
//! ```text
//! own = vehicles in own group's monitored zone
//! own == 0                         → own group Idle, done
//! for each opposite (Moore order, other group):
//!     c = vehicles in opposite group's zone
//!     c <= own                     → own group Green,
//!                                    opposite group Red (Idle if c == 0)
//!     c >  own                     → untouched; it wins on its own turn
//! ```
//!
//! Siblings and opposites are recomputed from the grid on every turn.  There
//! is no fairness guarantee: a permanently busier approach can hold green
//! forever.

use ct_core::{Coord, CtResult, GroupId, LightId, LightState};
use ct_grid::{Grid, Occupant, OccupiesCell, Topology};

use crate::{LightChange, SignalView};

// ── TrafficLight ──────────────────────────────────────────────────────────────

/// One light instance, on one lane cell.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TrafficLight {
    pub id:    LightId,
    pub group: GroupId,
    pub cell:  Coord,
}

impl OccupiesCell for TrafficLight {
    #[inline]
    fn cell(&self) -> Coord {
        self.cell
    }

    #[inline]
    fn occupant(&self) -> Occupant {
        Occupant::Light(self.id)
    }
}

// ── LightPool ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct GroupState {
    name:      String,
    state:     LightState,
    monitored: Vec<Coord>,
    /// Group index: every instance carrying this `GroupId`.
    members:   Vec<LightId>,
}

/// Every light instance and every group's shared state.
///
/// `LightId` indexes `lights`; `GroupId` indexes the group table.
#[derive(Clone, Debug, Default)]
pub struct LightPool {
    lights: Vec<TrafficLight>,
    groups: Vec<GroupState>,
}

impl LightPool {
    /// One instance per lane cell, numbered in [`Topology::light_instances`]
    /// order, each group starting in its configured initial state.
    pub fn from_topology(topology: &Topology) -> Self {
        let mut groups: Vec<GroupState> = topology
            .groups
            .iter()
            .map(|g| GroupState {
                name:      g.name.clone(),
                state:     g.initial_state,
                monitored: g.monitored.clone(),
                members:   Vec::with_capacity(g.lanes.len()),
            })
            .collect();

        let lights = topology
            .light_instances()
            .enumerate()
            .map(|(i, (group, cell))| {
                let id = LightId(i as u32);
                groups[group.index()].members.push(id);
                TrafficLight { id, group, cell }
            })
            .collect();

        Self { lights, groups }
    }

    /// Register every instance in the grid occupancy index.
    pub fn place_all(&self, grid: &mut Grid) -> CtResult<()> {
        for light in &self.lights {
            grid.place(light)?;
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    #[inline]
    pub fn lights(&self) -> &[TrafficLight] {
        &self.lights
    }

    #[inline]
    pub fn light(&self, id: LightId) -> Option<&TrafficLight> {
        self.lights.get(id.index())
    }

    pub fn ids(&self) -> impl Iterator<Item = LightId> + '_ {
        (0..self.lights.len() as u32).map(LightId)
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn group_state(&self, group: GroupId) -> LightState {
        self.groups[group.index()].state
    }

    #[inline]
    pub fn group_name(&self, group: GroupId) -> &str {
        &self.groups[group.index()].name
    }

    /// Every instance of `group`, including the one asking.
    #[inline]
    pub fn members(&self, group: GroupId) -> &[LightId] {
        &self.groups[group.index()].members
    }

    /// `(group, name, state)` for every group, in `GroupId` order.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &str, LightState)> + '_ {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, g)| (GroupId(i as u32), g.name.as_str(), g.state))
    }

    /// Other instances sharing `id`'s group.
    pub fn siblings(&self, id: LightId) -> impl Iterator<Item = LightId> + '_ {
        let group = self.lights[id.index()].group;
        self.members(group).iter().copied().filter(move |&l| l != id)
    }

    /// Light instances of other groups in the Moore neighbourhood of `id`'s
    /// cell, in neighbourhood order.
    pub fn opposites<'a>(&'a self, id: LightId, grid: &'a Grid) -> impl Iterator<Item = LightId> + 'a {
        let TrafficLight { group, cell, .. } = self.lights[id.index()];
        grid.lights_around(cell)
            .filter(move |&l| self.lights[l.index()].group != group)
    }

    /// Vehicles currently in `group`'s monitored zone.
    pub fn monitored_count(&self, group: GroupId, grid: &Grid) -> usize {
        grid.vehicle_count(&self.groups[group.index()].monitored)
    }

    // ── Negotiation ───────────────────────────────────────────────────────

    /// Run light `id`'s turn.  Returns the group transitions it caused.
    pub fn turn(&mut self, id: LightId, grid: &Grid) -> Vec<LightChange> {
        let own_group = self.lights[id.index()].group;
        let own = self.monitored_count(own_group, grid);
        let mut changes = Vec::new();

        if own == 0 {
            self.set_group(own_group, LightState::Idle, &mut changes);
            return changes;
        }

        let opposites: Vec<LightId> = self.opposites(id, grid).collect();
        for opposite in opposites {
            let their_group = self.lights[opposite.index()].group;
            let theirs = self.monitored_count(their_group, grid);
            if theirs > own {
                continue;
            }
            self.set_group(own_group, LightState::Green, &mut changes);
            let yielded = if theirs == 0 { LightState::Idle } else { LightState::Red };
            self.set_group(their_group, yielded, &mut changes);
        }

        if !changes.is_empty() {
            log::trace!("{id} ({}) with {own} waiting: {changes:?}", self.group_name(own_group));
        }
        changes
    }

    fn set_group(&mut self, group: GroupId, to: LightState, changes: &mut Vec<LightChange>) {
        let slot = &mut self.groups[group.index()].state;
        if *slot != to {
            changes.push(LightChange { group, from: *slot, to });
            *slot = to;
        }
    }
}

impl SignalView for LightPool {
    #[inline]
    fn state_of(&self, light: LightId) -> LightState {
        self.group_state(self.lights[light.index()].group)
    }
}
