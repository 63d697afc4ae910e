//! The cell grid and its occupancy index.
//!
//! # Data layout
//!
//! Cells are stored row-major in one `Vec<Cell>`:
//!
//! ```text
//! index(x, y) = y * width + x
//! ```
//!
//! Each cell carries its static layer flags (building / parking / monitored)
//! and a short list of occupant handles.  A cell holds at most one vehicle at
//! rest plus at most one light instance, so the occupant lists stay tiny and
//! a linear scan beats any map.
//!
//! The grid is bounded: coordinates outside `0..width × 0..height` are never
//! stored, and every query on them answers "nothing here".

use ct_core::{Coord, CtError, CtResult, LightId, VehicleId};

use crate::occupant::{Occupant, OccupiesCell};

// ── Cell ──────────────────────────────────────────────────────────────────────

/// One grid slot.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    pub building:  bool,
    pub parking:   bool,
    /// Part of at least one light's monitored zone.
    pub monitored: bool,
    occupants:     Vec<Occupant>,
}

impl Cell {
    /// All occupant handles currently in this cell.
    #[inline]
    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    pub fn vehicle(&self) -> Option<VehicleId> {
        self.occupants.iter().find_map(|o| match *o {
            Occupant::Vehicle(v) => Some(v),
            Occupant::Light(_)   => None,
        })
    }

    pub fn light(&self) -> Option<LightId> {
        self.occupants.iter().find_map(|o| match *o {
            Occupant::Light(l)   => Some(l),
            Occupant::Vehicle(_) => None,
        })
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Fixed-size 2-D cell set with per-cell occupancy.
///
/// The `Sim` owns the single `Grid`; agent turn functions receive it by
/// `&mut` and mutate it directly, so later agents in a tick see the moves of
/// earlier ones.
#[derive(Clone, Debug)]
pub struct Grid {
    width:  u32,
    height: u32,
    cells:  Vec<Cell>,
}

impl Grid {
    /// An empty grid: no buildings, no parking, no occupants.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && (c.x as u32) < self.width && (c.y as u32) < self.height
    }

    /// Row-major index of `c`, or `None` if it is off-grid.
    #[inline]
    pub fn index(&self, c: Coord) -> Option<usize> {
        self.contains(c)
            .then(|| c.y as usize * self.width as usize + c.x as usize)
    }

    /// Like [`index`](Self::index) but reports an off-grid coordinate as an error.
    pub fn try_index(&self, c: Coord) -> CtResult<usize> {
        self.index(c).ok_or(CtError::OutOfGrid(c))
    }

    /// Iterator over every in-bounds coordinate, row by row.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height as i32).flat_map(move |y| (0..self.width as i32).map(move |x| Coord::new(x, y)))
    }

    // ── Cell access ───────────────────────────────────────────────────────

    #[inline]
    pub fn cell(&self, c: Coord) -> Option<&Cell> {
        self.index(c).map(|i| &self.cells[i])
    }

    #[inline]
    fn cell_mut(&mut self, c: Coord) -> Option<&mut Cell> {
        let i = self.index(c)?;
        Some(&mut self.cells[i])
    }

    #[inline]
    pub fn is_building(&self, c: Coord) -> bool {
        self.cell(c).is_some_and(|cell| cell.building)
    }

    #[inline]
    pub fn is_parking(&self, c: Coord) -> bool {
        self.cell(c).is_some_and(|cell| cell.parking)
    }

    #[inline]
    pub fn is_monitored(&self, c: Coord) -> bool {
        self.cell(c).is_some_and(|cell| cell.monitored)
    }

    // ── Static layers (construction only) ─────────────────────────────────

    pub fn set_building(&mut self, c: Coord) -> CtResult<()> {
        let i = self.try_index(c)?;
        self.cells[i].building = true;
        Ok(())
    }

    pub fn set_parking(&mut self, c: Coord) -> CtResult<()> {
        let i = self.try_index(c)?;
        self.cells[i].parking = true;
        Ok(())
    }

    pub fn set_monitored(&mut self, c: Coord) -> CtResult<()> {
        let i = self.try_index(c)?;
        self.cells[i].monitored = true;
        Ok(())
    }

    // ── Occupancy queries ─────────────────────────────────────────────────

    /// The vehicle in `c`, if any.
    #[inline]
    pub fn vehicle_at(&self, c: Coord) -> Option<VehicleId> {
        self.cell(c).and_then(Cell::vehicle)
    }

    /// The light instance in `c`, if any.
    #[inline]
    pub fn light_at(&self, c: Coord) -> Option<LightId> {
        self.cell(c).and_then(Cell::light)
    }

    /// Light instances in the Moore neighbourhood of `c` (centre excluded),
    /// in the fixed neighbourhood order of [`Coord::moore`].
    pub fn lights_around(&self, c: Coord) -> impl Iterator<Item = LightId> + '_ {
        c.moore().filter_map(move |n| self.light_at(n))
    }

    /// Number of vehicles currently standing in `cells`.
    pub fn vehicle_count(&self, cells: &[Coord]) -> usize {
        cells.iter().filter(|&&c| self.vehicle_at(c).is_some()).count()
    }

    // ── Occupancy mutation ────────────────────────────────────────────────

    /// Put an agent's handle into its current cell.
    pub fn place<A: OccupiesCell>(&mut self, agent: &A) -> CtResult<()> {
        self.insert(agent.cell(), agent.occupant())
    }

    /// Insert `occupant` into cell `c`.
    pub fn insert(&mut self, c: Coord, occupant: Occupant) -> CtResult<()> {
        let cell = self.cell_mut(c).ok_or(CtError::OutOfGrid(c))?;
        cell.occupants.push(occupant);
        Ok(())
    }

    /// Remove `occupant` from cell `c`.  Returns `false` if it was not there.
    pub fn remove(&mut self, c: Coord, occupant: Occupant) -> bool {
        let Some(cell) = self.cell_mut(c) else {
            return false;
        };
        match cell.occupants.iter().position(|&o| o == occupant) {
            Some(pos) => {
                cell.occupants.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Move a vehicle handle from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if the vehicle is not in `from` or `to` is off-grid: both mean a
    /// vehicle's own position and the index have drifted apart, which is a
    /// programming error rather than a modelled condition.
    pub fn move_vehicle(&mut self, vehicle: VehicleId, from: Coord, to: Coord) {
        let handle = Occupant::Vehicle(vehicle);
        assert!(
            self.remove(from, handle),
            "{vehicle} is not in {from}; occupancy index out of sync"
        );
        let cell = self
            .cell_mut(to)
            .unwrap_or_else(|| panic!("{vehicle} moved off-grid to {to}"));
        cell.occupants.push(handle);
    }
}
