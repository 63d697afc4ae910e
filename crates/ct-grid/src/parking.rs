//! The parking set: every spawn and target cell a vehicle may use.

use std::collections::HashSet;

use ct_core::Coord;

/// Ordered set of parking cells, fixed at construction.
///
/// Order is the order the topology listed them in; the spawn/target draw in
/// `ct-sim` indexes into it, so the order is part of seed determinism.
#[derive(Clone, Debug, Default)]
pub struct ParkingSet {
    spots:  Vec<Coord>,
    lookup: HashSet<Coord>,
}

impl ParkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `c`.  Returns `false` (and changes nothing) if it is already present.
    pub fn insert(&mut self, c: Coord) -> bool {
        if !self.lookup.insert(c) {
            return false;
        }
        self.spots.push(c);
        true
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        self.lookup.contains(&c)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Spots in listing order.
    #[inline]
    pub fn as_slice(&self) -> &[Coord] {
        &self.spots
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.spots.iter().copied()
    }
}
