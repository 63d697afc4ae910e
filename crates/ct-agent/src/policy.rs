//! Built-in navigation policies.

use rand::Rng;
use rand::distributions::WeightedIndex;

use ct_core::{AgentRng, Direction};

use crate::{NavContext, NavigationPolicy};

// ── UniformRandom ─────────────────────────────────────────────────────────────

/// Every candidate direction is equally likely.
#[derive(Copy, Clone, Debug, Default)]
pub struct UniformRandom;

impl NavigationPolicy for UniformRandom {
    fn choose(&self, ctx: &NavContext<'_>, rng: &mut AgentRng) -> Option<Direction> {
        let dirs: Vec<Direction> = ctx.candidates.iter().collect();
        rng.choose(&dirs).copied()
    }
}

// ── WeightedRandom ────────────────────────────────────────────────────────────

/// Random choice weighted by direction class.
///
/// Diagonals are lane changes and street corners; with the default weights a
/// vehicle cuts across only when it has to or about one time in ten.
#[derive(Copy, Clone, Debug)]
pub struct WeightedRandom {
    pub cardinal: f64,
    pub diagonal: f64,
}

impl WeightedRandom {
    pub const DEFAULT_CARDINAL: f64 = 1.0;
    pub const DEFAULT_DIAGONAL: f64 = 0.1;

    pub fn new(cardinal: f64, diagonal: f64) -> Self {
        Self { cardinal, diagonal }
    }

    #[inline]
    fn weight(&self, dir: Direction) -> f64 {
        if dir.is_diagonal() { self.diagonal } else { self.cardinal }
    }
}

impl Default for WeightedRandom {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CARDINAL, Self::DEFAULT_DIAGONAL)
    }
}

impl NavigationPolicy for WeightedRandom {
    fn choose(&self, ctx: &NavContext<'_>, rng: &mut AgentRng) -> Option<Direction> {
        let dirs: Vec<Direction> = ctx.candidates.iter().collect();
        // All-zero or negative weights: nothing can be picked.
        let dist = WeightedIndex::new(dirs.iter().map(|&d| self.weight(d))).ok()?;
        Some(dirs[rng.inner().sample(&dist)])
    }
}

// ── Greedy ────────────────────────────────────────────────────────────────────

/// Deterministic: the candidate whose destination is closest to the target
/// by Manhattan distance.  Ties go to the earliest direction in
/// [`Direction::ALL`] order.
#[derive(Copy, Clone, Debug, Default)]
pub struct Greedy;

impl NavigationPolicy for Greedy {
    fn choose(&self, ctx: &NavContext<'_>, _rng: &mut AgentRng) -> Option<Direction> {
        ctx.candidates
            .iter()
            .min_by_key(|&d| ctx.cell.step(d).manhattan(ctx.target))
    }
}
