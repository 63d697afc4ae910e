//! The direction graph: which way a vehicle may leave each cell.
//!
//! The graph constrains *departure*: `allowed(c)` lists the directions a
//! vehicle standing on `c` may move in.  It is built once from topology and
//! pruned so that no allowed direction ever points off-grid or into a
//! building.  The only runtime mutation is congestion feedback, which can
//! clear a watched direction and later restore it to its built value.

use ct_core::{Coord, Direction, DirectionSet};

use crate::Grid;

// ── DirectionGraph ────────────────────────────────────────────────────────────

/// Per-cell allowed-direction sets, indexed like [`Grid`] cells.
#[derive(Clone, Debug)]
pub struct DirectionGraph {
    width:   u32,
    height:  u32,
    /// Directions as built from topology.  Never mutated after `build`.
    base:    Vec<DirectionSet>,
    /// Directions in effect this tick (`base` minus congestion closures).
    current: Vec<DirectionSet>,
}

impl DirectionGraph {
    /// A graph with no allowed movement anywhere.
    pub fn empty(width: u32, height: u32) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            base:    vec![DirectionSet::EMPTY; n],
            current: vec![DirectionSet::EMPTY; n],
        }
    }

    #[inline]
    fn index(&self, c: Coord) -> Option<usize> {
        (c.x >= 0 && c.y >= 0 && (c.x as u32) < self.width && (c.y as u32) < self.height)
            .then(|| c.y as usize * self.width as usize + c.x as usize)
    }

    /// Directions a vehicle may currently leave `c` in.  Off-grid and dead
    /// cells return the empty set.
    #[inline]
    pub fn allowed(&self, c: Coord) -> DirectionSet {
        self.index(c).map_or(DirectionSet::EMPTY, |i| self.current[i])
    }

    /// Directions as built from topology, ignoring congestion closures.
    #[inline]
    pub fn base_allowed(&self, c: Coord) -> DirectionSet {
        self.index(c).map_or(DirectionSet::EMPTY, |i| self.base[i])
    }

    #[inline]
    pub fn is_allowed(&self, c: Coord, dir: Direction) -> bool {
        self.allowed(c).contains(dir)
    }

    /// Close `dir` at `c` (`closed = true`) or restore it to its base value.
    ///
    /// Restoring never opens a direction the topology did not allow.
    pub fn set_closed(&mut self, c: Coord, dir: Direction, closed: bool) {
        let Some(i) = self.index(c) else {
            return;
        };
        if closed || !self.base[i].contains(dir) {
            self.current[i].remove(dir);
        } else {
            self.current[i].insert(dir);
        }
    }

    /// Number of cells with at least one allowed direction.
    pub fn live_cells(&self) -> usize {
        self.current.iter().filter(|s| !s.is_empty()).count()
    }
}

// ── DirectionGraphBuilder ─────────────────────────────────────────────────────

/// Collect per-direction coordinate lists, then [`build`](Self::build)
/// against a grid to prune illegal exits.
///
/// # Example
///
/// ```
/// use ct_core::{Coord, Direction};
/// use ct_grid::{DirectionGraphBuilder, Grid};
///
/// let grid = Grid::new(3, 1);
/// let mut b = DirectionGraphBuilder::new(&grid);
/// b.allow(Coord::new(0, 0), Direction::Right);
/// b.allow(Coord::new(2, 0), Direction::Right); // off-grid exit, pruned
/// let graph = b.build();
/// assert!(graph.is_allowed(Coord::new(0, 0), Direction::Right));
/// assert!(graph.allowed(Coord::new(2, 0)).is_empty());
/// ```
pub struct DirectionGraphBuilder<'g> {
    grid:    &'g Grid,
    graph:   DirectionGraph,
    ignored: usize,
}

impl<'g> DirectionGraphBuilder<'g> {
    pub fn new(grid: &'g Grid) -> Self {
        Self {
            grid,
            graph:   DirectionGraph::empty(grid.width(), grid.height()),
            ignored: 0,
        }
    }

    /// Allow leaving `c` in direction `dir`.  Off-grid `c` is counted and
    /// ignored.
    pub fn allow(&mut self, c: Coord, dir: Direction) {
        match self.graph.index(c) {
            Some(i) => self.graph.base[i].insert(dir),
            None => self.ignored += 1,
        }
    }

    /// Allow `dir` on every cell of `cells`.
    pub fn allow_all(&mut self, cells: &[Coord], dir: Direction) {
        for &c in cells {
            self.allow(c, dir);
        }
    }

    /// Number of off-grid coordinates dropped so far.
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    /// Prune exits that leave the grid or enter a building, and freeze the
    /// result as both the base and the current direction sets.
    pub fn build(mut self) -> DirectionGraph {
        let grid = self.grid;
        let mut pruned = 0usize;
        for c in grid.coords() {
            let Some(i) = self.graph.index(c) else { continue };
            for dir in self.graph.base[i].iter() {
                let dest = c.step(dir);
                if !grid.contains(dest) || grid.is_building(dest) {
                    self.graph.base[i].remove(dir);
                    pruned += 1;
                }
            }
        }
        if pruned > 0 {
            log::debug!("direction graph: pruned {pruned} exits into buildings or off-grid");
        }
        self.graph.current = self.graph.base.clone();
        self.graph
    }
}

// ── Congestion feedback ───────────────────────────────────────────────────────

/// Closes one direction at one cell while a watched area is congested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CongestionWatch {
    /// Cell whose exit is controlled.
    pub cell:      Coord,
    /// Exit direction closed while congested.
    pub direction: Direction,
    /// Cells whose vehicles are counted.
    pub area:      Vec<Coord>,
    /// Congested when the vehicle count is strictly greater than this.
    pub threshold: usize,
}

impl CongestionWatch {
    /// Default congestion threshold (vehicles in the watched area).
    pub const DEFAULT_THRESHOLD: usize = 10;

    /// Re-evaluate this watch against the live grid.  Returns `true` if the
    /// direction is closed after the update.
    pub fn apply(&self, grid: &Grid, graph: &mut DirectionGraph) -> bool {
        let congested = grid.vehicle_count(&self.area) > self.threshold;
        graph.set_closed(self.cell, self.direction, congested);
        congested
    }
}
