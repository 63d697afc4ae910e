//! City topology: the serde-facing map description and its validated form.
//!
//! [`TopologyConfig`] mirrors the JSON map file field for field.
//! [`Topology::from_config`] checks it against the grid bounds and the static
//! layers, then produces the [`Grid`], [`DirectionGraph`], [`ParkingSet`],
//! light groups and congestion watches the simulation runs on.
//!
//! Validation fails fast on the first problem.  The only tolerated defect is
//! an off-grid coordinate in a direction list, which is dropped with a
//! warning because hand-drawn maps routinely run a street one cell past the
//! edge.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use ct_core::{Coord, Direction, GroupId, LightState};

use crate::directions::{CongestionWatch, DirectionGraph, DirectionGraphBuilder};
use crate::error::{GridError, GridResult};
use crate::grid::Grid;
use crate::parking::ParkingSet;

// ── Serde configuration ───────────────────────────────────────────────────────

/// The map as written in a topology JSON file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub width:  u32,
    pub height: u32,
    #[serde(default)]
    pub buildings: Vec<Coord>,
    #[serde(default)]
    pub parking: Vec<Coord>,
    #[serde(default)]
    pub traffic_lights: Vec<LightDef>,
    #[serde(default)]
    pub directions: DirectionLists,
    #[serde(default)]
    pub congestion_watches: Vec<WatchDef>,
}

/// One traffic-light definition: a set of lane cells sharing a monitored zone.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LightDef {
    /// One light instance is created per lane cell.
    pub lanes: Vec<Coord>,
    #[serde(default)]
    pub initial_state: LightState,
    #[serde(default)]
    pub monitored: Vec<Coord>,
    /// Group name.  Definitions with the same name form one group.
    /// Defaults to `sema_<index>`.
    #[serde(default)]
    pub group: Option<String>,
}

/// Per-direction lists of cells a vehicle may leave in that direction.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionLists {
    pub up:         Vec<Coord>,
    pub down:       Vec<Coord>,
    pub left:       Vec<Coord>,
    pub right:      Vec<Coord>,
    pub up_left:    Vec<Coord>,
    pub up_right:   Vec<Coord>,
    pub down_left:  Vec<Coord>,
    pub down_right: Vec<Coord>,
}

impl DirectionLists {
    pub fn get(&self, dir: Direction) -> &[Coord] {
        match dir {
            Direction::Up        => &self.up,
            Direction::Down      => &self.down,
            Direction::Left      => &self.left,
            Direction::Right     => &self.right,
            Direction::UpLeft    => &self.up_left,
            Direction::UpRight   => &self.up_right,
            Direction::DownLeft  => &self.down_left,
            Direction::DownRight => &self.down_right,
        }
    }

    pub fn get_mut(&mut self, dir: Direction) -> &mut Vec<Coord> {
        match dir {
            Direction::Up        => &mut self.up,
            Direction::Down      => &mut self.down,
            Direction::Left      => &mut self.left,
            Direction::Right     => &mut self.right,
            Direction::UpLeft    => &mut self.up_left,
            Direction::UpRight   => &mut self.up_right,
            Direction::DownLeft  => &mut self.down_left,
            Direction::DownRight => &mut self.down_right,
        }
    }
}

/// A congestion-feedback rule as written in the map file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WatchDef {
    pub cell:      Coord,
    pub direction: Direction,
    pub area:      Vec<Coord>,
    #[serde(default = "default_threshold")]
    pub threshold: usize,
}

fn default_threshold() -> usize {
    CongestionWatch::DEFAULT_THRESHOLD
}

// ── Validated topology ────────────────────────────────────────────────────────

/// A named group of sibling light instances.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightGroup {
    pub name:          String,
    pub initial_state: LightState,
    /// Lane cells, one light instance each, in definition order.
    pub lanes:         Vec<Coord>,
    /// Monitored zone shared by every instance of the group.
    pub monitored:     Vec<Coord>,
}

/// A validated map, ready to hand to the simulation builder.
///
/// All fields are `pub` for direct access by the builder.  Do not construct
/// directly; use [`Topology::from_config`] or one of the JSON loaders.
#[derive(Clone, Debug)]
pub struct Topology {
    /// Static layers (buildings, parking, monitored).  No occupants yet.
    pub grid:    Grid,
    pub graph:   DirectionGraph,
    pub parking: ParkingSet,
    /// Indexed by `GroupId`.
    pub groups:  Vec<LightGroup>,
    pub watches: Vec<CongestionWatch>,
}

impl Topology {
    /// Validate `config` and build the runtime structures.
    pub fn from_config(config: &TopologyConfig) -> GridResult<Topology> {
        let (width, height) = (config.width, config.height);
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }
        let mut grid = Grid::new(width, height);

        // ── Static layers ─────────────────────────────────────────────────
        for &c in &config.buildings {
            check_bounds(&grid, "building", c)?;
            grid.set_building(c)?;
        }

        let mut parking = ParkingSet::new();
        for &c in &config.parking {
            check_bounds(&grid, "parking spot", c)?;
            if grid.is_building(c) {
                return Err(GridError::ParkingOnBuilding(c));
            }
            if !parking.insert(c) {
                return Err(GridError::DuplicateParking(c));
            }
            grid.set_parking(c)?;
        }

        // ── Lights ────────────────────────────────────────────────────────
        let mut groups: Vec<LightGroup> = Vec::new();
        let mut by_name: HashMap<String, GroupId> = HashMap::new();
        let mut lane_cells: HashSet<Coord> = HashSet::new();

        for (i, def) in config.traffic_lights.iter().enumerate() {
            if def.lanes.is_empty() {
                return Err(GridError::LightWithoutLanes(i));
            }
            for &c in &def.lanes {
                check_bounds(&grid, "traffic light lane", c)?;
                if grid.is_building(c) {
                    return Err(GridError::LightOnBuilding(c));
                }
                if !lane_cells.insert(c) {
                    return Err(GridError::LightCellTaken(c));
                }
            }
            for &c in &def.monitored {
                check_bounds(&grid, "monitored cell", c)?;
                grid.set_monitored(c)?;
            }

            let name = def.group.clone().unwrap_or_else(|| format!("sema_{i}"));
            let g = match by_name.get(&name) {
                Some(&g) => {
                    let first = groups[g.index()].initial_state;
                    if first != def.initial_state {
                        return Err(GridError::ConflictingInitialState {
                            group: name,
                            first,
                            second: def.initial_state,
                        });
                    }
                    g
                }
                None => {
                    let g = GroupId(groups.len() as u32);
                    by_name.insert(name.clone(), g);
                    groups.push(LightGroup {
                        name,
                        initial_state: def.initial_state,
                        lanes:         Vec::new(),
                        monitored:     Vec::new(),
                    });
                    g
                }
            };
            let group = &mut groups[g.index()];
            group.lanes.extend_from_slice(&def.lanes);
            for &c in &def.monitored {
                if !group.monitored.contains(&c) {
                    group.monitored.push(c);
                }
            }
        }

        // ── Direction graph ───────────────────────────────────────────────
        let mut builder = DirectionGraphBuilder::new(&grid);
        for dir in Direction::ALL {
            builder.allow_all(config.directions.get(dir), dir);
        }
        if builder.ignored() > 0 {
            log::warn!(
                "topology: ignored {} off-grid direction coordinates on a {width}x{height} grid",
                builder.ignored()
            );
        }
        let graph = builder.build();

        // ── Congestion watches ────────────────────────────────────────────
        let watches = config
            .congestion_watches
            .iter()
            .map(|w| {
                check_bounds(&grid, "congestion watch cell", w.cell)?;
                for &c in &w.area {
                    check_bounds(&grid, "congestion watch area", c)?;
                }
                Ok(CongestionWatch {
                    cell:      w.cell,
                    direction: w.direction,
                    area:      w.area.clone(),
                    threshold: w.threshold,
                })
            })
            .collect::<GridResult<Vec<_>>>()?;

        log::debug!(
            "topology: {width}x{height}, {} buildings, {} parking, {} light groups ({} lanes), {} live cells, {} watches",
            config.buildings.len(),
            parking.len(),
            groups.len(),
            lane_cells.len(),
            graph.live_cells(),
            watches.len(),
        );

        Ok(Topology { grid, graph, parking, groups, watches })
    }

    /// Every light instance as `(group, lane cell)`, group by group.  The
    /// position in this sequence is the instance's `LightId`.
    pub fn light_instances(&self) -> impl Iterator<Item = (GroupId, Coord)> + '_ {
        self.groups.iter().enumerate().flat_map(|(g, group)| {
            group.lanes.iter().map(move |&c| (GroupId(g as u32), c))
        })
    }

    pub fn light_count(&self) -> usize {
        self.groups.iter().map(|g| g.lanes.len()).sum()
    }
}

fn check_bounds(grid: &Grid, what: &'static str, coord: Coord) -> GridResult<()> {
    if grid.contains(coord) {
        Ok(())
    } else {
        Err(GridError::OutOfBounds {
            what,
            coord,
            width: grid.width(),
            height: grid.height(),
        })
    }
}
