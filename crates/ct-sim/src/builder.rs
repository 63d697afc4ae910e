//! Fluent builder for constructing a [`Sim`].

use std::collections::HashSet;

use ct_agent::{Fleet, LightPool, NavigationPolicy};
use ct_core::{Coord, SimConfig, SimRng, Tick};
use ct_grid::Topology;

use crate::sim::NameIndex;
use crate::{Sim, SimError, SimResult};

/// Stream offset of the spawn/target draw, so the draw never shares a
/// stream with the per-tick roster shuffles.
const SPAWN_STREAM: u64 = 1;

/// An explicitly placed vehicle.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct VehicleSpec {
    pub spawn:  Coord,
    pub target: Coord,
}

impl VehicleSpec {
    pub fn new(spawn: Coord, target: Coord) -> Self {
        Self { spawn, target }
    }
}

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, vehicle count, snapshot interval
/// - [`Topology`] — the validated map
/// - `P: NavigationPolicy` — usually [`ct_agent::WeightedRandom::default()`]
///
/// # Optional inputs
///
/// | Method           | Default                                                  |
/// |------------------|----------------------------------------------------------|
/// | `.vehicles(v)`   | `config.vehicle_count` vehicles drawn from parking spots |
///
/// # Example
///
/// ```rust,ignore
/// let topology = Topology::load_json(Path::new("map.json"))?;
/// let mut sim = SimBuilder::new(config, topology, WeightedRandom::default())
///     .build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<P: NavigationPolicy> {
    config:   SimConfig,
    topology: Topology,
    policy:   P,
    vehicles: Option<Vec<VehicleSpec>>,
}

impl<P: NavigationPolicy> SimBuilder<P> {
    pub fn new(config: SimConfig, topology: Topology, policy: P) -> Self {
        Self { config, topology, policy, vehicles: None }
    }

    /// Place vehicles explicitly instead of drawing them from the parking
    /// set.  `config.vehicle_count` must then be 0 or equal `specs.len()`.
    pub fn vehicles(mut self, specs: Vec<VehicleSpec>) -> Self {
        self.vehicles = Some(specs);
        self
    }

    /// Validate inputs, place every agent on the grid, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<P>> {
        let SimBuilder { config, topology, policy, vehicles } = self;
        let mut rng = SimRng::new(config.seed);

        // ── Resolve the vehicle population ────────────────────────────────
        let specs = match vehicles {
            Some(specs) => {
                if config.vehicle_count != 0 && config.vehicle_count != specs.len() {
                    return Err(SimError::Config(format!(
                        "vehicle_count is {} but {} vehicles were given explicitly",
                        config.vehicle_count,
                        specs.len()
                    )));
                }
                validate_specs(&specs, &topology)?;
                specs
            }
            None => draw_specs(config.vehicle_count, &topology, &mut rng.child(SPAWN_STREAM))?,
        };

        // ── Place agents ──────────────────────────────────────────────────
        let lights = LightPool::from_topology(&topology);
        let Topology { mut grid, graph, parking, watches, .. } = topology;
        lights.place_all(&mut grid)?;

        let mut fleet = Fleet::new(config.seed);
        for spec in &specs {
            fleet.push(spec.spawn, spec.target);
        }
        for vehicle in fleet.vehicles() {
            grid.place(vehicle)?;
        }

        let group_index: NameIndex = lights
            .groups()
            .map(|(g, name, _)| (name.to_owned(), g))
            .collect();

        log::debug!(
            "sim built: {} vehicles, {} lights in {} groups, {} watches, seed {}",
            fleet.len(),
            lights.len(),
            lights.group_count(),
            watches.len(),
            config.seed,
        );

        Ok(Sim {
            tick: Tick::ZERO,
            config,
            grid,
            graph,
            parking,
            fleet,
            lights,
            watches,
            policy,
            rng,
            group_index,
            roster: Vec::new(),
        })
    }
}

/// Draw spawn and target cells without replacement: the first `count`
/// sampled spots are spawns, the next `count` are targets.
fn draw_specs(count: usize, topology: &Topology, rng: &mut SimRng) -> SimResult<Vec<VehicleSpec>> {
    let spots = topology.parking.as_slice();
    if count > spots.len() / 2 {
        return Err(SimError::InsufficientParking { requested: count, available: spots.len() });
    }
    let picks = rand::seq::index::sample(rng.inner(), spots.len(), count * 2).into_vec();
    let (spawns, targets) = picks.split_at(count);
    Ok(spawns
        .iter()
        .zip(targets)
        .map(|(&s, &t)| VehicleSpec::new(spots[s], spots[t]))
        .collect())
}

fn validate_specs(specs: &[VehicleSpec], topology: &Topology) -> SimResult<()> {
    let grid = &topology.grid;
    let mut spawns: HashSet<Coord> = HashSet::with_capacity(specs.len());
    for (index, spec) in specs.iter().enumerate() {
        let invalid = |reason: String| Err(SimError::InvalidVehicle { index, reason });
        if !grid.contains(spec.spawn) {
            return invalid(format!("spawn {} is outside the grid", spec.spawn));
        }
        if grid.is_building(spec.spawn) {
            return invalid(format!("spawn {} is a building", spec.spawn));
        }
        if !topology.parking.contains(spec.target) {
            return invalid(format!("target {} is not a parking spot", spec.target));
        }
        if spec.target == spec.spawn {
            return invalid(format!("target {} is the spawn cell", spec.target));
        }
        if !spawns.insert(spec.spawn) {
            return invalid(format!("spawn {} is shared with another vehicle", spec.spawn));
        }
    }
    Ok(())
}
