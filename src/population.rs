//! The live vehicle set.

use crate::config::SceneConfig;
use crate::geometry::{Direction, LaneGeometry};
use crate::lane::Lane;
use crate::motion::SpacingModel;
use crate::snapshot::TypeCounts;
use crate::vehicle::factory::VehicleFactory;
use crate::vehicle::{Vehicle, VehicleType};
use crate::util::Interval;
use crate::{VehicleId, VehicleSet};
use log::trace;
use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

/// Owns every live vehicle and the per-lane ordering of them.
pub struct Population {
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// The lanes, indexed by lane number.
    lanes: Vec<Lane>,
    /// Builds new vehicles.
    factory: VehicleFactory,
    /// The number of vehicles scattered into each lane when seeding.
    seed_count: Interval<usize>,
    /// The per-tick occupancy target range.
    spawn_target: Interval<usize>,
    /// The per-tick spawn gate.
    spawn_gate: Bernoulli,
    /// Distance of the spawn point beyond the upstream edge.
    spawn_margin: f64,
    /// Required clearance around the spawn point.
    spawn_clearance: f64,
    /// Distance past the downstream edge at which vehicles retire.
    exit_margin: f64,
}

impl Population {
    /// Creates an empty population with lanes laid out for `geometry`.
    pub fn new(config: &SceneConfig, geometry: &LaneGeometry) -> Self {
        let spawn_gate =
            Bernoulli::new(config.spawn_probability).expect("Invalid spawn probability");
        Self {
            vehicles: VehicleSet::with_key(),
            lanes: Self::layout(geometry),
            factory: VehicleFactory::new(config),
            seed_count: config.seed_count,
            spawn_target: config.spawn_target,
            spawn_gate,
            spawn_margin: config.spawn_margin,
            spawn_clearance: config.spawn_clearance,
            exit_margin: config.exit_margin,
        }
    }

    fn layout(geometry: &LaneGeometry) -> Vec<Lane> {
        (0..geometry.lane_count())
            .map(|i| Lane::new(i, geometry.direction(i)))
            .collect()
    }

    /// The vehicles being simulated.
    pub fn vehicles(&self) -> &VehicleSet {
        &self.vehicles
    }

    /// The lanes, indexed by lane number.
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// The total number of live vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Removes every vehicle and lays the lanes out again for `geometry`.
    pub fn reset(&mut self, geometry: &LaneGeometry) {
        self.vehicles.clear();
        self.lanes = Self::layout(geometry);
    }

    /// Scatters a random number of vehicles across each lane.
    pub fn seed(&mut self, rng: &mut impl Rng, geometry: &LaneGeometry) {
        for lane in 0..self.lanes.len() {
            let count = self.seed_count.sample(rng);
            if count == 0 {
                continue;
            }
            let spacing = geometry.width() / count as f64;
            for i in 0..count {
                let jitter = rng.gen::<f64>() * spacing * 0.5;
                let x = match geometry.direction(lane) {
                    Direction::Forward => i as f64 * spacing + jitter,
                    Direction::Backward => geometry.width() - i as f64 * spacing - jitter,
                };
                self.spawn(rng, geometry, lane, Some(x));
            }
        }
    }

    /// Removes every vehicle whose front has passed the downstream exit margin.
    /// Returns the number of vehicles removed.
    pub fn retire(&mut self, geometry: &LaneGeometry) -> usize {
        let mut retired = 0;
        for lane in &mut self.lanes {
            let index = lane.index();
            let vehicles = &self.vehicles;
            let margin = self.exit_margin;
            let exited = lane.drain_where(|id| {
                geometry.is_past_exit(index, vehicles[id].pos_front(), margin)
            });
            for id in exited {
                trace!("retired vehicle {:?} from lane {}", id, index);
                self.vehicles.remove(id);
                retired += 1;
            }
        }
        retired
    }

    /// Gives each lane a chance to spawn a vehicle at its upstream edge.
    /// Returns the number of vehicles spawned.
    pub fn replenish(&mut self, rng: &mut impl Rng, geometry: &LaneGeometry) -> usize {
        let mut spawned = 0;
        for lane in 0..self.lanes.len() {
            let target = self.spawn_target.sample(rng);
            if self.lanes[lane].len() >= target || !self.spawn_gate.sample(rng) {
                continue;
            }
            let spawn_x = geometry.upstream_x(lane, self.spawn_margin);
            if self.lanes[lane].is_clear(&self.vehicles, spawn_x, self.spawn_clearance) {
                let id = self.spawn(rng, geometry, lane, None);
                trace!("spawned vehicle {:?} in lane {}", id, lane);
                spawned += 1;
            }
        }
        spawned
    }

    /// Advances every vehicle by one tick, lane by lane.
    pub fn advance(&mut self, model: &SpacingModel) {
        for lane in &mut self.lanes {
            model.advance_lane(lane, &mut self.vehicles);
        }
    }

    /// Counts the live vehicles of each type.
    pub fn counts(&self) -> TypeCounts {
        self.vehicles.values().map(Vehicle::kind).collect()
    }

    /// Adds a vehicle of a random type to a lane.
    pub fn spawn(
        &mut self,
        rng: &mut impl Rng,
        geometry: &LaneGeometry,
        lane: usize,
        x: Option<f64>,
    ) -> VehicleId {
        let factory = &self.factory;
        let id = self
            .vehicles
            .insert_with_key(|id| factory.create(rng, id, geometry, lane, x));
        self.lanes[lane].insert_vehicle(&self.vehicles, id);
        id
    }

    /// Adds a vehicle of the given type to a lane.
    pub fn insert(
        &mut self,
        rng: &mut impl Rng,
        geometry: &LaneGeometry,
        kind: VehicleType,
        lane: usize,
        x: Option<f64>,
    ) -> VehicleId {
        let factory = &self.factory;
        let id = self
            .vehicles
            .insert_with_key(|id| factory.build(rng, id, kind, geometry, lane, x));
        self.lanes[lane].insert_vehicle(&self.vehicles, id);
        id
    }

    /// Removes a vehicle from the population.
    pub fn remove(&mut self, id: VehicleId) -> Option<Vehicle> {
        let vehicle = self.vehicles.remove(id)?;
        self.lanes[vehicle.lane()].remove_vehicle(id);
        Some(vehicle)
    }
}
