use crate::config::SceneConfig;
use crate::geometry::LaneGeometry;
use crate::motion::SpacingModel;
use crate::population::Population;
use crate::snapshot::{SceneSnapshot, TypeCounts};
use crate::vehicle::{Vehicle, VehicleType};
use crate::VehicleId;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A synthetic road scene.
///
/// The scene is advanced one frame at a time with [Simulation::tick], and
/// consumers read the result through [Simulation::snapshot].
pub struct Simulation {
    /// The scene parameters.
    config: SceneConfig,
    /// The lane layout for the current viewport.
    geometry: LaneGeometry,
    /// The vehicles being simulated.
    population: Population,
    /// The spacing rule applied to every lane.
    spacing: SpacingModel,
    /// The source of all randomness in the scene.
    rng: StdRng,
    /// The vehicle counts published by the last tick.
    counts: TypeCounts,
    /// The current frame of simulation.
    frame: usize,
}

impl Simulation {
    /// Creates a new simulation for a viewport and seeds it with vehicles.
    ///
    /// # Panics
    /// If the configuration is invalid.
    pub fn new(config: SceneConfig, width: f64, height: f64) -> Self {
        config.assert_valid();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let geometry = LaneGeometry::resolve(&config, width, height);
        let population = Population::new(&config, &geometry);
        let mut sim = Self {
            spacing: SpacingModel::new(&config.spacing),
            config,
            geometry,
            population,
            rng,
            counts: TypeCounts::default(),
            frame: 0,
        };
        sim.reseed();
        sim
    }

    /// Advances the simulation by one frame.
    pub fn tick(&mut self) {
        let retired = self.population.retire(&self.geometry);
        let spawned = self.population.replenish(&mut self.rng, &self.geometry);
        self.population.advance(&self.spacing);
        self.publish();
        self.frame += 1;
        if retired + spawned > 0 {
            debug!(
                "frame {}: {} retired, {} spawned, {} live",
                self.frame,
                retired,
                spawned,
                self.population.len()
            );
        }
    }

    /// Advances the simulation by `ticks` frames.
    pub fn advance(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Gets the state of the scene as of the last completed tick.
    pub fn snapshot(&self) -> SceneSnapshot<'_> {
        SceneSnapshot {
            frame: self.frame,
            geometry: &self.geometry,
            vehicles: self.population.vehicles(),
            lanes: self.population.lanes(),
            counts: self.counts,
        }
    }

    /// Recomputes the lane geometry for a new viewport size and reseeds the scene.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.geometry = LaneGeometry::resolve(&self.config, width, height);
        debug!(
            "resized to {}x{}, lane centres {:?}",
            self.geometry.width(),
            self.geometry.height(),
            self.geometry.centres()
        );
        self.reseed();
    }

    /// Discards every vehicle and seeds the scene again.
    pub fn restart(&mut self) {
        self.reseed();
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Gets the scene parameters.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Gets the current lane geometry.
    pub fn geometry(&self) -> &LaneGeometry {
        &self.geometry
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.population.vehicles().values()
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, vehicle_id: VehicleId) -> Option<&Vehicle> {
        self.population.vehicles().get(vehicle_id)
    }

    /// Adds a vehicle of the given type to a lane at horizontal position `x`,
    /// or at the lane's spawn edge if `x` is `None`.
    ///
    /// # Panics
    /// If `lane` is not a lane of the scene.
    pub fn add_vehicle(&mut self, kind: VehicleType, lane: usize, x: Option<f64>) -> VehicleId {
        assert!(lane < self.geometry.lane_count(), "Lane {} does not exist", lane);
        let id = self
            .population
            .insert(&mut self.rng, &self.geometry, kind, lane, x);
        self.publish();
        id
    }

    /// Removes a vehicle from the simulation.
    pub fn remove_vehicle(&mut self, vehicle_id: VehicleId) -> Option<Vehicle> {
        let vehicle = self.population.remove(vehicle_id);
        self.publish();
        vehicle
    }

    /// Removes every vehicle, leaving an empty road until vehicles spawn.
    pub fn clear(&mut self) {
        self.population.reset(&self.geometry);
        self.publish();
    }

    fn reseed(&mut self) {
        self.population.reset(&self.geometry);
        self.population.seed(&mut self.rng, &self.geometry);
        self.publish();
        debug!("seeded {} vehicles", self.population.len());
    }

    /// Recounts the live vehicles for consumers.
    fn publish(&mut self) {
        self.counts = self.population.counts();
    }
}
