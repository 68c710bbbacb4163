use super::{Vehicle, VehicleType};
use crate::config::SceneConfig;
use crate::geometry::{Direction, LaneGeometry};
use crate::util::{round1, Interval};
use crate::{Point2d, VehicleId};
use rand::seq::SliceRandom;
use rand::Rng;

/// Builds vehicles with randomised type, speed and confidence.
#[derive(Clone, Debug)]
pub struct VehicleFactory {
    /// The range of confidence scores.
    confidence: Interval<f64>,
    /// Distance beyond a full vehicle width at which spawned vehicles are placed.
    spawn_offset: f64,
}

impl VehicleFactory {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            confidence: config.confidence,
            spawn_offset: config.spawn_offset,
        }
    }

    /// Creates a vehicle of a type drawn from the weighted pool.
    ///
    /// If `x` is `None` the vehicle is placed just off-screen at its lane's upstream edge.
    pub fn create(
        &self,
        rng: &mut impl Rng,
        id: VehicleId,
        geometry: &LaneGeometry,
        lane: usize,
        x: Option<f64>,
    ) -> Vehicle {
        let kind = *VehicleType::POOL
            .choose(rng)
            .expect("Vehicle pool is not empty");
        self.build(rng, id, kind, geometry, lane, x)
    }

    /// Creates a vehicle of the given type.
    pub fn build(
        &self,
        rng: &mut impl Rng,
        id: VehicleId,
        kind: VehicleType,
        geometry: &LaneGeometry,
        lane: usize,
        x: Option<f64>,
    ) -> Vehicle {
        let bp = kind.blueprint();
        let dir = geometry.direction(lane);
        let speed = bp.speed.sample(rng);
        let confidence = round1(self.confidence.sample(rng));
        let hue = rng.gen_range(0..360);

        // The full width keeps even the rear half clear of the viewport
        let x = x.unwrap_or_else(|| match dir {
            Direction::Forward => -bp.width - self.spawn_offset,
            Direction::Backward => geometry.width() + bp.width + self.spawn_offset,
        });

        Vehicle {
            id,
            kind,
            lane,
            dir,
            pos: Point2d::new(x, geometry.centre(lane)),
            half_wid: 0.5 * bp.width,
            half_hgt: 0.5 * bp.height,
            vel: speed * dir.sign(),
            confidence,
            hue,
        }
    }
}
