use crate::geometry::Direction;
use crate::util::Interval;
use crate::{Point2d, VehicleId};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub(crate) mod factory;

/// The kinds of vehicle that appear in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VehicleType {
    Car,
    Truck,
    Bus,
    Motorcycle,
    Bicycle,
}

/// The static attributes of a vehicle type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blueprint {
    /// The length of the vehicle along the lane.
    pub width: f64,
    /// The extent of the vehicle across the lane.
    pub height: f64,
    /// The range of speed magnitudes, per tick.
    pub speed: Interval<f64>,
}

/// A simulated vehicle.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Vehicle {
    /// The vehicle's ID
    id: VehicleId,
    /// The vehicle type.
    kind: VehicleType,
    /// The lane the vehicle travels in.
    lane: usize,
    /// The direction of the vehicle's lane.
    dir: Direction,
    /// The centre of the vehicle.
    pos: Point2d,
    /// Half the vehicle's width.
    half_wid: f64,
    /// Half the vehicle's height.
    half_hgt: f64,
    /// The signed nominal displacement per tick.
    vel: f64,
    /// The detection confidence in percent.
    confidence: f64,
    /// Colour variation used when drawing the vehicle, in degrees.
    hue: u16,
}

impl VehicleType {
    /// All vehicle types.
    pub const ALL: [VehicleType; 5] = [
        VehicleType::Car,
        VehicleType::Truck,
        VehicleType::Bus,
        VehicleType::Motorcycle,
        VehicleType::Bicycle,
    ];

    /// The weighted draw pool. Repetition encodes weight.
    pub const POOL: [VehicleType; 13] = [
        VehicleType::Car,
        VehicleType::Car,
        VehicleType::Car,
        VehicleType::Car,
        VehicleType::Car,
        VehicleType::Car,
        VehicleType::Car,
        VehicleType::Truck,
        VehicleType::Truck,
        VehicleType::Bus,
        VehicleType::Motorcycle,
        VehicleType::Motorcycle,
        VehicleType::Bicycle,
    ];

    /// The position of this type within [VehicleType::ALL].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The static attributes of this type.
    pub fn blueprint(self) -> Blueprint {
        let (width, height, min, max) = match self {
            VehicleType::Car => (52.0, 28.0, 1.2, 2.8),
            VehicleType::Truck => (90.0, 36.0, 0.7, 1.4),
            VehicleType::Bus => (110.0, 38.0, 0.9, 1.5),
            VehicleType::Motorcycle => (30.0, 18.0, 1.8, 3.5),
            VehicleType::Bicycle => (22.0, 16.0, 0.5, 0.9),
        };
        Blueprint {
            width,
            height,
            speed: Interval::new(min, max),
        }
    }

    /// A human readable name.
    pub fn label(self) -> &'static str {
        match self {
            VehicleType::Car => "Car",
            VehicleType::Truck => "Truck",
            VehicleType::Bus => "Bus",
            VehicleType::Motorcycle => "Motorcycle",
            VehicleType::Bicycle => "Bicycle",
        }
    }
}

impl Vehicle {
    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The vehicle type.
    pub fn kind(&self) -> VehicleType {
        self.kind
    }

    /// The lane the vehicle travels in.
    pub fn lane(&self) -> usize {
        self.lane
    }

    /// The direction of travel.
    pub fn direction(&self) -> Direction {
        self.dir
    }

    /// The coordinates of the centre of the vehicle.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The horizontal position of the centre of the vehicle.
    pub fn x(&self) -> f64 {
        self.pos.x
    }

    /// The vertical position of the centre of the vehicle, always its lane's centre line.
    pub fn y(&self) -> f64 {
        self.pos.y
    }

    /// The vehicle's width along the lane.
    pub fn width(&self) -> f64 {
        2.0 * self.half_wid
    }

    /// The vehicle's height across the lane.
    pub fn height(&self) -> f64 {
        2.0 * self.half_hgt
    }

    /// The area of the vehicle's footprint.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// The signed displacement per tick at full speed.
    pub fn vel(&self) -> f64 {
        self.vel
    }

    /// The detection confidence in percent.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// The visual seed, a hue in degrees.
    pub fn hue(&self) -> u16 {
        self.hue
    }

    /// The horizontal position of the leading edge.
    pub fn pos_front(&self) -> f64 {
        self.pos.x + self.dir.sign() * self.half_wid
    }

    /// The horizontal position of the trailing edge.
    pub fn pos_rear(&self) -> f64 {
        self.pos.x - self.dir.sign() * self.half_wid
    }

    /// The clearance between this vehicle's front and the rear of `leader`,
    /// measured along the direction of travel. Negative when they overlap.
    pub fn gap_to(&self, leader: &Vehicle) -> f64 {
        self.dir.sign() * (leader.pos_rear() - self.pos_front())
    }

    /// Moves the vehicle by a fraction of its nominal velocity.
    pub(crate) fn advance(&mut self, factor: f64) {
        self.pos.x += self.vel * factor;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pool_weights() {
        let count = |kind| VehicleType::POOL.iter().filter(|k| **k == kind).count();
        assert_eq!(count(VehicleType::Car), 7);
        assert_eq!(count(VehicleType::Car), 7 * count(VehicleType::Bus));
        assert!(count(VehicleType::Truck) > count(VehicleType::Bicycle));
    }

    #[test]
    fn blueprints_have_valid_speeds() {
        for kind in VehicleType::ALL {
            let bp = kind.blueprint();
            assert!(bp.speed.min > 0.0 && bp.speed.min < bp.speed.max);
            assert!(bp.width > 0.0 && bp.height > 0.0);
        }
    }

    #[test]
    fn type_indices_match_order() {
        for (i, kind) in VehicleType::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
