//! The read-only view of the scene published after each tick.

use crate::geometry::LaneGeometry;
use crate::lane::Lane;
use crate::vehicle::{Vehicle, VehicleType};
use crate::{VehicleId, VehicleSet};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// The number of live vehicles of each type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeCounts([usize; 5]);

impl TypeCounts {
    /// The total number of vehicles.
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// The count of each type, in the order of [VehicleType::ALL].
    pub fn iter(&self) -> impl Iterator<Item = (VehicleType, usize)> + '_ {
        VehicleType::ALL.iter().map(|kind| (*kind, self[*kind]))
    }

    /// The percentage of all vehicles that are of the given type, rounded.
    pub fn share(&self, kind: VehicleType) -> u32 {
        match self.total() {
            0 => 0,
            total => (100.0 * self[kind] as f64 / total as f64).round() as u32,
        }
    }
}

impl Index<VehicleType> for TypeCounts {
    type Output = usize;

    fn index(&self, kind: VehicleType) -> &usize {
        &self.0[kind.index()]
    }
}

impl FromIterator<VehicleType> for TypeCounts {
    fn from_iter<I: IntoIterator<Item = VehicleType>>(iter: I) -> Self {
        let mut counts = Self::default();
        for kind in iter {
            counts.0[kind.index()] += 1;
        }
        counts
    }
}

/// The state of the scene after a completed tick.
///
/// A snapshot borrows the simulation, so the scene cannot change while it is held.
#[derive(Clone, Copy)]
pub struct SceneSnapshot<'a> {
    pub(crate) frame: usize,
    pub(crate) geometry: &'a LaneGeometry,
    pub(crate) vehicles: &'a VehicleSet,
    pub(crate) lanes: &'a [Lane],
    pub(crate) counts: TypeCounts,
}

impl<'a> SceneSnapshot<'a> {
    /// The number of ticks completed when the snapshot was taken.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The lane geometry the vehicles are laid out on.
    pub fn geometry(&self) -> &'a LaneGeometry {
        self.geometry
    }

    /// Returns an iterator over all the live vehicles.
    pub fn vehicles(&self) -> impl Iterator<Item = &'a Vehicle> + 'a {
        self.vehicles.values()
    }

    /// Gets the vehicle with the given ID, if it is still live.
    pub fn get_vehicle(&self, id: VehicleId) -> Option<&'a Vehicle> {
        self.vehicles.get(id)
    }

    /// Returns the vehicles in a lane in order of ascending x.
    pub fn lane_vehicles(&self, lane: usize) -> impl Iterator<Item = &'a Vehicle> + 'a {
        let (lanes, vehicles) = (self.lanes, self.vehicles);
        lanes[lane].vehicles().iter().map(move |id| &vehicles[*id])
    }

    /// The number of live vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// The number of live vehicles of each type.
    pub fn counts(&self) -> TypeCounts {
        self.counts
    }

    /// The summed footprint area of all live vehicles.
    pub fn occupied_area(&self) -> f64 {
        self.vehicles().map(Vehicle::area).sum()
    }
}
