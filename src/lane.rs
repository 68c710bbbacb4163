use crate::geometry::Direction;
use crate::{VehicleId, VehicleSet};
use smallvec::SmallVec;

/// The occupants of a single lane, kept ordered by ascending x.
#[derive(Clone, Debug)]
pub struct Lane {
    /// The lane index.
    index: usize,
    /// The direction of travel.
    dir: Direction,
    /// The vehicles in the lane, in order of ascending x.
    vehicles: Vec<VehicleId>,
}

impl Lane {
    pub(crate) fn new(index: usize, dir: Direction) -> Self {
        Self {
            index,
            dir,
            vehicles: vec![],
        }
    }

    /// The lane index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The direction of travel.
    pub fn direction(&self) -> Direction {
        self.dir
    }

    /// The number of vehicles in the lane.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// The vehicles in the lane, in order of ascending x.
    pub fn vehicles(&self) -> &[VehicleId] {
        &self.vehicles
    }

    /// The vehicle immediately ahead of the one at `idx` in the direction of travel.
    pub(crate) fn leader(&self, idx: usize) -> Option<VehicleId> {
        match self.dir {
            Direction::Forward => self.vehicles.get(idx + 1).copied(),
            Direction::Backward => idx.checked_sub(1).map(|i| self.vehicles[i]),
        }
    }

    /// Whether no vehicle centre lies strictly within `clearance` of `x`.
    pub(crate) fn is_clear(&self, vehicles: &VehicleSet, x: f64, clearance: f64) -> bool {
        self.vehicles
            .iter()
            .all(|id| (vehicles[*id].x() - x).abs() >= clearance)
    }

    /// Inserts the vehicle with the given ID into the lane.
    pub(crate) fn insert_vehicle(&mut self, vehicles: &VehicleSet, id: VehicleId) {
        let veh_x = vehicles[id].x();
        let idx = self
            .vehicles
            .iter()
            .map(|id| vehicles[*id].x())
            .position(|x| x > veh_x)
            .unwrap_or(self.vehicles.len());
        self.vehicles.insert(idx, id);
    }

    /// Removes the vehicle with the given ID from the lane.
    pub(crate) fn remove_vehicle(&mut self, id: VehicleId) {
        if let Some(idx) = self.vehicles.iter().rposition(|v| *v == id) {
            self.vehicles.remove(idx);
        }
    }

    /// Removes every vehicle matching the predicate, returning their IDs.
    pub(crate) fn drain_where(
        &mut self,
        mut pred: impl FnMut(VehicleId) -> bool,
    ) -> SmallVec<[VehicleId; 8]> {
        let mut removed = SmallVec::new();
        self.vehicles.retain(|id| {
            if pred(*id) {
                removed.push(*id);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Restores ascending x order after vehicles have moved.
    pub(crate) fn sort(&mut self, vehicles: &VehicleSet) {
        self.vehicles
            .sort_by(|a, b| vehicles[*a].x().total_cmp(&vehicles[*b].x()));
    }
}
