//! Per-lane motion with a forward-gap slowdown rule.

use crate::config::SpacingParams;
use crate::lane::Lane;
use crate::VehicleSet;

/// The spacing model of a vehicle.
///
/// This is a greedy heuristic rather than a car following model: a vehicle
/// only looks at its immediate leader and never stops or reverses.
#[derive(Clone, Copy, Debug)]
pub struct SpacingModel {
    safe_gap: f64,
    slow_zone: f64,
    slow_span: f64,
    min_factor: f64,
}

impl SpacingModel {
    /// Creates a new spacing model.
    pub fn new(params: &SpacingParams) -> Self {
        Self {
            safe_gap: params.safe_gap,
            slow_zone: params.slow_zone,
            slow_span: params.slow_span,
            min_factor: params.min_factor,
        }
    }

    /// Calculates the fraction of nominal speed a vehicle travels at.
    ///
    /// # Arguments
    /// * `gap` - The distance to the leader's rear, or `None` if there is no leader.
    pub fn speed_factor(&self, gap: Option<f64>) -> f64 {
        match gap {
            Some(gap) if gap < self.safe_gap + self.slow_zone => {
                let factor = f64::max(self.min_factor, (gap - self.safe_gap) / self.slow_span);
                f64::min(1.0, factor)
            }
            _ => 1.0,
        }
    }

    /// Advances every vehicle in the lane by one tick, leaving the lane sorted.
    ///
    /// Vehicles are visited in order of ascending x and moved in place, so a
    /// vehicle sees its leader's position after the leader's own update when
    /// the leader was visited first.
    pub(crate) fn advance_lane(&self, lane: &mut Lane, vehicles: &mut VehicleSet) {
        lane.sort(vehicles);
        for (idx, id) in lane.vehicles().iter().enumerate() {
            let gap = lane
                .leader(idx)
                .map(|leader| vehicles[*id].gap_to(&vehicles[leader]));
            let factor = self.speed_factor(gap);
            vehicles[*id].advance(factor);
        }
        lane.sort(vehicles);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn model() -> SpacingModel {
        SpacingModel::new(&SpacingParams::default())
    }

    #[test]
    fn free_road() {
        assert_eq!(model().speed_factor(None), 1.0);
        assert_eq!(model().speed_factor(Some(35.0)), 1.0);
        assert_eq!(model().speed_factor(Some(500.0)), 1.0);
    }

    #[test]
    fn slows_inside_zone() {
        let model = model();
        assert_approx_eq!(model.speed_factor(Some(25.0)), 0.25);
        assert_approx_eq!(model.speed_factor(Some(34.0)), 0.475);
        assert_approx_eq!(model.speed_factor(Some(19.0)), 0.1);
    }

    #[test]
    fn crawls_below_safe_gap() {
        let model = model();
        assert_approx_eq!(model.speed_factor(Some(5.0)), 0.1);
        assert_approx_eq!(model.speed_factor(Some(15.0)), 0.1);
        assert_approx_eq!(model.speed_factor(Some(-30.0)), 0.1);
    }
}
