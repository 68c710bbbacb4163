//! Lane geometry of the road band.

use crate::config::SceneConfig;
use crate::util::Interval;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The direction of travel of a lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Rightward, towards increasing x.
    Forward,
    /// Leftward, towards decreasing x.
    Backward,
}

impl Direction {
    /// The sign of velocities in this direction.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// The resolved lane layout for one viewport size.
///
/// Geometry is owned by the simulation and replaced wholesale on resize;
/// vehicles only ever read it.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneGeometry {
    /// Viewport width after clamping.
    width: f64,
    /// Viewport height after clamping.
    height: f64,
    /// The vertical extent of the road band.
    road: Interval<f64>,
    /// The height of a single lane.
    lane_height: f64,
    /// The y coordinate of each lane's centre line.
    centres: Vec<f64>,
}

impl LaneGeometry {
    /// Computes the lane layout for a viewport.
    ///
    /// Degenerate sizes (zero, negative or NaN) are clamped to the configured minimum viewport.
    pub fn resolve(config: &SceneConfig, width: f64, height: f64) -> Self {
        let clamp = |value: f64, min: f64| if value >= min { value } else { min };
        let width = clamp(width, config.min_viewport.0);
        let height = clamp(height, config.min_viewport.1);

        let road = Interval::new(height * config.road_top, height * config.road_bottom);
        let lane_height = road.length() / config.lane_count as f64;
        let centres = (0..config.lane_count)
            .map(|i| road.min + lane_height * i as f64 + 0.5 * lane_height)
            .collect();

        Self {
            width,
            height,
            road,
            lane_height,
            centres,
        }
    }

    /// The viewport width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// The viewport height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The number of lanes.
    pub fn lane_count(&self) -> usize {
        self.centres.len()
    }

    /// The height of a single lane.
    pub fn lane_height(&self) -> f64 {
        self.lane_height
    }

    /// The vertical extent of the road band.
    pub fn road_band(&self) -> Interval<f64> {
        self.road
    }

    /// The area of the road band.
    pub fn road_area(&self) -> f64 {
        self.width * self.road.length()
    }

    /// The y coordinate of a lane's centre line.
    pub fn centre(&self, lane: usize) -> f64 {
        self.centres[lane]
    }

    /// The centre lines of all the lanes, top to bottom.
    pub fn centres(&self) -> &[f64] {
        &self.centres
    }

    /// The direction of travel of a lane.
    ///
    /// The upper half of the lanes travel rightward. With an odd lane count the
    /// middle lane does too.
    pub fn direction(&self, lane: usize) -> Direction {
        if 2 * lane < self.lane_count() {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// The x coordinate `margin` beyond the upstream edge of a lane.
    pub fn upstream_x(&self, lane: usize, margin: f64) -> f64 {
        match self.direction(lane) {
            Direction::Forward => -margin,
            Direction::Backward => self.width + margin,
        }
    }

    /// Whether a vehicle front at `front` has passed `margin` beyond the downstream edge.
    pub fn is_past_exit(&self, lane: usize, front: f64, margin: f64) -> bool {
        match self.direction(lane) {
            Direction::Forward => front > self.width + margin,
            Direction::Backward => front < -margin,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn lanes_divide_road_band() {
        let geom = LaneGeometry::resolve(&SceneConfig::default(), 800.0, 450.0);
        assert_eq!(geom.lane_count(), 4);
        assert_approx_eq!(geom.lane_height(), 85.5);
        let expected = [96.75, 182.25, 267.75, 353.25];
        for (centre, expected) in geom.centres().iter().zip(expected) {
            assert_approx_eq!(*centre, expected);
        }
        assert_approx_eq!(geom.road_area(), 800.0 * 342.0);
    }

    #[test]
    fn lane_directions() {
        let geom = LaneGeometry::resolve(&SceneConfig::default(), 800.0, 450.0);
        assert_eq!(geom.direction(0), Direction::Forward);
        assert_eq!(geom.direction(1), Direction::Forward);
        assert_eq!(geom.direction(2), Direction::Backward);
        assert_eq!(geom.direction(3), Direction::Backward);
        assert_eq!(geom.upstream_x(0, 60.0), -60.0);
        assert_eq!(geom.upstream_x(3, 60.0), 860.0);
    }

    #[test]
    fn odd_lane_counts_favour_forward() {
        let directions = |lane_count| {
            let config = SceneConfig {
                lane_count,
                ..Default::default()
            };
            let geom = LaneGeometry::resolve(&config, 800.0, 450.0);
            (0..lane_count).map(|i| geom.direction(i)).collect::<Vec<_>>()
        };
        use Direction::*;
        assert_eq!(directions(3), vec![Forward, Forward, Backward]);
        assert_eq!(
            directions(5),
            vec![Forward, Forward, Forward, Backward, Backward]
        );
    }

    #[test]
    fn exit_test() {
        let geom = LaneGeometry::resolve(&SceneConfig::default(), 800.0, 450.0);
        assert!(!geom.is_past_exit(0, 820.0, 20.0));
        assert!(geom.is_past_exit(0, 820.5, 20.0));
        assert!(!geom.is_past_exit(2, -20.0, 20.0));
        assert!(geom.is_past_exit(2, -20.5, 20.0));
    }

    #[test]
    fn degenerate_viewport_is_clamped() {
        let config = SceneConfig::default();
        let geom = LaneGeometry::resolve(&config, 0.0, f64::NAN);
        assert_eq!(geom.width(), 160.0);
        assert_eq!(geom.height(), 90.0);
        assert!(geom.lane_height() > 0.0);
        assert!(geom.centres().windows(2).all(|w| w[0] < w[1]));
    }
}
