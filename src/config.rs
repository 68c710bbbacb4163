//! Tunable parameters of the scene engine.

use crate::util::Interval;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The parameters of the scene.
///
/// The defaults reproduce the tuned behaviour of the dashboard scene:
/// four lanes, a road band between 12% and 88% of the viewport height,
/// and a sparse spawn rate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SceneConfig {
    /// The number of lanes. The first half travel rightward, the rest leftward.
    pub lane_count: usize,
    /// The top of the road band as a fraction of the viewport height.
    pub road_top: f64,
    /// The bottom of the road band as a fraction of the viewport height.
    pub road_bottom: f64,
    /// The smallest viewport the geometry will be resolved for, as `(width, height)`.
    pub min_viewport: (f64, f64),
    /// Seed for the random source. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// The number of vehicles scattered into each lane when seeding.
    pub seed_count: Interval<usize>,
    /// The per-tick occupancy target below which a lane may spawn.
    pub spawn_target: Interval<usize>,
    /// The chance that a lane below its target spawns on a given tick.
    pub spawn_probability: f64,
    /// Distance of the spawn point beyond the upstream viewport edge.
    pub spawn_margin: f64,
    /// No spawn happens while a vehicle is closer than this to the spawn point.
    pub spawn_clearance: f64,
    /// Extra distance beyond a full vehicle width at which new vehicles are placed.
    pub spawn_offset: f64,
    /// Distance past the downstream edge the front of a vehicle must reach to retire.
    pub exit_margin: f64,
    /// The range of detection confidence scores, in percent.
    pub confidence: Interval<f64>,
    /// The spacing rule parameters.
    pub spacing: SpacingParams,
}

/// Parameters of the forward-gap slowdown rule.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpacingParams {
    /// The gap below which a vehicle crawls at its minimum factor.
    pub safe_gap: f64,
    /// Gaps under `safe_gap + slow_zone` are throttled.
    pub slow_zone: f64,
    /// The gap beyond `safe_gap` over which the speed factor ramps up to 1.
    pub slow_span: f64,
    /// The smallest fraction of nominal speed a vehicle moves at.
    pub min_factor: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            lane_count: 4,
            road_top: 0.12,
            road_bottom: 0.88,
            min_viewport: (160.0, 90.0),
            seed: None,
            seed_count: Interval::new(3, 6),
            spawn_target: Interval::new(3, 5),
            spawn_probability: 0.012,
            spawn_margin: 60.0,
            spawn_clearance: 120.0,
            spawn_offset: 10.0,
            exit_margin: 20.0,
            confidence: Interval::new(82.0, 98.0),
            spacing: SpacingParams::default(),
        }
    }
}

impl Default for SpacingParams {
    fn default() -> Self {
        Self {
            safe_gap: 15.0,
            slow_zone: 20.0,
            slow_span: 40.0,
            min_factor: 0.1,
        }
    }
}

impl SceneConfig {
    /// Creates the default configuration with a fixed random seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Panics if the configuration cannot drive a scene.
    pub fn assert_valid(&self) {
        assert!(self.lane_count >= 2, "Scene must have at least two lanes");
        assert!(
            0.0 <= self.road_top && self.road_top < self.road_bottom && self.road_bottom <= 1.0,
            "Road band must satisfy 0 <= road_top < road_bottom <= 1"
        );
        assert!(
            self.min_viewport.0 > 0.0 && self.min_viewport.1 > 0.0,
            "Minimum viewport must be positive"
        );
        assert!(self.seed_count.is_ordered(), "Invalid seed count range");
        assert!(self.spawn_target.is_ordered(), "Invalid spawn target range");
        assert!(self.confidence.is_ordered(), "Invalid confidence range");
        assert!(
            (0.0..=1.0).contains(&self.spawn_probability),
            "Spawn probability must be within [0, 1]"
        );
        assert!(self.spawn_clearance >= 0.0, "Spawn clearance must not be negative");
        assert!(self.spacing.slow_span > 0.0, "Slow span must be positive");
        assert!(
            self.spacing.min_factor > 0.0 && self.spacing.min_factor <= 1.0,
            "Minimum speed factor must be within (0, 1]"
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_is_valid() {
        SceneConfig::default().assert_valid();
        assert_eq!(SceneConfig::seeded(3).seed, Some(3));
    }

    #[test]
    #[should_panic(expected = "at least two lanes")]
    fn rejects_single_lane() {
        SceneConfig {
            lane_count: 1,
            ..Default::default()
        }
        .assert_valid();
    }

    #[test]
    #[should_panic(expected = "Spawn probability")]
    fn rejects_bad_probability() {
        SceneConfig {
            spawn_probability: 1.5,
            ..Default::default()
        }
        .assert_valid();
    }
}
