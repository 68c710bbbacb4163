pub use cgmath;
pub use config::{SceneConfig, SpacingParams};
pub use detection::{detections, ConfidenceTier, DetectionBox};
pub use geometry::{Direction, LaneGeometry};
pub use lane::Lane;
pub use metrics::{CongestionLevel, DensityGrid, DensityLevel, FlowHistory, FrameRateMeter, TrafficMetrics};
pub use simulation::Simulation;
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use snapshot::{SceneSnapshot, TypeCounts};
pub use util::Interval;
pub use vehicle::{Blueprint, Vehicle, VehicleType};

mod config;
mod detection;
mod geometry;
mod lane;
pub mod metrics;
mod motion;
mod population;
mod simulation;
mod snapshot;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

/// A 2D point
pub type Point2d = cgmath::Point2<f64>;

type VehicleSet = SlotMap<VehicleId, Vehicle>;
