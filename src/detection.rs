//! Fake detection annotations derived from the scene.

use crate::snapshot::SceneSnapshot;
use crate::vehicle::{Vehicle, VehicleType};
use crate::{Point2d, VehicleId};
#[cfg(feature = "serde")]
use serde::Serialize;

/// How much a detection should be trusted, by confidence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ConfidenceTier {
    /// Above 90%.
    High,
    /// Above 75%.
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn of(confidence: f64) -> Self {
        if confidence > 90.0 {
            ConfidenceTier::High
        } else if confidence > 75.0 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    /// The opacity a renderer draws the box with.
    pub fn alpha(self) -> f64 {
        match self {
            ConfidenceTier::High => 1.0,
            ConfidenceTier::Medium => 0.8,
            ConfidenceTier::Low => 0.6,
        }
    }
}

/// A bounding box annotation around one vehicle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DetectionBox {
    pub vehicle: VehicleId,
    pub kind: VehicleType,
    /// The top left corner.
    pub min: Point2d,
    /// The bottom right corner.
    pub max: Point2d,
    pub confidence: f64,
    pub tier: ConfidenceTier,
}

impl DetectionBox {
    pub fn new(vehicle: &Vehicle) -> Self {
        let half_w = 0.5 * vehicle.width();
        let half_h = 0.5 * vehicle.height();
        let pos = vehicle.position();
        Self {
            vehicle: vehicle.id(),
            kind: vehicle.kind(),
            min: Point2d::new(pos.x - half_w, pos.y - half_h),
            max: Point2d::new(pos.x + half_w, pos.y + half_h),
            confidence: vehicle.confidence(),
            tier: ConfidenceTier::of(vehicle.confidence()),
        }
    }

    /// The label drawn above the box, e.g. `Car 91%`.
    pub fn label(&self) -> String {
        // Halves round away from zero
        format!("{} {}%", self.kind.label(), self.confidence.round())
    }
}

/// Annotates every vehicle in the snapshot, top lane first.
pub fn detections(snapshot: &SceneSnapshot) -> Vec<DetectionBox> {
    (0..snapshot.geometry().lane_count())
        .flat_map(|lane| snapshot.lane_vehicles(lane))
        .map(DetectionBox::new)
        .collect()
}
