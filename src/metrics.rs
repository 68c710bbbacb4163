//! Dashboard figures derived from scene snapshots.
//!
//! Everything here is a pure function of a [SceneSnapshot]; the engine never
//! reads these values back.

use crate::snapshot::{SceneSnapshot, TypeCounts};
use itertools::iproduct;
#[cfg(feature = "serde")]
use serde::Serialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// The vehicle count treated as 100% density.
const FULL_DENSITY_COUNT: f64 = 22.0;

/// The speed estimate with an empty road, in km/h.
const FREE_FLOW_SPEED: f64 = 60.0;

/// The speed estimate never drops below this, in km/h.
const MIN_SPEED: f64 = 8.0;

/// Vehicles per minute for each vehicle in frame.
const THROUGHPUT_PER_VEHICLE: f64 = 4.2;

/// The number of samples kept by default in a [FlowHistory].
pub const FLOW_HISTORY_LEN: usize = 120;

/// The number of columns in a [DensityGrid].
pub const DENSITY_GRID_COLS: usize = 12;

/// A coarse rating of the density percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum DensityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl DensityLevel {
    pub fn of(density: u32) -> Self {
        match density {
            0..=29 => DensityLevel::Low,
            30..=54 => DensityLevel::Medium,
            55..=74 => DensityLevel::High,
            _ => DensityLevel::Critical,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DensityLevel::Low => "LOW",
            DensityLevel::Medium => "MEDIUM",
            DensityLevel::High => "HIGH",
            DensityLevel::Critical => "CRITICAL",
        }
    }
}

/// Congestion in quarter steps of the density percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum CongestionLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl CongestionLevel {
    pub fn of(density: u32) -> Self {
        match density / 25 {
            0 => CongestionLevel::Low,
            1 => CongestionLevel::Moderate,
            2 => CongestionLevel::High,
            _ => CongestionLevel::Critical,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CongestionLevel::Low => "LOW",
            CongestionLevel::Moderate => "MOD",
            CongestionLevel::High => "HIGH",
            CongestionLevel::Critical => "CRIT",
        }
    }
}

/// Headline traffic figures for one reporting interval.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TrafficMetrics {
    /// The frame the figures were taken at.
    pub frame: usize,
    /// The number of vehicles in frame.
    pub total: usize,
    /// The number of vehicles of each type.
    pub counts: TypeCounts,
    /// Vehicle footprint as a percentage of the road band.
    pub occupancy: u32,
    /// Vehicle count as a percentage of a full road.
    pub density: u32,
    /// Estimated average speed in km/h.
    pub speed: u32,
    /// Estimated vehicles per minute.
    pub throughput: u32,
    pub level: DensityLevel,
    pub congestion: CongestionLevel,
}

impl TrafficMetrics {
    pub fn from_snapshot(snapshot: &SceneSnapshot) -> Self {
        let counts = snapshot.counts();
        let total = counts.total();
        let road_area = snapshot.geometry().road_area();
        let occupancy = f64::min(100.0, (snapshot.occupied_area() / road_area * 100.0).round());
        let density = f64::min(100.0, (total as f64 / FULL_DENSITY_COUNT * 100.0).round());
        let speed = f64::max(MIN_SPEED, (FREE_FLOW_SPEED - density * 0.45).round());
        let density = density as u32;

        Self {
            frame: snapshot.frame(),
            total,
            counts,
            occupancy: occupancy as u32,
            density,
            speed: speed as u32,
            throughput: (total as f64 * THROUGHPUT_PER_VEHICLE).round() as u32,
            level: DensityLevel::of(density),
            congestion: CongestionLevel::of(density),
        }
    }
}

/// A rolling record of vehicle totals, oldest first.
#[derive(Clone, Debug)]
pub struct FlowHistory {
    capacity: usize,
    samples: VecDeque<usize>,
    /// The sum of every total ever recorded.
    detected: u64,
}

impl FlowHistory {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Flow history capacity must be positive");
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
            detected: 0,
        }
    }

    /// Records a total, evicting the oldest sample when full.
    pub fn record(&mut self, total: usize) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(total);
        self.detected += total as u64;
    }

    /// The recorded samples, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = usize> + '_ {
        self.samples.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The running sum of all recorded totals, including evicted ones.
    pub fn total_detected(&self) -> u64 {
        self.detected
    }

    /// The mean of the retained samples.
    pub fn mean(&self) -> Option<f64> {
        match self.samples.len() {
            0 => None,
            n => Some(self.samples.iter().sum::<usize>() as f64 / n as f64),
        }
    }
}

impl Default for FlowHistory {
    fn default() -> Self {
        Self::new(FLOW_HISTORY_LEN)
    }
}

/// Vehicle centres binned into cells over the road band, one row per lane.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityGrid {
    rows: usize,
    cols: usize,
    cells: Vec<u32>,
}

impl DensityGrid {
    pub fn from_snapshot(snapshot: &SceneSnapshot, cols: usize) -> Self {
        assert!(cols > 0, "Density grid must have at least one column");
        let geometry = snapshot.geometry();
        let rows = geometry.lane_count();
        let road = geometry.road_band();
        let cell_w = geometry.width() / cols as f64;
        let cell_h = road.length() / rows as f64;

        let mut cells = vec![0; rows * cols];
        for vehicle in snapshot.vehicles() {
            let col = (vehicle.x() / cell_w).floor();
            let row = ((vehicle.y() - road.min) / cell_h).floor();
            if col >= 0.0 && row >= 0.0 && (col as usize) < cols && (row as usize) < rows {
                cells[row as usize * cols + col as usize] += 1;
            }
        }

        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The number of vehicle centres in a cell.
    pub fn count(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.cols + col]
    }

    /// A cell's count relative to the busiest cell, in `[0, 1]`.
    pub fn density(&self, row: usize, col: usize) -> f64 {
        let max = self.cells.iter().copied().max().unwrap_or(0).max(1);
        self.count(row, col) as f64 / max as f64
    }

    /// Returns `(row, col, density)` for every occupied cell.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        iproduct!(0..self.rows, 0..self.cols)
            .filter(|(row, col)| self.count(*row, *col) > 0)
            .map(|(row, col)| (row, col, self.density(row, col)))
    }
}

/// Measures the rate at which ticks are actually delivered.
#[derive(Clone, Debug)]
pub struct FrameRateMeter {
    window_start: Instant,
    frames: u32,
    rate: u32,
}

impl FrameRateMeter {
    /// The length of each measurement window.
    pub const WINDOW: Duration = Duration::from_secs(1);

    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            rate: 0,
        }
    }

    /// Records a frame. Returns the new rate when a window closes.
    pub fn record(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.duration_since(self.window_start) >= Self::WINDOW {
            self.rate = self.frames;
            self.frames = 0;
            self.window_start = now;
            Some(self.rate)
        } else {
            None
        }
    }

    /// Frames counted in the last completed window.
    pub fn rate(&self) -> u32 {
        self.rate
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn density_levels() {
        assert_eq!(DensityLevel::of(0), DensityLevel::Low);
        assert_eq!(DensityLevel::of(29), DensityLevel::Low);
        assert_eq!(DensityLevel::of(30), DensityLevel::Medium);
        assert_eq!(DensityLevel::of(55), DensityLevel::High);
        assert_eq!(DensityLevel::of(75), DensityLevel::Critical);
        assert_eq!(DensityLevel::of(100).label(), "CRITICAL");
    }

    #[test]
    fn congestion_levels() {
        assert_eq!(CongestionLevel::of(24), CongestionLevel::Low);
        assert_eq!(CongestionLevel::of(25), CongestionLevel::Moderate);
        assert_eq!(CongestionLevel::of(74).label(), "HIGH");
        assert_eq!(CongestionLevel::of(100), CongestionLevel::Critical);
    }

    #[test]
    fn flow_history_evicts_oldest() {
        let mut history = FlowHistory::new(3);
        for total in [5, 6, 7, 8] {
            history.record(total);
        }
        assert_eq!(history.samples().collect::<Vec<_>>(), vec![6, 7, 8]);
        assert_eq!(history.total_detected(), 26);
        assert_eq!(history.mean(), Some(7.0));
        assert_eq!(FlowHistory::default().mean(), None);
    }

    #[test]
    #[should_panic(expected = "at least one column")]
    fn grid_needs_columns() {
        let sim = crate::Simulation::new(crate::SceneConfig::seeded(1), 800.0, 450.0);
        DensityGrid::from_snapshot(&sim.snapshot(), 0);
    }

    #[test]
    fn frame_rate_windows() {
        let start = Instant::now();
        let mut meter = FrameRateMeter::new(start);
        for i in 1..60 {
            assert_eq!(meter.record(start + Duration::from_millis(i * 16)), None);
        }
        assert_eq!(meter.record(start + Duration::from_millis(1000)), Some(60));
        assert_eq!(meter.rate(), 60);
    }
}
