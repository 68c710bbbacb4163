//! Tests that run the whole scene for many ticks.

use assert_approx_eq::assert_approx_eq;
use itertools::Itertools;
use traffic_scene::{
    detections, DensityGrid, SceneConfig, SceneSnapshot, Simulation, TrafficMetrics, VehicleType,
};

fn scene(seed: u64) -> Simulation {
    Simulation::new(SceneConfig::seeded(seed), 800.0, 450.0)
}

/// Checks that every vehicle sits on its lane's centre line and travels in the lane's direction.
fn assert_lane_invariant(snapshot: &SceneSnapshot) {
    let geometry = snapshot.geometry();
    for vehicle in snapshot.vehicles() {
        assert_eq!(vehicle.y(), geometry.centre(vehicle.lane()));
        assert_eq!(
            vehicle.vel().signum(),
            geometry.direction(vehicle.lane()).sign()
        );
        assert_eq!(vehicle.direction(), geometry.direction(vehicle.lane()));
    }
}

#[test]
fn lane_invariant_holds_for_1000_ticks() {
    let mut sim = scene(2024);
    let mut empty_run = 0;
    let mut longest_empty_run = 0;

    for _ in 0..1000 {
        sim.tick();
        let snapshot = sim.snapshot();
        assert_lane_invariant(&snapshot);

        for lane in 0..snapshot.geometry().lane_count() {
            assert!(snapshot.lane_vehicles(lane).count() <= 6);
        }

        if snapshot.is_empty() {
            empty_run += 1;
            longest_empty_run = longest_empty_run.max(empty_run);
        } else {
            empty_run = 0;
        }
    }

    assert_eq!(sim.frame(), 1000);
    assert!(longest_empty_run <= 60);
}

#[test]
fn counts_match_vehicles() {
    let mut sim = scene(7);
    for _ in 0..20 {
        sim.advance(25);
        let snapshot = sim.snapshot();
        let counts = snapshot.counts();
        assert_eq!(counts.total(), snapshot.len());
        for kind in VehicleType::ALL {
            let n = snapshot.vehicles().filter(|v| v.kind() == kind).count();
            assert_eq!(counts[kind], n);
        }
    }
}

#[test]
fn lanes_are_published_in_x_order() {
    let mut sim = scene(3);
    sim.advance(400);
    let snapshot = sim.snapshot();
    for lane in 0..snapshot.geometry().lane_count() {
        assert!(snapshot
            .lane_vehicles(lane)
            .tuple_windows()
            .all(|(a, b)| a.x() <= b.x()));
    }
}

#[test]
fn resize_recomputes_geometry_and_reseeds() {
    let mut sim = scene(99);
    sim.advance(50);
    let old_ids = sim.iter_vehicles().map(|v| v.id()).collect::<Vec<_>>();

    sim.resize(1200.0, 600.0);

    let snapshot = sim.snapshot();
    let geometry = snapshot.geometry();
    assert_eq!(geometry.width(), 1200.0);
    assert_approx_eq!(geometry.lane_height(), 114.0);
    for (centre, expected) in geometry.centres().iter().zip([129.0, 243.0, 357.0, 471.0]) {
        assert_approx_eq!(*centre, expected);
    }

    assert!(!snapshot.is_empty());
    assert_lane_invariant(&snapshot);
    for vehicle in snapshot.vehicles() {
        assert!(vehicle.x() >= 0.0 && vehicle.x() <= 1200.0);
    }
    assert!(old_ids.iter().all(|id| snapshot.get_vehicle(*id).is_none()));
    assert_eq!(snapshot.counts().total(), snapshot.len());
}

#[test]
fn degenerate_resize_is_clamped() {
    let mut sim = scene(4);
    sim.resize(0.0, 0.0);
    let snapshot = sim.snapshot();
    assert!(snapshot.geometry().lane_height() > 0.0);
    assert!(!snapshot.is_empty());
    sim.advance(100);
    assert_lane_invariant(&sim.snapshot());
}

#[test]
fn restart_reseeds_scene() {
    let mut sim = scene(12);
    sim.advance(300);
    sim.restart();
    let snapshot = sim.snapshot();
    for lane in 0..snapshot.geometry().lane_count() {
        assert!((3..=6).contains(&snapshot.lane_vehicles(lane).count()));
    }
    assert_eq!(sim.frame(), 300);
}

#[test]
fn same_seed_same_scene() {
    let mut a = scene(31);
    let mut b = scene(31);
    a.advance(500);
    b.advance(500);

    let describe = |sim: &Simulation| {
        let snapshot = sim.snapshot();
        (0..snapshot.geometry().lane_count())
            .flat_map(|lane| snapshot.lane_vehicles(lane))
            .map(|v| (v.lane(), v.kind(), v.x(), v.confidence()))
            .collect::<Vec<_>>()
    };
    assert_eq!(describe(&a), describe(&b));
}

#[test]
fn metrics_follow_snapshot() {
    let mut sim = scene(8);
    sim.advance(200);
    let snapshot = sim.snapshot();
    let metrics = TrafficMetrics::from_snapshot(&snapshot);

    assert_eq!(metrics.total, snapshot.len());
    assert_eq!(metrics.frame, 200);
    assert!(metrics.occupancy <= 100 && metrics.density <= 100);
    assert!(metrics.speed >= 8 && metrics.speed <= 60);
    assert_eq!(
        metrics.density,
        ((snapshot.len() as f64 / 22.0 * 100.0).round() as u32).min(100)
    );

    let grid = DensityGrid::from_snapshot(&snapshot, 12);
    let on_screen = snapshot
        .vehicles()
        .filter(|v| v.x() >= 0.0 && v.x() < 800.0)
        .count();
    let binned = (0..grid.rows())
        .flat_map(|row| (0..grid.cols()).map(move |col| (row, col)))
        .map(|(row, col)| grid.count(row, col) as usize)
        .sum::<usize>();
    assert_eq!(binned, on_screen);
    assert!(grid.occupied().all(|(_, _, d)| d > 0.0 && d <= 1.0));

    let boxes = detections(&snapshot);
    assert_eq!(boxes.len(), snapshot.len());
    for b in &boxes {
        assert!(b.min.x < b.max.x && b.min.y < b.max.y);
        assert!(b.label().starts_with(b.kind.label()));
    }
}
