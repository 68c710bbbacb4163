use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use traffic_scene::{FlowHistory, FrameRateMeter, SceneConfig, Simulation, TrafficMetrics};

/// Ticks per reported second of scene time.
const TICKS_PER_REPORT: usize = 60;

fn load_config(path: &str) -> Result<SceneConfig> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("parsing config {}", path))
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config(&path)?,
        None => SceneConfig::default(),
    };
    let seconds = match args.next() {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("invalid duration {:?}", arg))?,
        None => 10,
    };

    let mut sim = Simulation::new(config, 800.0, 450.0);
    let mut history = FlowHistory::default();
    let mut meter = FrameRateMeter::new(Instant::now());

    info!("Simulating {} s of scene time...", seconds);
    for _ in 0..seconds {
        let start = Instant::now();
        for _ in 0..TICKS_PER_REPORT {
            sim.tick();
            meter.record(Instant::now());
        }
        let frame = start.elapsed() / TICKS_PER_REPORT as u32;

        let snapshot = sim.snapshot();
        let metrics = TrafficMetrics::from_snapshot(&snapshot);
        history.record(metrics.total);
        info!(
            "Avg. tick: {:?} ({} vehs, {} detected so far)",
            frame,
            metrics.total,
            history.total_detected()
        );
        println!("{}", serde_json::to_string(&metrics)?);
    }

    info!(
        "Mean vehicles in frame: {:.1}, last measured rate: {} ticks/s",
        history.mean().unwrap_or(0.0),
        meter.rate()
    );
    Ok(())
}
