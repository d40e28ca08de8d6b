//! Headless runner: seeds a world, runs it, prints a JSON report.
//!
//! Usage: `eco-runner [config.json] [snapshot-out.json]`

mod telemetry;

use anyhow::{Context, Result};
use chrono::Utc;
use eco_core::{Census, Position, SimConfig, SpawnKind, TickReport};
use eco_world::{Command, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Keeps spawn placement independent of the world's own random stream
const SPAWN_STREAM: u64 = 0x5eed_0f_5a11;

#[derive(Debug, Serialize)]
struct RunReport {
    seed: u64,
    ticks: u64,
    /// Unix seconds
    started_at: i64,
    finished_at: i64,
    duration_ms: i64,
    initial: Census,
    survivors: Census,
    totals: TickReport,
}

fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config(Path::new(&path))?,
        None => SimConfig::default(),
    };
    let snapshot_path = args.next();

    info!(
        seed = config.run.seed,
        ticks = config.run.num_ticks,
        "Starting eco-sim runner"
    );

    let started_at = Utc::now();
    let mut world = World::new(config.clone())?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.run.seed ^ SPAWN_STREAM);
    queue_initial_spawns(&mut world, &config, &mut rng);

    // Spawns land at the start of the first tick
    let totals = world.run(config.run.num_ticks);
    let finished_at = Utc::now();

    let report = RunReport {
        seed: config.run.seed,
        ticks: world.current_tick(),
        started_at: started_at.timestamp(),
        finished_at: finished_at.timestamp(),
        duration_ms: (finished_at - started_at).num_milliseconds(),
        initial: initial_census(&config),
        survivors: world.census(),
        totals,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(path) = snapshot_path {
        let json = world.snapshot().to_json()?;
        std::fs::write(&path, json).with_context(|| format!("writing snapshot to {}", path))?;
        info!(path = %path, "Snapshot written");
    }

    telemetry::shutdown_telemetry();
    Ok(())
}

fn load_config(path: &Path) -> Result<SimConfig> {
    SimConfig::from_file(path).with_context(|| format!("loading config {}", path.display()))
}

/// Stand-in for mouse/keyboard input: one spawn command per requested entity
fn queue_initial_spawns(world: &mut World, config: &SimConfig, rng: &mut ChaCha8Rng) {
    let bounds = world.bounds();
    for spec in &config.run.initial_spawns {
        for _ in 0..spec.count {
            let position = Position::new(
                rng.gen_range(0.0..=bounds.width),
                rng.gen_range(0.0..=bounds.height),
            );
            world.submit(Command::Spawn {
                kind: spec.kind,
                position,
            });
        }
    }
    info!(queued = world.pending_commands(), "Initial spawns queued");
}

fn initial_census(config: &SimConfig) -> Census {
    let mut census = Census::new();
    for spec in &config.run.initial_spawns {
        match spec.kind {
            SpawnKind::Plant => {
                census.plants += spec.count;
                census.plant_patches += spec.count;
            }
            SpawnKind::Animal(species) => {
                *census.animals.entry(species).or_insert(0) += spec.count;
            }
        }
    }
    census
}
