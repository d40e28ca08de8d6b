//! Configuration types for the simulation.

use crate::{Error, Result, Species, SpawnKind, WeatherMode};
use serde::{Deserialize, Serialize};

/// Logical world width
pub const WORLD_WIDTH: f32 = 1600.0;
/// Logical world height
pub const WORLD_HEIGHT: f32 = 900.0;
/// Zone grid columns
pub const GRID_WIDTH: usize = 100;
/// Zone grid rows
pub const GRID_HEIGHT: usize = 100;
/// Growth ceiling for a single plant
pub const MAX_PLANT_PATCHES: usize = 100;
pub const RAINDROP_COUNT: usize = 100;
/// Largest accepted world width or height
pub const MAX_WORLD_EXTENT: f32 = 1.0e6;

/// World geometry and map generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Logical width of the world
    pub width: f32,
    /// Logical height of the world
    pub height: f32,
    /// Number of zone cells along x
    pub grid_width: usize,
    /// Number of zone cells along y
    pub grid_height: usize,
    /// Majority-vote smoothing passes applied after random assignment
    pub smoothing_passes: usize,
    /// Raindrops animated while it is raining
    pub raindrop_count: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            smoothing_passes: 5,
            raindrop_count: RAINDROP_COUNT,
        }
    }
}

/// Initial values of the global environment knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub sunlight: f32,
    pub humidity: f32,
    pub weather: WeatherMode,
    /// Lower bound for sunlight/humidity adjustments
    pub min_level: f32,
    /// Upper bound for sunlight/humidity adjustments
    pub max_level: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            sunlight: 50.0,
            humidity: 50.0,
            weather: WeatherMode::Sunny,
            min_level: 0.0,
            max_level: 100.0,
        }
    }
}

/// How many of one kind to place at random positions before the first tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub kind: SpawnKind,
    pub count: usize,
}

/// Headless run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of ticks to run
    pub num_ticks: u64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Emit population metrics every N ticks (0 disables)
    pub metrics_interval: u64,
    /// Initial populations
    pub initial_spawns: Vec<SpawnSpec>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_ticks: 5_000,
            seed: 0,
            metrics_interval: 500,
            initial_spawns: vec![
                SpawnSpec {
                    kind: SpawnKind::Plant,
                    count: 40,
                },
                SpawnSpec {
                    kind: SpawnKind::Animal(Species::Herbivore),
                    count: 30,
                },
                SpawnSpec {
                    kind: SpawnKind::Animal(Species::Rabbit),
                    count: 30,
                },
                SpawnSpec {
                    kind: SpawnKind::Animal(Species::Bird),
                    count: 15,
                },
                SpawnSpec {
                    kind: SpawnKind::Animal(Species::Predator),
                    count: 4,
                },
                SpawnSpec {
                    kind: SpawnKind::Animal(Species::Lion),
                    count: 3,
                },
                SpawnSpec {
                    kind: SpawnKind::Animal(Species::Tiger),
                    count: 2,
                },
                SpawnSpec {
                    kind: SpawnKind::Animal(Species::Human),
                    count: 6,
                },
            ],
        }
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub run: RunConfig,
    pub world: WorldConfig,
    pub environment: EnvironmentConfig,
}

impl SimConfig {
    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<()> {
        let world = &self.world;
        if !(world.width > 0.0 && world.height > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "world must have positive size, got {}x{}",
                world.width, world.height
            )));
        }
        if !(world.width <= MAX_WORLD_EXTENT && world.height <= MAX_WORLD_EXTENT) {
            return Err(Error::InvalidConfig(format!(
                "world size {}x{} exceeds {} per side",
                world.width, world.height, MAX_WORLD_EXTENT
            )));
        }
        if world.grid_width == 0 || world.grid_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "zone grid must be non-empty, got {}x{}",
                world.grid_width, world.grid_height
            )));
        }

        let env = &self.environment;
        if env.min_level > env.max_level {
            return Err(Error::InvalidConfig(format!(
                "environment bounds inverted: {} > {}",
                env.min_level, env.max_level
            )));
        }
        for (name, value) in [("sunlight", env.sunlight), ("humidity", env.humidity)] {
            if value < env.min_level || value > env.max_level {
                return Err(Error::InvalidConfig(format!(
                    "initial {} {} outside {}..={}",
                    name, value, env.min_level, env.max_level
                )));
            }
        }

        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
