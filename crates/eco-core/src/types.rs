//! Core type definitions for the simulation.

use crate::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a plant or animal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D position in logical world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance to another position
    pub fn distance(&self, other: &Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle (radians) of the ray from `self` towards `other`
    pub fn angle_to(&self, other: &Position) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Clamp into `[0, width] x [0, height]`
    pub fn clamp(&self, width: f32, height: f32) -> Self {
        Self {
            x: self.x.clamp(0.0, width),
            y: self.y.clamp(0.0, height),
        }
    }

    /// Unit vector pointing at `target`
    pub fn unit_towards(&self, target: &Position) -> Result<(f32, f32)> {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let length = dx.hypot(dy);
        if length == 0.0 {
            return Err(Error::DegenerateVector);
        }
        Ok((dx / length, dy / length))
    }
}

/// Logical extent of the world; positions live in `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn clamp(&self, pos: Position) -> Position {
        pos.clamp(self.width, self.height)
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0.0..=self.width).contains(&pos.x) && (0.0..=self.height).contains(&pos.y)
    }
}

/// Animal species tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    /// Generic grazing animal
    Herbivore,
    Rabbit,
    Bird,
    Predator,
    Lion,
    Tiger,
    Human,
}

impl Species {
    pub fn all() -> [Species; 7] {
        [
            Species::Herbivore,
            Species::Rabbit,
            Species::Bird,
            Species::Predator,
            Species::Lion,
            Species::Tiger,
            Species::Human,
        ]
    }

    /// Predator, Lion and Tiger
    pub fn is_carnivore(&self) -> bool {
        matches!(self, Species::Predator | Species::Lion | Species::Tiger)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Herbivore => "herbivore",
            Species::Rabbit => "rabbit",
            Species::Bird => "bird",
            Species::Predator => "predator",
            Species::Lion => "lion",
            Species::Tiger => "tiger",
            Species::Human => "human",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything the input layer can place into the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Plant,
    Animal(Species),
}

/// Human mood, drives speed and hunting strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Fearful,
}

impl Emotion {
    pub fn all() -> [Emotion; 4] {
        [Emotion::Happy, Emotion::Sad, Emotion::Angry, Emotion::Fearful]
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::all()[rng.gen_range(0..4)]
    }
}

/// Global weather mode, cycled by external command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeatherMode {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
}

impl WeatherMode {
    pub fn next(&self) -> Self {
        match self {
            WeatherMode::Sunny => WeatherMode::Cloudy,
            WeatherMode::Cloudy => WeatherMode::Rainy,
            WeatherMode::Rainy => WeatherMode::Sunny,
        }
    }
}

/// Biome classification of a map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Desert,
    Grassland,
    Forest,
    Tundra,
}

impl ZoneKind {
    pub fn all() -> [ZoneKind; 4] {
        [
            ZoneKind::Desert,
            ZoneKind::Grassland,
            ZoneKind::Forest,
            ZoneKind::Tundra,
        ]
    }

    /// Whether plants can grow here at all
    pub fn is_fertile(&self) -> bool {
        matches!(self, ZoneKind::Grassland | ZoneKind::Forest)
    }
}

/// Outcome of a zone's weather roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precipitation {
    Clear,
    Rain,
    Snow,
}

/// Display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}
