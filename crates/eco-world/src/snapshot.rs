//! Read-only drawable state handed to the rendering side once per frame.

use crate::animal::Animal;
use crate::environment::EnvironmentState;
use crate::plant::{Patch, Plant};
use crate::rain::Raindrop;
use eco_core::{Emotion, EntityId, Position, Rgb, Species};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PlantView {
    pub id: EntityId,
    pub anchor: Position,
    pub patches: Vec<Patch>,
    pub health: i32,
}

impl From<&Plant> for PlantView {
    fn from(plant: &Plant) -> Self {
        Self {
            id: plant.id,
            anchor: plant.position,
            patches: plant.patches.clone(),
            health: plant.health,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnimalView {
    pub id: EntityId,
    pub species: Species,
    pub position: Position,
    pub heading: f32,
    pub health: f32,
    pub hunger: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
}

impl From<&Animal> for AnimalView {
    fn from(animal: &Animal) -> Self {
        Self {
            id: animal.id,
            species: animal.species(),
            position: animal.position,
            heading: animal.heading,
            health: animal.health,
            hunger: animal.hunger,
            emotion: animal.emotion(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub environment: EnvironmentState,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Row-major background colours, one per zone cell
    pub zone_colors: Vec<Rgb>,
    pub plants: Vec<PlantView>,
    pub animals: Vec<AnimalView>,
    /// Empty unless it is raining
    pub raindrops: Vec<Raindrop>,
}

impl WorldSnapshot {
    pub fn animals_of(&self, species: Species) -> impl Iterator<Item = &AnimalView> {
        self.animals.iter().filter(move |a| a.species == species)
    }

    pub fn to_json(&self) -> eco_core::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
