//! Animal state and base behaviour shared by every species.

use crate::plant::Plant;
use eco_core::{Bounds, Emotion, EntityId, Position, Species};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

pub const MAX_HEALTH: f32 = 100.0;
pub const MAX_HUNGER: f32 = 100.0;
/// Hunger lost per `wander`
pub const HUNGER_DECAY: f32 = 0.05;
/// Heading re-rolls add up to this many radians either way
pub const TURN_JITTER: f32 = 0.5;

const TIMID_BRAVERY: f32 = 0.5;
const TIMID_TURN_CHANCE: f64 = 0.05;
const BOLD_TURN_CHANCE: f64 = 0.02;

const FORAGE_HUNGER: f32 = 30.0;
const EATING_RANGE: f32 = 15.0;
const FORAGE_STEP: f32 = 2.0;
const MEAL_HEALTH: f32 = 50.0;
const MEAL_HUNGER: f32 = 70.0;

const REPRODUCTION_RANGE: f32 = 50.0;
const OFFSPRING_SPREAD: f32 = 10.0;

/// Species tag plus any species-only state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnimalKind {
    Herbivore,
    Rabbit,
    Bird,
    Predator,
    Lion,
    Tiger,
    Human { emotion: Emotion, greedy: bool },
}

impl AnimalKind {
    pub fn spawn(species: Species, rng: &mut ChaCha8Rng) -> Self {
        match species {
            Species::Herbivore => AnimalKind::Herbivore,
            Species::Rabbit => AnimalKind::Rabbit,
            Species::Bird => AnimalKind::Bird,
            Species::Predator => AnimalKind::Predator,
            Species::Lion => AnimalKind::Lion,
            Species::Tiger => AnimalKind::Tiger,
            Species::Human => AnimalKind::Human {
                emotion: Emotion::random(rng),
                greedy: rng.gen_bool(0.5),
            },
        }
    }

    pub fn species(&self) -> Species {
        match self {
            AnimalKind::Herbivore => Species::Herbivore,
            AnimalKind::Rabbit => Species::Rabbit,
            AnimalKind::Bird => Species::Bird,
            AnimalKind::Predator => Species::Predator,
            AnimalKind::Lion => Species::Lion,
            AnimalKind::Tiger => Species::Tiger,
            AnimalKind::Human { .. } => Species::Human,
        }
    }
}

fn initial_speed(species: Species, rng: &mut ChaCha8Rng) -> f32 {
    match species {
        Species::Herbivore => rng.gen_range(1.0..2.5),
        Species::Rabbit => rng.gen_range(1.5..3.0),
        Species::Bird | Species::Predator => rng.gen_range(2.0..4.0),
        Species::Lion => rng.gen_range(3.0..4.0),
        Species::Tiger => rng.gen_range(2.5..4.5),
        Species::Human => 1.5,
    }
}

/// Result of a successful bite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meal {
    pub plant: EntityId,
    pub plant_died: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    pub id: EntityId,
    pub kind: AnimalKind,
    pub position: Position,
    pub speed: f32,
    /// Radians
    pub heading: f32,
    pub health: f32,
    pub hunger: f32,
    /// 0 = timid, 1 = bold
    pub bravery: f32,
    /// Prey-selection weight
    pub size: f32,
    /// One-shot: set after the first successful mating, never cleared
    pub has_reproduced: bool,
    pub born_tick: u64,
}

impl Animal {
    pub fn new(species: Species, position: Position, rng: &mut ChaCha8Rng) -> Self {
        let kind = AnimalKind::spawn(species, rng);
        Self {
            id: EntityId::new(),
            kind,
            position,
            speed: initial_speed(species, rng),
            heading: rng.gen_range(0.0..2.0 * PI),
            health: MAX_HEALTH,
            hunger: MAX_HUNGER,
            bravery: rng.gen_range(0.0..1.0),
            size: rng.gen_range(1.0..10.0),
            has_reproduced: false,
            born_tick: 0,
        }
    }

    pub fn with_birth_tick(mut self, tick: u64) -> Self {
        self.born_tick = tick;
        self
    }

    pub fn species(&self) -> Species {
        self.kind.species()
    }

    pub fn emotion(&self) -> Option<Emotion> {
        match self.kind {
            AnimalKind::Human { emotion, .. } => Some(emotion),
            _ => None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0 && self.hunger > 0.0
    }

    pub fn distance_to(&self, target: &Position) -> f32 {
        self.position.distance(target)
    }

    /// Take damage. Returns true if this killed the animal.
    pub fn hurt(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount).clamp(0.0, MAX_HEALTH);
        self.health <= 0.0
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, MAX_HEALTH);
    }

    pub fn satiate(&mut self, amount: f32) {
        self.hunger = (self.hunger + amount).clamp(0.0, MAX_HUNGER);
    }

    pub fn drain_hunger(&mut self, amount: f32) {
        self.hunger = (self.hunger - amount).clamp(0.0, MAX_HUNGER);
    }

    pub(crate) fn advance(&mut self, distance: f32) {
        self.position = self
            .position
            .add(self.heading.cos() * distance, self.heading.sin() * distance);
    }

    pub(crate) fn maybe_turn(&mut self, chance: f64, jitter: f32, rng: &mut ChaCha8Rng) {
        if rng.gen_bool(chance) {
            self.heading += rng.gen_range(-jitter..jitter);
        }
    }

    /// Mirror the heading off any edge the animal is touching or past
    pub(crate) fn reflect_off_edges(&mut self, bounds: Bounds) {
        if self.position.x <= 0.0 || self.position.x >= bounds.width {
            self.heading = PI - self.heading;
        }
        if self.position.y <= 0.0 || self.position.y >= bounds.height {
            self.heading = -self.heading;
        }
    }

    /// Base movement: timid animals creep and turn more often, bold ones run straight
    pub fn wander(&mut self, bounds: Bounds, rng: &mut ChaCha8Rng) {
        if self.bravery < TIMID_BRAVERY {
            self.advance(self.speed * 0.5);
            self.maybe_turn(TIMID_TURN_CHANCE, TURN_JITTER, rng);
        } else {
            self.advance(self.speed);
            self.maybe_turn(BOLD_TURN_CHANCE, TURN_JITTER, rng);
        }

        self.reflect_off_edges(bounds);
        self.position = bounds.clamp(self.position);
        self.drain_hunger(HUNGER_DECAY);
    }

    /// Keep going at full speed without foraging or hunting
    pub fn coast(&mut self, bounds: Bounds, rng: &mut ChaCha8Rng) {
        self.advance(self.speed);
        self.reflect_off_edges(bounds);
        self.maybe_turn(BOLD_TURN_CHANCE, TURN_JITTER, rng);
        self.position = bounds.clamp(self.position);
    }

    /// Straight-line step towards `target`; no-op when already there
    pub fn move_towards(&mut self, target: &Position, step: f32) {
        if let Ok((ux, uy)) = self.position.unit_towards(target) {
            self.position = self.position.add(ux * step, uy * step);
        }
    }

    pub fn face(&mut self, target: &Position) {
        self.heading = self.position.angle_to(target);
    }

    pub fn face_away_from(&mut self, threat: &Position) {
        self.heading = threat.angle_to(&self.position);
    }

    /// Turn away from every threat inside `radius`; the last one wins
    pub fn flee_from(&mut self, threats: &[Position], radius: f32) {
        for threat in threats {
            if self.distance_to(threat) < radius {
                self.face_away_from(threat);
            }
        }
    }

    /// Walk to the nearest live plant when hungry and take a bite once close
    pub fn eat_plants(&mut self, plants: &mut [Plant]) -> Option<Meal> {
        if self.hunger >= FORAGE_HUNGER {
            return None;
        }

        let mut nearest: Option<(usize, f32)> = None;
        for (i, plant) in plants.iter().enumerate() {
            if !plant.is_alive() {
                continue;
            }
            let distance = self.distance_to(&plant.position);
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((i, distance));
            }
        }
        let (index, distance) = nearest?;

        let plant = &mut plants[index];
        if distance > EATING_RANGE {
            self.move_towards(&plant.position, FORAGE_STEP);
            return None;
        }

        let plant_died = plant.take_bite();
        self.heal(MEAL_HEALTH);
        self.satiate(MEAL_HUNGER);
        Some(Meal {
            plant: plant.id,
            plant_died,
        })
    }
}

/// Pair `population[index]` with the first eligible mate in range and append one
/// offspring. Returns the newborn's id.
pub fn reproduce(
    population: &mut Vec<Animal>,
    index: usize,
    bounds: Bounds,
    tick: u64,
    rng: &mut ChaCha8Rng,
) -> Option<EntityId> {
    let parent = population.get(index)?;
    if parent.has_reproduced || !parent.is_alive() {
        return None;
    }

    let species = parent.species();
    let origin = parent.position;
    let partner = population.iter().enumerate().position(|(j, other)| {
        j != index
            && other.is_alive()
            && !other.has_reproduced
            && other.species() == species
            && other.distance_to(&origin) < REPRODUCTION_RANGE
    })?;

    let spot = bounds.clamp(origin.add(
        rng.gen_range(-OFFSPRING_SPREAD..OFFSPRING_SPREAD),
        rng.gen_range(-OFFSPRING_SPREAD..OFFSPRING_SPREAD),
    ));
    let child = Animal::new(species, spot, rng).with_birth_tick(tick);
    let child_id = child.id;

    population[index].has_reproduced = true;
    population[partner].has_reproduced = true;
    population.push(child);
    Some(child_id)
}
