//! Population statistics tracking.

use crate::Species;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Live population counts at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Census {
    /// Live animals per species
    pub animals: BTreeMap<Species, usize>,
    /// Live plants
    pub plants: usize,
    /// Sum of growth patches over all live plants
    pub plant_patches: usize,
}

impl Census {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, species: Species) -> usize {
        self.animals.get(&species).copied().unwrap_or(0)
    }

    pub fn total_animals(&self) -> usize {
        self.animals.values().sum()
    }

    /// No animals and no plants left
    pub fn is_extinct(&self) -> bool {
        self.total_animals() == 0 && self.plants == 0
    }
}

/// What happened during a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    /// Offspring appended by reproduction
    pub births: u32,
    /// Animals removed because hunger reached zero
    pub starved: u32,
    /// Animals removed because health reached zero
    pub killed: u32,
    /// Plants removed by decay or grazing
    pub plants_lost: u32,
    /// New growth patches across all plants
    pub patches_grown: u32,
    /// External commands applied at the start of the tick
    pub commands_applied: u32,
}

impl TickReport {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }

    pub fn deaths(&self) -> u32 {
        self.starved + self.killed
    }

    /// Fold another report into this one, keeping the later tick number
    pub fn absorb(&mut self, other: &TickReport) {
        self.tick = self.tick.max(other.tick);
        self.births += other.births;
        self.starved += other.starved;
        self.killed += other.killed;
        self.plants_lost += other.plants_lost;
        self.patches_grown += other.patches_grown;
        self.commands_applied += other.commands_applied;
    }
}
