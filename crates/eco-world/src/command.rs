//! External input events, queued until the start of the next tick.

use eco_core::{Position, SpawnKind};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Place one plant or animal; the position is clamped into the world
    Spawn { kind: SpawnKind, position: Position },
    AdjustSunlight { delta: f32 },
    AdjustHumidity { delta: f32 },
    CycleWeather,
}

/// FIFO of commands not yet applied
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&mut self) -> Vec<Command> {
        self.pending.drain(..).collect()
    }
}
