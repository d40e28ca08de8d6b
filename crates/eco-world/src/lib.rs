//! World simulation engine.
//!
//! Biome zones, plants, and the animal species that graze, hunt, flee and
//! breed across them, advanced one tick at a time by `World`.

pub mod animal;
pub mod command;
pub mod environment;
pub mod plant;
pub mod population;
pub mod rain;
pub mod snapshot;
pub mod species;
pub mod world;
pub mod zone;
pub mod zone_map;

pub use animal::{Animal, AnimalKind};
pub use command::Command;
pub use environment::EnvironmentState;
pub use plant::{Patch, Plant};
pub use population::Populations;
pub use snapshot::WorldSnapshot;
pub use world::{LocalConditions, World};
pub use zone::Zone;
pub use zone_map::ZoneMap;
