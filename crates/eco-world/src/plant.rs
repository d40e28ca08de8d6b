//! Plant patch clusters.

use crate::environment::EnvironmentState;
use crate::zone_map::ZoneMap;
use eco_core::{Bounds, EntityId, Position, ZoneKind, MAX_PLANT_PATCHES};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Size of a freshly planted patch
pub const PLANT_SIZE: u32 = 10;
/// Plants smaller than this are eaten in one bite
pub const WHOLE_BITE_SIZE: u32 = 5;
/// Health removed by a partial bite
pub const PARTIAL_BITE: i32 = 2;

const MIN_SUNLIGHT: f32 = 20.0;
const MIN_HUMIDITY: f32 = 50.0;
const GROWTH_SCALE: f32 = 1e-6;
const DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// One growth unit, in whole world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Patch {
    pub x: i32,
    pub y: i32,
}

impl Patch {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn from_position(pos: Position) -> Self {
        Self::new(pos.x.round() as i32, pos.y.round() as i32)
    }

    pub fn position(&self) -> Position {
        Position::new(self.x as f32, self.y as f32)
    }
}

/// What a plant did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// Patch ceiling reached
    Capped,
    /// Growth roll succeeded; number of patches added
    Grew(usize),
    /// Conditions fine but the roll failed
    Dormant,
    /// Lost health to harsh conditions
    Withered,
    /// Health ran out this tick
    Died,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plant {
    pub id: EntityId,
    /// Anchor position where the plant was seeded
    pub position: Position,
    pub patches: Vec<Patch>,
    pub health: i32,
    /// `PLANT_SIZE` while alive, 0 once dead
    pub size: u32,
    /// Zone under the anchor, cached at creation
    pub zone: Option<ZoneKind>,
}

impl Plant {
    pub fn new(position: Position, map: &ZoneMap, bounds: Bounds) -> Self {
        let position = bounds.clamp(position);
        let zone = map
            .zone_at_point(position, bounds.width, bounds.height)
            .ok()
            .map(|z| z.kind);

        Self {
            id: EntityId::new(),
            position,
            patches: vec![Patch::from_position(position)],
            health: 100,
            size: PLANT_SIZE,
            zone,
        }
    }

    pub fn anchor(&self) -> Patch {
        Patch::from_position(self.position)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn growth_probability(sunlight: f32, humidity: f32) -> f32 {
        sunlight * humidity * GROWTH_SCALE
    }

    /// Advance one tick. `anchors` holds the anchor cells of every live plant.
    pub fn grow(
        &mut self,
        env: &EnvironmentState,
        map: &ZoneMap,
        bounds: Bounds,
        anchors: &HashSet<Patch>,
        rng: &mut ChaCha8Rng,
    ) -> Growth {
        if self.patches.len() >= MAX_PLANT_PATCHES {
            return Growth::Capped;
        }

        let fertile = self.zone.map_or(false, |kind| kind.is_fertile());
        if fertile && env.sunlight > MIN_SUNLIGHT && env.humidity > MIN_HUMIDITY {
            if rng.gen::<f32>() < Self::growth_probability(env.sunlight, env.humidity) {
                Growth::Grew(self.extend_growth(map, bounds, anchors, rng))
            } else {
                Growth::Dormant
            }
        } else if self.be_eaten(1) {
            Growth::Died
        } else {
            Growth::Withered
        }
    }

    /// Sprout from every patch in one or two orthogonal directions.
    /// Returns the number of patches added.
    pub fn extend_growth(
        &mut self,
        map: &ZoneMap,
        bounds: Bounds,
        anchors: &HashSet<Patch>,
        rng: &mut ChaCha8Rng,
    ) -> usize {
        let capacity = MAX_PLANT_PATCHES.saturating_sub(self.patches.len());
        let step = (self.size * 2) as i32;
        let max_x = (bounds.width as i32 - 1).max(0);
        let max_y = (bounds.height as i32 - 1).max(0);
        let mut sprouts: Vec<Patch> = Vec::new();

        for patch in &self.patches {
            let count = rng.gen_range(1..=2);
            for &(dx, dy) in DIRECTIONS.choose_multiple(rng, count) {
                let candidate = Patch::new(
                    (patch.x + dx * step).clamp(0, max_x),
                    (patch.y + dy * step).clamp(0, max_y),
                );

                if self.patches.contains(&candidate) || sprouts.contains(&candidate) {
                    continue;
                }
                if map
                    .zone_at_point(candidate.position(), bounds.width, bounds.height)
                    .is_err()
                {
                    continue;
                }
                if anchors.contains(&candidate) {
                    continue;
                }
                sprouts.push(candidate);
            }
        }

        sprouts.truncate(capacity);
        let grown = sprouts.len();
        self.patches.extend(sprouts);
        grown
    }

    /// Remove `amount` health. Returns true if this killed the plant.
    pub fn be_eaten(&mut self, amount: i32) -> bool {
        self.health -= amount;
        if self.health <= 0 {
            self.health = 0;
            self.size = 0;
            self.patches.clear();
            return true;
        }
        false
    }

    /// Apply one grazing bite: small plants go whole, large ones lose a little.
    /// Returns true if the plant died.
    pub fn take_bite(&mut self) -> bool {
        if self.size < WHOLE_BITE_SIZE {
            self.be_eaten(100)
        } else {
            self.be_eaten(PARTIAL_BITE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn bounds() -> Bounds {
        Bounds::new(1600.0, 900.0)
    }

    fn grassland() -> ZoneMap {
        ZoneMap::uniform(100, 100, ZoneKind::Grassland).unwrap()
    }

    #[test]
    fn test_new_plant() {
        let plant = Plant::new(Position::new(400.0, 300.0), &grassland(), bounds());
        assert_eq!(plant.patches, vec![Patch::new(400, 300)]);
        assert_eq!(plant.health, 100);
        assert_eq!(plant.size, PLANT_SIZE);
        assert_eq!(plant.zone, Some(ZoneKind::Grassland));
    }

    #[test]
    fn test_growth_probability() {
        assert!((Plant::growth_probability(80.0, 80.0) - 0.0064).abs() < 1e-7);
    }

    #[test]
    fn test_harsh_conditions_wither() {
        let map = grassland();
        let mut plant = Plant::new(Position::new(100.0, 100.0), &map, bounds());
        let env = EnvironmentState::new(10.0, 80.0, Default::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let anchors = HashSet::new();

        assert_eq!(plant.grow(&env, &map, bounds(), &anchors, &mut rng), Growth::Withered);
        assert_eq!(plant.health, 99);

        for _ in 0..98 {
            plant.grow(&env, &map, bounds(), &anchors, &mut rng);
        }
        assert_eq!(plant.grow(&env, &map, bounds(), &anchors, &mut rng), Growth::Died);
        assert!(!plant.is_alive());
        assert!(plant.patches.is_empty());
        assert_eq!(plant.size, 0);
    }

    #[test]
    fn test_barren_zone_withers() {
        let map = ZoneMap::uniform(100, 100, ZoneKind::Desert).unwrap();
        let mut plant = Plant::new(Position::new(100.0, 100.0), &map, bounds());
        let env = EnvironmentState::new(100.0, 100.0, Default::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            plant.grow(&env, &map, bounds(), &HashSet::new(), &mut rng),
            Growth::Withered
        );
    }

    #[test]
    fn test_extend_growth_adds_orthogonal_patches() {
        let map = grassland();
        let mut plant = Plant::new(Position::new(800.0, 400.0), &map, bounds());
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let grown = plant.extend_growth(&map, bounds(), &HashSet::new(), &mut rng);

        assert!((1..=2).contains(&grown));
        for patch in &plant.patches[1..] {
            let dx = (patch.x - 800).abs();
            let dy = (patch.y - 400).abs();
            assert!((dx == 20 && dy == 0) || (dx == 0 && dy == 20));
        }
    }

    #[test]
    fn test_extend_growth_respects_ceiling_and_bounds() {
        let map = grassland();
        let mut plant = Plant::new(Position::new(5.0, 5.0), &map, bounds());
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for _ in 0..50 {
            plant.extend_growth(&map, bounds(), &HashSet::new(), &mut rng);
            assert!(plant.patches.len() <= MAX_PLANT_PATCHES);
        }
        assert_eq!(plant.patches.len(), MAX_PLANT_PATCHES);
        assert!(plant
            .patches
            .iter()
            .all(|p| p.x >= 0 && p.x < 1600 && p.y >= 0 && p.y < 900));

        let unique: HashSet<_> = plant.patches.iter().collect();
        assert_eq!(unique.len(), plant.patches.len());

        let env = EnvironmentState::new(100.0, 100.0, Default::default());
        assert_eq!(
            plant.grow(&env, &map, bounds(), &HashSet::new(), &mut rng),
            Growth::Capped
        );
    }

    #[test]
    fn test_extend_growth_avoids_other_anchors() {
        let map = grassland();
        let mut plant = Plant::new(Position::new(800.0, 400.0), &map, bounds());
        let anchors: HashSet<Patch> = [
            Patch::new(780, 400),
            Patch::new(820, 400),
            Patch::new(800, 380),
            Patch::new(800, 420),
        ]
        .into_iter()
        .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert_eq!(plant.extend_growth(&map, bounds(), &anchors, &mut rng), 0);
        assert_eq!(plant.patches.len(), 1);
    }

    #[test]
    fn test_bites() {
        let map = grassland();
        let mut plant = Plant::new(Position::new(10.0, 10.0), &map, bounds());
        assert!(!plant.take_bite());
        assert_eq!(plant.health, 98);

        plant.size = 3;
        assert!(plant.take_bite());
        assert!(!plant.is_alive());
        assert!(plant.patches.is_empty());
    }
}
