//! Per-species collections and the scans that cross them.
//!
//! Entities are never removed mid-pass. Kills and starvation only drop
//! health or hunger to zero; every scan here skips dead entries, and
//! `Populations::compact` removes them once at the end of the tick.

use crate::animal::Animal;
use eco_core::{Position, Species};
use serde::Serialize;

/// Location of an animal inside a `Pools` view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub pool: usize,
    pub index: usize,
}

/// Mutable view over several collections, scanned as one sequence in pool order
pub struct Pools<'a> {
    pools: Vec<&'a mut [Animal]>,
}

impl<'a> Pools<'a> {
    pub fn new(pools: Vec<&'a mut [Animal]>) -> Self {
        Self { pools }
    }

    pub fn empty() -> Self {
        Self { pools: Vec::new() }
    }

    /// Live animals with their handles
    pub fn live(&self) -> impl Iterator<Item = (Handle, &Animal)> + '_ {
        self.pools.iter().enumerate().flat_map(|(pool, animals)| {
            animals
                .iter()
                .enumerate()
                .filter(|(_, a)| a.is_alive())
                .map(move |(index, a)| (Handle { pool, index }, a))
        })
    }

    pub fn get(&self, handle: Handle) -> Option<&Animal> {
        self.pools.get(handle.pool)?.get(handle.index)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Animal> {
        self.pools.get_mut(handle.pool)?.get_mut(handle.index)
    }

    /// Closest live animal. Strict `<`, so the first of equally distant wins.
    pub fn nearest(&self, from: &Position) -> Option<(Handle, f32)> {
        self.nearest_matching(from, |_| true)
    }

    pub fn nearest_matching<F>(&self, from: &Position, accept: F) -> Option<(Handle, f32)>
    where
        F: Fn(&Animal) -> bool,
    {
        let mut best: Option<(Handle, f32)> = None;
        for (handle, animal) in self.live().filter(|(_, a)| accept(a)) {
            let distance = animal.distance_to(from);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((handle, distance));
            }
        }
        best
    }

    /// Biggest live animal. `>=` from zero, so the last of equal size wins.
    pub fn largest(&self) -> Option<Handle> {
        let mut best = None;
        let mut max_size = 0.0;
        for (handle, animal) in self.live() {
            if animal.size >= max_size {
                max_size = animal.size;
                best = Some(handle);
            }
        }
        best
    }

    /// First live animal in scan order closer than `radius`
    pub fn first_within<F>(&self, from: &Position, radius: f32, accept: F) -> Option<Handle>
    where
        F: Fn(&Animal) -> bool,
    {
        self.live()
            .find(|(_, a)| accept(a) && a.distance_to(from) < radius)
            .map(|(handle, _)| handle)
    }
}

/// Mean position of the live members
pub fn centroid(animals: &[Animal]) -> Option<Position> {
    let (sum_x, sum_y, count) = animals
        .iter()
        .filter(|a| a.is_alive())
        .fold((0.0f32, 0.0f32, 0usize), |(x, y, n), a| {
            (x + a.position.x, y + a.position.y, n + 1)
        });
    if count == 0 {
        return None;
    }
    Some(Position::new(sum_x / count as f32, sum_y / count as f32))
}

/// Drop dead members, returning them in their original order
pub fn compact(animals: &mut Vec<Animal>) -> Vec<Animal> {
    let (alive, dead): (Vec<_>, Vec<_>) = std::mem::take(animals)
        .into_iter()
        .partition(Animal::is_alive);
    *animals = alive;
    dead
}

/// One collection per species
#[derive(Debug, Clone, Default, Serialize)]
pub struct Populations {
    pub herbivores: Vec<Animal>,
    pub rabbits: Vec<Animal>,
    pub birds: Vec<Animal>,
    pub predators: Vec<Animal>,
    pub lions: Vec<Animal>,
    pub tigers: Vec<Animal>,
    pub humans: Vec<Animal>,
}

impl Populations {
    pub fn of(&self, species: Species) -> &Vec<Animal> {
        match species {
            Species::Herbivore => &self.herbivores,
            Species::Rabbit => &self.rabbits,
            Species::Bird => &self.birds,
            Species::Predator => &self.predators,
            Species::Lion => &self.lions,
            Species::Tiger => &self.tigers,
            Species::Human => &self.humans,
        }
    }

    pub fn of_mut(&mut self, species: Species) -> &mut Vec<Animal> {
        match species {
            Species::Herbivore => &mut self.herbivores,
            Species::Rabbit => &mut self.rabbits,
            Species::Bird => &mut self.birds,
            Species::Predator => &mut self.predators,
            Species::Lion => &mut self.lions,
            Species::Tiger => &mut self.tigers,
            Species::Human => &mut self.humans,
        }
    }

    pub fn push(&mut self, animal: Animal) {
        self.of_mut(animal.species()).push(animal);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animal> {
        Species::all()
            .into_iter()
            .flat_map(move |species| self.of(species).iter())
    }

    pub fn live_count(&self, species: Species) -> usize {
        self.of(species).iter().filter(|a| a.is_alive()).count()
    }

    /// Live carnivores then live humans, in collection order
    pub fn threat_positions(&self) -> Vec<Position> {
        [&self.predators, &self.lions, &self.tigers, &self.humans]
            .into_iter()
            .flat_map(|pop| pop.iter().filter(|a| a.is_alive()).map(|a| a.position))
            .collect()
    }

    /// Remove every dead animal from every collection
    pub fn compact(&mut self) -> Vec<Animal> {
        let mut removed = Vec::new();
        for species in Species::all() {
            removed.extend(compact(self.of_mut(species)));
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn at(species: Species, x: f32, y: f32, rng: &mut ChaCha8Rng) -> Animal {
        Animal::new(species, Position::new(x, y), rng)
    }

    #[test]
    fn test_nearest_spans_pools_and_skips_dead() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut herbivores = vec![at(Species::Herbivore, 50.0, 0.0, &mut rng)];
        let mut rabbits = vec![
            at(Species::Rabbit, 5.0, 0.0, &mut rng),
            at(Species::Rabbit, 20.0, 0.0, &mut rng),
        ];
        rabbits[0].health = 0.0;

        let pools = Pools::new(vec![herbivores.as_mut_slice(), rabbits.as_mut_slice()]);
        let (handle, distance) = pools.nearest(&Position::new(0.0, 0.0)).unwrap();
        assert_eq!(handle, Handle { pool: 1, index: 1 });
        assert!((distance - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_nearest_tie_keeps_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut a = vec![at(Species::Rabbit, 10.0, 0.0, &mut rng)];
        let mut b = vec![at(Species::Rabbit, -10.0, 0.0, &mut rng)];
        let pools = Pools::new(vec![a.as_mut_slice(), b.as_mut_slice()]);
        let (handle, _) = pools.nearest(&Position::new(0.0, 0.0)).unwrap();
        assert_eq!(handle.pool, 0);
    }

    #[test]
    fn test_largest_tie_keeps_last() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut herd: Vec<Animal> = (0..3)
            .map(|i| at(Species::Herbivore, i as f32, 0.0, &mut rng))
            .collect();
        herd[0].size = 9.0;
        herd[1].size = 4.0;
        herd[2].size = 9.0;
        let pools = Pools::new(vec![herd.as_mut_slice()]);
        assert_eq!(pools.largest(), Some(Handle { pool: 0, index: 2 }));
    }

    #[test]
    fn test_empty_scans() {
        let pools = Pools::empty();
        assert!(pools.nearest(&Position::default()).is_none());
        assert!(pools.largest().is_none());
        assert!(pools
            .first_within(&Position::default(), 100.0, |_| true)
            .is_none());
    }

    #[test]
    fn test_centroid_ignores_dead() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut lions = vec![
            at(Species::Lion, 0.0, 0.0, &mut rng),
            at(Species::Lion, 10.0, 20.0, &mut rng),
            at(Species::Lion, 500.0, 500.0, &mut rng),
        ];
        lions[2].hunger = 0.0;
        assert_eq!(centroid(&lions), Some(Position::new(5.0, 10.0)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn test_compact_removes_dead() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut populations = Populations::default();
        for species in Species::all() {
            populations.push(at(species, 1.0, 1.0, &mut rng));
            populations.push(at(species, 2.0, 2.0, &mut rng));
        }
        populations.rabbits[0].hunger = 0.0;
        populations.tigers[1].health = 0.0;

        let removed = populations.compact();
        assert_eq!(removed.len(), 2);
        assert_eq!(populations.rabbits.len(), 1);
        assert_eq!(populations.tigers.len(), 1);
        assert_eq!(populations.iter().count(), 12);
    }

    #[test]
    fn test_threat_positions() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut populations = Populations::default();
        populations.push(at(Species::Rabbit, 1.0, 1.0, &mut rng));
        populations.push(at(Species::Human, 2.0, 2.0, &mut rng));
        populations.push(at(Species::Tiger, 3.0, 3.0, &mut rng));
        assert_eq!(
            populations.threat_positions(),
            vec![Position::new(3.0, 3.0), Position::new(2.0, 2.0)]
        );
    }
}
