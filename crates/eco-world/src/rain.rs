//! Cosmetic raindrop field, advanced only while it rains.

use eco_core::Bounds;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Raindrop {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub length: f32,
}

impl Raindrop {
    fn spawn(bounds: Bounds, rng: &mut ChaCha8Rng) -> Self {
        Self {
            x: rng.gen_range(0.0..=bounds.width),
            y: rng.gen_range(-bounds.height..=bounds.height),
            speed: rng.gen_range(2.0..5.0),
            length: rng.gen_range(5.0..15.0),
        }
    }

    fn fall(&mut self, bounds: Bounds, rng: &mut ChaCha8Rng) {
        self.y += self.speed;
        if self.y > bounds.height {
            self.y = rng.gen_range((-bounds.height).min(-1.0)..=-1.0);
            self.x = rng.gen_range(0.0..=bounds.width);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RainField {
    pub drops: Vec<Raindrop>,
}

impl RainField {
    pub fn new(count: usize, bounds: Bounds, rng: &mut ChaCha8Rng) -> Self {
        Self {
            drops: (0..count).map(|_| Raindrop::spawn(bounds, rng)).collect(),
        }
    }

    pub fn advance(&mut self, bounds: Bounds, rng: &mut ChaCha8Rng) {
        for drop in &mut self.drops {
            drop.fall(bounds, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_drops_start_in_band() {
        let bounds = Bounds::new(1600.0, 900.0);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let rain = RainField::new(100, bounds, &mut rng);
        assert_eq!(rain.drops.len(), 100);
        for drop in &rain.drops {
            assert!((0.0..=1600.0).contains(&drop.x));
            assert!((-900.0..=900.0).contains(&drop.y));
            assert!((2.0..5.0).contains(&drop.speed));
        }
    }

    #[test]
    fn test_drop_respawns_above_top() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut rain = RainField {
            drops: vec![Raindrop {
                x: 10.0,
                y: 99.0,
                speed: 3.0,
                length: 5.0,
            }],
        };
        rain.advance(bounds, &mut rng);
        let drop = rain.drops[0];
        assert!(drop.y < 0.0 && drop.y >= -100.0);
        assert_eq!(drop.speed, 3.0);
    }
}
