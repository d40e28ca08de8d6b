//! Biome descriptors.

use eco_core::{Precipitation, Rgb, ZoneKind};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Chance and kind of precipitation rolled for a zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherPolicy {
    pub chance: f32,
    pub precipitation: Precipitation,
}

/// Static description of a biome. Cells share these by reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    pub kind: ZoneKind,
    pub temperature_range: (f32, f32),
    pub humidity_range: (f32, f32),
    pub color: Rgb,
    pub weather: WeatherPolicy,
}

static DESERT: Zone = Zone {
    kind: ZoneKind::Desert,
    temperature_range: (30.0, 50.0),
    humidity_range: (0.0, 20.0),
    color: Rgb::new(237, 201, 175),
    weather: WeatherPolicy {
        chance: 0.05,
        precipitation: Precipitation::Rain,
    },
};

static GRASSLAND: Zone = Zone {
    kind: ZoneKind::Grassland,
    temperature_range: (15.0, 30.0),
    humidity_range: (20.0, 60.0),
    color: Rgb::new(124, 252, 0),
    weather: WeatherPolicy {
        chance: 0.2,
        precipitation: Precipitation::Rain,
    },
};

static FOREST: Zone = Zone {
    kind: ZoneKind::Forest,
    temperature_range: (5.0, 15.0),
    humidity_range: (60.0, 100.0),
    color: Rgb::new(34, 139, 34),
    weather: WeatherPolicy {
        chance: 0.3,
        precipitation: Precipitation::Rain,
    },
};

static TUNDRA: Zone = Zone {
    kind: ZoneKind::Tundra,
    temperature_range: (-10.0, 5.0),
    humidity_range: (20.0, 50.0),
    color: Rgb::new(200, 220, 240),
    weather: WeatherPolicy {
        chance: 0.2,
        precipitation: Precipitation::Snow,
    },
};

impl Zone {
    pub fn of(kind: ZoneKind) -> &'static Zone {
        match kind {
            ZoneKind::Desert => &DESERT,
            ZoneKind::Grassland => &GRASSLAND,
            ZoneKind::Forest => &FOREST,
            ZoneKind::Tundra => &TUNDRA,
        }
    }

    pub fn sample_temperature(&self, rng: &mut ChaCha8Rng) -> f32 {
        sample_range(self.temperature_range, rng)
    }

    pub fn sample_humidity(&self, rng: &mut ChaCha8Rng) -> f32 {
        sample_range(self.humidity_range, rng)
    }

    /// Roll this tick's local weather
    pub fn roll_weather(&self, rng: &mut ChaCha8Rng) -> Precipitation {
        if rng.gen::<f32>() < self.weather.chance {
            self.weather.precipitation
        } else {
            Precipitation::Clear
        }
    }
}

fn sample_range((lo, hi): (f32, f32), rng: &mut ChaCha8Rng) -> f32 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}
