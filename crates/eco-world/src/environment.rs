//! Global environment knobs. Changed only by external commands.

use eco_core::{EnvironmentConfig, WeatherMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    pub sunlight: f32,
    pub humidity: f32,
    pub weather: WeatherMode,
    min_level: f32,
    max_level: f32,
}

impl EnvironmentState {
    pub fn new(sunlight: f32, humidity: f32, weather: WeatherMode) -> Self {
        Self {
            sunlight,
            humidity,
            weather,
            min_level: 0.0,
            max_level: 100.0,
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self {
            sunlight: config.sunlight,
            humidity: config.humidity,
            weather: config.weather,
            min_level: config.min_level,
            max_level: config.max_level,
        }
    }

    pub fn adjust_sunlight(&mut self, delta: f32) {
        self.sunlight = (self.sunlight + delta).clamp(self.min_level, self.max_level);
    }

    pub fn adjust_humidity(&mut self, delta: f32) {
        self.humidity = (self.humidity + delta).clamp(self.min_level, self.max_level);
    }

    pub fn cycle_weather(&mut self) {
        self.weather = self.weather.next();
    }

    pub fn is_raining(&self) -> bool {
        self.weather == WeatherMode::Rainy
    }
}

impl Default for EnvironmentState {
    fn default() -> Self {
        Self::from_config(&EnvironmentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustments_are_clamped() {
        let mut env = EnvironmentState::default();
        env.adjust_sunlight(80.0);
        assert_eq!(env.sunlight, 100.0);
        env.adjust_humidity(-75.0);
        assert_eq!(env.humidity, 0.0);
        env.adjust_humidity(5.0);
        assert_eq!(env.humidity, 5.0);
    }

    #[test]
    fn test_cycle_weather() {
        let mut env = EnvironmentState::default();
        assert!(!env.is_raining());
        env.cycle_weather();
        env.cycle_weather();
        assert!(env.is_raining());
        env.cycle_weather();
        assert_eq!(env.weather, WeatherMode::Sunny);
    }
}
