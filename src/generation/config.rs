//! Generation configuration, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::field::NoiseSet;
use crate::terrain::{ChillCurve, Climate, HeightVariant, TemperatureMode, ValleyShaper};

/// How caves are cut out of the base terrain
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CaveStrategy {
    Off,
    /// Two contoured noises plus occasional cave valley tunnels
    Contour,
    /// Four-noise density caves
    Density { cave_size: f32, finish: DensityFinish },
}

impl Default for CaveStrategy {
    fn default() -> Self {
        CaveStrategy::Density {
            cave_size: 0.07,
            finish: DensityFinish::Decorated,
        }
    }
}

/// What happens after density caves are carved
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DensityFinish {
    /// Single top-down pass carving and decorating with fungi, stalactites,
    /// mushrooms, pooled water and lava.
    Decorated,
    /// Seed lava and ground water into stone, then carve and drop liquid
    /// left floating mid-cave.
    Seeded {
        lava: bool,
        ground_water: bool,
        lava_frequency: f32,
        ground_water_frequency: f32,
    },
}

/// Configuration for the valleys terrain pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// World seed every noise field and chunk sub-seed derives from.
    pub seed: u32,
    /// Sea level
    pub water_level: i32,
    /// Half-width of river channels, in river-noise units
    pub river_size: f32,
    /// Maximum depth of a river channel below its surface
    pub river_depth: f32,
    /// Elevation over which heat halves (or drops by 20)
    pub altitude_chill: f32,
    /// Humidity setting, neutral at 50
    pub humidity: f32,
    /// Temperature setting, neutral at 50
    pub temperature: f32,
    /// Lava never appears above this elevation
    pub lava_max_height: i32,
    /// No chunk may reach past this coordinate on any axis
    pub map_limit: i32,
    /// Halo width in cells around each requested chunk
    pub halo: i32,

    pub height_variant: HeightVariant,
    pub temperature_mode: TemperatureMode,
    pub chill_curve: ChillCurve,
    pub caves: CaveStrategy,

    pub noise: NoiseSet,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            water_level: 1,
            river_size: 0.05,
            river_depth: 5.0,
            altitude_chill: 90.0,
            humidity: 50.0,
            temperature: 50.0,
            lava_max_height: 0,
            map_limit: 31000,
            halo: 16,
            height_variant: HeightVariant::default(),
            temperature_mode: TemperatureMode::default(),
            chill_curve: ChillCurve::default(),
            caves: CaveStrategy::default(),
            noise: NoiseSet::default(),
        }
    }
}

impl GenerationConfig {
    /// Default configuration with a given seed
    pub fn with_seed(seed: u32) -> Self {
        Self { seed, ..Default::default() }
    }

    /// Read a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this configuration as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.river_size > 0.0) {
            return Err(Error::Config(format!("river_size must be positive, got {}", self.river_size)));
        }
        if self.river_depth < 0.0 {
            return Err(Error::Config(format!("river_depth must not be negative, got {}", self.river_depth)));
        }
        if self.altitude_chill < 0.0 {
            return Err(Error::Config(format!(
                "altitude_chill must not be negative, got {}",
                self.altitude_chill
            )));
        }
        if self.halo < 1 {
            return Err(Error::Config(format!("halo must be at least 1, got {}", self.halo)));
        }
        if self.map_limit <= 0 || self.water_level.abs() >= self.map_limit {
            return Err(Error::Config(format!(
                "water_level {} must lie inside map_limit {}",
                self.water_level, self.map_limit
            )));
        }
        if let HeightVariant::Iterative { max_steps: 0 } = self.height_variant {
            return Err(Error::Config("iterative height search needs max_steps > 0".into()));
        }
        if let CaveStrategy::Density { cave_size, .. } = self.caves {
            if !(cave_size > 0.0) {
                return Err(Error::Config(format!("cave_size must be positive, got {cave_size}")));
            }
        }
        Ok(())
    }

    /// Climate settings derived from this configuration
    pub fn climate(&self) -> Climate {
        Climate {
            temperature: self.temperature,
            humidity: self.humidity,
            altitude_chill: self.altitude_chill,
            water_level: self.water_level as f32,
            temperature_mode: self.temperature_mode,
            chill_curve: self.chill_curve,
        }
    }

    /// Height shaping settings derived from this configuration
    pub fn shaper(&self) -> ValleyShaper {
        ValleyShaper {
            river_size: self.river_size,
            river_depth: self.river_depth,
            water_level: self.water_level as f32,
            variant: self.height_variant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.shaper().river_size, 0.05);
        assert_eq!(config.climate().water_level, 1.0);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");

        let config = GenerationConfig {
            seed: 99,
            height_variant: HeightVariant::Iterative { max_steps: 32 },
            temperature_mode: TemperatureMode::Multiplicative,
            caves: CaveStrategy::Density {
                cave_size: 0.1,
                finish: DensityFinish::Seeded {
                    lava: true,
                    ground_water: false,
                    lava_frequency: 0.0001,
                    ground_water_frequency: 0.0001,
                },
            },
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = GenerationConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "seed": 7, "caves": "Contour" }"#).unwrap();

        let loaded = GenerationConfig::load(&path).unwrap();
        assert_eq!(loaded.seed, 7);
        assert_eq!(loaded.caves, CaveStrategy::Contour);
        assert_eq!(loaded.noise, NoiseSet::default());
    }

    #[test]
    fn test_invalid_rejected() {
        let config = GenerationConfig { river_size: 0.0, ..Default::default() };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = GenerationConfig { halo: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = GenerationConfig {
            height_variant: HeightVariant::Iterative { max_steps: 0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = GenerationConfig::load(dir.path().join("nope.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
