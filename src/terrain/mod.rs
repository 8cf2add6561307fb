//! Terrain shaping: valleys, climate and biomes

pub mod biome;
pub mod climate;
pub mod valley;

pub use biome::{BiomeDef, BiomeId, BiomeSource, BiomeTable, StoneType};
pub use climate::{ChillCurve, Climate, TemperatureMode};
pub use valley::{HeightVariant, RIVER_NONE, ValleyInputs, ValleyShape, ValleyShaper};
