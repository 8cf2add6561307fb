//! Noise parameters and the default parameter set

use serde::{Deserialize, Serialize};

/// Parameters of one multi-octave noise field.
///
/// A sample is `offset + scale * fbm(p / spread)`, where the fbm uses
/// `octaves`, `persistence` and `lacunarity` and is seeded from the world
/// seed plus `seed`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    pub offset: f64,
    pub scale: f64,
    /// Spatial period per axis (x, y, z)
    pub spread: [f64; 3],
    pub seed: i32,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
}

impl NoiseParams {
    pub const fn new(
        offset: f64,
        scale: f64,
        spread: f64,
        seed: i32,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
    ) -> Self {
        Self {
            offset,
            scale,
            spread: [spread, spread, spread],
            seed,
            octaves,
            persistence,
            lacunarity,
        }
    }

    /// A field that evaluates to `value` everywhere
    pub const fn constant(value: f64) -> Self {
        Self::new(value, 0.0, 1.0, 0, 1, 1.0, 2.0)
    }
}

/// Parameters for every field the generator evaluates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSet {
    pub filler_depth: NoiseParams,
    pub heat: NoiseParams,
    pub heat_blend: NoiseParams,
    pub humidity: NoiseParams,
    pub humidity_blend: NoiseParams,

    pub terrain_height: NoiseParams,
    pub rivers: NoiseParams,
    pub valley_depth: NoiseParams,
    pub valley_profile: NoiseParams,
    pub inter_valley_slope: NoiseParams,
    pub inter_valley_fill: NoiseParams,
    pub cliffs: NoiseParams,
    pub corr: NoiseParams,

    pub contour_caves_1: NoiseParams,
    pub contour_caves_2: NoiseParams,
    pub caves_1: NoiseParams,
    pub caves_2: NoiseParams,
    pub caves_3: NoiseParams,
    pub caves_4: NoiseParams,
    pub lava_1: NoiseParams,
    pub lava_2: NoiseParams,
    pub water_1: NoiseParams,
    pub water_2: NoiseParams,

    pub plant: NoiseParams,
}

impl Default for NoiseSet {
    fn default() -> Self {
        Self {
            filler_depth: NoiseParams::new(0.0, 1.2, 150.0, 261, 3, 0.7, 2.0),
            heat: NoiseParams::new(60.0, 50.0, 750.0, 5349, 3, 0.5, 2.0),
            heat_blend: NoiseParams::new(0.0, 1.5, 8.0, 13, 2, 1.0, 2.0),
            humidity: NoiseParams::new(50.0, 50.0, 750.0, 842, 3, 0.5, 2.0),
            humidity_blend: NoiseParams::new(0.0, 1.5, 8.0, 90003, 2, 1.0, 2.0),

            terrain_height: NoiseParams::new(-10.0, 50.0, 1024.0, 5202, 6, 0.4, 2.0),
            rivers: NoiseParams::new(0.0, 1.0, 256.0, -6050, 5, 0.6, 2.0),
            valley_depth: NoiseParams::new(5.0, 4.0, 512.0, -1914, 1, 1.0, 2.0),
            valley_profile: NoiseParams::new(0.6, 0.5, 512.0, 777, 1, 1.0, 2.0),
            inter_valley_slope: NoiseParams::new(0.5, 0.5, 128.0, 746, 1, 1.0, 2.0),
            inter_valley_fill: NoiseParams::new(0.0, 1.0, 768.0, 1993, 6, 0.8, 2.0),
            cliffs: NoiseParams::new(0.0, 1.0, 750.0, 8445, 5, 1.0, 2.0),
            corr: NoiseParams::new(0.0, 1.0, 40.0, -3536, 4, 1.0, 2.0),

            contour_caves_1: NoiseParams::new(0.0, 12.0, 100.0, 52534, 4, 0.5, 2.0),
            contour_caves_2: NoiseParams::new(0.0, 12.0, 100.0, 10325, 4, 0.5, 2.0),
            caves_1: NoiseParams::new(0.0, 1.0, 32.0, -4640, 4, 0.5, 2.0),
            caves_2: NoiseParams::new(0.0, 1.0, 32.0, 8804, 4, 0.5, 2.0),
            caves_3: NoiseParams::new(0.0, 1.0, 32.0, -4780, 4, 0.5, 2.0),
            caves_4: NoiseParams::new(0.0, 1.0, 32.0, -9969, 4, 0.5, 2.0),
            lava_1: NoiseParams::new(0.0, 1.0, 32.0, 75266, 4, 0.5, 2.0),
            lava_2: NoiseParams::new(0.0, 1.0, 32.0, -89113, 4, 0.5, 2.0),
            water_1: NoiseParams::new(0.0, 1.0, 32.0, 82329, 4, 0.5, 2.0),
            water_2: NoiseParams::new(0.0, 1.0, 32.0, -59107, 4, 0.5, 2.0),

            plant: NoiseParams::new(0.0, 1.0, 200.0, 33, 3, 0.7, 2.0),
        }
    }
}
