//! Named multi-octave noise fields.
//!
//! Every field owns its own fbm generator seeded from the world seed and the
//! field's parameters, so evaluating (or skipping) one field never changes
//! the values of another.

pub mod params;
pub mod bank;

pub use params::{NoiseParams, NoiseSet};
pub use bank::{Lattice3, NoiseBank};

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Identity of each field in the bank
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldId {
    FillerDepth,
    Heat,
    HeatBlend,
    Humidity,
    HumidityBlend,
    TerrainHeight,
    Rivers,
    ValleyDepth,
    ValleyProfile,
    InterValleySlope,
    InterValleyFill,
    Cliffs,
    Corr,
    ContourCaves1,
    ContourCaves2,
    Caves1,
    Caves2,
    Caves3,
    Caves4,
    Lava1,
    Lava2,
    Water1,
    Water2,
    Plant,
}

impl FieldId {
    pub const ALL: [FieldId; 24] = [
        FieldId::FillerDepth,
        FieldId::Heat,
        FieldId::HeatBlend,
        FieldId::Humidity,
        FieldId::HumidityBlend,
        FieldId::TerrainHeight,
        FieldId::Rivers,
        FieldId::ValleyDepth,
        FieldId::ValleyProfile,
        FieldId::InterValleySlope,
        FieldId::InterValleyFill,
        FieldId::Cliffs,
        FieldId::Corr,
        FieldId::ContourCaves1,
        FieldId::ContourCaves2,
        FieldId::Caves1,
        FieldId::Caves2,
        FieldId::Caves3,
        FieldId::Caves4,
        FieldId::Lava1,
        FieldId::Lava2,
        FieldId::Water1,
        FieldId::Water2,
        FieldId::Plant,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FieldId::FillerDepth => "filler_depth",
            FieldId::Heat => "heat",
            FieldId::HeatBlend => "heat_blend",
            FieldId::Humidity => "humidity",
            FieldId::HumidityBlend => "humidity_blend",
            FieldId::TerrainHeight => "terrain_height",
            FieldId::Rivers => "rivers",
            FieldId::ValleyDepth => "valley_depth",
            FieldId::ValleyProfile => "valley_profile",
            FieldId::InterValleySlope => "inter_valley_slope",
            FieldId::InterValleyFill => "inter_valley_fill",
            FieldId::Cliffs => "cliffs",
            FieldId::Corr => "corr",
            FieldId::ContourCaves1 => "contour_caves_1",
            FieldId::ContourCaves2 => "contour_caves_2",
            FieldId::Caves1 => "caves_1",
            FieldId::Caves2 => "caves_2",
            FieldId::Caves3 => "caves_3",
            FieldId::Caves4 => "caves_4",
            FieldId::Lava1 => "lava_1",
            FieldId::Lava2 => "lava_2",
            FieldId::Water1 => "water_1",
            FieldId::Water2 => "water_2",
            FieldId::Plant => "plant",
        }
    }

    /// This field's parameters within a set
    pub fn params(self, set: &NoiseSet) -> NoiseParams {
        match self {
            FieldId::FillerDepth => set.filler_depth,
            FieldId::Heat => set.heat,
            FieldId::HeatBlend => set.heat_blend,
            FieldId::Humidity => set.humidity,
            FieldId::HumidityBlend => set.humidity_blend,
            FieldId::TerrainHeight => set.terrain_height,
            FieldId::Rivers => set.rivers,
            FieldId::ValleyDepth => set.valley_depth,
            FieldId::ValleyProfile => set.valley_profile,
            FieldId::InterValleySlope => set.inter_valley_slope,
            FieldId::InterValleyFill => set.inter_valley_fill,
            FieldId::Cliffs => set.cliffs,
            FieldId::Corr => set.corr,
            FieldId::ContourCaves1 => set.contour_caves_1,
            FieldId::ContourCaves2 => set.contour_caves_2,
            FieldId::Caves1 => set.caves_1,
            FieldId::Caves2 => set.caves_2,
            FieldId::Caves3 => set.caves_3,
            FieldId::Caves4 => set.caves_4,
            FieldId::Lava1 => set.lava_1,
            FieldId::Lava2 => set.lava_2,
            FieldId::Water1 => set.water_1,
            FieldId::Water2 => set.water_2,
            FieldId::Plant => set.plant,
        }
    }
}

/// One seeded fbm generator with its parameters
pub struct NoiseField {
    params: NoiseParams,
    fbm: Fbm<Perlin>,
}

impl NoiseField {
    pub fn new(params: NoiseParams, world_seed: u32) -> Self {
        let fbm = Fbm::<Perlin>::new(world_seed.wrapping_add(params.seed as u32))
            .set_octaves(params.octaves.max(1) as usize)
            .set_persistence(params.persistence)
            .set_lacunarity(params.lacunarity);

        Self { params, fbm }
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// Sample at column (x, z)
    #[inline]
    pub fn sample_2d(&self, x: i32, z: i32) -> f32 {
        let p = &self.params;
        if p.scale == 0.0 {
            return p.offset as f32;
        }
        let n = self.fbm.get([x as f64 / p.spread[0], z as f64 / p.spread[2]]);
        (p.offset + p.scale * n) as f32
    }

    /// Sample at cell (x, y, z)
    #[inline]
    pub fn sample_3d(&self, x: i32, y: i32, z: i32) -> f32 {
        let p = &self.params;
        if p.scale == 0.0 {
            return p.offset as f32;
        }
        let n = self.fbm.get([
            x as f64 / p.spread[0],
            y as f64 / p.spread[1],
            z as f64 / p.spread[2],
        ]);
        (p.offset + p.scale * n) as f32
    }
}
