//! Per-column maps: climate, shaped heights and rivers.
//!
//! Lattice evaluation and single-point queries share [`derive_column`], so
//! a point query reproduces the chunk's maps bit for bit.

use crate::field::{FieldId, NoiseBank};
use crate::math::Extent;
use crate::terrain::{BiomeId, Climate, ValleyInputs, ValleyShaper};

/// Raw 2D samples of one column
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RawColumn {
    pub heat: f32,
    pub heat_blend: f32,
    pub humidity: f32,
    pub humidity_blend: f32,
    pub valley: ValleyInputs,
}

impl RawColumn {
    /// Sample every 2D field at one column
    pub fn sample(bank: &NoiseBank, x: i32, z: i32) -> Self {
        let s = |id| bank.sample_2d(id, x, z);
        Self {
            heat: s(FieldId::Heat),
            heat_blend: s(FieldId::HeatBlend),
            humidity: s(FieldId::Humidity),
            humidity_blend: s(FieldId::HumidityBlend),
            valley: ValleyInputs {
                terrain_height: s(FieldId::TerrainHeight),
                rivers: s(FieldId::Rivers),
                valley_depth: s(FieldId::ValleyDepth),
                valley_profile: s(FieldId::ValleyProfile),
                inter_valley_slope: s(FieldId::InterValleySlope),
                inter_valley_fill: s(FieldId::InterValleyFill),
                cliffs: s(FieldId::Cliffs),
                corr: s(FieldId::Corr),
            },
        }
    }
}

/// Final values of one column
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Column {
    pub height: i32,
    pub river: f32,
    pub heat: f32,
    pub humidity: f32,
}

/// Shape a column and derive its climate.
pub(crate) fn derive_column(
    bank: &NoiseBank,
    climate: &Climate,
    shaper: &ValleyShaper,
    x: i32,
    z: i32,
    raw: &RawColumn,
) -> Column {
    let shape = shaper.shape(&raw.valley, |y| bank.sample_3d(FieldId::InterValleyFill, x, y, z));

    let heat = climate.blend_heat(raw.heat, raw.heat_blend);
    let humidity = climate.blend_humidity(raw.humidity, raw.humidity_blend);

    Column {
        height: shape.ground as i32,
        river: shape.river,
        heat: climate.heat_by_altitude(heat, shape.ground),
        humidity: climate.humidity_by_terrain(humidity, shape.ground, shape.valley),
    }
}

/// 2D maps produced for the requested footprint of one chunk.
///
/// Indexed by [`Extent::column_index`] over `footprint`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkMaps {
    pub footprint: Extent,
    /// Ground surface elevation
    pub heights: Vec<i32>,
    /// River surface elevation or `RIVER_NONE`
    pub rivers: Vec<f32>,
    pub biomes: Vec<BiomeId>,
    pub heat: Vec<f32>,
    pub humidity: Vec<f32>,
}

impl ChunkMaps {
    #[inline]
    pub fn index(&self, x: i32, z: i32) -> usize {
        self.footprint.column_index(x, z)
    }

    /// Whether column (x, z) is part of the footprint
    pub fn contains(&self, x: i32, z: i32) -> bool {
        x >= self.footprint.min.x
            && x <= self.footprint.max.x
            && z >= self.footprint.min.z
            && z <= self.footprint.max.z
    }

    pub fn height(&self, x: i32, z: i32) -> i32 {
        self.heights[self.index(x, z)]
    }

    pub fn river(&self, x: i32, z: i32) -> f32 {
        self.rivers[self.index(x, z)]
    }

    pub fn biome(&self, x: i32, z: i32) -> BiomeId {
        self.biomes[self.index(x, z)]
    }

    pub fn column_count(&self) -> usize {
        self.heights.len()
    }
}

/// Column noise only the generator itself consumes
pub(crate) struct ColumnNoise {
    pub filler_depth: Vec<f32>,
    pub plant: Vec<f32>,
}

/// Evaluate all 2D fields over `footprint` and derive its maps.
///
/// The biome map is left at the default biome; it is resolved once the
/// height map is final.
pub(crate) fn compute_columns(
    bank: &NoiseBank,
    climate: &Climate,
    shaper: &ValleyShaper,
    footprint: Extent,
) -> (ChunkMaps, ColumnNoise) {
    let map = |id| bank.map_2d(id, &footprint);
    let heat = map(FieldId::Heat);
    let heat_blend = map(FieldId::HeatBlend);
    let humidity = map(FieldId::Humidity);
    let humidity_blend = map(FieldId::HumidityBlend);
    let terrain_height = map(FieldId::TerrainHeight);
    let rivers = map(FieldId::Rivers);
    let valley_depth = map(FieldId::ValleyDepth);
    let valley_profile = map(FieldId::ValleyProfile);
    let inter_valley_slope = map(FieldId::InterValleySlope);
    let inter_valley_fill = map(FieldId::InterValleyFill);
    let cliffs = map(FieldId::Cliffs);
    let corr = map(FieldId::Corr);

    let n = terrain_height.len();
    let mut maps = ChunkMaps {
        footprint,
        heights: Vec::with_capacity(n),
        rivers: Vec::with_capacity(n),
        biomes: vec![BiomeId::default(); n],
        heat: Vec::with_capacity(n),
        humidity: Vec::with_capacity(n),
    };

    for (i, (x, z)) in footprint.columns().enumerate() {
        let raw = RawColumn {
            heat: heat[i],
            heat_blend: heat_blend[i],
            humidity: humidity[i],
            humidity_blend: humidity_blend[i],
            valley: ValleyInputs {
                terrain_height: terrain_height[i],
                rivers: rivers[i],
                valley_depth: valley_depth[i],
                valley_profile: valley_profile[i],
                inter_valley_slope: inter_valley_slope[i],
                inter_valley_fill: inter_valley_fill[i],
                cliffs: cliffs[i],
                corr: corr[i],
            },
        };
        let column = derive_column(bank, climate, shaper, x, z, &raw);
        maps.heights.push(column.height);
        maps.rivers.push(column.river);
        maps.heat.push(column.heat);
        maps.humidity.push(column.humidity);
    }

    let noise = ColumnNoise {
        filler_depth: map(FieldId::FillerDepth),
        plant: map(FieldId::Plant),
    };

    (maps, noise)
}
