//! Biome stratification: top, filler and bulk stone layers per column.

use glam::IVec3;

use super::columns::ChunkMaps;
use crate::math::ChunkExtent;
use crate::terrain::{BiomeDef, BiomeSource, StoneType};
use crate::voxel::{ContentId, Palette, VoxelVolume};

/// Placement count that disables top/filler until the next surface
const STONE_LEVEL: u32 = u32::MAX;

/// Resolve the biome map from heat, humidity and the height map.
pub(crate) fn resolve_biomes(maps: &mut ChunkMaps, biomes: &dyn BiomeSource) {
    for i in 0..maps.biomes.len() {
        maps.biomes[i] = biomes.resolve(maps.heat[i], maps.humidity[i], maps.heights[i]);
    }
}

/// Layer state of one column walk
struct ColumnState<'a> {
    biome: Option<&'a BiomeDef>,
    depth_top: u32,
    base_filler: u32,
    placed: u32,
    air_above: bool,
    water_above: bool,
}

/// Walk every requested column top-down, replacing base stone and water with
/// the biome's layered materials. Returns the dominant stone flavor seen.
pub(crate) fn stratify(
    volume: &mut dyn VoxelVolume,
    extent: &ChunkExtent,
    maps: &ChunkMaps,
    biomes: &dyn BiomeSource,
    palette: &Palette,
    filler_depth: &[f32],
    water_level: i32,
) -> StoneType {
    let (min, max) = (extent.min(), extent.max());
    let mut stone_type = StoneType::Stone;

    for (x, z) in extent.requested.columns() {
        let index = maps.index(x, z);
        let heat = maps.heat[index];
        let humidity = maps.humidity[index];

        // Material just above the chunk, from a neighbor or the base fill overshoot
        let c_above = volume.get(IVec3::new(x, max.y + 1, z));
        let air_above = c_above == ContentId::AIR;
        let water_above = c_above == palette.water;
        let mut state = ColumnState {
            biome: None,
            depth_top: 0,
            base_filler: 0,
            placed: if air_above || water_above { 0 } else { STONE_LEVEL },
            air_above,
            water_above,
        };

        for y in (min.y..=max.y).rev() {
            let p = IVec3::new(x, y, z);
            let c = volume.get(p);
            let is_water = c == palette.water || c == palette.river_water;

            let exposed_stone = c == palette.stone
                && (state.air_above || state.water_above || state.biome.is_none());
            let exposed_water = is_water && (state.air_above || state.biome.is_none());
            if exposed_stone || exposed_water {
                let biome = biomes.get(biomes.resolve(heat, humidity, y));
                state.depth_top = biome.depth_top.max(0) as u32;
                state.base_filler = (biome.depth_top as f32
                    + biome.depth_filler as f32
                    + filler_depth[index])
                    .max(0.0) as u32;
                state.biome = Some(biome);

                let flavor = StoneType::of(biome.stone, palette);
                if flavor != StoneType::Stone {
                    stone_type = flavor;
                }
            }

            match state.biome {
                Some(biome) if c == palette.stone => {
                    // Keep top and filler supported
                    let below = volume.get(p - IVec3::Y);
                    if below == ContentId::AIR || below == palette.water || below == palette.river_water {
                        state.placed = STONE_LEVEL;
                    }

                    let layer = if state.placed < state.depth_top {
                        state.placed += 1;
                        biome.top
                    } else if state.placed < state.base_filler {
                        state.placed += 1;
                        biome.filler
                    } else {
                        biome.stone
                    };
                    volume.set(p, layer);
                    state.air_above = false;
                    state.water_above = false;
                }
                Some(biome) if c == palette.water => {
                    let top = y > water_level - biome.depth_water_top;
                    volume.set(p, if top { biome.water_top } else { biome.water });
                    state.placed = 0;
                    state.air_above = false;
                    state.water_above = true;
                }
                Some(biome) if c == palette.river_water => {
                    volume.set(p, biome.river_water);
                    state.placed = STONE_LEVEL;
                    state.air_above = false;
                    state.water_above = true;
                }
                _ if c == ContentId::AIR => {
                    state.placed = 0;
                    state.air_above = true;
                    state.water_above = false;
                }
                _ => {
                    // Material from a neighbor or an earlier pass
                    state.placed = STONE_LEVEL;
                    state.air_above = false;
                    state.water_above = false;
                }
            }
        }
    }

    stone_type
}
