//! Base fill: stone, sea water, river water and air from the height maps.

use glam::IVec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::columns::ChunkMaps;
use crate::math::ChunkExtent;
use crate::voxel::{ContentId, Palette, VoxelVolume};

/// Fill every undetermined cell of the requested columns, one cell past the
/// requested range above and below. Returns the highest ground surface.
///
/// Cells already decided (by an overlapping neighbor) are never touched.
pub(crate) fn base_fill(
    volume: &mut dyn VoxelVolume,
    extent: &ChunkExtent,
    maps: &ChunkMaps,
    palette: &Palette,
    water_level: i32,
    rng: &mut ChaCha8Rng,
) -> i32 {
    let (min, max) = (extent.min(), extent.max());
    let mut surface_max = i32::MIN;

    for (x, z) in extent.requested.columns() {
        let surface = maps.height(x, z);
        let river = maps.river(x, z) as i32;
        surface_max = surface_max.max(surface);

        let has_channel = river > surface;
        for y in (min.y - 1)..=(max.y + 1) {
            let p = IVec3::new(x, y, z);
            if volume.get(p) != ContentId::IGNORE {
                continue;
            }

            let content = if has_channel && y == surface + 1 {
                if rng.gen_range(1..=4) == 1 {
                    palette.sand_with_rocks
                } else {
                    palette.sand
                }
            } else if y <= surface {
                palette.stone
            } else if has_channel && y <= river {
                palette.river_water
            } else if y <= water_level {
                palette.water
            } else {
                ContentId::AIR
            };
            volume.set(p, content);
        }
    }

    surface_max
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::seed;
    use crate::math::Extent;
    use crate::terrain::{BiomeId, RIVER_NONE};
    use crate::voxel::{DenseVolume, MaterialRegistry};

    /// Volume wrapper counting writes
    struct Counting {
        inner: DenseVolume,
        writes: usize,
    }

    impl VoxelVolume for Counting {
        fn bounds(&self) -> Extent {
            self.inner.bounds()
        }
        fn get(&self, p: IVec3) -> ContentId {
            self.inner.get(p)
        }
        fn set(&mut self, p: IVec3, content: ContentId) {
            self.writes += 1;
            self.inner.set(p, content);
        }
    }

    fn maps(extent: &ChunkExtent, height: i32, river: f32) -> ChunkMaps {
        let n = extent.column_count();
        ChunkMaps {
            footprint: extent.requested,
            heights: vec![height; n],
            rivers: vec![river; n],
            biomes: vec![BiomeId::default(); n],
            heat: vec![50.0; n],
            humidity: vec![50.0; n],
        }
    }

    fn setup() -> (ChunkExtent, Palette) {
        let extent = ChunkExtent::new(IVec3::new(0, -8, 0), IVec3::new(3, 7, 3), 2).unwrap();
        let palette = Palette::resolve(&MaterialRegistry::with_defaults()).unwrap();
        (extent, palette)
    }

    #[test]
    fn test_layers_without_river() {
        let (extent, palette) = setup();
        let maps = maps(&extent, -3, RIVER_NONE);
        let mut volume = DenseVolume::new(extent.full);
        let mut rng = seed::stage_rng(1, seed::BASE_FILL);

        let surface = base_fill(&mut volume, &extent, &maps, &palette, 1, &mut rng);
        assert_eq!(surface, -3);

        let at = |y| volume.get(IVec3::new(2, y, 1));
        assert_eq!(at(-9), palette.stone);
        assert_eq!(at(-3), palette.stone);
        assert_eq!(at(-2), palette.water);
        assert_eq!(at(1), palette.water);
        assert_eq!(at(2), ContentId::AIR);
        assert_eq!(at(8), ContentId::AIR);
        // Outside the filled range
        assert_eq!(at(9), ContentId::IGNORE);
        assert_eq!(at(-10), ContentId::IGNORE);
    }

    #[test]
    fn test_river_channel() {
        let (extent, palette) = setup();
        let maps = maps(&extent, 2, 5.5);
        let mut volume = DenseVolume::new(extent.full);
        let mut rng = seed::stage_rng(1, seed::BASE_FILL);
        base_fill(&mut volume, &extent, &maps, &palette, 1, &mut rng);

        let at = |y| volume.get(IVec3::new(0, y, 0));
        assert_eq!(at(2), palette.stone);
        let bed = at(3);
        assert!(bed == palette.sand || bed == palette.sand_with_rocks);
        assert_eq!(at(4), palette.river_water);
        assert_eq!(at(5), palette.river_water);
        assert_eq!(at(6), ContentId::AIR);
    }

    #[test]
    fn test_refill_is_idempotent() {
        let (extent, palette) = setup();
        let maps = maps(&extent, 0, RIVER_NONE);
        let mut volume = Counting {
            inner: DenseVolume::new(extent.full),
            writes: 0,
        };
        let mut rng = seed::stage_rng(9, seed::BASE_FILL);

        base_fill(&mut volume, &extent, &maps, &palette, 1, &mut rng);
        let first = volume.writes;
        assert_eq!(first, 4 * 4 * 18);

        let before = volume.inner.clone();
        base_fill(&mut volume, &extent, &maps, &palette, 1, &mut rng);
        assert_eq!(volume.writes, first);
        assert_eq!(volume.inner, before);
    }

    #[test]
    fn test_decided_cells_untouched() {
        let (extent, palette) = setup();
        let maps = maps(&extent, 0, RIVER_NONE);
        let mut volume = DenseVolume::new(extent.full);
        let marker = ContentId(500);
        volume.set(IVec3::new(1, -4, 1), marker);
        volume.set(IVec3::new(1, 5, 1), marker);

        let mut rng = seed::stage_rng(9, seed::BASE_FILL);
        base_fill(&mut volume, &extent, &maps, &palette, 1, &mut rng);
        assert_eq!(volume.get(IVec3::new(1, -4, 1)), marker);
        assert_eq!(volume.get(IVec3::new(1, 5, 1)), marker);
    }
}
