//! River consistency: drop floating river water and trim overflow.
//!
//! Runs after caves and structure placement so it sees their changes. A
//! river over a cave spanning several chunks can't be repaired from one
//! chunk's data; those columns lose their water instead.

use glam::IVec3;

use super::columns::ChunkMaps;
use crate::math::ChunkExtent;
use crate::terrain::{BiomeSource, RIVER_NONE};
use crate::voxel::{ContentId, Palette, VoxelVolume};

/// Neighborhood radius for overflow trimming
const OVERFLOW_RADIUS: i32 = 2;

/// Fix every requested column whose river surface lies inside the chunk's
/// vertical range. Returns the number of river cells cleared.
pub(crate) fn fix_rivers(
    volume: &mut dyn VoxelVolume,
    extent: &ChunkExtent,
    maps: &ChunkMaps,
    biomes: &dyn BiomeSource,
    palette: &Palette,
) -> usize {
    let (min, max) = (extent.min(), extent.max());
    let mut cleared = 0;

    for (x, z) in extent.requested.columns() {
        let river = maps.river(x, z);
        if river == RIVER_NONE {
            continue;
        }
        let river_y = river as i32;
        if river_y < min.y || river_y > max.y {
            continue;
        }

        let river_water = biomes.get(maps.biome(x, z)).river_water;
        let is_river = |c: ContentId| c == palette.river_water || c == river_water;
        let at = |y| IVec3::new(x, y, z);

        // Find what the river rests on
        let mut floor = river_y;
        while floor >= min.y && is_river(volume.get(at(floor))) {
            floor -= 1;
        }
        let supported = floor >= min.y && volume.get(at(floor)) != ContentId::AIR;
        if !supported {
            for y in (floor + 1)..=river_y {
                volume.set(at(y), ContentId::AIR);
                cleared += 1;
            }
            continue;
        }

        // Lowest dry neighbor below the river surface
        let mut lowest = None;
        for dz in -OVERFLOW_RADIUS..=OVERFLOW_RADIUS {
            for dx in -OVERFLOW_RADIUS..=OVERFLOW_RADIUS {
                let (nx, nz) = (x + dx, z + dz);
                if !maps.contains(nx, nz) || maps.river(nx, nz) != RIVER_NONE {
                    continue;
                }
                let height = maps.height(nx, nz);
                if height < river_y {
                    lowest = Some(lowest.map_or(height, |h: i32| h.min(height)));
                }
            }
        }

        if let Some(lowest) = lowest {
            for y in (lowest + 1).max(min.y)..=river_y {
                if is_river(volume.get(at(y))) {
                    volume.set(at(y), ContentId::AIR);
                    cleared += 1;
                }
            }
        }
    }

    if cleared > 0 {
        log::trace!("Cleared {} river cells at {}", cleared, extent.min());
    }
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{BiomeDef, BiomeId, BiomeTable};
    use crate::voxel::{DenseVolume, MaterialRegistry};

    struct Fixture {
        extent: ChunkExtent,
        maps: ChunkMaps,
        palette: Palette,
        table: BiomeTable,
        volume: DenseVolume,
    }

    /// Flat stone at y = 0 everywhere with no rivers
    fn fixture() -> Fixture {
        let registry = MaterialRegistry::with_defaults();
        let palette = Palette::resolve(&registry).unwrap();
        let table = BiomeTable::single(BiomeDef::plain(&palette));
        let extent = ChunkExtent::new(IVec3::new(0, -8, 0), IVec3::new(7, 7, 7), 2).unwrap();
        let n = extent.column_count();
        let maps = ChunkMaps {
            footprint: extent.requested,
            heights: vec![0; n],
            rivers: vec![RIVER_NONE; n],
            biomes: vec![BiomeId::default(); n],
            heat: vec![50.0; n],
            humidity: vec![50.0; n],
        };
        let mut volume = DenseVolume::new(extent.full);
        volume.fill(extent.full, ContentId::AIR);
        volume.fill(
            crate::math::Extent::new(extent.full.min, IVec3::new(extent.full.max.x, 0, extent.full.max.z)),
            palette.stone,
        );
        Fixture { extent, maps, palette, table, volume }
    }

    /// Put a river channel with surface `surface` over ground `ground` at (x, z)
    fn river_column(f: &mut Fixture, x: i32, z: i32, ground: i32, surface: i32) {
        let i = f.maps.index(x, z);
        f.maps.heights[i] = ground;
        f.maps.rivers[i] = surface as f32 + 0.5;
        for y in (ground + 1)..=0 {
            f.volume.set(IVec3::new(x, y, z), ContentId::AIR);
        }
        f.volume.set(IVec3::new(x, ground, z), f.palette.sand);
        for y in (ground + 1)..=surface {
            f.volume.set(IVec3::new(x, y, z), f.palette.river_water);
        }
    }

    fn run(f: &mut Fixture) -> usize {
        fix_rivers(&mut f.volume, &f.extent, &f.maps, &f.table, &f.palette)
    }

    #[test]
    fn test_supported_river_is_kept() {
        let mut f = fixture();
        // Every neighbor also carries the river, so none can overflow
        for (x, z) in f.extent.requested.columns() {
            river_column(&mut f, x, z, -3, 2);
        }
        assert_eq!(run(&mut f), 0);
        assert_eq!(f.volume.get(IVec3::new(4, 2, 4)), f.palette.river_water);
        assert_eq!(f.volume.get(IVec3::new(4, -2, 4)), f.palette.river_water);
    }

    #[test]
    fn test_floating_river_is_cleared() {
        let mut f = fixture();
        for (x, z) in f.extent.requested.columns() {
            river_column(&mut f, x, z, -3, 2);
        }
        // A cave under one column removes its river bed
        f.volume.set(IVec3::new(3, -3, 3), ContentId::AIR);

        assert_eq!(run(&mut f), 5);
        for y in -3..=2 {
            assert_eq!(f.volume.get(IVec3::new(3, y, 3)), ContentId::AIR);
        }
        assert_eq!(f.volume.get(IVec3::new(3, 2, 4)), f.palette.river_water);
    }

    #[test]
    fn test_river_to_chunk_floor_is_cleared() {
        let mut f = fixture();
        for (x, z) in f.extent.requested.columns() {
            river_column(&mut f, x, z, -3, 2);
        }
        for y in -10..=-3 {
            f.volume.set(IVec3::new(5, y, 5), f.palette.river_water);
        }
        run(&mut f);
        for y in -8..=2 {
            assert_eq!(f.volume.get(IVec3::new(5, y, 5)), ContentId::AIR);
        }
        // Below the requested range nothing is touched
        assert_eq!(f.volume.get(IVec3::new(5, -9, 5)), f.palette.river_water);
    }

    #[test]
    fn test_overflow_trimmed_to_dry_neighbor() {
        let mut f = fixture();
        river_column(&mut f, 4, 4, -3, 3);
        // Dry neighbor two cells away sits at y = 0
        let cleared = run(&mut f);
        assert_eq!(cleared, 3);
        assert_eq!(f.volume.get(IVec3::new(4, 3, 4)), ContentId::AIR);
        assert_eq!(f.volume.get(IVec3::new(4, 1, 4)), ContentId::AIR);
        assert_eq!(f.volume.get(IVec3::new(4, 0, 4)), f.palette.river_water);
        assert_eq!(f.volume.get(IVec3::new(4, -2, 4)), f.palette.river_water);
    }

    #[test]
    fn test_neighbors_outside_footprint_ignored() {
        let mut f = fixture();
        for (x, z) in f.extent.requested.columns() {
            river_column(&mut f, x, z, -3, 2);
        }
        // Corner column: its in-footprint neighbors all carry rivers
        assert_eq!(run(&mut f), 0);
        assert_eq!(f.volume.get(IVec3::new(0, 2, 0)), f.palette.river_water);
    }

    #[test]
    fn test_river_above_chunk_skipped() {
        let mut f = fixture();
        river_column(&mut f, 2, 2, 5, 7);
        let i = f.maps.index(2, 2);
        f.maps.rivers[i] = 30.0;
        assert_eq!(run(&mut f), 0);
    }
}
