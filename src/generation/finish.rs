//! Finishing pass: biome dust on exposed surfaces and aquatic plants.

use glam::IVec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::columns::ChunkMaps;
use crate::math::ChunkExtent;
use crate::terrain::BiomeSource;
use crate::voxel::{ContentId, MaterialRegistry, Palette, VoxelVolume};

/// Settle one cell of biome dust on the topmost solid surface of every
/// column. Returns the number of dust cells placed.
pub(crate) fn dust_top(
    volume: &mut dyn VoxelVolume,
    extent: &ChunkExtent,
    maps: &ChunkMaps,
    biomes: &dyn BiomeSource,
    registry: &MaterialRegistry,
    water_level: i32,
) -> usize {
    let (min, max) = (extent.min(), extent.max());
    if max.y < water_level {
        return 0;
    }

    let top = extent.full.max.y;
    let mut placed = 0;
    for (x, z) in extent.requested.columns() {
        let Some(dust) = biomes.get(maps.biome(x, z)).dust else {
            continue;
        };
        let at = |y| IVec3::new(x, y, z);

        let start = match volume.get(at(top)) {
            ContentId::AIR => top - 1,
            ContentId::IGNORE if volume.get(at(max.y + 1)) == ContentId::AIR => max.y,
            _ => continue,
        };

        let mut y = start;
        while y >= min.y - 1 && volume.get(at(y)) == ContentId::AIR {
            y -= 1;
        }
        if y < min.y - 1 {
            continue;
        }

        let c = volume.get(at(y));
        if c != ContentId::IGNORE && c != dust && !registry.is_buildable_to(c) {
            volume.set(at(y + 1), dust);
            placed += 1;
        }
    }
    placed
}

/// Place arrow arum on river sand and water lilies on open river water.
/// Returns the number of plants placed.
pub(crate) fn water_plants(
    volume: &mut dyn VoxelVolume,
    extent: &ChunkExtent,
    maps: &ChunkMaps,
    biomes: &dyn BiomeSource,
    palette: &Palette,
    plant_noise: &[f32],
    rng: &mut ChaCha8Rng,
) -> usize {
    let (min, max) = (extent.min(), extent.max());
    let mut placed = 0;

    for (x, z) in extent.requested.columns() {
        let index = maps.index(x, z);
        let heat = maps.heat[index];
        let plant = plant_noise[index];
        let river_water = biomes.get(maps.biome(x, z)).river_water;
        let is_river = |c: ContentId| c == palette.river_water || c == river_water;

        for y in min.y..max.y {
            let p = IVec3::new(x, y, z);
            let c = volume.get(p);
            let up = volume.get(p + IVec3::Y);

            if c == palette.sand && palette.is_water(up) && plant < 0.1 && rng.gen_range(1..=20) < 5 {
                let enclosed = [IVec3::X, IVec3::NEG_X, IVec3::Z, IVec3::NEG_Z].iter().all(|d| {
                    let n = volume.get(p + *d);
                    !palette.is_water(n) && n != ContentId::AIR && n != ContentId::IGNORE
                });
                if enclosed && is_river(up) && heat > 35.0 {
                    volume.set(p, palette.arrow_arum);
                    placed += 1;
                }
            } else if is_river(c)
                && up == ContentId::AIR
                && heat > 65.0
                && plant.abs() < 0.2
                && rng.gen_range(1..=20) < 4
            {
                volume.set(p + IVec3::Y, palette.waterlily);
                placed += 1;
            }
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::seed;
    use crate::math::Extent;
    use crate::terrain::{BiomeDef, BiomeId, BiomeTable, RIVER_NONE};
    use crate::voxel::DenseVolume;

    struct Fixture {
        extent: ChunkExtent,
        maps: ChunkMaps,
        registry: MaterialRegistry,
        palette: Palette,
        volume: DenseVolume,
    }

    /// Ground at `ground` over the chunk at `min_y..min_y + 15`, air above
    fn fixture(min_y: i32, ground: i32, heat: f32) -> Fixture {
        let registry = MaterialRegistry::with_defaults();
        let palette = Palette::resolve(&registry).unwrap();
        let extent =
            ChunkExtent::new(IVec3::new(0, min_y, 0), IVec3::new(7, min_y + 15, 7), 4).unwrap();
        let n = extent.column_count();
        let maps = ChunkMaps {
            footprint: extent.requested,
            heights: vec![ground; n],
            rivers: vec![RIVER_NONE; n],
            biomes: vec![BiomeId::default(); n],
            heat: vec![heat; n],
            humidity: vec![50.0; n],
        };
        let full = extent.full;
        let mut volume = DenseVolume::new(full);
        volume.fill(full, ContentId::AIR);
        volume.fill(Extent::new(full.min, IVec3::new(full.max.x, ground, full.max.z)), palette.stone);
        Fixture { extent, maps, registry, palette, volume }
    }

    fn snowy(f: &Fixture) -> (BiomeTable, ContentId) {
        let snow = f.registry.id("snow").unwrap();
        let table = BiomeTable::single(BiomeDef {
            dust: Some(snow),
            ..BiomeDef::plain(&f.palette)
        });
        (table, snow)
    }

    #[test]
    fn test_dust_on_surface() {
        let mut f = fixture(0, 5, 50.0);
        let (table, snow) = snowy(&f);
        let placed = dust_top(&mut f.volume, &f.extent, &f.maps, &table, &f.registry, 1);
        assert_eq!(placed, f.extent.column_count());
        assert_eq!(f.volume.get(IVec3::new(3, 6, 3)), snow);
        assert_eq!(f.volume.get(IVec3::new(3, 7, 3)), ContentId::AIR);
    }

    #[test]
    fn test_dust_suppressed_below_sea_level() {
        let mut f = fixture(-40, -30, 50.0);
        let (table, snow) = snowy(&f);
        let placed = dust_top(&mut f.volume, &f.extent, &f.maps, &table, &f.registry, 1);
        assert_eq!(placed, 0);
        assert_eq!(f.volume.count_in(f.extent.full, snow), 0);
    }

    #[test]
    fn test_no_dust_on_water_or_without_biome_dust() {
        let mut f = fixture(0, 5, 50.0);
        let (table, snow) = snowy(&f);
        f.volume.set(IVec3::new(2, 5, 2), f.palette.water);
        dust_top(&mut f.volume, &f.extent, &f.maps, &table, &f.registry, 1);
        assert_eq!(f.volume.get(IVec3::new(2, 6, 2)), ContentId::AIR);

        let plain = BiomeTable::single(BiomeDef::plain(&f.palette));
        let mut g = fixture(0, 5, 50.0);
        assert_eq!(dust_top(&mut g.volume, &g.extent, &g.maps, &plain, &g.registry, 1), 0);
        assert_eq!(g.volume.count_in(g.extent.full, snow), 0);
    }

    #[test]
    fn test_dust_needs_open_sky() {
        let mut f = fixture(0, 5, 50.0);
        let (table, _) = snowy(&f);
        // Undetermined halo with solid cell right above the chunk
        let full = f.extent.full;
        f.volume.fill(Extent::new(IVec3::new(full.min.x, 16, full.min.z), full.max), ContentId::IGNORE);
        f.volume.set(IVec3::new(1, 16, 1), f.palette.stone);
        dust_top(&mut f.volume, &f.extent, &f.maps, &table, &f.registry, 1);
        assert_eq!(f.volume.get(IVec3::new(1, 6, 1)), ContentId::AIR);
    }

    #[test]
    fn test_waterlilies_on_warm_rivers() {
        let mut f = fixture(0, 3, 70.0);
        let table = BiomeTable::single(BiomeDef::plain(&f.palette));
        for (x, z) in f.extent.requested.columns() {
            f.volume.set(IVec3::new(x, 4, z), f.palette.river_water);
        }
        let plant = vec![0.0; f.extent.column_count()];
        let mut rng = seed::stage_rng(99, seed::WATER_PLANTS);

        let placed =
            water_plants(&mut f.volume, &f.extent, &f.maps, &table, &f.palette, &plant, &mut rng);
        assert!(placed > 0);
        assert_eq!(f.volume.count_in(f.extent.requested, f.palette.waterlily), placed);
        for (x, z) in f.extent.requested.columns() {
            let c = f.volume.get(IVec3::new(x, 5, z));
            assert!(c == ContentId::AIR || c == f.palette.waterlily);
        }
    }

    #[test]
    fn test_no_waterlilies_when_cold() {
        let mut f = fixture(0, 3, 20.0);
        let table = BiomeTable::single(BiomeDef::plain(&f.palette));
        for (x, z) in f.extent.requested.columns() {
            f.volume.set(IVec3::new(x, 4, z), f.palette.river_water);
        }
        let plant = vec![0.0; f.extent.column_count()];
        let mut rng = seed::stage_rng(99, seed::WATER_PLANTS);
        let placed =
            water_plants(&mut f.volume, &f.extent, &f.maps, &table, &f.palette, &plant, &mut rng);
        assert_eq!(placed, 0);
    }

    #[test]
    fn test_arrow_arum_on_enclosed_river_sand() {
        let mut f = fixture(0, 3, 40.0);
        let table = BiomeTable::single(BiomeDef::plain(&f.palette));
        let full = f.extent.full;
        f.volume.fill(Extent::new(IVec3::new(full.min.x, 3, full.min.z), IVec3::new(full.max.x, 3, full.max.z)), f.palette.sand);
        f.volume.fill(Extent::new(IVec3::new(full.min.x, 4, full.min.z), IVec3::new(full.max.x, 4, full.max.z)), f.palette.river_water);
        let plant = vec![0.0; f.extent.column_count()];
        let mut rng = seed::stage_rng(7, seed::WATER_PLANTS);

        let placed =
            water_plants(&mut f.volume, &f.extent, &f.maps, &table, &f.palette, &plant, &mut rng);
        assert!(placed > 0);
        assert_eq!(f.volume.count_in(f.extent.requested, f.palette.arrow_arum), placed);
    }
}
