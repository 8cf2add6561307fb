//! Cave carving strategies.
//!
//! The strategy is chosen once per chunk. Every effect here is best effort:
//! a decoration whose preconditions are unmet is simply not placed.

use glam::IVec3;
use rand::Rng;

use super::columns::ChunkMaps;
use super::config::{CaveStrategy, DensityFinish};
use super::{seed, tunnels};
use crate::field::{FieldId, Lattice3, NoiseBank};
use crate::math::{ChunkExtent, Extent};
use crate::terrain::BiomeSource;
use crate::voxel::{ContentId, MaterialRegistry, Palette, VoxelVolume};

/// Contoured noise product above which the contour strategy carves
const CONTOUR_THRESHOLD: f32 = 0.3;

/// Everything a cave pass reads besides the volume
pub(crate) struct CaveInputs<'a> {
    pub extent: &'a ChunkExtent,
    pub maps: &'a ChunkMaps,
    pub bank: &'a NoiseBank,
    pub registry: &'a MaterialRegistry,
    pub biomes: &'a dyn BiomeSource,
    pub palette: &'a Palette,
    pub block_seed: u32,
    pub water_level: i32,
    pub lava_max_height: i32,
    /// Highest ground surface from the base fill
    pub surface_max: i32,
}

impl CaveInputs<'_> {
    /// Requested columns, one cell past the requested range vertically
    fn padded_region(&self) -> Extent {
        Extent::new(self.extent.min() - IVec3::Y, self.extent.max() + IVec3::Y)
    }

    fn has_ground(&self) -> bool {
        self.surface_max >= self.extent.min().y
    }
}

/// Run the configured strategy.
pub(crate) fn carve(strategy: &CaveStrategy, volume: &mut dyn VoxelVolume, inputs: &CaveInputs) {
    match *strategy {
        CaveStrategy::Off => {}
        CaveStrategy::Contour => carve_contour(volume, inputs),
        CaveStrategy::Density { cave_size, finish: DensityFinish::Decorated } => {
            carve_decorated(volume, inputs, cave_size)
        }
        CaveStrategy::Density {
            cave_size,
            finish:
                DensityFinish::Seeded {
                    lava,
                    ground_water,
                    lava_frequency,
                    ground_water_frequency,
                },
        } => {
            if inputs.has_ground() {
                let seeding = LiquidSeeding {
                    lava,
                    ground_water,
                    lava_frequency,
                    ground_water_frequency,
                };
                seed_liquids(volume, inputs, &seeding);
                carve_density_seeded(volume, inputs, cave_size);
            }
        }
    }
}

#[inline]
fn contour(v: f32) -> f32 {
    let v = v.abs();
    if v >= 1.0 { 0.0 } else { 1.0 - v }
}

/// Two contoured noises, then zero to two cave valleys.
fn carve_contour(volume: &mut dyn VoxelVolume, inputs: &CaveInputs) {
    if inputs.has_ground() {
        let region = inputs.padded_region();
        let n1 = Lattice3::evaluate(inputs.bank, FieldId::ContourCaves1, region);
        let n2 = Lattice3::evaluate(inputs.bank, FieldId::ContourCaves2, region);

        for z in region.min.z..=region.max.z {
            for y in region.min.y..=region.max.y {
                for x in region.min.x..=region.max.x {
                    let p = IVec3::new(x, y, z);
                    if contour(n1.at(p)) * contour(n2.at(p)) <= CONTOUR_THRESHOLD {
                        continue;
                    }
                    let c = volume.get(p);
                    if c != ContentId::AIR && inputs.registry.is_ground_content(c) {
                        volume.set(p, ContentId::AIR);
                    }
                }
            }
        }
    }

    let mut rng = seed::stage_rng(inputs.block_seed, seed::TUNNELS);
    let count = tunnels::valley_count(&mut rng);
    for _ in 0..count {
        tunnels::carve_cave_valley(volume, inputs.extent, inputs.registry, &mut rng, inputs.surface_max);
    }
    if count > 0 {
        log::trace!("Carved {} cave valleys at {}", count, inputs.extent.min());
    }
}

/// Four-noise cave density; caves lie where the sum of squares is small.
struct Density {
    fields: [Lattice3; 4],
}

impl Density {
    fn evaluate(bank: &NoiseBank, region: Extent) -> Self {
        Self {
            fields: [
                Lattice3::evaluate(bank, FieldId::Caves1, region),
                Lattice3::evaluate(bank, FieldId::Caves2, region),
                Lattice3::evaluate(bank, FieldId::Caves3, region),
                Lattice3::evaluate(bank, FieldId::Caves4, region),
            ],
        }
    }

    #[inline]
    fn at(&self, p: IVec3) -> f32 {
        self.fields.iter().map(|f| f.at(p).powi(2)).sum()
    }
}

/// Top-down walk per column that carves density caves and decorates them.
///
/// A cell inside a cave is carved unless it is already air or a liquid.
/// Cave ceilings may grow glowing fungus or stalactites; floors reached
/// after an air run get mushrooms, stalagmites, pooled water or lava.
fn carve_decorated(volume: &mut dyn VoxelVolume, inputs: &CaveInputs, cave_size: f32) {
    if !inputs.has_ground() {
        return;
    }

    let region = inputs.padded_region();
    let density = Density::evaluate(inputs.bank, region);
    let palette = inputs.palette;
    let mut rng = seed::stage_rng(inputs.block_seed, seed::CAVE_DECORATION);

    for (x, z) in inputs.extent.requested.columns() {
        let humidity = inputs.maps.humidity[inputs.maps.index(x, z)];
        // Drier caves roll higher and so decorate less
        let weigh = |sr: u32| {
            if humidity > 0.0 {
                (sr as f32 * 100.0 / humidity) as u32
            } else {
                sr
            }
        };

        let mut above = ContentId::IGNORE;
        let mut underground = false;
        let mut air_count = 0u32;

        for y in (region.min.y..=region.max.y).rev() {
            let p = IVec3::new(x, y, z);
            let up = p + IVec3::Y;
            let c = volume.get(p);
            let in_cave = density.at(p) < cave_size;

            if palette.is_stone(above) || y < -10 {
                underground = true;
            }

            if in_cave && c != ContentId::AIR && inputs.registry.is_ground_content(c) {
                let sr = if palette.is_stone(above) {
                    weigh(rng.gen_range(0..=99))
                } else {
                    1000
                };

                if sr < 4 {
                    volume.set(up, palette.fungal_stone);
                    volume.set(p, ContentId::AIR);
                    air_count += 1;
                } else if sr < 19 {
                    volume.set(p, palette.stalactite);
                } else {
                    volume.set(p, ContentId::AIR);
                    air_count += 1;
                }
            } else if air_count > 0 && palette.is_stone(c) {
                let sr = weigh(rng.gen_range(0..=999));

                if !underground {
                    // First floor under an opening to the surface
                    let biome = inputs.biomes.get(inputs.maps.biome(x, z));
                    volume.set(p, biome.filler);
                    underground = true;
                } else if sr < 3 {
                    if y < inputs.water_level {
                        volume.set(up, palette.water);
                    }
                } else if sr < 33 {
                    if y < -10 {
                        volume.set(p, palette.dirt);
                        volume.set(up, palette.mushroom_red);
                    }
                } else if sr < 63 {
                    if y < -10 {
                        volume.set(p, palette.dirt);
                        volume.set(up, palette.mushroom_brown);
                    }
                } else if sr < 83 {
                    if y < -25 && air_count > 1 {
                        volume.set(p, palette.dirt);
                        volume.set(up, palette.giant_mushroom_stem);
                        volume.set(up + IVec3::Y, palette.huge_mushroom_cap);
                    }
                } else if sr < 93 {
                    if y < -50 && air_count > 2 {
                        volume.set(p, palette.dirt);
                        volume.set(up, palette.giant_mushroom_stem);
                        volume.set(up + IVec3::Y, palette.giant_mushroom_stem);
                        volume.set(up + IVec3::Y * 2, palette.giant_mushroom_cap);
                    }
                } else if sr < 243 {
                    if y < -10 {
                        volume.set(up, palette.stalagmite);
                    }
                } else if sr < 1000 && ((999 - sr) as f32) < (-(y as f32) / 10000.0).ceil() {
                    // Grows likelier with depth
                    if y < inputs.lava_max_height {
                        volume.set(up, palette.lava);
                    }
                }
            }

            if !in_cave {
                air_count = 0;
            }
            above = volume.get(p);
        }
    }
}

/// Liquid seeding switches and rates
struct LiquidSeeding {
    lava: bool,
    ground_water: bool,
    lava_frequency: f32,
    ground_water_frequency: f32,
}

/// Lava seeding threshold for a chunk whose floor is at `min_y`. It rises in
/// whole steps for every 2000 cells below the lava ceiling.
fn lava_chance(min_y: i32, lava_max_height: i32, frequency: f32) -> f32 {
    let steps = min_y.saturating_sub(lava_max_height) / 2000;
    (1 - steps) as f32 * frequency
}

/// Turn stone into ground water below sea level and into lava below the lava
/// ceiling, where their noise tests pass.
fn seed_liquids(volume: &mut dyn VoxelVolume, inputs: &CaveInputs, seeding: &LiquidSeeding) {
    if !seeding.lava && !seeding.ground_water {
        return;
    }

    let extent = inputs.extent;
    let (min, max) = (extent.min(), extent.max());
    let palette = inputs.palette;
    let bank = inputs.bank;

    let lava_chance = lava_chance(min.y, inputs.lava_max_height, seeding.lava_frequency);

    let water = seeding.ground_water.then(|| {
        (
            bank.map_2d(FieldId::Water1, &extent.requested),
            Lattice3::evaluate(bank, FieldId::Water2, extent.requested),
        )
    });
    let lava = seeding.lava.then(|| {
        (
            bank.map_2d(FieldId::Lava1, &extent.requested),
            Lattice3::evaluate(bank, FieldId::Lava2, extent.requested),
        )
    });

    for z in min.z..=max.z {
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let p = IVec3::new(x, y, z);
                let column = extent.requested.column_index(x, z);

                if let Some((w1, w2)) = &water {
                    if y < inputs.water_level
                        && w1[column].powi(2) + w2.at(p).powi(2) < seeding.ground_water_frequency
                        && palette.is_stone(volume.get(p))
                    {
                        volume.set(p, palette.river_water);
                    }
                }
                if let Some((l1, l2)) = &lava {
                    if y < inputs.lava_max_height
                        && l1[column].powi(2) + l2.at(p).abs() < lava_chance
                        && palette.is_stone(volume.get(p))
                    {
                        volume.set(p, palette.lava);
                    }
                }
            }
        }
    }
}

/// Bottom-up density carve that also drops seeded liquid left hanging in a
/// cave without stone underneath.
fn carve_density_seeded(volume: &mut dyn VoxelVolume, inputs: &CaveInputs, cave_size: f32) {
    let extent = inputs.extent;
    let density = Density::evaluate(inputs.bank, extent.requested);
    let palette = inputs.palette;

    let (min, max) = (extent.min(), extent.max());
    for z in min.z..=max.z {
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let p = IVec3::new(x, y, z);
                if density.at(p) >= cave_size {
                    continue;
                }
                let c = volume.get(p);
                if c == ContentId::AIR {
                    continue;
                }
                if inputs.registry.is_ground_content(c) {
                    volume.set(p, ContentId::AIR);
                } else if c == palette.river_water || c == palette.lava {
                    if !palette.is_stone(volume.get(p - IVec3::Y)) {
                        volume.set(p, ContentId::AIR);
                    }
                }
            }
        }
    }
}
