//! Valleys terrain pipeline.
//!
//! One call fills one chunk:
//! 1. Column maps (climate, shaped heights, rivers) from the noise bank
//! 2. Base fill of stone, sea water, river water and air
//! 3. Biome map and stratification into top/filler/stone layers
//! 4. Caves, using the configured strategy
//! 5. Host structure placement
//! 6. River consistency fix
//! 7. Dust and aquatic plants

pub mod config;
pub mod seed;
pub mod columns;
pub(crate) mod terrain_fill;
pub(crate) mod strata;
pub(crate) mod caves;
pub(crate) mod tunnels;
pub(crate) mod rivers;
pub(crate) mod finish;

pub use config::{CaveStrategy, DensityFinish, GenerationConfig};
pub use columns::ChunkMaps;

use std::sync::Arc;

use glam::IVec3;
use rayon::prelude::*;

use crate::core::metrics::StageTimer;
use crate::core::{Error, MetricsSink, Result, StageTimings};
use crate::field::NoiseBank;
use crate::math::ChunkExtent;
use crate::terrain::{BiomeId, BiomeSource, BiomeTable, Climate, StoneType, ValleyShaper};
use crate::voxel::{DenseVolume, MaterialRegistry, Palette, VoxelVolume};
use columns::RawColumn;

/// Host hook for dungeons and other structures, run after caves so the
/// river fix sees whatever it builds.
pub trait StructurePlacer {
    fn place(
        &mut self,
        extent: &ChunkExtent,
        volume: &mut dyn VoxelVolume,
        maps: &ChunkMaps,
        stone_type: StoneType,
        block_seed: u32,
    );
}

/// Optional host collaborators for one generation call
#[derive(Default)]
pub struct ChunkServices<'a> {
    pub metrics: Option<&'a mut dyn MetricsSink>,
    pub structures: Option<&'a mut dyn StructurePlacer>,
}

/// Everything a generation call produces besides the voxels
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedChunk {
    pub extent: ChunkExtent,
    pub maps: ChunkMaps,
    /// Dominant stone flavor, for structures built to match
    pub stone_type: StoneType,
    /// Highest ground surface among the requested columns
    pub surface_max: i32,
    pub block_seed: u32,
}

/// A chunk generated into its own dense volume
#[derive(Clone, Debug)]
pub struct DenseChunk {
    pub volume: DenseVolume,
    pub chunk: GeneratedChunk,
    pub timings: StageTimings,
}

/// Operations a world host needs from a terrain generator.
pub trait ChunkGenerator: Send + Sync {
    /// Fill the requested region of `volume`. Fails before any write when
    /// a precondition is violated.
    fn generate(
        &self,
        extent: &ChunkExtent,
        volume: &mut dyn VoxelVolume,
        services: &mut ChunkServices<'_>,
    ) -> Result<GeneratedChunk>;

    /// Ground level of column (x, z), identical to the chunk height map.
    fn height_at(&self, x: i32, z: i32) -> i32;

    /// Biome at `p`, classified with the column's climate at `p.y`.
    fn biome_at(&self, p: IVec3) -> BiomeId;
}

/// The valleys terrain generator.
///
/// Immutable after construction; chunks may be generated concurrently.
pub struct ValleysGenerator {
    config: GenerationConfig,
    bank: NoiseBank,
    climate: Climate,
    shaper: ValleyShaper,
    registry: Arc<MaterialRegistry>,
    palette: Palette,
    biomes: Arc<dyn BiomeSource>,
}

impl ValleysGenerator {
    /// Build a generator, resolving the material palette up front.
    pub fn new(
        config: GenerationConfig,
        registry: Arc<MaterialRegistry>,
        biomes: Arc<dyn BiomeSource>,
    ) -> Result<Self> {
        config.validate()?;
        let palette = Palette::resolve(&registry)?;
        let bank = NoiseBank::new(&config.noise, config.seed);

        log::info!(
            "Valleys generator ready: seed {}, water level {}, caves {:?}, heights {:?}",
            config.seed,
            config.water_level,
            config.caves,
            config.height_variant
        );

        Ok(Self {
            climate: config.climate(),
            shaper: config.shaper(),
            config,
            bank,
            registry,
            palette,
            biomes,
        })
    }

    /// Generator over the built-in materials and biome table
    pub fn with_defaults(config: GenerationConfig) -> Result<Self> {
        let registry = MaterialRegistry::with_defaults();
        let palette = Palette::resolve(&registry)?;
        let biomes = BiomeTable::with_defaults(&registry, &palette);
        Self::new(config, Arc::new(registry), Arc::new(biomes))
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    pub fn biomes(&self) -> &dyn BiomeSource {
        self.biomes.as_ref()
    }

    /// Chunk at grid position `pos` with `size` cells per axis and the
    /// configured halo.
    pub fn chunk_extent(&self, pos: IVec3, size: i32) -> Result<ChunkExtent> {
        ChunkExtent::from_grid(pos, size, self.config.halo)
    }

    /// Generate a chunk into a fresh volume covering its full region.
    pub fn generate_dense(&self, extent: &ChunkExtent) -> Result<DenseChunk> {
        let mut volume = DenseVolume::new(extent.full);
        let mut timings = StageTimings::default();
        let chunk = {
            let mut services = ChunkServices {
                metrics: Some(&mut timings),
                structures: None,
            };
            self.generate(extent, &mut volume, &mut services)?
        };
        Ok(DenseChunk { volume, chunk, timings })
    }

    /// Generate independent chunks in parallel. Results are in input order
    /// and equal to generating each chunk alone.
    pub fn generate_batch(&self, extents: &[ChunkExtent]) -> Result<Vec<DenseChunk>> {
        let start = std::time::Instant::now();
        let chunks: Vec<DenseChunk> = extents
            .par_iter()
            .map(|extent| self.generate_dense(extent))
            .collect::<Result<_>>()?;

        let elapsed = start.elapsed();
        log::info!(
            "Generated {} chunks in {:.2}s ({:.0} chunks/sec)",
            chunks.len(),
            elapsed.as_secs_f64(),
            chunks.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
        );
        Ok(chunks)
    }

    /// Check the call's preconditions before anything is written.
    fn validate(&self, extent: &ChunkExtent, volume: &dyn VoxelVolume) -> Result<()> {
        let bounds = volume.bounds();
        if !bounds.contains_extent(&extent.full) {
            return Err(Error::OutOfBounds(format!(
                "volume {}..{} does not cover chunk region {}..{}",
                bounds.min, bounds.max, extent.full.min, extent.full.max
            )));
        }

        let limit = IVec3::splat(self.config.map_limit);
        if extent.min().cmplt(-limit).any() || extent.max().cmpgt(limit).any() {
            return Err(Error::OutOfBounds(format!(
                "chunk {}..{} exceeds map limit {}",
                extent.min(),
                extent.max(),
                self.config.map_limit
            )));
        }
        Ok(())
    }

    fn column_at(&self, x: i32, z: i32) -> columns::Column {
        let raw = RawColumn::sample(&self.bank, x, z);
        columns::derive_column(&self.bank, &self.climate, &self.shaper, x, z, &raw)
    }
}

impl ChunkGenerator for ValleysGenerator {
    fn generate(
        &self,
        extent: &ChunkExtent,
        volume: &mut dyn VoxelVolume,
        services: &mut ChunkServices<'_>,
    ) -> Result<GeneratedChunk> {
        self.validate(extent, volume)?;

        let config = &self.config;
        let palette = &self.palette;
        let biomes = self.biomes.as_ref();
        let block_seed = seed::block_seed(extent.full.min, config.seed);
        let min = extent.min();

        let timer = StageTimer::start("columns");
        let (mut maps, column_noise) =
            columns::compute_columns(&self.bank, &self.climate, &self.shaper, extent.requested);
        timer.finish(services.metrics.as_deref_mut());

        let timer = StageTimer::start("base_fill");
        let mut rng = seed::stage_rng(block_seed, seed::BASE_FILL);
        let surface_max =
            terrain_fill::base_fill(volume, extent, &maps, palette, config.water_level, &mut rng);
        timer.finish(services.metrics.as_deref_mut());
        log::debug!("Chunk {}: base fill, surface max {}", min, surface_max);

        let timer = StageTimer::start("stratify");
        strata::resolve_biomes(&mut maps, biomes);
        let stone_type = strata::stratify(
            volume,
            extent,
            &maps,
            biomes,
            palette,
            &column_noise.filler_depth,
            config.water_level,
        );
        timer.finish(services.metrics.as_deref_mut());
        log::debug!("Chunk {}: stratified, stone type {:?}", min, stone_type);

        let timer = StageTimer::start("caves");
        let cave_inputs = caves::CaveInputs {
            extent,
            maps: &maps,
            bank: &self.bank,
            registry: &self.registry,
            biomes,
            palette,
            block_seed,
            water_level: config.water_level,
            lava_max_height: config.lava_max_height,
            surface_max,
        };
        caves::carve(&config.caves, volume, &cave_inputs);
        timer.finish(services.metrics.as_deref_mut());
        log::debug!("Chunk {}: caves carved ({:?})", min, config.caves);

        if let Some(placer) = services.structures.as_deref_mut() {
            let timer = StageTimer::start("structures");
            placer.place(extent, volume, &maps, stone_type, block_seed);
            timer.finish(services.metrics.as_deref_mut());
        }

        let timer = StageTimer::start("rivers");
        let cleared = rivers::fix_rivers(volume, extent, &maps, biomes, palette);
        timer.finish(services.metrics.as_deref_mut());
        log::debug!("Chunk {}: river fix cleared {} cells", min, cleared);

        let timer = StageTimer::start("finish");
        let dust = finish::dust_top(volume, extent, &maps, biomes, &self.registry, config.water_level);
        let mut rng = seed::stage_rng(block_seed, seed::WATER_PLANTS);
        let plants = finish::water_plants(
            volume,
            extent,
            &maps,
            biomes,
            palette,
            &column_noise.plant,
            &mut rng,
        );
        timer.finish(services.metrics.as_deref_mut());
        log::debug!("Chunk {}: {} dust cells, {} plants", min, dust, plants);

        Ok(GeneratedChunk {
            extent: *extent,
            maps,
            stone_type,
            surface_max,
            block_seed,
        })
    }

    fn height_at(&self, x: i32, z: i32) -> i32 {
        self.column_at(x, z).height
    }

    fn biome_at(&self, p: IVec3) -> BiomeId {
        let column = self.column_at(p.x, p.z);
        self.biomes.resolve(column.heat, column.humidity, p.y)
    }
}
