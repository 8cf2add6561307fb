//! Biome classification by heat, humidity and elevation

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::voxel::{ContentId, MaterialRegistry, Palette};

/// Index of a biome inside its source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BiomeId(pub u8);

/// Which bulk stone a biome lays down
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoneType {
    #[default]
    Stone,
    DesertStone,
    Sandstone,
}

impl StoneType {
    /// Classify a bulk stone material
    pub fn of(stone: ContentId, palette: &Palette) -> Self {
        if stone == palette.desert_stone && stone != palette.stone {
            StoneType::DesertStone
        } else if stone == palette.sandstone && stone != palette.stone {
            StoneType::Sandstone
        } else {
            StoneType::Stone
        }
    }
}

/// Materials and layer depths of one biome
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeDef {
    pub name: String,

    pub top: ContentId,
    pub filler: ContentId,
    pub stone: ContentId,
    pub water_top: ContentId,
    pub water: ContentId,
    pub river_water: ContentId,
    /// Loose material settling on exposed surfaces
    pub dust: Option<ContentId>,

    pub depth_top: i32,
    pub depth_filler: i32,
    /// How far below the water level `water_top` reaches
    pub depth_water_top: i32,

    /// Climate point this biome is centered on
    pub heat_point: f32,
    pub humidity_point: f32,
    /// Inclusive elevation band where the biome may occur
    pub y_min: i32,
    pub y_max: i32,
}

impl BiomeDef {
    /// Biome of plain stone and water with no surface layers
    pub fn plain(palette: &Palette) -> Self {
        Self {
            name: "default".to_string(),
            top: palette.stone,
            filler: palette.stone,
            stone: palette.stone,
            water_top: palette.water,
            water: palette.water,
            river_water: palette.river_water,
            dust: None,
            depth_top: 0,
            depth_filler: 0,
            depth_water_top: 0,
            heat_point: 50.0,
            humidity_point: 50.0,
            y_min: i32::MIN,
            y_max: i32::MAX,
        }
    }
}

/// Classifier the generator queries for the biome at a climate point.
///
/// Implementations must be immutable during world generation; they are
/// shared by every concurrently generated chunk.
pub trait BiomeSource: Send + Sync {
    /// Biome for the given heat, humidity and elevation
    fn resolve(&self, heat: f32, humidity: f32, y: i32) -> BiomeId;

    /// Definition of a resolved biome
    fn get(&self, id: BiomeId) -> &BiomeDef;
}

/// Nearest-climate-point biome table.
///
/// A biome is eligible when `y` lies inside its band; among eligible biomes
/// the one whose (heat, humidity) point is closest wins. When no biome is
/// eligible the first one is used.
#[derive(Clone, Debug)]
pub struct BiomeTable {
    biomes: Vec<BiomeDef>,
}

impl BiomeTable {
    pub fn new(biomes: Vec<BiomeDef>) -> Result<Self> {
        if biomes.is_empty() {
            return Err(Error::Config("biome table must hold at least one biome".into()));
        }
        if biomes.len() > u8::MAX as usize + 1 {
            return Err(Error::Config(format!("too many biomes: {}", biomes.len())));
        }
        Ok(Self { biomes })
    }

    /// Table holding a single biome
    pub fn single(biome: BiomeDef) -> Self {
        Self { biomes: vec![biome] }
    }

    /// A small temperate/desert/cold biome set built from registered materials.
    pub fn with_defaults(registry: &MaterialRegistry, palette: &Palette) -> Self {
        let m = |name: &str, fallback: ContentId| registry.id(name).unwrap_or(fallback);

        let base = BiomeDef::plain(palette);
        let dirt = palette.dirt;
        let sand = palette.sand;
        let grass = m("dirt_with_grass", dirt);
        let snowy = m("dirt_with_snow", dirt);
        let snowblock = m("snowblock", palette.stone);
        let snow = registry.id("snow");

        let biomes = vec![
            BiomeDef {
                name: "grassland".into(),
                top: grass,
                filler: dirt,
                depth_top: 1,
                depth_filler: 1,
                heat_point: 50.0,
                humidity_point: 35.0,
                y_min: 6,
                ..base.clone()
            },
            BiomeDef {
                name: "grassland_dunes".into(),
                top: sand,
                filler: sand,
                depth_top: 1,
                depth_filler: 2,
                heat_point: 50.0,
                humidity_point: 35.0,
                y_min: 4,
                y_max: 5,
                ..base.clone()
            },
            BiomeDef {
                name: "grassland_ocean".into(),
                top: sand,
                filler: sand,
                depth_top: 1,
                depth_filler: 3,
                heat_point: 50.0,
                humidity_point: 35.0,
                y_max: 3,
                ..base.clone()
            },
            BiomeDef {
                name: "desert".into(),
                top: m("desert_sand", sand),
                filler: m("desert_sand", sand),
                stone: palette.desert_stone,
                depth_top: 1,
                depth_filler: 1,
                heat_point: 92.0,
                humidity_point: 16.0,
                y_min: 4,
                ..base.clone()
            },
            BiomeDef {
                name: "sandstone_desert".into(),
                top: sand,
                filler: sand,
                stone: palette.sandstone,
                depth_top: 1,
                depth_filler: 1,
                heat_point: 60.0,
                humidity_point: 0.0,
                y_min: 4,
                ..base.clone()
            },
            BiomeDef {
                name: "cold_desert".into(),
                top: m("silver_sand", sand),
                filler: m("silver_sand", sand),
                depth_top: 1,
                depth_filler: 1,
                heat_point: 40.0,
                humidity_point: 0.0,
                y_min: 4,
                ..base.clone()
            },
            BiomeDef {
                name: "taiga".into(),
                top: snowy,
                filler: dirt,
                dust: snow,
                depth_top: 1,
                depth_filler: 3,
                heat_point: 25.0,
                humidity_point: 70.0,
                y_min: 4,
                ..base.clone()
            },
            BiomeDef {
                name: "icesheet".into(),
                top: snowblock,
                filler: snowblock,
                water_top: palette.ice,
                dust: Some(snowblock),
                depth_top: 1,
                depth_filler: 3,
                depth_water_top: 10,
                heat_point: 0.0,
                humidity_point: 73.0,
                y_min: -8,
                ..base.clone()
            },
            BiomeDef {
                name: "tundra".into(),
                top: snowy,
                filler: m("gravel", dirt),
                dust: snow,
                depth_top: 1,
                depth_filler: 1,
                heat_point: 0.0,
                humidity_point: 40.0,
                y_min: 2,
                ..base
            },
        ];

        Self { biomes }
    }

    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BiomeId, &BiomeDef)> {
        self.biomes
            .iter()
            .enumerate()
            .map(|(i, def)| (BiomeId(i as u8), def))
    }
}

impl BiomeSource for BiomeTable {
    fn resolve(&self, heat: f32, humidity: f32, y: i32) -> BiomeId {
        let mut best = BiomeId(0);
        let mut best_dist = f32::INFINITY;
        for (id, def) in self.iter() {
            if y < def.y_min || y > def.y_max {
                continue;
            }
            let dh = heat - def.heat_point;
            let dm = humidity - def.humidity_point;
            let dist = dh * dh + dm * dm;
            if dist < best_dist {
                best_dist = dist;
                best = id;
            }
        }
        best
    }

    fn get(&self, id: BiomeId) -> &BiomeDef {
        self.biomes.get(id.0 as usize).unwrap_or(&self.biomes[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> (MaterialRegistry, Palette, BiomeTable) {
        let registry = MaterialRegistry::with_defaults();
        let palette = Palette::resolve(&registry).unwrap();
        let table = BiomeTable::with_defaults(&registry, &palette);
        (registry, palette, table)
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(BiomeTable::new(Vec::new()), Err(Error::Config(_))));
    }

    #[test]
    fn test_nearest_climate_point() {
        let (_, _, table) = table();
        assert_eq!(table.get(table.resolve(95.0, 10.0, 20)).name, "desert");
        assert_eq!(table.get(table.resolve(48.0, 38.0, 20)).name, "grassland");
        assert_eq!(table.get(table.resolve(-10.0, 75.0, 20)).name, "icesheet");
    }

    #[test]
    fn test_elevation_band() {
        let (_, _, table) = table();
        assert_eq!(table.get(table.resolve(50.0, 35.0, -20)).name, "grassland_ocean");
        assert_eq!(table.get(table.resolve(50.0, 35.0, 5)).name, "grassland_dunes");
        assert_eq!(table.get(table.resolve(50.0, 35.0, 100)).name, "grassland");
    }

    #[test]
    fn test_no_eligible_falls_back_to_first() {
        let registry = MaterialRegistry::with_defaults();
        let palette = Palette::resolve(&registry).unwrap();
        let table = BiomeTable::new(vec![BiomeDef {
            y_min: 0,
            y_max: 10,
            ..BiomeDef::plain(&palette)
        }])
        .unwrap();
        assert_eq!(table.resolve(50.0, 50.0, -100), BiomeId(0));
    }

    #[test]
    fn test_stone_type() {
        let (_, palette, table) = table();
        let desert = table.resolve(95.0, 10.0, 20);
        assert_eq!(StoneType::of(table.get(desert).stone, &palette), StoneType::DesertStone);
        let sandstone = table.resolve(60.0, 0.0, 20);
        assert_eq!(StoneType::of(table.get(sandstone).stone, &palette), StoneType::Sandstone);
        assert_eq!(StoneType::of(palette.stone, &palette), StoneType::Stone);
    }

    #[test]
    fn test_resolve_determinism() {
        let (_, _, table) = table();
        for (h, m, y) in [(10.0, 20.0, 3), (70.0, 90.0, 40), (33.3, 66.6, -5)] {
            assert_eq!(table.resolve(h, m, y), table.resolve(h, m, y));
        }
    }
}
