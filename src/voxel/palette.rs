//! Materials the generator places, resolved once at setup.
//!
//! Decorative materials from optional content fall back to a structural
//! substitute (or air) so a sparse registry never stops generation.

use crate::core::{Error, Result};
use crate::voxel::content::{ContentId, MaterialRegistry};

/// Resolved material ids used by every generation stage
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub stone: ContentId,
    pub water: ContentId,
    pub river_water: ContentId,
    pub lava: ContentId,
    pub sand: ContentId,
    pub dirt: ContentId,
    pub desert_stone: ContentId,
    pub sandstone: ContentId,
    pub ice: ContentId,

    pub sand_with_rocks: ContentId,
    pub stalactite: ContentId,
    pub stalagmite: ContentId,
    pub fungal_stone: ContentId,
    pub mushroom_red: ContentId,
    pub mushroom_brown: ContentId,
    pub huge_mushroom_cap: ContentId,
    pub giant_mushroom_cap: ContentId,
    pub giant_mushroom_stem: ContentId,
    pub arrow_arum: ContentId,
    pub waterlily: ContentId,
}

impl Palette {
    /// Resolve every material, applying fallbacks for optional ones.
    pub fn resolve(registry: &MaterialRegistry) -> Result<Self> {
        let required = |name: &str| {
            registry
                .id(name)
                .ok_or_else(|| Error::MissingMaterial(name.to_string()))
        };
        let optional = |name: &str, fallback: ContentId| match registry.id(name) {
            Some(id) => id,
            None => {
                log::warn!("Material '{}' not registered, substituting {:?}", name, fallback);
                fallback
            }
        };

        let stone = required("stone")?;
        let water = required("water_source")?;
        let lava = required("lava_source")?;
        let dirt = required("dirt")?;

        let sand = optional("sand", stone);
        let river_water = optional("river_water_source", water);

        Ok(Self {
            stone,
            water,
            river_water,
            lava,
            sand,
            dirt,
            desert_stone: optional("desert_stone", stone),
            sandstone: optional("sandstone", stone),
            ice: optional("ice", ContentId::AIR),

            sand_with_rocks: optional("sand_with_rocks", sand),
            stalactite: optional("stalactite", ContentId::AIR),
            stalagmite: optional("stalagmite", ContentId::AIR),
            fungal_stone: optional("glowing_fungal_stone", stone),
            mushroom_red: optional("mushroom_fertile_red", ContentId::AIR),
            mushroom_brown: optional("mushroom_fertile_brown", ContentId::AIR),
            huge_mushroom_cap: optional("huge_mushroom_cap", ContentId::AIR),
            giant_mushroom_cap: optional("giant_mushroom_cap", ContentId::AIR),
            giant_mushroom_stem: optional("giant_mushroom_stem", ContentId::AIR),
            arrow_arum: optional("arrow_arum_water", sand),
            waterlily: optional("waterlily", water),
        })
    }

    /// Either kind of water source
    #[inline]
    pub fn is_water(&self, c: ContentId) -> bool {
        c == self.water || c == self.river_water
    }

    /// Any of the bulk stones a biome may lay down
    #[inline]
    pub fn is_stone(&self, c: ContentId) -> bool {
        c == self.stone || c == self.desert_stone || c == self.sandstone
    }
}
