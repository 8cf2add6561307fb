//! Material identifiers and the material registry

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Material flags
pub mod flags {
    /// Caves may carve through this material.
    pub const GROUND_CONTENT: u8 = 1 << 0;
    /// Other material may replace this in place (dust does not settle on it).
    pub const BUILDABLE_TO: u8 = 1 << 1;
    /// Liquids, for support checks.
    pub const LIQUID: u8 = 1 << 2;
}

/// Runtime material identifier - exactly 2 bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ContentId(pub u16);

impl ContentId {
    /// Empty cell
    pub const AIR: ContentId = ContentId(0);
    /// Cell not yet decided by any generation pass
    pub const IGNORE: ContentId = ContentId(u16::MAX);

    pub fn is_air(self) -> bool {
        self == Self::AIR
    }

    pub fn is_ignore(self) -> bool {
        self == Self::IGNORE
    }
}

impl Default for ContentId {
    fn default() -> Self {
        Self::IGNORE
    }
}

/// Static properties of one registered material
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialDef {
    pub name: String,
    pub flags: u8,
}

impl MaterialDef {
    pub fn new(name: impl Into<String>, flags: u8) -> Self {
        Self { name: name.into(), flags }
    }

    /// Check if caves may carve this material
    pub fn is_ground_content(&self) -> bool {
        self.flags & flags::GROUND_CONTENT != 0
    }

    /// Check if this material may be replaced in place
    pub fn is_buildable_to(&self) -> bool {
        self.flags & flags::BUILDABLE_TO != 0
    }

    /// Check if this material is a liquid
    pub fn is_liquid(&self) -> bool {
        self.flags & flags::LIQUID != 0
    }
}

/// Symbolic material name -> runtime id table.
///
/// Read-only once generation starts; shared by every chunk.
#[derive(Clone, Debug)]
pub struct MaterialRegistry {
    defs: Vec<MaterialDef>,
    by_name: HashMap<String, ContentId>,
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialRegistry {
    /// Registry containing only air
    pub fn new() -> Self {
        let mut registry = Self {
            defs: Vec::new(),
            by_name: HashMap::new(),
        };
        registry.insert(MaterialDef::new("air", flags::BUILDABLE_TO));
        registry
    }

    /// Registry with every material the generator knows about.
    pub fn with_defaults() -> Self {
        use flags::{BUILDABLE_TO, GROUND_CONTENT, LIQUID};

        let mut registry = Self::new();
        for (name, f) in [
            ("stone", GROUND_CONTENT),
            ("desert_stone", GROUND_CONTENT),
            ("sandstone", GROUND_CONTENT),
            ("dirt", GROUND_CONTENT),
            ("dirt_with_grass", GROUND_CONTENT),
            ("dirt_with_snow", GROUND_CONTENT),
            ("sand", GROUND_CONTENT),
            ("desert_sand", GROUND_CONTENT),
            ("silver_sand", GROUND_CONTENT),
            ("gravel", GROUND_CONTENT),
            ("sand_with_rocks", GROUND_CONTENT),
            ("snowblock", GROUND_CONTENT),
            ("ice", GROUND_CONTENT),
            ("snow", BUILDABLE_TO),
            ("water_source", LIQUID | BUILDABLE_TO),
            ("river_water_source", LIQUID | BUILDABLE_TO),
            ("lava_source", LIQUID | BUILDABLE_TO),
            ("glowing_fungal_stone", GROUND_CONTENT),
            ("stalactite", 0),
            ("stalagmite", 0),
            ("mushroom_fertile_red", BUILDABLE_TO),
            ("mushroom_fertile_brown", BUILDABLE_TO),
            ("huge_mushroom_cap", 0),
            ("giant_mushroom_cap", 0),
            ("giant_mushroom_stem", 0),
            ("arrow_arum_water", 0),
            ("waterlily", BUILDABLE_TO),
        ] {
            registry.insert(MaterialDef::new(name, f));
        }
        registry
    }

    /// Add a material, returning its id. Re-registering a name returns the existing id.
    ///
    /// Fails once every id below `IGNORE` is taken.
    pub fn register(&mut self, def: MaterialDef) -> Result<ContentId> {
        if let Some(&id) = self.by_name.get(&def.name) {
            return Ok(id);
        }
        if self.defs.len() >= Self::CAPACITY {
            return Err(Error::Config(format!(
                "material registry full, cannot add '{}'",
                def.name
            )));
        }
        Ok(self.insert(def))
    }

    /// Most materials a registry holds; the next id would be `IGNORE`.
    pub const CAPACITY: usize = ContentId::IGNORE.0 as usize;

    fn insert(&mut self, def: MaterialDef) -> ContentId {
        if let Some(&id) = self.by_name.get(&def.name) {
            return id;
        }
        let id = ContentId(self.defs.len() as u16);
        self.by_name.insert(def.name.clone(), id);
        self.defs.push(def);
        id
    }

    /// Look up a material by name
    pub fn id(&self, name: &str) -> Option<ContentId> {
        self.by_name.get(name).copied()
    }

    /// Properties of a material; `None` for IGNORE or unknown ids
    pub fn def(&self, id: ContentId) -> Option<&MaterialDef> {
        self.defs.get(id.0 as usize)
    }

    /// Check if caves may carve `id`. Unknown ids are never ground content.
    pub fn is_ground_content(&self, id: ContentId) -> bool {
        self.def(id).is_some_and(MaterialDef::is_ground_content)
    }

    /// Check if `id` may be replaced in place
    pub fn is_buildable_to(&self, id: ContentId) -> bool {
        self.def(id).is_some_and(MaterialDef::is_buildable_to)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size() {
        assert_eq!(std::mem::size_of::<ContentId>(), 2);
    }

    #[test]
    fn test_air_is_first() {
        let registry = MaterialRegistry::new();
        assert_eq!(registry.id("air"), Some(ContentId::AIR));
        assert!(registry.is_buildable_to(ContentId::AIR));
        assert!(!registry.is_ground_content(ContentId::AIR));
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = MaterialRegistry::new();
        let a = registry.register(MaterialDef::new("stone", flags::GROUND_CONTENT)).unwrap();
        let b = registry.register(MaterialDef::new("stone", 0)).unwrap();
        assert_eq!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_stops_before_ignore() {
        let mut registry = MaterialRegistry::new();
        for i in 1..MaterialRegistry::CAPACITY {
            registry.register(MaterialDef::new(format!("m{i}"), 0)).unwrap();
        }
        assert_eq!(registry.len(), MaterialRegistry::CAPACITY);
        assert_eq!(registry.id("m65534"), Some(ContentId(65534)));

        match registry.register(MaterialDef::new("overflow", 0)) {
            Err(Error::Config(msg)) => assert!(msg.contains("overflow")),
            other => panic!("expected full registry, got {:?}", other),
        }
        assert_eq!(registry.id("overflow"), None);
        // Known names still resolve
        assert_eq!(registry.register(MaterialDef::new("m1", 0)).unwrap(), ContentId(1));
    }

    #[test]
    fn test_flags() {
        let registry = MaterialRegistry::with_defaults();
        let stone = registry.id("stone").unwrap();
        let water = registry.id("water_source").unwrap();
        assert!(registry.is_ground_content(stone));
        assert!(!registry.is_ground_content(water));
        assert!(registry.def(water).unwrap().is_liquid());
        assert!(!registry.is_ground_content(ContentId::IGNORE));
        assert!(registry.def(ContentId::IGNORE).is_none());
    }
}
