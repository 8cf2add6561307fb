//! The bank of every field the generator uses, with lattice evaluation.

use glam::IVec3;

use super::{FieldId, NoiseField, NoiseSet};
use crate::math::Extent;

/// Fixed set of named fields, built once per world seed.
///
/// The bank is immutable after construction and is shared read-only by all
/// chunks; lattices it produces are owned by the caller.
pub struct NoiseBank {
    seed: u32,
    fields: Vec<NoiseField>,
}

impl NoiseBank {
    pub fn new(set: &NoiseSet, seed: u32) -> Self {
        let fields = FieldId::ALL
            .iter()
            .map(|id| NoiseField::new(id.params(set), seed))
            .collect();
        Self { seed, fields }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &NoiseField {
        &self.fields[id as usize]
    }

    #[inline]
    pub fn sample_2d(&self, id: FieldId, x: i32, z: i32) -> f32 {
        self.field(id).sample_2d(x, z)
    }

    #[inline]
    pub fn sample_3d(&self, id: FieldId, x: i32, y: i32, z: i32) -> f32 {
        self.field(id).sample_3d(x, y, z)
    }

    /// One sample per column of `region`, in [`Extent::column_index`] order.
    pub fn map_2d(&self, id: FieldId, region: &Extent) -> Vec<f32> {
        let field = self.field(id);
        region
            .columns()
            .map(|(x, z)| field.sample_2d(x, z))
            .collect()
    }

    /// One sample per cell of `region`, in [`Extent::index`] order.
    pub fn map_3d(&self, id: FieldId, region: &Extent) -> Vec<f32> {
        let field = self.field(id);
        let mut out = Vec::with_capacity(region.volume());
        for z in region.min.z..=region.max.z {
            for y in region.min.y..=region.max.y {
                for x in region.min.x..=region.max.x {
                    out.push(field.sample_3d(x, y, z));
                }
            }
        }
        out
    }
}

/// A 3D lattice of samples over an extent
pub struct Lattice3 {
    pub extent: Extent,
    pub values: Vec<f32>,
}

impl Lattice3 {
    pub fn evaluate(bank: &NoiseBank, id: FieldId, extent: Extent) -> Self {
        Self {
            values: bank.map_3d(id, &extent),
            extent,
        }
    }

    #[inline]
    pub fn at(&self, p: IVec3) -> f32 {
        self.values[self.extent.index(p)]
    }
}
