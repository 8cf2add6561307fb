//! Inclusive integer boxes and chunk regions

use glam::IVec3;

use crate::core::{Error, Result};

/// Axis-aligned integer box; both corners are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    pub min: IVec3,
    pub max: IVec3,
}

impl Extent {
    /// Create extent from min and max corners (inclusive)
    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Whether min <= max on every axis
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    /// Number of cells along each axis
    pub fn size(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    /// Total number of cells
    pub fn volume(&self) -> usize {
        let s = self.size();
        s.x as usize * s.y as usize * s.z as usize
    }

    /// Check if point is inside the extent
    pub fn contains(&self, p: IVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Check if `other` lies entirely inside this extent
    pub fn contains_extent(&self, other: &Extent) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Grow by `by` cells on every side; `None` if a corner leaves the i32 range.
    pub fn expanded(&self, by: i32) -> Option<Extent> {
        Some(Extent {
            min: checked_offset(self.min, -by)?,
            max: checked_offset(self.max, by)?,
        })
    }

    /// Clamp a point into the extent
    pub fn clamp(&self, p: IVec3) -> IVec3 {
        p.clamp(self.min, self.max)
    }

    /// Linear index with x varying fastest, then y, then z.
    /// Caller guarantees `p` is inside.
    #[inline]
    pub fn index(&self, p: IVec3) -> usize {
        let s = self.size();
        let d = p - self.min;
        ((d.z * s.y + d.y) * s.x + d.x) as usize
    }

    /// Column index (x fastest, then z) over the horizontal footprint.
    #[inline]
    pub fn column_index(&self, x: i32, z: i32) -> usize {
        let s = self.size();
        ((z - self.min.z) * s.x + (x - self.min.x)) as usize
    }

    /// Iterate (x, z) columns in the same order as [`Extent::column_index`].
    pub fn columns(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (min, max) = (self.min, self.max);
        (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| (x, z)))
    }
}

/// The region one generation call is responsible for.
///
/// `requested` is committed to the host; `full` adds a halo on every side
/// that neighbor-aware stages (caves, rivers, dust) may read and carve into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkExtent {
    pub requested: Extent,
    pub full: Extent,
    pub halo: i32,
}

impl ChunkExtent {
    /// Build a chunk region from its requested corners and halo width.
    pub fn new(min: IVec3, max: IVec3, halo: i32) -> Result<Self> {
        let requested = Extent::new(min, max);
        if !requested.is_valid() {
            return Err(Error::InvalidExtent(format!(
                "min {min} exceeds max {max} on some axis"
            )));
        }
        if halo < 1 {
            return Err(Error::InvalidExtent(format!(
                "halo must be at least one cell, got {halo}"
            )));
        }
        let full = requested.expanded(halo).ok_or_else(|| {
            Error::InvalidExtent(format!("halo {halo} around {min}..{max} overflows"))
        })?;
        Ok(Self {
            requested,
            full,
            halo,
        })
    }

    /// Chunk of `size` cells per axis at grid position `pos`.
    pub fn from_grid(pos: IVec3, size: i32, halo: i32) -> Result<Self> {
        let overflow = || Error::InvalidExtent(format!("chunk {pos} of size {size} overflows"));
        let min = IVec3::new(
            pos.x.checked_mul(size).ok_or_else(overflow)?,
            pos.y.checked_mul(size).ok_or_else(overflow)?,
            pos.z.checked_mul(size).ok_or_else(overflow)?,
        );
        let max = size
            .checked_sub(1)
            .and_then(|d| checked_offset(min, d))
            .ok_or_else(overflow)?;
        Self::new(min, max, halo)
    }

    /// Requested region's minimum corner
    pub fn min(&self) -> IVec3 {
        self.requested.min
    }

    /// Requested region's maximum corner
    pub fn max(&self) -> IVec3 {
        self.requested.max
    }

    /// Requested region's cell counts
    pub fn size(&self) -> IVec3 {
        self.requested.size()
    }

    /// Number of columns in the requested footprint
    pub fn column_count(&self) -> usize {
        let s = self.size();
        (s.x * s.z) as usize
    }
}

fn checked_offset(p: IVec3, by: i32) -> Option<IVec3> {
    Some(IVec3::new(
        p.x.checked_add(by)?,
        p.y.checked_add(by)?,
        p.z.checked_add(by)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_and_volume() {
        let e = Extent::new(IVec3::ZERO, IVec3::new(3, 1, 0));
        assert_eq!(e.size(), IVec3::new(4, 2, 1));
        assert_eq!(e.volume(), 8);
    }

    #[test]
    fn test_contains() {
        let e = Extent::new(IVec3::splat(-2), IVec3::splat(2));
        assert!(e.contains(IVec3::ZERO));
        assert!(e.contains(IVec3::splat(2)));
        assert!(!e.contains(IVec3::new(3, 0, 0)));
        assert!(e.contains_extent(&Extent::new(IVec3::splat(-1), IVec3::ONE)));
        assert!(!e.contains_extent(&e.expanded(1).unwrap()));
    }

    #[test]
    fn test_index_is_x_fastest() {
        let e = Extent::new(IVec3::new(10, 20, 30), IVec3::new(13, 22, 31));
        assert_eq!(e.index(e.min), 0);
        assert_eq!(e.index(e.min + IVec3::X), 1);
        assert_eq!(e.index(e.min + IVec3::Y), 4);
        assert_eq!(e.index(e.min + IVec3::Z), 12);
        assert_eq!(e.index(e.max), e.volume() - 1);
    }

    #[test]
    fn test_columns_order_matches_index() {
        let e = Extent::new(IVec3::new(-1, 0, 5), IVec3::new(1, 0, 6));
        for (i, (x, z)) in e.columns().enumerate() {
            assert_eq!(e.column_index(x, z), i);
        }
        assert_eq!(e.columns().count(), 6);
    }

    #[test]
    fn test_chunk_extent_halo() {
        let c = ChunkExtent::new(IVec3::ZERO, IVec3::splat(15), 16).unwrap();
        assert_eq!(c.full.min, IVec3::splat(-16));
        assert_eq!(c.full.max, IVec3::splat(31));
        assert!(c.full.contains_extent(&c.requested));
        assert_eq!(c.column_count(), 256);
    }

    #[test]
    fn test_chunk_extent_from_grid() {
        let c = ChunkExtent::from_grid(IVec3::new(1, -1, 0), 16, 16).unwrap();
        assert_eq!(c.min(), IVec3::new(16, -16, 0));
        assert_eq!(c.max(), IVec3::new(31, -1, 15));
    }

    #[test]
    fn test_chunk_extent_rejects_inverted() {
        assert!(ChunkExtent::new(IVec3::ONE, IVec3::ZERO, 16).is_err());
        assert!(ChunkExtent::new(IVec3::ZERO, IVec3::ONE, 0).is_err());
    }

    #[test]
    fn test_chunk_extent_rejects_overflow() {
        let far = IVec3::new(i32::MAX / 8, 0, 0);
        assert!(matches!(
            ChunkExtent::from_grid(far, 16, 16),
            Err(Error::InvalidExtent(_))
        ));
        assert!(matches!(
            ChunkExtent::from_grid(IVec3::new(0, i32::MIN / 16, 0), 16, 1),
            Err(Error::InvalidExtent(_))
        ));
        let edge = IVec3::new(i32::MAX - 15, 0, 0);
        assert!(matches!(
            ChunkExtent::new(edge, edge + IVec3::new(15, 15, 15), 1),
            Err(Error::InvalidExtent(_))
        ));
        assert!(Extent::new(IVec3::splat(i32::MIN), IVec3::ZERO).expanded(1).is_none());
    }
}
