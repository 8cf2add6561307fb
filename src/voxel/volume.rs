//! Voxel volume accessor and a dense in-memory implementation

use glam::IVec3;

use crate::math::Extent;
use crate::voxel::content::ContentId;

/// Host-owned material storage the generator writes into.
///
/// Cells never decided by any pass read as [`ContentId::IGNORE`], as do
/// cells outside [`VoxelVolume::bounds`].
pub trait VoxelVolume {
    /// Inclusive region this volume can store
    fn bounds(&self) -> Extent;

    /// Material at `p`
    fn get(&self, p: IVec3) -> ContentId;

    /// Overwrite the material at `p`. Writes outside bounds are dropped.
    fn set(&mut self, p: IVec3, content: ContentId);
}

/// Dense material array over an extent, x fastest then y then z.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseVolume {
    extent: Extent,
    data: Vec<ContentId>,
}

impl DenseVolume {
    /// Create a volume where every cell is undetermined
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            data: vec![ContentId::IGNORE; extent.volume()],
        }
    }

    /// Raw cells in index order
    pub fn data(&self) -> &[ContentId] {
        &self.data
    }

    /// Set every cell of `region` (clipped to bounds) to `content`
    pub fn fill(&mut self, region: Extent, content: ContentId) {
        let lo = self.extent.clamp(region.min);
        let hi = self.extent.clamp(region.max);
        for z in lo.z..=hi.z {
            for y in lo.y..=hi.y {
                for x in lo.x..=hi.x {
                    let i = self.extent.index(IVec3::new(x, y, z));
                    self.data[i] = content;
                }
            }
        }
    }

    /// Number of cells in `region` holding `content`
    pub fn count_in(&self, region: Extent, content: ContentId) -> usize {
        let mut count = 0;
        for z in region.min.z..=region.max.z {
            for y in region.min.y..=region.max.y {
                for x in region.min.x..=region.max.x {
                    if self.get(IVec3::new(x, y, z)) == content {
                        count += 1;
                    }
                }
            }
        }
        count
    }
}

impl VoxelVolume for DenseVolume {
    fn bounds(&self) -> Extent {
        self.extent
    }

    #[inline]
    fn get(&self, p: IVec3) -> ContentId {
        if self.extent.contains(p) {
            self.data[self.extent.index(p)]
        } else {
            ContentId::IGNORE
        }
    }

    #[inline]
    fn set(&mut self, p: IVec3, content: ContentId) {
        if self.extent.contains(p) {
            let i = self.extent.index(p);
            self.data[i] = content;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_undetermined() {
        let v = DenseVolume::new(Extent::new(IVec3::ZERO, IVec3::splat(3)));
        assert_eq!(v.data().len(), 64);
        assert!(v.data().iter().all(|c| c.is_ignore()));
    }

    #[test]
    fn test_get_set() {
        let mut v = DenseVolume::new(Extent::new(IVec3::splat(-2), IVec3::splat(2)));
        let p = IVec3::new(-1, 2, 0);
        v.set(p, ContentId(7));
        assert_eq!(v.get(p), ContentId(7));
        assert_eq!(v.get(IVec3::ZERO), ContentId::IGNORE);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut v = DenseVolume::new(Extent::new(IVec3::ZERO, IVec3::ONE));
        v.set(IVec3::splat(5), ContentId(3));
        assert_eq!(v.get(IVec3::splat(5)), ContentId::IGNORE);
        assert_eq!(v.count_in(v.bounds(), ContentId(3)), 0);
    }

    #[test]
    fn test_fill_clips() {
        let mut v = DenseVolume::new(Extent::new(IVec3::ZERO, IVec3::splat(3)));
        v.fill(Extent::new(IVec3::new(-5, 0, 0), IVec3::new(1, 0, 0)), ContentId::AIR);
        assert_eq!(v.count_in(v.bounds(), ContentId::AIR), 2);
    }
}
