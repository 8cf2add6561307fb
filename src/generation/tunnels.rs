//! Cave valleys: short, wide, vertically flattened tunnels carved by a
//! random walk from a point below the chunk's highest ground.

use std::f32::consts::TAU;

use glam::{IVec3, Vec3};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::math::{ChunkExtent, Extent};
use crate::voxel::{ContentId, MaterialRegistry, VoxelVolume};

const MIN_DIAMETER: i32 = 2;
const MAX_DIAMETER: i32 = 6;
/// Vertical radius relative to horizontal radius
const FLATTEN: f32 = 0.5;

/// Number of cave valleys for one chunk: 1-in-4 chance of one or two.
pub(crate) fn valley_count(rng: &mut ChaCha8Rng) -> u32 {
    if rng.gen_range(1..=4) == 1 {
        rng.gen_range(1..=2)
    } else {
        0
    }
}

/// Carve one cave valley. Only ground content inside the halo-inclusive
/// region is removed; a walk with no room below the surface does nothing.
pub(crate) fn carve_cave_valley(
    volume: &mut dyn VoxelVolume,
    extent: &ChunkExtent,
    registry: &MaterialRegistry,
    rng: &mut ChaCha8Rng,
    surface_max: i32,
) {
    let (min, max) = (extent.min(), extent.max());
    let top = surface_max.min(max.y);
    if top < min.y {
        return;
    }

    let mut pos = Vec3::new(
        rng.gen_range(min.x..=max.x) as f32 + 0.5,
        rng.gen_range(min.y..=top) as f32 + 0.5,
        rng.gen_range(min.z..=max.z) as f32 + 0.5,
    );
    let yaw: f32 = rng.gen_range(0.0..TAU);
    let heading = Vec3::new(yaw.cos(), 0.0, yaw.sin());

    let longest = rng.gen_range(15..=30);
    let routepoints = rng.gen_range(5..=longest);
    let widest = rng.gen_range(MIN_DIAMETER..=MAX_DIAMETER);

    // Keep every ellipsoid inside the full region
    let margin = widest as f32 * 0.5 + 1.0;
    let lo = extent.full.min.as_vec3() + Vec3::splat(margin);
    let hi = extent.full.max.as_vec3() - Vec3::splat(margin) + Vec3::ONE;
    if lo.cmpgt(hi).any() {
        return;
    }

    for _ in 0..routepoints {
        let radius = rng.gen_range(MIN_DIAMETER..=widest) as f32 * 0.5;
        let step = heading * rng.gen_range(2.0..6.0)
            + Vec3::new(
                rng.gen_range(-3.0..=3.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-3.0..=3.0),
            );
        let next = (pos + step).clamp(lo, hi);
        carve_segment(volume, &extent.full, registry, pos, next, radius);
        pos = next;
    }
}

/// Sweep a flattened ellipsoid from `a` to `b`.
fn carve_segment(
    volume: &mut dyn VoxelVolume,
    region: &Extent,
    registry: &MaterialRegistry,
    a: Vec3,
    b: Vec3,
    radius: f32,
) {
    let samples = (a.distance(b).ceil() as i32).max(1);
    for i in 0..=samples {
        let center = a.lerp(b, i as f32 / samples as f32);
        carve_ellipsoid(volume, region, registry, center, radius);
    }
}

fn carve_ellipsoid(
    volume: &mut dyn VoxelVolume,
    region: &Extent,
    registry: &MaterialRegistry,
    center: Vec3,
    radius: f32,
) {
    let rx = radius.max(1.0);
    let ry = (radius * FLATTEN).max(1.0);
    let lo = (center - Vec3::new(rx, ry, rx)).floor().as_ivec3();
    let hi = (center + Vec3::new(rx, ry, rx)).ceil().as_ivec3();

    for z in lo.z..=hi.z {
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                let p = IVec3::new(x, y, z);
                if !region.contains(p) {
                    continue;
                }
                let d = (p.as_vec3() + Vec3::splat(0.5) - center) / Vec3::new(rx, ry, rx);
                if d.length_squared() > 1.0 {
                    continue;
                }
                let c = volume.get(p);
                if c != ContentId::AIR && registry.is_ground_content(c) {
                    volume.set(p, ContentId::AIR);
                }
            }
        }
    }
}
