//! Per-chunk sub-seeds.
//!
//! Every non-noise random decision in a chunk comes from an RNG seeded with
//! the chunk's block seed plus a fixed per-stage offset, so chunks never
//! depend on generation order.

use glam::IVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// River bed rubble rolls
pub const BASE_FILL: u32 = 21343;
/// Cave valley tunnel count and shape
pub const TUNNELS: u32 = 21343;
/// Decorated cave rolls
pub const CAVE_DECORATION: u32 = 72202;
/// Aquatic flora rolls
pub const WATER_PLANTS: u32 = 56439;

/// Hash of a chunk's halo-inclusive minimum corner and the world seed.
pub fn block_seed(p: IVec3, seed: u32) -> u32 {
    let mut n = 1619u32
        .wrapping_mul(p.x as u32)
        .wrapping_add(31337u32.wrapping_mul(p.y as u32))
        .wrapping_add(52591u32.wrapping_mul(p.z as u32))
        .wrapping_add(1013u32.wrapping_mul(seed));
    n ^= n >> 13;
    n.wrapping_mul(
        n.wrapping_mul(n)
            .wrapping_mul(60493)
            .wrapping_add(19990303),
    )
    .wrapping_add(1376312589)
}

/// Deterministic RNG for one stage of one chunk
pub fn stage_rng(block_seed: u32, offset: u32) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(block_seed.wrapping_add(offset) as u64)
}
