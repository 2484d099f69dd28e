//! Hash-based value noise
//!
//! A lattice of pseudo-random values (one per integer point, derived from the
//! world seed) smoothly interpolated in between. Cheap, seedable and stable
//! across platforms, which is all biome placement needs.

use glam::Vec2;

/// Integer hash of a lattice point, keyed on the world seed
pub fn hash2(seed: u64, x: i32, y: i32) -> u32 {
    let mut h = seed
        ^ (x as u32 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (y as u32 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    // splitmix64 finalizer
    h = (h ^ (h >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h = (h ^ (h >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^= h >> 31;
    (h as u32).wrapping_mul(2654435761)
}

/// Lattice value in [0, 1)
#[inline]
pub fn lattice(seed: u64, x: i32, y: i32) -> f32 {
    (hash2(seed, x, y) >> 8) as f32 / (1u32 << 24) as f32
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Smooth value noise in [0, 1]
pub fn value_noise(seed: u64, p: Vec2) -> f32 {
    let cell = p.floor();
    let frac = p - cell;
    let (x0, y0) = (cell.x as i32, cell.y as i32);

    let v00 = lattice(seed, x0, y0);
    let v10 = lattice(seed, x0.wrapping_add(1), y0);
    let v01 = lattice(seed, x0, y0.wrapping_add(1));
    let v11 = lattice(seed, x0.wrapping_add(1), y0.wrapping_add(1));

    let tx = smoothstep(frac.x);
    let ty = smoothstep(frac.y);

    let top = v00 + (v10 - v00) * tx;
    let bottom = v01 + (v11 - v01) * tx;
    (top + (bottom - top) * ty).clamp(0.0, 1.0)
}
