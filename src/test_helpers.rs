//! Shared test utilities for the medaug test suite.
//!
//! Small synthetic rasters and a seeded RNG so pixel-level assertions are
//! reproducible without fixture files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let img = gradient_rgb(16, 8);
//! let out = apply_custom(&img, &params, &mut seeded_rng(7)).unwrap();
//! ```

use image::{Rgb, RgbImage};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// =========================================================================
// Rasters
// =========================================================================

/// Uniform image of one color.
pub fn solid_rgb(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(rgb))
}

/// Image where every row and every column differs.
///
/// Red ramps left to right, green ramps top to bottom, blue mixes both so
/// flips and rotations always move observable values.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    let ramp = |v: u32, len: u32| (v * 255 / len.saturating_sub(1).max(1)) as u8;
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([ramp(x, width), ramp(y, height), ((x + 2 * y) * 13 % 256) as u8])
    })
}

// =========================================================================
// Randomness
// =========================================================================

/// Deterministic RNG for a given seed.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
