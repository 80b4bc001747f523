//! Pixel-level transforms, the building blocks of every pipeline.
//!
//! Each function borrows an [`RgbImage`] and returns a brand-new buffer; the
//! input is never touched. All float math is done per channel, then rounded
//! to the nearest integer and clamped to `[0, 255]`.
//!
//! | Operation | Implementation |
//! |---|---|
//! | Rotate | `imageproc::geometric_transformations::rotate_about_center`, nearest neighbour, black fill |
//! | Flip H / V | `image::imageops::flip_horizontal` / `flip_vertical` |
//! | Brightness | `v * factor` |
//! | Contrast | `mean + factor * (v - mean)`, mean = global average luma |
//! | Gaussian noise | `rand_distr::Normal(0, std_dev)` per channel |
//! | Gaussian blur | `imageproc::filter::gaussian_blur_f32`, radius used as sigma |

use image::{Rgb, RgbImage, imageops};
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("invalid image: {width}x{height} has no pixels")]
    InvalidImage { width: u32, height: u32 },
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}

pub type Result<T> = std::result::Result<T, TransformError>;

/// Pixel written into regions that rotate in from outside the canvas.
pub const ROTATION_FILL: Rgb<u8> = Rgb([0, 0, 0]);

fn ensure_pixels(image: &RgbImage) -> Result<()> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidImage { width, height });
    }
    Ok(())
}

fn ensure_finite(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TransformError::InvalidParameter { name, value })
    }
}

fn ensure_non_negative(name: &'static str, value: f32) -> Result<()> {
    ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(TransformError::InvalidParameter { name, value });
    }
    Ok(())
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn map_channels(image: &RgbImage, f: impl Fn(f32) -> f32) -> RgbImage {
    let mut out = image.clone();
    for value in out.iter_mut() {
        *value = to_channel(f(*value as f32));
    }
    out
}

/// Rotate about the image center. Positive degrees turn counter-clockwise.
///
/// The canvas keeps its size: corners that leave the frame are cropped and
/// uncovered regions are filled with [`ROTATION_FILL`].
pub fn rotate(image: &RgbImage, degrees: f32) -> Result<RgbImage> {
    ensure_pixels(image)?;
    ensure_finite("degrees", degrees)?;
    // imageproc turns clockwise for positive theta
    Ok(rotate_about_center(
        image,
        -degrees.to_radians(),
        Interpolation::Nearest,
        ROTATION_FILL,
    ))
}

/// Mirror left-to-right.
pub fn flip_horizontal(image: &RgbImage) -> Result<RgbImage> {
    ensure_pixels(image)?;
    Ok(imageops::flip_horizontal(image))
}

/// Mirror top-to-bottom.
pub fn flip_vertical(image: &RgbImage) -> Result<RgbImage> {
    ensure_pixels(image)?;
    Ok(imageops::flip_vertical(image))
}

/// Scale every channel by `factor`. `0.0` yields black, `1.0` is an identity.
pub fn adjust_brightness(image: &RgbImage, factor: f32) -> Result<RgbImage> {
    ensure_pixels(image)?;
    ensure_non_negative("brightness", factor)?;
    Ok(map_channels(image, |v| v * factor))
}

/// Scale each channel's distance from the global mean luma by `factor`.
///
/// `0.0` collapses the image to flat gray at the mean, `1.0` is an identity.
pub fn adjust_contrast(image: &RgbImage, factor: f32) -> Result<RgbImage> {
    ensure_pixels(image)?;
    ensure_non_negative("contrast", factor)?;
    let mean = mean_luma(image);
    Ok(map_channels(image, |v| mean + factor * (v - mean)))
}

/// Average ITU-R 601 luma over all pixels, rounded to a whole level.
pub fn mean_luma(image: &RgbImage) -> f32 {
    let total: u64 = image
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            (r as u64 * 299 + g as u64 * 587 + b as u64 * 114) / 1000
        })
        .sum();
    let count = image.width() as u64 * image.height() as u64;
    if count == 0 {
        return 0.0;
    }
    (total as f64 / count as f64).round() as f32
}

/// Add independent zero-mean Gaussian noise to every channel of every pixel.
///
/// `std_dev == 0` returns an equal copy without drawing from `rng`.
pub fn add_gaussian_noise<R: Rng + ?Sized>(
    image: &RgbImage,
    std_dev: f32,
    rng: &mut R,
) -> Result<RgbImage> {
    ensure_pixels(image)?;
    ensure_non_negative("std_dev", std_dev)?;
    if std_dev == 0.0 {
        return Ok(image.clone());
    }
    let normal = Normal::new(0.0f32, std_dev).map_err(|_| TransformError::InvalidParameter {
        name: "std_dev",
        value: std_dev,
    })?;
    let mut out = image.clone();
    for value in out.iter_mut() {
        *value = to_channel(*value as f32 + normal.sample(rng));
    }
    Ok(out)
}

/// Gaussian blur where `radius` is the kernel's standard deviation.
///
/// A radius of zero returns an equal copy.
pub fn gaussian_blur(image: &RgbImage, radius: f32) -> Result<RgbImage> {
    ensure_pixels(image)?;
    ensure_non_negative("radius", radius)?;
    if radius == 0.0 {
        return Ok(image.clone());
    }
    Ok(gaussian_blur_f32(image, radius))
}
