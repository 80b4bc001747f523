//! Procedural "lung blob" generator.
//!
//! Draws two filled ellipses on a black single-channel canvas and softens
//! them with a Gaussian blur:
//!
//! ```text
//!   ┌──────────────────────────┐
//!   │      ▄▄▄        ▄▄▄      │
//!   │     █████      █████     │   centers at 35% and 65% of the width,
//!   │     █████      █████     │   both at half height,
//!   │     █████      █████     │   semi-axes 50 × 80 px
//!   │      ▀▀▀        ▀▀▀      │
//!   └──────────────────────────┘
//! ```
//!
//! The geometry is in absolute pixels, so small canvases clip the blobs.

use super::{BatchReport, SynthError, ensure_size, save_artifact};
use crate::config::ProceduralConfig;
use crate::naming;
use crate::store::{ArtifactRecord, ArtifactSink, GeneratorType};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_ellipse_mut;
use imageproc::filter::gaussian_blur_f32;
use std::path::Path;

/// Horizontal blob centers as fractions of the canvas width.
pub const BLOB_CENTERS_X: [f32; 2] = [0.35, 0.65];

/// Ellipse semi-axes `(horizontal, vertical)` in pixels.
pub const BLOB_SEMI_AXES: (i32, i32) = (50, 80);

/// Sigma matching an auto-sized 21×21 Gaussian kernel.
pub const DEFAULT_BLUR_SIGMA: f32 = 3.5;

/// Note stored with every procedural record.
pub const NOTES: &str = "synthetic lung blob";

const BLOB_VALUE: Luma<u8> = Luma([255]);

/// Render one blurred two-blob canvas.
pub fn lung_blob_image(width: u32, height: u32, blur_sigma: f32) -> Result<GrayImage, SynthError> {
    ensure_size(width, height)?;
    let mut canvas = GrayImage::new(width, height);
    let cy = (height / 2) as i32;
    for fx in BLOB_CENTERS_X {
        let cx = (width as f32 * fx) as i32;
        draw_filled_ellipse_mut(
            &mut canvas,
            (cx, cy),
            BLOB_SEMI_AXES.0,
            BLOB_SEMI_AXES.1,
            BLOB_VALUE,
        );
    }
    if blur_sigma > 0.0 {
        canvas = gaussian_blur_f32(&canvas, blur_sigma);
    }
    Ok(canvas)
}

/// Generate `count` images into `output_dir`, recording each as it is written.
///
/// See the [module-level batch semantics](super) for failure handling.
pub fn generate_procedural_batch<S: ArtifactSink + ?Sized>(
    sink: &mut S,
    output_dir: &Path,
    config: &ProceduralConfig,
    count: usize,
) -> Result<BatchReport, SynthError> {
    ensure_size(config.width, config.height)?;
    std::fs::create_dir_all(output_dir)?;

    let mut report = BatchReport::default();
    for _ in 0..count {
        let image = lung_blob_image(config.width, config.height, config.blur_sigma)?;
        let record = ArtifactRecord::new(
            naming::procedural_filename(&chrono::Local::now()),
            GeneratorType::Procedural,
            naming::resolution(config.width, config.height),
            NOTES,
        );
        save_artifact(sink, &image, output_dir, record, &mut report)?;
    }
    Ok(report)
}
