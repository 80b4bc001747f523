//! Decoding uploads and encoding results.
//!
//! Inputs of any compiled-in format are decoded and normalized to 8-bit RGB,
//! the working format of every transform. Outputs are always PNG, which keeps
//! augmented and synthetic pixels lossless, and are never written over an
//! existing file.

use image::{ImageBuffer, ImageFormat, ImageReader, PixelWithColorType, RgbImage};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("Failed to encode {path}: {reason}")]
    Encode { path: String, reason: String },
}

/// Extensions accepted for upload.
pub const INPUT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "webp"];

/// True if `path` has an extension listed in [`INPUT_EXTENSIONS`].
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| INPUT_EXTENSIONS.iter().any(|ok| e.eq_ignore_ascii_case(ok)))
}

/// Load an image from disk and convert it to RGB8.
pub fn load_rgb(path: &Path) -> Result<RgbImage, CodecError> {
    let decoded = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| CodecError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    Ok(decoded.to_rgb8())
}

/// Write an 8-bit buffer (RGB or grayscale) as a new PNG file.
///
/// An existing file at `path` is left untouched and reported as
/// [`CodecError::Io`] with kind [`std::io::ErrorKind::AlreadyExists`].
pub fn save_png<P>(image: &ImageBuffer<P, Vec<u8>>, path: &Path) -> Result<(), CodecError>
where
    P: PixelWithColorType<Subpixel = u8>,
{
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let mut writer = BufWriter::new(file);
    image
        .write_to(&mut writer, ImageFormat::Png)
        .map_err(|e| CodecError::Encode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    writer.flush()?;
    Ok(())
}

/// True when `err` means the target file was already there.
pub fn is_already_exists(err: &CodecError) -> bool {
    matches!(err, CodecError::Io(e) if e.kind() == std::io::ErrorKind::AlreadyExists)
}
