//! Centralized naming for generated artifacts.
//!
//! Every file the tool writes is named by one of these functions so that the
//! artifact table, the output directory and the CLI agree on the same names:
//!
//! - `synthetic_procedural_20261016_083100_123456.png` (procedural blobs)
//! - `augmented_20261016_083100_123456.png` (custom or power augmentation)
//! - `gan_3f2c…e1.png` (noise stub; UUID keeps batches collision-free)
//!
//! Timestamps are local time with microsecond precision, matching what a user
//! sees in their file browser.

use chrono::{DateTime, TimeZone};
use uuid::Uuid;

/// Extension of every artifact written by the tool.
pub const ARTIFACT_EXTENSION: &str = "png";

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";

/// Filesystem-safe timestamp with microseconds, e.g. `20261016_083100_000042`.
pub fn timestamp_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(STAMP_FORMAT).to_string()
}

/// Name for a procedurally generated image.
pub fn procedural_filename<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "synthetic_procedural_{}.{ARTIFACT_EXTENSION}",
        timestamp_stamp(at)
    )
}

/// Name for an augmented upload.
pub fn augmented_filename<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("augmented_{}.{ARTIFACT_EXTENSION}", timestamp_stamp(at))
}

/// Name for a GAN-stub image.
pub fn gan_filename(id: Uuid) -> String {
    format!("gan_{}.{ARTIFACT_EXTENSION}", id.simple())
}

/// Resolution string stored with every record, e.g. `"256x256"`.
pub fn resolution(width: u32, height: u32) -> String {
    format!("{width}x{height}")
}

/// Parse a `"WxH"` resolution string back into dimensions.
pub fn parse_resolution(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once('x')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}
