//! Append-only record of custom augmentation settings.
//!
//! Each invocation appends one JSON object on its own line:
//!
//! ```text
//! {"time":"2026-10-16 08:31:00","rotate":10,"flip_h":true,"flip_v":false,"brightness":1.2,"contrast":1.0,"noise":0.0}
//! ```
//!
//! The log is informational. Callers treat a failed append as a warning.

use crate::imaging::AugmentationParameters;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One line of the usage log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub time: String,
    pub rotate: i32,
    pub flip_h: bool,
    pub flip_v: bool,
    pub brightness: f32,
    pub contrast: f32,
    pub noise: f32,
}

impl UsageEntry {
    pub fn new<Tz: TimeZone>(at: &DateTime<Tz>, params: &AugmentationParameters) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            time: at.format(TIME_FORMAT).to_string(),
            rotate: params.rotate,
            flip_h: params.flip_h,
            flip_v: params.flip_v,
            brightness: params.brightness,
            contrast: params.contrast,
            noise: params.noise_std,
        }
    }
}

/// Append `entry` as a single line, creating the file and its parent if needed.
pub fn append(path: &Path, entry: &UsageEntry) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let line = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

/// Read every entry back, skipping lines that don't parse.
#[cfg(test)]
fn read_entries(path: &Path) -> std::io::Result<Vec<UsageEntry>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}
