//! Parameter types for augmentation.
//!
//! These structs describe *what* to do to an image, not *how*. They are the
//! interface between the caller (which collects values from a form or the
//! command line) and the [`pipeline`](super::pipeline), which turns them into
//! an ordered list of concrete operations.
//!
//! ## Identity values
//!
//! Every field has a no-op value: `rotate = 0`, both flips `false`,
//! `brightness = 1.0`, `contrast = 1.0`, `noise_std = 0.0`. A field at its
//! identity value makes the pipeline skip that stage entirely; the transform
//! is never called with identity arguments.

use serde::{Deserialize, Serialize};

/// Brightness/contrast factor that leaves the image unchanged.
pub const IDENTITY_FACTOR: f32 = 1.0;

/// User-selected augmentation settings for the fixed ("custom") pipeline.
///
/// Immutable by convention: build one per request and hand it to
/// [`apply_custom`](super::pipeline::apply_custom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentationParameters {
    /// Rotation in degrees, positive = counter-clockwise. The UI offers
    /// [-30, 30] but the core accepts any value.
    pub rotate: i32,
    pub flip_h: bool,
    pub flip_v: bool,
    /// Multiplicative brightness factor.
    pub brightness: f32,
    /// Multiplicative contrast factor around the mean luma.
    pub contrast: f32,
    /// Standard deviation of additive Gaussian noise, in 8-bit levels.
    pub noise_std: f32,
}

impl Default for AugmentationParameters {
    fn default() -> Self {
        Self {
            rotate: 0,
            flip_h: false,
            flip_v: false,
            brightness: IDENTITY_FACTOR,
            contrast: IDENTITY_FACTOR,
            noise_std: 0.0,
        }
    }
}

impl AugmentationParameters {
    pub fn rotates(&self) -> bool {
        self.rotate != 0
    }

    pub fn adjusts_brightness(&self) -> bool {
        self.brightness != IDENTITY_FACTOR
    }

    pub fn adjusts_contrast(&self) -> bool {
        self.contrast != IDENTITY_FACTOR
    }

    pub fn adds_noise(&self) -> bool {
        self.noise_std > 0.0
    }

    /// True when every field is at its no-op value.
    pub fn is_identity(&self) -> bool {
        !self.rotates()
            && !self.flip_h
            && !self.flip_v
            && !self.adjusts_brightness()
            && !self.adjusts_contrast()
            && !self.adds_noise()
    }

    /// Compact human-readable summary of the active settings, used as the
    /// `notes` column of augmentation records.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.rotates() {
            parts.push(format!("rotate={}", self.rotate));
        }
        if self.flip_h {
            parts.push("flip_h".to_string());
        }
        if self.flip_v {
            parts.push("flip_v".to_string());
        }
        if self.adjusts_brightness() {
            parts.push(format!("brightness={}", self.brightness));
        }
        if self.adjusts_contrast() {
            parts.push(format!("contrast={}", self.contrast));
        }
        if self.adds_noise() {
            parts.push(format!("noise={}", self.noise_std));
        }
        if parts.is_empty() {
            "identity".to_string()
        } else {
            parts.join(" ")
        }
    }
}
