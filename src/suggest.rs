//! Advisory tips for the active augmentation settings.
//!
//! One tip per non-default field, in field declaration order. When nothing is
//! active a single encouragement is returned instead, so the result is never
//! empty.

use crate::imaging::AugmentationParameters;

pub const ROTATE_TIP: &str = "📐 Rotation is great for orientation invariance (e.g. X-ray angles).";
pub const FLIP_H_TIP: &str = "↔ Horizontal flipping helps in symmetry-heavy scans like MRIs.";
pub const FLIP_V_TIP: &str =
    "↕ Vertical flipping is rare but can be useful in dermatology datasets.";
pub const BRIGHTNESS_TIP: &str =
    "💡 Brightness adjustment helps model learn across exposure variations.";
pub const CONTRAST_TIP: &str = "🎚️ Contrast tuning is useful for better visibility of fine details.";
pub const NOISE_TIP: &str = "🎛️ Adding Gaussian noise helps with robustness in real-world data.";
pub const DEFAULT_TIP: &str = "✅ Tip: Try combining multiple augmentations for stronger results!";

pub fn suggest(params: &AugmentationParameters) -> Vec<&'static str> {
    let checks = [
        (params.rotates(), ROTATE_TIP),
        (params.flip_h, FLIP_H_TIP),
        (params.flip_v, FLIP_V_TIP),
        (params.adjusts_brightness(), BRIGHTNESS_TIP),
        (params.adjusts_contrast(), CONTRAST_TIP),
        (params.noise_std != 0.0, NOISE_TIP),
    ];
    let tips: Vec<&'static str> = checks
        .into_iter()
        .filter_map(|(active, tip)| active.then_some(tip))
        .collect();

    if tips.is_empty() {
        vec![DEFAULT_TIP]
    } else {
        tips
    }
}
