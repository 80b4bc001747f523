//! Image augmentation in pure Rust on top of `image` and `imageproc`.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image::ImageReader`, PNG encoder |
//! | **Rotate** | `imageproc::geometric_transformations::rotate_about_center` |
//! | **Blur** | `imageproc::filter::gaussian_blur_f32` |
//! | **Flip** | `image::imageops::flip_horizontal` / `flip_vertical` |
//! | **Brightness / contrast / noise** | per-channel float math, `rand_distr::Normal` |
//!
//! The module is split into:
//! - **Parameters**: [`AugmentationParameters`], the caller-facing value
//! - **Transforms**: stateless single operations, each returning a new buffer
//! - **Pipeline**: custom (fixed order) and power (randomized) composition
//! - **Codec**: file I/O for uploads and results

pub mod codec;
pub mod params;
pub mod pipeline;
pub mod transforms;

pub use codec::{CodecError, load_rgb, save_png};
pub use params::AugmentationParameters;
pub use pipeline::{
    CUSTOM_STAGE_ORDER, Op, OpKind, POWER_OPS, Stage, apply_custom, apply_plan, apply_random,
    plan_custom, plan_random,
};
pub use transforms::TransformError;
