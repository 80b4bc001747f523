//! Pipeline composition: turn parameters into an ordered list of [`Op`]s and
//! run them.
//!
//! Two modes share one executor ([`apply_plan`]):
//!
//! - **Custom**: [`plan_custom`] walks [`CUSTOM_STAGE_ORDER`] and emits one op
//!   per non-identity field of [`AugmentationParameters`]. The order is a named
//!   constant so a new stage has to be slotted in explicitly.
//! - **Power**: [`plan_random`] draws 3–5 distinct entries from
//!   [`POWER_OPS`] without replacement, samples each entry's parameter, and
//!   keeps the draw order as the application order.
//!
//! Planning is separate from execution so tests can inspect exactly what would
//! run for a given seed or parameter set without touching pixels.

use super::params::AugmentationParameters;
use super::transforms::{self, Result};
use image::RgbImage;
use rand::Rng;
use rand::seq::index;
use std::fmt;
use std::ops::RangeInclusive;

/// A single concrete image operation with its parameter resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Rotate(f32),
    FlipHorizontal,
    FlipVertical,
    Brightness(f32),
    Contrast(f32),
    Blur(f32),
    Noise(f32),
}

impl Op {
    pub fn kind(&self) -> OpKind {
        match self {
            Op::Rotate(_) => OpKind::Rotate,
            Op::FlipHorizontal => OpKind::Mirror,
            Op::FlipVertical => OpKind::Flip,
            Op::Brightness(_) => OpKind::Brightness,
            Op::Contrast(_) => OpKind::Contrast,
            Op::Blur(_) => OpKind::Blur,
            Op::Noise(_) => OpKind::Noise,
        }
    }

    /// Run this op. Only [`Op::Noise`] consumes randomness.
    pub fn apply<R: Rng + ?Sized>(&self, image: &RgbImage, rng: &mut R) -> Result<RgbImage> {
        match *self {
            Op::Rotate(degrees) => transforms::rotate(image, degrees),
            Op::FlipHorizontal => transforms::flip_horizontal(image),
            Op::FlipVertical => transforms::flip_vertical(image),
            Op::Brightness(factor) => transforms::adjust_brightness(image, factor),
            Op::Contrast(factor) => transforms::adjust_contrast(image, factor),
            Op::Blur(radius) => transforms::gaussian_blur(image, radius),
            Op::Noise(std_dev) => transforms::add_gaussian_noise(image, std_dev, rng),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Rotate(d) => write!(f, "rotate {d:.1}°"),
            Op::FlipHorizontal => write!(f, "mirror"),
            Op::FlipVertical => write!(f, "flip"),
            Op::Brightness(x) => write!(f, "brightness ×{x:.2}"),
            Op::Contrast(x) => write!(f, "contrast ×{x:.2}"),
            Op::Blur(r) => write!(f, "blur r={r:.2}"),
            Op::Noise(s) => write!(f, "noise σ={s:.1}"),
        }
    }
}

// =============================================================================
// Custom mode
// =============================================================================

/// Stage identifiers of the custom pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Rotate,
    FlipHorizontal,
    FlipVertical,
    Brightness,
    Contrast,
    Noise,
}

/// Application order of the custom pipeline. Changing it changes pixels.
pub const CUSTOM_STAGE_ORDER: [Stage; 6] = [
    Stage::Rotate,
    Stage::FlipHorizontal,
    Stage::FlipVertical,
    Stage::Brightness,
    Stage::Contrast,
    Stage::Noise,
];

impl Stage {
    /// The op this stage contributes, or `None` when its field is a no-op.
    pub fn op_for(self, params: &AugmentationParameters) -> Option<Op> {
        match self {
            Stage::Rotate => params.rotates().then(|| Op::Rotate(params.rotate as f32)),
            Stage::FlipHorizontal => params.flip_h.then_some(Op::FlipHorizontal),
            Stage::FlipVertical => params.flip_v.then_some(Op::FlipVertical),
            Stage::Brightness => params
                .adjusts_brightness()
                .then_some(Op::Brightness(params.brightness)),
            Stage::Contrast => params
                .adjusts_contrast()
                .then_some(Op::Contrast(params.contrast)),
            Stage::Noise => params.adds_noise().then_some(Op::Noise(params.noise_std)),
        }
    }
}

/// Plan the custom pipeline without executing it.
pub fn plan_custom(params: &AugmentationParameters) -> Vec<Op> {
    CUSTOM_STAGE_ORDER
        .iter()
        .filter_map(|stage| stage.op_for(params))
        .collect()
}

/// Apply the fixed-order custom pipeline.
///
/// With every parameter at its identity value no transform runs and the
/// result is a pixel-identical copy of `image`.
pub fn apply_custom<R: Rng + ?Sized>(
    image: &RgbImage,
    params: &AugmentationParameters,
    rng: &mut R,
) -> Result<RgbImage> {
    apply_plan(image, &plan_custom(params), rng)
}

// =============================================================================
// Power mode
// =============================================================================

/// Kinds of operation known to the randomized pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Rotate,
    Mirror,
    Flip,
    Brightness,
    Contrast,
    Blur,
    Noise,
}

/// How a power-mode entry picks its parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamRule {
    /// No parameter (flips).
    Fixed,
    /// Uniform draw from the inclusive range.
    Uniform(RangeInclusive<f32>),
}

/// One entry of the power-mode table: an op kind plus its sampling rule.
#[derive(Debug, Clone, PartialEq)]
pub struct OpDescriptor {
    pub kind: OpKind,
    pub rule: ParamRule,
}

impl OpDescriptor {
    const fn fixed(kind: OpKind) -> Self {
        Self {
            kind,
            rule: ParamRule::Fixed,
        }
    }

    const fn uniform(kind: OpKind, lo: f32, hi: f32) -> Self {
        Self {
            kind,
            rule: ParamRule::Uniform(lo..=hi),
        }
    }

    /// Resolve the descriptor into a concrete op.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Op {
        let value = match &self.rule {
            ParamRule::Fixed => 0.0,
            ParamRule::Uniform(range) => rng.random_range(range.clone()),
        };
        match self.kind {
            OpKind::Rotate => Op::Rotate(value),
            OpKind::Mirror => Op::FlipHorizontal,
            OpKind::Flip => Op::FlipVertical,
            OpKind::Brightness => Op::Brightness(value),
            OpKind::Contrast => Op::Contrast(value),
            OpKind::Blur => Op::Blur(value),
            OpKind::Noise => Op::Noise(value),
        }
    }
}

/// The fixed set power mode draws from.
pub const POWER_OPS: [OpDescriptor; 7] = [
    OpDescriptor::uniform(OpKind::Rotate, -25.0, 25.0),
    OpDescriptor::fixed(OpKind::Mirror),
    OpDescriptor::fixed(OpKind::Flip),
    OpDescriptor::uniform(OpKind::Brightness, 0.7, 1.5),
    OpDescriptor::uniform(OpKind::Contrast, 0.7, 1.5),
    OpDescriptor::uniform(OpKind::Blur, 0.5, 1.5),
    OpDescriptor::uniform(OpKind::Noise, 5.0, 20.0),
];

/// Bounds on how many distinct ops one power-mode run applies.
pub const POWER_OP_COUNT: RangeInclusive<usize> = 3..=5;

/// Draw a power-mode plan: 3–5 distinct ops in sampled order.
pub fn plan_random<R: Rng + ?Sized>(rng: &mut R) -> Vec<Op> {
    let count = rng.random_range(POWER_OP_COUNT);
    let picks = index::sample(rng, POWER_OPS.len(), count);
    picks
        .into_iter()
        .map(|i| POWER_OPS[i].sample(rng))
        .collect()
}

/// Randomized "power mode" augmentation.
///
/// Returns the image together with the ops that produced it so callers can
/// report or log them.
pub fn apply_random<R: Rng + ?Sized>(image: &RgbImage, rng: &mut R) -> Result<(RgbImage, Vec<Op>)> {
    let plan = plan_random(rng);
    let out = apply_plan(image, &plan, rng)?;
    Ok((out, plan))
}

// =============================================================================
// Execution
// =============================================================================

/// Run `ops` in order. An empty plan returns a copy of the input.
pub fn apply_plan<R: Rng + ?Sized>(image: &RgbImage, ops: &[Op], rng: &mut R) -> Result<RgbImage> {
    let mut current = image.clone();
    for op in ops {
        tracing::debug!(%op, "applying");
        current = op.apply(&current, rng)?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::collections::HashSet;

    #[test]
    fn identity_params_plan_nothing() {
        assert!(plan_custom(&AugmentationParameters::default()).is_empty());
    }

    #[test]
    fn identity_params_return_identical_pixels() {
        let img = gradient_rgb(31, 17);
        let out = apply_custom(&img, &AugmentationParameters::default(), &mut seeded_rng(3)).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn custom_plan_follows_stage_order() {
        let params = AugmentationParameters {
            rotate: -12,
            flip_h: true,
            flip_v: true,
            brightness: 0.9,
            contrast: 1.4,
            noise_std: 3.0,
        };
        assert_eq!(
            plan_custom(&params),
            vec![
                Op::Rotate(-12.0),
                Op::FlipHorizontal,
                Op::FlipVertical,
                Op::Brightness(0.9),
                Op::Contrast(1.4),
                Op::Noise(3.0),
            ]
        );
    }

    #[test]
    fn custom_plan_skips_identity_fields() {
        let params = AugmentationParameters {
            flip_v: true,
            contrast: 0.8,
            ..Default::default()
        };
        assert_eq!(plan_custom(&params), vec![Op::FlipVertical, Op::Contrast(0.8)]);
    }

    #[test]
    fn stage_order_constant_lists_each_stage_once() {
        let unique: Vec<Stage> = CUSTOM_STAGE_ORDER
            .iter()
            .copied()
            .fold(Vec::new(), |mut acc, s| {
                if !acc.contains(&s) {
                    acc.push(s);
                }
                acc
            });
        assert_eq!(unique.len(), CUSTOM_STAGE_ORDER.len());
        assert_eq!(CUSTOM_STAGE_ORDER[0], Stage::Rotate);
        assert_eq!(CUSTOM_STAGE_ORDER[5], Stage::Noise);
    }

    #[test]
    fn custom_order_matters_for_pixels() {
        // flip then brighten == brighten then flip, but rotate then flip != flip then rotate
        let img = gradient_rgb(40, 30);
        let mut rng = seeded_rng(0);
        let params = AugmentationParameters {
            rotate: 20,
            flip_h: true,
            ..Default::default()
        };
        let composed = apply_custom(&img, &params, &mut rng).unwrap();
        let reversed = apply_plan(&img, &[Op::FlipHorizontal, Op::Rotate(20.0)], &mut rng).unwrap();
        let forward = apply_plan(&img, &[Op::Rotate(20.0), Op::FlipHorizontal], &mut rng).unwrap();
        assert_eq!(composed, forward);
        assert_ne!(composed, reversed);
    }

    #[test]
    fn random_plan_has_three_to_five_distinct_ops() {
        for seed in 0..200 {
            let plan = plan_random(&mut seeded_rng(seed));
            assert!(POWER_OP_COUNT.contains(&plan.len()), "seed {seed}: {plan:?}");
            let kinds: HashSet<OpKind> = plan.iter().map(Op::kind).collect();
            assert_eq!(kinds.len(), plan.len(), "seed {seed} repeated an op");
        }
    }

    #[test]
    fn random_plan_parameters_stay_in_range() {
        for seed in 0..200 {
            for op in plan_random(&mut seeded_rng(seed)) {
                match op {
                    Op::Rotate(d) => assert!((-25.0..=25.0).contains(&d)),
                    Op::Brightness(x) | Op::Contrast(x) => assert!((0.7..=1.5).contains(&x)),
                    Op::Blur(r) => assert!((0.5..=1.5).contains(&r)),
                    Op::Noise(s) => assert!((5.0..=20.0).contains(&s)),
                    Op::FlipHorizontal | Op::FlipVertical => {}
                }
            }
        }
    }

    #[test]
    fn random_plan_reaches_every_op_and_every_count() {
        let mut kinds = HashSet::new();
        let mut counts = HashSet::new();
        for seed in 0..500 {
            let plan = plan_random(&mut seeded_rng(seed));
            counts.insert(plan.len());
            kinds.extend(plan.iter().map(Op::kind));
        }
        assert_eq!(kinds.len(), POWER_OPS.len());
        assert_eq!(counts, HashSet::from([3, 4, 5]));
    }

    #[test]
    fn random_order_is_not_canonical() {
        // Sampled order is the application order, so some seed must place a
        // later table entry before an earlier one.
        let position = |k: OpKind| POWER_OPS.iter().position(|d| d.kind == k).unwrap();
        let out_of_order = (0..100).any(|seed| {
            let plan = plan_random(&mut seeded_rng(seed));
            plan.windows(2)
                .any(|w| position(w[0].kind()) > position(w[1].kind()))
        });
        assert!(out_of_order);
    }

    #[test]
    fn apply_random_is_reproducible() {
        let img = gradient_rgb(24, 24);
        let (a, plan_a) = apply_random(&img, &mut seeded_rng(99)).unwrap();
        let (b, plan_b) = apply_random(&img, &mut seeded_rng(99)).unwrap();
        assert_eq!(plan_a, plan_b);
        assert_eq!(a, b);
        assert_eq!(a.dimensions(), img.dimensions());
    }

    #[test]
    fn apply_plan_propagates_invalid_image() {
        let empty = RgbImage::new(0, 0);
        assert!(apply_plan(&empty, &[Op::FlipVertical], &mut seeded_rng(0)).is_err());
    }

    #[test]
    fn op_display_is_readable() {
        assert_eq!(Op::Rotate(12.345).to_string(), "rotate 12.3°");
        assert_eq!(Op::FlipHorizontal.to_string(), "mirror");
        assert_eq!(Op::Noise(7.0).to_string(), "noise σ=7.0");
    }
}
