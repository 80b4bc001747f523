//! Stand-in for a generative model.
//!
//! There is no network here: each image is independent uniform noise over the
//! full 8-bit range in all three channels. The output only exists so callers
//! can exercise the "generate with a model" path end to end.

use super::{BatchReport, SynthError, ensure_size, save_artifact};
use crate::config::GanConfig;
use crate::naming;
use crate::store::{ArtifactRecord, ArtifactSink, GeneratorType};
use image::RgbImage;
use rand::Rng;
use std::path::Path;
use uuid::Uuid;

/// Note stored with every GAN-stub record.
pub const NOTES: &str = "uniform noise placeholder, no trained model";

/// One image of per-pixel, per-channel uniform noise in `[0, 255]`.
pub fn noise_image<R: Rng + ?Sized>(
    rng: &mut R,
    width: u32,
    height: u32,
) -> Result<RgbImage, SynthError> {
    ensure_size(width, height)?;
    let mut image = RgbImage::new(width, height);
    rng.fill_bytes(&mut image);
    Ok(image)
}

/// Generate `count` noise images into `output_dir`, recording each one.
pub fn generate_gan_batch<R, S>(
    sink: &mut S,
    rng: &mut R,
    output_dir: &Path,
    config: &GanConfig,
    count: usize,
) -> Result<BatchReport, SynthError>
where
    R: Rng + ?Sized,
    S: ArtifactSink + ?Sized,
{
    ensure_size(config.width, config.height)?;
    std::fs::create_dir_all(output_dir)?;

    let mut report = BatchReport::default();
    for _ in 0..count {
        let image = noise_image(rng, config.width, config.height)?;
        let record = ArtifactRecord::new(
            naming::gan_filename(Uuid::new_v4()),
            GeneratorType::Gan,
            naming::resolution(config.width, config.height),
            NOTES,
        );
        save_artifact(sink, &image, output_dir, record, &mut report)?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::MockSink;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn noise_has_requested_size_and_spread() {
        let img = noise_image(&mut seeded_rng(5), 64, 64).unwrap();
        assert_eq!(img.dimensions(), (64, 64));
        let min = *img.iter().min().unwrap();
        let max = *img.iter().max().unwrap();
        assert!(min < 10 && max > 245, "range {min}..{max}");
    }

    #[test]
    fn noise_is_seeded() {
        let a = noise_image(&mut seeded_rng(11), 16, 16).unwrap();
        let b = noise_image(&mut seeded_rng(11), 16, 16).unwrap();
        let c = noise_image(&mut seeded_rng(12), 16, 16).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn batch_produces_independent_tagged_images() {
        let tmp = TempDir::new().unwrap();
        let mut sink = MockSink::new();
        let config = GanConfig {
            width: 64,
            height: 64,
            count: 1,
        };

        let report =
            generate_gan_batch(&mut sink, &mut seeded_rng(1), tmp.path(), &config, 3).unwrap();

        assert_eq!(report.artifacts.len(), 3);
        assert!(report.is_clean());
        assert!(
            sink.records
                .iter()
                .all(|r| r.generator_type == GeneratorType::Gan && r.resolution == "64x64")
        );
        let first = crate::imaging::load_rgb(&report.artifacts[0].path).unwrap();
        let second = crate::imaging::load_rgb(&report.artifacts[1].path).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn zero_size_is_rejected_before_touching_disk() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("never");
        let config = GanConfig {
            width: 0,
            height: 64,
            count: 1,
        };
        let result = generate_gan_batch(&mut MockSink::new(), &mut seeded_rng(0), &out, &config, 1);
        assert!(matches!(result, Err(SynthError::InvalidSize { .. })));
        assert!(!out.exists());
    }
}
