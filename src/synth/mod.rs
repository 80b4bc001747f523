//! Synthetic placeholder generators.
//!
//! Two independent producers of stand-in training images:
//!
//! | Generator | Output | Record tag |
//! |---|---|---|
//! | [`procedural`] | 1-channel canvas with two blurred "lung" ellipses | `procedural` |
//! | [`gan`] | 3-channel uniform noise, a stub for a real generative model | `GAN` |
//!
//! ## Batch semantics
//!
//! Batches run sequentially. For each item the image is written to disk first,
//! then its record is handed to an [`ArtifactSink`]. A persistence failure is
//! logged, collected into [`BatchReport::failures`] and the batch carries on;
//! files already written stay where they are. A name that already exists on
//! disk is never overwritten: the item is skipped, left unrecorded and listed
//! in [`BatchReport::skipped`]. Other I/O and encoding failures abort a batch.
//!
//! Augmented uploads go through the same path via [`save_augmented`], tagged
//! `augmentation`.

pub mod gan;
pub mod procedural;

use crate::imaging::codec::is_already_exists;
use crate::imaging::{CodecError, save_png};
use crate::naming;
use crate::store::{ArtifactRecord, ArtifactSink, GeneratorType, PersistenceError};
use chrono::{DateTime, TimeZone};
use image::{ImageBuffer, PixelWithColorType, RgbImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encoding failed: {0}")]
    Codec(#[from] CodecError),
    #[error("Cannot generate a {width}x{height} image")]
    InvalidSize { width: u32, height: u32 },
}

/// A file written to disk together with its description.
#[derive(Debug, Clone)]
pub struct GeneratedArtifact {
    pub path: PathBuf,
    pub record: ArtifactRecord,
}

/// An item that was not recorded, either because the store refused it or
/// because its file name was already taken on disk.
#[derive(Debug)]
pub struct PersistenceFailure {
    pub filename: String,
    pub error: PersistenceError,
}

/// Outcome of a batch: every written artifact plus any persistence warnings.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub artifacts: Vec<GeneratedArtifact>,
    /// Written to disk but not recorded.
    pub failures: Vec<PersistenceFailure>,
    /// Neither written nor recorded: the file name already existed.
    pub skipped: Vec<PersistenceFailure>,
}

impl BatchReport {
    /// Number of artifacts whose record reached the sink.
    pub fn persisted(&self) -> usize {
        self.artifacts.len() - self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }
}

pub(crate) fn ensure_size(width: u32, height: u32) -> Result<(), SynthError> {
    if width == 0 || height == 0 {
        return Err(SynthError::InvalidSize { width, height });
    }
    Ok(())
}

/// Write `image` as `record.filename` inside `output_dir`, then record it.
///
/// A taken file name is logged and pushed onto `report.skipped`; other disk
/// errors are returned. Sink errors are logged and pushed onto
/// `report.failures` without undoing the file write.
pub fn save_artifact<P, S>(
    sink: &mut S,
    image: &ImageBuffer<P, Vec<u8>>,
    output_dir: &Path,
    record: ArtifactRecord,
    report: &mut BatchReport,
) -> Result<(), SynthError>
where
    P: PixelWithColorType<Subpixel = u8>,
    S: ArtifactSink + ?Sized,
{
    let path = output_dir.join(&record.filename);
    if let Err(error) = save_png(image, &path) {
        if !is_already_exists(&error) {
            return Err(error.into());
        }
        tracing::warn!(path = %path.display(), "file exists, artifact skipped");
        report.skipped.push(PersistenceFailure {
            error: PersistenceError::DuplicateFilename(record.filename.clone()),
            filename: record.filename,
        });
        return Ok(());
    }
    tracing::debug!(path = %path.display(), generator = %record.generator_type, "artifact saved");

    if let Err(error) = sink.insert(&record) {
        tracing::warn!(filename = %record.filename, %error, "artifact saved but not recorded");
        report.failures.push(PersistenceFailure {
            filename: record.filename.clone(),
            error,
        });
    }
    report.artifacts.push(GeneratedArtifact { path, record });
    Ok(())
}

/// Write one augmentation result named after `at` and record it.
///
/// The resolution is taken from the output image, `notes` usually carries
/// [`AugmentationParameters::summary`](crate::imaging::AugmentationParameters::summary)
/// or the applied power-mode ops.
pub fn save_augmented<S, Tz>(
    sink: &mut S,
    image: &RgbImage,
    output_dir: &Path,
    at: &DateTime<Tz>,
    notes: impl Into<String>,
    report: &mut BatchReport,
) -> Result<(), SynthError>
where
    S: ArtifactSink + ?Sized,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    ensure_size(image.width(), image.height())?;
    std::fs::create_dir_all(output_dir)?;
    let record = ArtifactRecord::new(
        naming::augmented_filename(at),
        GeneratorType::Augmentation,
        naming::resolution(image.width(), image.height()),
        notes,
    );
    save_artifact(sink, image, output_dir, record, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::load_rgb;
    use crate::store::tests::MockSink;
    use crate::test_helpers::*;
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;

    #[test]
    fn save_artifact_writes_file_and_records() {
        let tmp = TempDir::new().unwrap();
        let mut sink = MockSink::new();
        let mut report = BatchReport::default();
        let record = ArtifactRecord::new("x.png", GeneratorType::Augmentation, "4x4", "");

        save_artifact(&mut sink, &solid_rgb(4, 4, [1, 2, 3]), tmp.path(), record, &mut report)
            .unwrap();

        assert!(tmp.path().join("x.png").exists());
        assert_eq!(sink.records.len(), 1);
        assert!(report.is_clean());
        assert_eq!(report.persisted(), 1);
    }

    #[test]
    fn sink_failure_keeps_file_and_reports() {
        let tmp = TempDir::new().unwrap();
        let mut sink = MockSink::failing_on(&[0]);
        let mut report = BatchReport::default();
        let record = ArtifactRecord::new("y.png", GeneratorType::Augmentation, "4x4", "");

        save_artifact(&mut sink, &solid_rgb(4, 4, [0, 0, 0]), tmp.path(), record, &mut report)
            .unwrap();

        assert!(tmp.path().join("y.png").exists());
        assert_eq!(report.artifacts.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].filename, "y.png");
        assert_eq!(report.persisted(), 0);
    }

    #[test]
    fn taken_file_name_is_skipped_not_overwritten() {
        let tmp = TempDir::new().unwrap();
        let first = solid_rgb(2, 2, [9, 9, 9]);
        let mut sink = MockSink::new();
        let mut report = BatchReport::default();
        for image in [&first, &solid_rgb(2, 2, [250, 0, 0])] {
            let record = ArtifactRecord::new("same.png", GeneratorType::Procedural, "2x2", "");
            save_artifact(&mut sink, image, tmp.path(), record, &mut report).unwrap();
        }

        assert_eq!(load_rgb(&tmp.path().join("same.png")).unwrap(), first);
        assert_eq!(sink.records.len(), 1);
        assert_eq!(report.artifacts.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].filename, "same.png");
        assert_eq!(report.persisted(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn save_augmented_tags_and_sizes_record() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("augmented");
        let at = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_micro_opt(8, 31, 0, 7)
            .unwrap()
            .and_utc();
        let mut sink = MockSink::new();
        let mut report = BatchReport::default();

        save_augmented(&mut sink, &gradient_rgb(12, 5), &out, &at, "flip_v", &mut report).unwrap();

        assert!(report.is_clean());
        let record = &sink.records[0];
        assert_eq!(record.filename, "augmented_20261016_083100_000007.png");
        assert_eq!(record.generator_type, GeneratorType::Augmentation);
        assert_eq!(record.resolution, "12x5");
        assert_eq!(record.notes, "flip_v");
        assert!(out.join(&record.filename).exists());
    }

    #[test]
    fn save_augmented_rejects_empty_image() {
        let tmp = TempDir::new().unwrap();
        let result = save_augmented(
            &mut MockSink::new(),
            &RgbImage::new(0, 3),
            tmp.path(),
            &Utc::now(),
            "",
            &mut BatchReport::default(),
        );
        assert!(matches!(result, Err(SynthError::InvalidSize { .. })));
    }

    #[test]
    fn missing_output_dir_is_an_error() {
        let mut sink = MockSink::new();
        let mut report = BatchReport::default();
        let record = ArtifactRecord::new("z.png", GeneratorType::Augmentation, "1x1", "");
        let result = save_artifact(
            &mut sink,
            &solid_rgb(1, 1, [0, 0, 0]),
            Path::new("/nonexistent/dir"),
            record,
            &mut report,
        );
        assert!(result.is_err());
        assert!(sink.records.is_empty());
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            ensure_size(0, 10),
            Err(SynthError::InvalidSize { width: 0, height: 10 })
        ));
        assert!(ensure_size(1, 1).is_ok());
    }
}
