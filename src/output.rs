//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Augment / Power
//!
//! ```text
//! 001 augmented_20261016_083100_123456.png (100x100)
//!     Source: scans/chest.png
//!     Ops: rotate 10.0° → mirror → brightness ×1.20
//!
//! Augmented 1 image (1 this run), 1 recorded
//! ```
//!
//! ## Generate
//!
//! ```text
//! Procedural
//! 001 synthetic_procedural_20261016_083100_123456.png (256x256)
//! 002 synthetic_procedural_20261016_083100_234567.png (256x256)
//!     Warning: not recorded: filename already recorded: synthetic_...
//!
//! Generated 2 images, 1 recorded → data/synthetic
//! ```
//!
//! ## Recent
//!
//! ```text
//! 2026-10-16 08:31:00  procedural    256x256  synthetic_procedural_....png  synthetic lung blob
//!
//! Recorded: 3 procedural, 1 augmentation, 0 GAN (4 total)
//! ```
//!
//! ## Show
//!
//! ```text
//! augmented_20261016_083100_123456.png
//!     Generator: augmentation
//!     Size: 100 × 100 px
//!     Created: 2026-10-16 08:31:00
//!     Notes: rotate=10, flip_h
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::imaging::Op;
use crate::naming;
use crate::store::{ArtifactRecord, GeneratorType};
use crate::synth::{BatchReport, GeneratedArtifact};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// `NNN filename (WxH)`
fn artifact_line(index: usize, artifact: &GeneratedArtifact) -> String {
    format!(
        "{} {} ({})",
        format_index(index),
        artifact.record.filename,
        artifact.record.resolution
    )
}

/// Indented warning for an artifact whose record was rejected, if any.
fn failure_line(report: &BatchReport, artifact: &GeneratedArtifact) -> Option<String> {
    report
        .failures
        .iter()
        .find(|f| f.filename == artifact.record.filename)
        .map(|f| format!("{}Warning: not recorded: {}", indent(1), f.error))
}

/// Indented line for every item skipped because its file already existed.
fn skipped_lines(report: &BatchReport) -> impl Iterator<Item = String> + '_ {
    report
        .skipped
        .iter()
        .map(|s| format!("{}Skipped {}: file already exists", indent(1), s.filename))
}

fn skipped_suffix(report: &BatchReport) -> String {
    if report.skipped.is_empty() {
        String::new()
    } else {
        format!(", {} skipped", report.skipped.len())
    }
}

/// Operation chain joined with arrows, or `(none)` for an empty plan.
pub fn format_ops(ops: &[Op]) -> String {
    if ops.is_empty() {
        return "(none)".to_string();
    }
    ops.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" → ")
}

// ============================================================================
// Augment / Power
// ============================================================================

/// One augmented upload: output name, source and applied operations.
pub fn format_augmented(
    index: usize,
    source: &Path,
    artifact: &GeneratedArtifact,
    ops: &[Op],
    report: &BatchReport,
) -> Vec<String> {
    let mut lines = vec![
        artifact_line(index, artifact),
        format!("{}Source: {}", indent(1), source.display()),
        format!("{}Ops: {}", indent(1), format_ops(ops)),
    ];
    lines.extend(failure_line(report, artifact));
    lines
}

/// Closing line of an augment or power run.
///
/// `session_count` is the caller-owned augmentation counter.
pub fn format_augment_summary(report: &BatchReport, session_count: usize) -> String {
    format!(
        "Augmented {} ({} this run), {} recorded{}",
        plural(report.artifacts.len(), "image"),
        session_count,
        report.persisted(),
        skipped_suffix(report)
    )
}

pub fn print_augmented(
    index: usize,
    source: &Path,
    artifact: &GeneratedArtifact,
    ops: &[Op],
    report: &BatchReport,
) {
    for line in format_augmented(index, source, artifact, ops, report) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

pub fn format_batch_report(title: &str, report: &BatchReport, output_dir: &Path) -> Vec<String> {
    let mut lines = vec![title.to_string()];
    for (i, artifact) in report.artifacts.iter().enumerate() {
        lines.push(artifact_line(i + 1, artifact));
        lines.extend(failure_line(report, artifact));
    }
    lines.extend(skipped_lines(report));
    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} recorded{} → {}",
        plural(report.artifacts.len(), "image"),
        report.persisted(),
        skipped_suffix(report),
        output_dir.display()
    ));
    lines
}

pub fn print_batch_report(title: &str, report: &BatchReport, output_dir: &Path) {
    for line in format_batch_report(title, report, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Recent
// ============================================================================

fn local_time(record: &ArtifactRecord) -> impl std::fmt::Display {
    record
        .created_at
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S")
}

/// Newest-first table of records, timestamps shown in local time.
pub fn format_recent(records: &[ArtifactRecord]) -> Vec<String> {
    if records.is_empty() {
        return vec!["No artifacts recorded yet".to_string()];
    }
    let gen_width = records
        .iter()
        .map(|r| r.generator_type.as_str().len())
        .max()
        .unwrap_or(0);
    let res_width = records
        .iter()
        .map(|r| r.resolution.len())
        .max()
        .unwrap_or(0);
    records
        .iter()
        .map(|r| {
            let when = local_time(r);
            let line = format!(
                "{when}  {:<gen_width$}  {:<res_width$}  {}  {}",
                r.generator_type.as_str(),
                r.resolution,
                r.filename,
                r.notes
            );
            line.trim_end().to_string()
        })
        .collect()
}

pub fn print_recent(records: &[ArtifactRecord]) {
    for line in format_recent(records) {
        println!("{}", line);
    }
}

/// Per-generator record counts followed by the overall total.
pub fn format_totals(totals: &[(GeneratorType, usize)]) -> String {
    let parts = totals
        .iter()
        .map(|(g, n)| format!("{n} {g}"))
        .collect::<Vec<_>>()
        .join(", ");
    let total: usize = totals.iter().map(|(_, n)| n).sum();
    format!("Recorded: {parts} ({total} total)")
}

// ============================================================================
// Show
// ============================================================================

/// Every stored field of one record.
pub fn format_record(record: &ArtifactRecord) -> Vec<String> {
    let size = match naming::parse_resolution(&record.resolution) {
        Some((w, h)) => format!("{w} × {h} px"),
        None => record.resolution.clone(),
    };
    let mut lines = vec![
        record.filename.clone(),
        format!("{}Generator: {}", indent(1), record.generator_type),
        format!("{}Size: {}", indent(1), size),
        format!("{}Created: {}", indent(1), local_time(record)),
    ];
    if !record.notes.is_empty() {
        lines.push(format!("{}Notes: {}", indent(1), record.notes));
    }
    lines
}

pub fn print_record(record: &ArtifactRecord) {
    for line in format_record(record) {
        println!("{}", line);
    }
}

// ============================================================================
// Suggestions
// ============================================================================

pub fn format_suggestions(tips: &[&str]) -> Vec<String> {
    let mut lines = vec!["Suggestions".to_string()];
    lines.extend(tips.iter().map(|tip| format!("{}{}", indent(1), tip)));
    lines
}

pub fn print_suggestions(tips: &[&str]) {
    for line in format_suggestions(tips) {
        println!("{}", line);
    }
}
