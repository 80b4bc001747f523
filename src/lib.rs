//! # medaug
//!
//! Image augmentation and synthetic placeholder generation for small medical
//! imaging datasets. Uploaded images go through a fixed or randomized chain of
//! pixel transforms; placeholder images are drawn procedurally or filled with
//! noise. Every file written is recorded in a SQLite table.
//!
//! # Data Flow
//!
//! ```text
//! params ──▶ imaging::pipeline ──▶ RgbImage ──┐
//!                                             ├──▶ PNG on disk + store::ArtifactRecord
//! config ──▶ synth::{procedural, gan} ────────┘
//! ```
//!
//! The core is stateless across calls. Anything that accumulates (the
//! per-run augmentation counter, the usage log) belongs to the caller.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Transform library, pipeline composer, decode/encode helpers |
//! | [`synth`] | Procedural lung-blob generator and the noise-only GAN stub |
//! | [`store`] | SQLite artifact table with transactional inserts |
//! | [`suggest`] | Advisory tips for the active augmentation settings |
//! | [`naming`] | Filenames and resolution strings for every artifact |
//! | [`usage_log`] | Append-only JSON-lines log of custom augmentation settings |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Plans Before Pixels
//!
//! Both pipeline modes first build a `Vec<Op>` and only then touch pixels. The
//! custom plan is derived from a named stage order constant; the random plan
//! samples a descriptor table without replacement. Either plan can be
//! inspected, printed and asserted on without decoding an image.
//!
//! ## Injected Randomness
//!
//! Nothing reaches for a global RNG. Noise and power mode take `&mut impl Rng`,
//! so a seed on the command line reproduces a run exactly.
//!
//! ## Writes Win Over Bookkeeping
//!
//! A generated file is kept even when its record cannot be stored. The
//! failure is logged and reported alongside the batch, and later items still
//! run.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod store;
pub mod suggest;
pub mod synth;
pub mod usage_log;

#[cfg(test)]
pub(crate) mod test_helpers;
