use clap::{Parser, Subcommand};
use medaug::imaging::{self, AugmentationParameters, Op};
use medaug::store::{ArtifactStore, GeneratorType};
use medaug::synth::{self, BatchReport, gan, procedural};
use medaug::{config, output, suggest, usage_log};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};

/// Custom-pipeline settings shared by `augment` and `suggest`.
#[derive(clap::Args, Clone, Copy)]
struct ParamArgs {
    /// Rotation in degrees, positive = counter-clockwise
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    rotate: i32,
    /// Mirror left to right
    #[arg(long)]
    flip_h: bool,
    /// Flip top to bottom
    #[arg(long)]
    flip_v: bool,
    /// Brightness factor (1.0 = unchanged)
    #[arg(long, default_value_t = 1.0)]
    brightness: f32,
    /// Contrast factor around the mean luma (1.0 = unchanged)
    #[arg(long, default_value_t = 1.0)]
    contrast: f32,
    /// Standard deviation of Gaussian noise in 8-bit levels (0 = off)
    #[arg(long, default_value_t = 0.0)]
    noise: f32,
}

impl From<ParamArgs> for AugmentationParameters {
    fn from(args: ParamArgs) -> Self {
        Self {
            rotate: args.rotate,
            flip_h: args.flip_h,
            flip_v: args.flip_v,
            brightness: args.brightness,
            contrast: args.contrast,
            noise_std: args.noise,
        }
    }
}

/// Shared flag for commands that draw random numbers.
#[derive(clap::Args, Clone, Copy)]
struct SeedArgs {
    /// Seed for reproducible output (default: OS entropy)
    #[arg(long)]
    seed: Option<u64>,
}

impl SeedArgs {
    fn rng(self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        }
    }
}

#[derive(Parser)]
#[command(name = "medaug")]
#[command(about = "Augment medical images and generate synthetic placeholders")]
#[command(long_about = "\
Augment medical images and generate synthetic placeholders

Custom augmentation applies the enabled stages in a fixed order:

  rotate → mirror → flip → brightness → contrast → noise

Power mode picks 3 to 5 of rotate, mirror, flip, brightness, contrast, blur
and noise at random, with random strengths.

Every written image is recorded in a SQLite table inside the output
directory ('medaug recent' lists the latest ones, 'medaug show' one of them).

Run 'medaug gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Log debug details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply the fixed-order custom pipeline to each input
    Augment {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[command(flatten)]
        params: ParamArgs,
        #[command(flatten)]
        seed: SeedArgs,
    },
    /// Apply a random chain of strong transforms to each input
    Power {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[command(flatten)]
        seed: SeedArgs,
    },
    /// Generate synthetic placeholder images
    Generate {
        #[command(subcommand)]
        kind: GenerateKind,
    },
    /// List the most recently recorded artifacts
    Recent {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Print the stored record of one artifact
    Show {
        /// File name as listed by 'recent'
        filename: String,
    },
    /// Print advisory tips for a set of augmentation settings
    Suggest(ParamArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum GenerateKind {
    /// Two blurred "lung" ellipses on black
    Procedural {
        /// Number of images (default: procedural.count)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Uniform noise standing in for a generative model
    Gan {
        /// Number of images (default: gan.count)
        #[arg(short = 'n', long)]
        count: Option<usize>,
        #[command(flatten)]
        seed: SeedArgs,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Augment {
            inputs,
            params,
            seed,
        } => {
            let (app_config, mut store) = open_workspace(&cli.config)?;
            let output_dir = app_config.storage.output_dir();
            let params: AugmentationParameters = params.into();
            let mut rng = seed.rng();
            let ops = imaging::plan_custom(&params);
            if params.is_identity() {
                tracing::warn!("no augmentation enabled, outputs are plain copies");
            }

            let mut report = BatchReport::default();
            let mut session_count = 0;
            for input in supported_inputs(&inputs) {
                let image = imaging::load_rgb(input)?;
                let augmented = imaging::apply_custom(&image, &params, &mut rng)?;
                let written = report.artifacts.len();
                synth::save_augmented(
                    &mut store,
                    &augmented,
                    &output_dir,
                    &chrono::Local::now(),
                    params.summary(),
                    &mut report,
                )?;
                session_count += 1;
                print_new(&report, written, input, &ops);
            }

            let entry = usage_log::UsageEntry::new(&chrono::Local::now(), &params);
            let log_path = app_config.storage.usage_log_path();
            if let Err(error) = usage_log::append(&log_path, &entry) {
                tracing::warn!(path = %log_path.display(), %error, "could not append usage log");
            }

            println!();
            println!("{}", output::format_augment_summary(&report, session_count));
            println!();
            output::print_suggestions(&suggest::suggest(&params));
        }
        Command::Power { inputs, seed } => {
            let (app_config, mut store) = open_workspace(&cli.config)?;
            let output_dir = app_config.storage.output_dir();
            let mut rng = seed.rng();
            let mut report = BatchReport::default();
            let mut session_count = 0;
            for input in supported_inputs(&inputs) {
                let image = imaging::load_rgb(input)?;
                let (augmented, ops) = imaging::apply_random(&image, &mut rng)?;
                let notes = format!("power: {}", output::format_ops(&ops));
                let written = report.artifacts.len();
                synth::save_augmented(
                    &mut store,
                    &augmented,
                    &output_dir,
                    &chrono::Local::now(),
                    notes,
                    &mut report,
                )?;
                session_count += 1;
                print_new(&report, written, input, &ops);
            }
            println!();
            println!("{}", output::format_augment_summary(&report, session_count));
        }
        Command::Generate { kind } => {
            let (app_config, mut store) = open_workspace(&cli.config)?;
            let output_dir = app_config.storage.output_dir();
            match kind {
                GenerateKind::Procedural { count } => {
                    let count = count.unwrap_or(app_config.procedural.count);
                    let report = procedural::generate_procedural_batch(
                        &mut store,
                        &output_dir,
                        &app_config.procedural,
                        count,
                    )?;
                    output::print_batch_report("Procedural", &report, &output_dir);
                }
                GenerateKind::Gan { count, seed } => {
                    let count = count.unwrap_or(app_config.gan.count);
                    let report = gan::generate_gan_batch(
                        &mut store,
                        &mut seed.rng(),
                        &output_dir,
                        &app_config.gan,
                        count,
                    )?;
                    output::print_batch_report("GAN", &report, &output_dir);
                }
            }
        }
        Command::Recent { limit } => {
            let (_, store) = open_workspace(&cli.config)?;
            output::print_recent(&store.query_recent(limit)?);
            let totals = GeneratorType::ALL
                .into_iter()
                .map(|g| Ok((g, store.count(Some(g))?)))
                .collect::<Result<Vec<_>, medaug::store::PersistenceError>>()?;
            println!();
            println!("{}", output::format_totals(&totals));
        }
        Command::Show { filename } => {
            let (_, store) = open_workspace(&cli.config)?;
            match store.find_by_filename(&filename)? {
                Some(record) => output::print_record(&record),
                None => return Err(format!("no artifact named {filename} is recorded").into()),
            }
        }
        Command::Suggest(params) => {
            output::print_suggestions(&suggest::suggest(&params.into()));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config and open the artifact store, creating its table if needed.
fn open_workspace(
    config_dir: &Path,
) -> Result<(config::AppConfig, ArtifactStore), Box<dyn std::error::Error>> {
    let app_config = config::load_config(config_dir)?;
    let database = app_config.storage.database_path();
    let store = ArtifactStore::open(&database)?;
    tracing::debug!(database = %database.display(), "store ready");
    Ok((app_config, store))
}

/// Inputs with a decodable extension; the rest are skipped with a warning.
fn supported_inputs(inputs: &[PathBuf]) -> impl Iterator<Item = &PathBuf> {
    inputs.iter().filter(|path| {
        let ok = imaging::codec::is_supported_input(path);
        if !ok {
            tracing::warn!(path = %path.display(), "skipping unsupported input");
        }
        ok
    })
}

/// Print the artifact added since `written`, if the item wasn't skipped.
fn print_new(report: &BatchReport, written: usize, source: &Path, ops: &[Op]) {
    if let Some(artifact) = report.artifacts.get(written) {
        output::print_augmented(written + 1, source, artifact, ops, report);
    }
}
