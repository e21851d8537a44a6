//! `pnp-imaging` CLI - Prepare, degrade and score test images.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pnp_imaging::{
    add_noise_seeded, downscale, load_image, nrmse, nrmse_title, resample, save_image, Config,
    Image, InterpolationKernel, Pipeline,
};

/// Resample, add noise to, and score grayscale test images.
#[derive(Parser, Debug)]
#[command(name = "pnp-imaging")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resample an image by a scale factor (output size / input size).
    Resample {
        #[command(flatten)]
        io: InputOutput,

        /// Scale factor. Values below 1 shrink the image.
        #[arg(short, long, value_name = "FLOAT")]
        factor: f64,

        /// Interpolation kernel (nearest, box, bilinear, bicubic, lanczos, hamming or 0-5).
        #[arg(short, long, default_value = "bicubic", value_name = "KERNEL")]
        kernel: InterpolationKernel,
    },

    /// Shrink an image by a factor (2 halves each side).
    Downscale {
        #[command(flatten)]
        io: InputOutput,

        /// Reduction factor.
        #[arg(short, long, value_name = "FLOAT")]
        factor: f64,

        /// Interpolation kernel (nearest, box, bilinear, bicubic, lanczos, hamming or 0-5).
        #[arg(short, long, default_value = "bicubic", value_name = "KERNEL")]
        kernel: InterpolationKernel,
    },

    /// Add clipped Gaussian noise.
    Noise {
        #[command(flatten)]
        io: InputOutput,

        /// Noise standard deviation, in units of full intensity range.
        #[arg(short, long, value_name = "FLOAT")]
        std: f64,

        /// Random seed for reproducibility.
        #[arg(long, value_name = "INT")]
        seed: Option<u64>,
    },

    /// Downscale then add noise, producing a synthetic observation.
    Degrade {
        #[command(flatten)]
        io: InputOutput,

        /// Reduction factor.
        #[arg(short, long, default_value = "1.0", value_name = "FLOAT")]
        factor: f64,

        /// Interpolation kernel (nearest, box, bilinear, bicubic, lanczos, hamming or 0-5).
        #[arg(short, long, default_value = "bicubic", value_name = "KERNEL")]
        kernel: InterpolationKernel,

        /// Noise standard deviation.
        #[arg(short, long, default_value = "0.0", value_name = "FLOAT")]
        std: f64,

        /// Random seed for reproducibility.
        #[arg(long, value_name = "INT")]
        seed: Option<u64>,
    },

    /// Print the NRMSE of a candidate image against a reference.
    Nrmse {
        /// Candidate image path.
        #[arg(value_name = "CANDIDATE")]
        candidate: PathBuf,

        /// Reference (ground truth) image path.
        #[arg(value_name = "REFERENCE")]
        reference: PathBuf,

        /// Print a display caption with this title instead of the bare score.
        #[arg(short, long, value_name = "TEXT")]
        title: Option<String>,
    },
}

#[derive(ClapArgs, Debug)]
struct InputOutput {
    /// Input image path.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output image path.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("pnp_imaging={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Resample { io, factor, kernel } => {
            let img = load(&io.input)?;
            let out = resample(&img, *factor, *kernel).context("Failed to resample image")?;
            store(&out, &io.output)
        }
        Command::Downscale { io, factor, kernel } => {
            let img = load(&io.input)?;
            let out = downscale(&img, *factor, *kernel).context("Failed to downscale image")?;
            store(&out, &io.output)
        }
        Command::Noise { io, std, seed } => {
            let img = load(&io.input)?;
            let out = add_noise_seeded(&img, *std, *seed).context("Failed to add noise")?;
            store(&out, &io.output)
        }
        Command::Degrade {
            io,
            factor,
            kernel,
            std,
            seed,
        } => {
            let config = Config {
                downscale_factor: *factor,
                kernel: *kernel,
                noise_std: *std,
                seed: *seed,
            };
            let mut pipeline = Pipeline::new(config).context("Failed to initialize pipeline")?;

            let img = load(&io.input)?;
            let out = pipeline
                .observe(&img)
                .context("Failed to synthesize observation")?;
            store(&out, &io.output)
        }
        Command::Nrmse {
            candidate,
            reference,
            title,
        } => {
            let candidate = load(candidate)?;
            let reference = load(reference)?;

            let line = match title {
                Some(title) => nrmse_title(title, &candidate, &reference),
                None => nrmse(&candidate, &reference).map(|score| score.to_string()),
            }
            .context("Failed to compute NRMSE")?;

            println!("{line}");
            Ok(())
        }
    }
}

fn load(path: &Path) -> Result<Image> {
    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }
    load_image(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn store(image: &Image, path: &Path) -> Result<()> {
    save_image(image, path).with_context(|| format!("Failed to write {}", path.display()))?;

    let (height, width) = image.dim();
    println!("Wrote {} ({width}x{height})", path.display());
    Ok(())
}
