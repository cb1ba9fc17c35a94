//! `rechroma` CLI - colorize grayscale images and videos.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rechroma::model::resolve_model_path;
use rechroma::{metrics, video, Colorizer, ModelVariant, OnnxPredictor, PipelineConfig};

/// Colorize grayscale images and videos with a pretrained predictor.
#[derive(Parser, Debug)]
#[command(name = "rechroma")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Colorize a single image.
    Image {
        /// Input image path.
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output image path.
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        model: ModelArgs,

        /// Report PSNR and SSIM of the result against the input.
        #[arg(long)]
        metrics: bool,
    },

    /// Colorize a video frame by frame.
    Video {
        /// Input video path.
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output video path.
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        model: ModelArgs,

        /// Output frame rate.
        #[arg(long, default_value = "30", value_name = "INT")]
        fps: u32,

        /// Root directory for intermediate frame storage. A unique
        /// subdirectory is created (and removed) per run.
        #[arg(long, value_name = "DIR")]
        work_dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// Path to the ONNX weights. Defaults to the cached file for --variant.
    #[arg(short, long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Square resolution the predictor runs at.
    #[arg(long, default_value = "512", value_name = "INT")]
    size: u32,

    /// Model capacity variant.
    #[arg(long, default_value = "large", value_parser = ["large", "tiny"], value_name = "VARIANT")]
    variant: String,
}

impl ModelArgs {
    fn variant(&self) -> ModelVariant {
        match self.variant.as_str() {
            "tiny" => ModelVariant::Tiny,
            _ => ModelVariant::Large,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("rechroma={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(cli) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Image {
            input,
            output,
            model,
            metrics: report_metrics,
        } => {
            anyhow::ensure!(input.exists(), "Input file does not exist: {}", input.display());

            let mut colorizer = build_colorizer(&model, 30)?;

            colorizer
                .process(&input, &output)
                .context("Failed to colorize image")?;

            if report_metrics {
                let reference = rechroma::image::load_rgb(&input)?;
                let colorized = rechroma::image::load_rgb(&output)?;
                println!("PSNR: {:.3}", metrics::psnr(&reference, &colorized)?);
                println!("SSIM: {:.3}", metrics::ssim(&reference, &colorized)?);
            }

            println!(
                "Successfully colorized {} -> {}",
                input.display(),
                output.display()
            );
        }
        Command::Video {
            input,
            output,
            model,
            fps,
            work_dir,
        } => {
            anyhow::ensure!(input.exists(), "Input file does not exist: {}", input.display());

            let mut colorizer = build_colorizer(&model, fps)?;

            let report = video::run(
                &input,
                &output,
                fps,
                work_dir.as_deref(),
                |frame| colorizer.colorize_image(frame),
            )
            .context("Failed to colorize video")?;

            println!(
                "Successfully colorized {} -> {} ({} frames, {} skipped)",
                input.display(),
                output.display(),
                report.assembly.frames_written,
                report.frames_skipped + report.assembly.frames_skipped
            );
        }
    }

    Ok(())
}

fn build_colorizer(args: &ModelArgs, frame_rate: u32) -> Result<Colorizer<OnnxPredictor>> {
    let variant = args.variant();
    let weights = resolve_model_path(args.model.as_deref(), variant)
        .context("Failed to locate model weights")?;
    let predictor =
        OnnxPredictor::from_file(&weights).context("Failed to initialize predictor")?;

    let config = PipelineConfig {
        input_size: args.size,
        variant,
        frame_rate,
    };

    Colorizer::new(config, predictor).context("Failed to build pipeline")
}
