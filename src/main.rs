use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use edge_convolution_rs::edge_pipeline::{
    EdgeConfig, EdgeDetectionPipeline, EdgeError, GradientMode, ImageEdgeWorkflow, ResizeFilter,
};
use edge_convolution_rs::logger;

use tracing::{error, info};

#[derive(Parser)]
#[clap(version, about = "Sobel and Prewitt edge filters for RGB rasters", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Number of row bands processed in parallel (defaults to the CPU count)
    #[clap(short, long, global = true)]
    workers: Option<usize>,

    /// Gradient output: per-channel magnitude or red/blue color coding
    #[clap(short, long, global = true, value_enum, default_value_t = Mode::Magnitude)]
    mode: Mode,

    /// Output file name for the Sobel raster
    #[clap(long, global = true, default_value = "sobel_output.bin")]
    sobel_name: String,

    /// Output file name for the Prewitt raster
    #[clap(long, global = true, default_value = "prewitt_output.bin")]
    prewitt_name: String,

    /// Print a per-step timing table
    #[clap(long, global = true, action)]
    timings: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[clap(short, long, global = true, action)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Filter a headerless binary RGB raster
    Raster {
        input_binary_path: PathBuf,
        output_folder: PathBuf,
        width: usize,
        height: usize,
    },
    /// Decode and resize an image, then filter it
    Image {
        input_image_path: PathBuf,
        output_folder: PathBuf,
        width: usize,
        height: usize,

        /// Resampling filter used when resizing
        #[clap(short, long, value_enum, default_value_t = Resize::CatmullRom)]
        resize: Resize,

        /// Skip rendering the results as PNG
        #[clap(long, action)]
        no_png: bool,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Mode {
    Magnitude,
    ColorCoded,
}

impl From<Mode> for GradientMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Magnitude => GradientMode::Magnitude,
            Mode::ColorCoded => GradientMode::ColorCoded,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Resize {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<Resize> for ResizeFilter {
    fn from(resize: Resize) -> Self {
        match resize {
            Resize::Nearest => ResizeFilter::Nearest,
            Resize::Triangle => ResizeFilter::Triangle,
            Resize::CatmullRom => ResizeFilter::CatmullRom,
            Resize::Gaussian => ResizeFilter::Gaussian,
            Resize::Lanczos3 => ResizeFilter::Lanczos3,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            let code = e
                .downcast_ref::<EdgeError>()
                .map(EdgeError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn base_config(cli: &Cli) -> EdgeConfig {
    EdgeConfig::builder()
        .workers(cli.workers)
        .mode(cli.mode.into())
        .sobel_file_name(cli.sobel_name.as_str())
        .prewitt_file_name(cli.prewitt_name.as_str())
        .build()
}

fn run(cli: &Cli) -> Result<()> {
    let start = Instant::now();

    let timings = match &cli.command {
        Command::Raster {
            input_binary_path,
            output_folder,
            width,
            height,
        } => {
            let pipeline = EdgeDetectionPipeline::new(base_config(cli));
            let scheduler = pipeline.scheduler();
            info!(
                "Edge pipeline initialized, workers: {}, mode: {:?}",
                scheduler.workers(),
                scheduler.mode()
            );

            let (paths, timings) = pipeline
                .detect_file_with_timings(input_binary_path, output_folder, *width, *height)
                .with_context(|| format!("Failed to filter {}", input_binary_path.display()))?;
            println!("Sobel output saved to '{}'.", paths.sobel.display());
            println!("Prewitt output saved to '{}'.", paths.prewitt.display());
            timings
        }
        Command::Image {
            input_image_path,
            output_folder,
            width,
            height,
            resize,
            no_png,
        } => {
            let config = EdgeConfig {
                resize_filter: (*resize).into(),
                write_png: !no_png,
                ..base_config(cli)
            };
            let workflow = ImageEdgeWorkflow::new(config);

            let report = workflow
                .run(input_image_path, output_folder, *width, *height)
                .with_context(|| format!("Failed to process {}", input_image_path.display()))?;
            println!("Binary raster saved to '{}'.", report.binary_path.display());
            println!("Sobel output saved to '{}'.", report.outputs.sobel.display());
            println!("Prewitt output saved to '{}'.", report.outputs.prewitt.display());
            for png in &report.png_paths {
                println!("Rendered '{}'.", png.display());
            }
            report.timings
        }
    };

    if cli.timings {
        timings.print_summary();
    }
    println!("Execution time: {:.4} seconds", start.elapsed().as_secs_f64());

    Ok(())
}
