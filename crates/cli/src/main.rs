use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use voxdens_pipeline::{bin_file, summarize_file, tally_file, BinnerConfig};

/// Reduce particle simulation output to per-voxel density histograms.
#[derive(Parser)]
#[command(name = "voxdens", version)]
struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bin a position file into one density line per frame.
    Bin(BinArgs),
    /// Count the particles of one frame inside the closed box [0, side]^3.
    Tally(TallyArgs),
    /// Report frame count and peak voxel density of a density file.
    Summary(SummaryArgs),
}

#[derive(Args)]
struct BinArgs {
    /// Position file, one comma-separated x,y,z,... line per frame.
    #[arg(short, long, default_value = "results.txt")]
    input: PathBuf,

    /// Density file to create.
    #[arg(short, long, default_value = "densities_result.txt")]
    output: PathBuf,

    /// JSON file with binner settings; flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Side length of the cubic simulation domain.
    #[arg(long)]
    side_length: Option<f64>,

    /// Voxels per axis.
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Bin batches of frames in parallel. Output is identical to a sequential run.
    #[arg(long)]
    parallel: bool,

    /// Frames per parallel batch.
    #[arg(long)]
    batch_size: Option<usize>,
}

#[derive(Args)]
struct TallyArgs {
    #[arg(short, long, default_value = "results.txt")]
    input: PathBuf,

    /// 1-indexed frame to inspect.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    frame: u64,

    #[arg(long, default_value_t = 100.0)]
    side_length: f64,
}

#[derive(Args)]
struct SummaryArgs {
    #[arg(short, long, default_value = "densities_result.txt")]
    input: PathBuf,

    /// Voxels per axis the file was written with.
    #[arg(short, long, default_value_t = 10)]
    resolution: usize,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(args: &BinArgs) -> Result<BinnerConfig> {
    let mut config = match &args.config {
        Some(path) => BinnerConfig::from_json_file(path)?,
        None => BinnerConfig::default(),
    };
    if let Some(side) = args.side_length {
        config.domain_side_length = side;
    }
    if let Some(res) = args.resolution {
        config.grid_resolution = res;
    }
    if args.parallel {
        config.parallel = true;
    }
    if let Some(batch) = args.batch_size {
        config.batch_size = batch;
    }
    Ok(config)
}

fn run_bin(args: &BinArgs) -> Result<()> {
    let config = resolve_config(args)?;
    if args.input == args.output {
        bail!("input and output must be different files");
    }
    info!(?config, "resolved configuration");

    let summary = bin_file(&args.input, &args.output, &config).with_context(|| {
        format!(
            "binning {} into {}",
            args.input.display(),
            args.output.display()
        )
    })?;
    println!(
        "{} frames, {} particles, {} binned, {} discarded",
        summary.frames,
        summary.particles,
        summary.binned,
        summary.discarded()
    );
    Ok(())
}

fn run_tally(args: &TallyArgs) -> Result<()> {
    let frame = usize::try_from(args.frame).context("frame number out of range")?;
    let report = tally_file(&args.input, frame, args.side_length)
        .with_context(|| format!("tallying {}", args.input.display()))?;
    println!(
        "frame {}: {} of {} particles inside [0, {}]^3",
        report.frame, report.in_bounds, report.particles, args.side_length
    );
    Ok(())
}

fn run_summary(args: &SummaryArgs) -> Result<()> {
    let summary = summarize_file(&args.input, args.resolution)
        .with_context(|| format!("summarizing {}", args.input.display()))?;
    println!("frames: {}", summary.frames);
    println!("max region density: {}", summary.max_region_density);
    if let Some(peak) = summary.peak {
        println!(
            "peak: frame {} voxel ({}, {}, {})",
            peak.frame, peak.voxel.ix, peak.voxel.iy, peak.voxel.iz
        );
    }
    Ok(())
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Command::Bin(args) => run_bin(args),
        Command::Tally(args) => run_tally(args),
        Command::Summary(args) => run_summary(args),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            std::process::ExitCode::FAILURE
        }
    }
}
