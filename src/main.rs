// SPDX-License-Identifier: GPL-3.0-only

use camera_preview::{ProcessMode, RawFileLayout};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "camera-preview")]
#[command(about = "Process raw YUV camera frames into RGBA previews")]
#[command(version = camera_preview::constants::app_info::version())]
struct Cli {
    /// Config file (default: <config dir>/camera-preview/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a raw YUV dump to PNG
    Process {
        /// Raw frame file
        input: PathBuf,

        /// Frame width in pixels
        #[arg(short = 'W', long)]
        width: u32,

        /// Frame height in pixels
        #[arg(short = 'H', long)]
        height: u32,

        /// Plane arrangement of the dump
        #[arg(short, long, value_enum, default_value_t = RawFileLayout::Nv21)]
        layout: RawFileLayout,

        /// Luma row stride in bytes (default: width)
        #[arg(long)]
        stride: Option<u32>,

        /// Processing mode: raw, grayscale or edges (default: from config)
        #[arg(short, long)]
        mode: Option<ProcessMode>,

        /// Output PNG path (default: ~/Pictures/Camera Preview/frame_TIMESTAMP.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Measure processing throughput on synthetic frames
    Bench {
        /// Frame size as WIDTHxHEIGHT
        #[arg(short, long, default_value = "1280x720")]
        resolution: String,

        /// Chroma arrangement of the synthetic frames
        #[arg(short, long, value_enum, default_value_t = RawFileLayout::Nv21)]
        layout: RawFileLayout,

        /// Extra bytes appended to every row
        #[arg(short, long, default_value_t = camera_preview::constants::bench::DEFAULT_PADDING)]
        padding: u32,

        /// Number of frames (0 = until Ctrl+C)
        #[arg(short, long, default_value_t = camera_preview::constants::bench::DEFAULT_FRAMES)]
        frames: u64,

        /// Processing mode: raw, grayscale or edges (default: from config)
        #[arg(short, long)]
        mode: Option<ProcessMode>,

        /// Alternate every frame with this WIDTHxHEIGHT to exercise resizing
        #[arg(short, long)]
        alternate: Option<String>,
    },

    /// Print the effective configuration as JSON
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=camera_preview=trace, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config = camera_preview::Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Process {
            input,
            width,
            height,
            layout,
            stride,
            mode,
            output,
        } => cli::process_file(
            &config,
            cli::RawInput {
                path: input,
                width,
                height,
                layout,
                stride,
            },
            mode,
            output,
        )?,
        Commands::Bench {
            resolution,
            layout,
            padding,
            frames,
            mode,
            alternate,
        } => cli::bench(
            &config,
            cli::BenchOptions {
                resolution,
                layout,
                padding,
                frames,
                mode,
                alternate,
            },
        )?,
        Commands::Config => cli::show_config(&config)?,
    }

    Ok(())
}
