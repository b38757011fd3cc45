// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for frame processing
//!
//! This module provides command-line functionality for:
//! - Converting raw YUV dumps to PNG
//! - Benchmarking the processor on synthetic frames
//! - Printing the effective configuration

use camera_preview::constants::{bench as defaults, parse_resolution, paths};
use camera_preview::media::raw_file;
use camera_preview::{
    AppError, AppResult, Config, FrameDimensions, FrameProcessor, Pattern, ProcessMode,
    ProcessorOptions, RawFileLayout, SyntheticFrame,
};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::info;

/// A raw frame file and its geometry
pub struct RawInput {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub layout: RawFileLayout,
    pub stride: Option<u32>,
}

/// Parameters of the `bench` command
pub struct BenchOptions {
    pub resolution: String,
    pub layout: RawFileLayout,
    pub padding: u32,
    pub frames: u64,
    pub mode: Option<ProcessMode>,
    pub alternate: Option<String>,
}

/// Processor options for a given input layout
///
/// NV12 dumps override the configured pair order; the file format states it.
fn options_for(config: &Config, layout: RawFileLayout) -> ProcessorOptions {
    let mut options = config.processor;
    if layout != RawFileLayout::I420 {
        options.semi_planar_order = layout.chroma_order();
    }
    options
}

/// Run one raw dump through the processor and save it as PNG
pub fn process_file(
    config: &Config,
    input: RawInput,
    mode: Option<ProcessMode>,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let data = std::fs::read(&input.path)?;
    let frame = raw_file::frame_from_bytes(
        &data,
        input.width,
        input.height,
        input.layout,
        input.stride,
    )?;

    let mode = mode.unwrap_or(config.mode);
    println!(
        "Input: {} ({}x{} {}, {} bytes)",
        input.path.display(),
        input.width,
        input.height,
        input.layout,
        data.len()
    );
    println!("Mode: {}", mode);

    let mut processor = FrameProcessor::with_options(options_for(config, input.layout));
    processor.initialize(input.width, input.height)?;
    processor.set_process_mode(mode);

    let mut rgba = Vec::new();
    processor.process_frame_into(&frame, &mut rgba)?;

    let image = image::RgbaImage::from_raw(input.width, input.height, rgba)
        .ok_or_else(|| AppError::Other("RGBA buffer does not match frame size".to_string()))?;

    let output_path = match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            path
        }
        None => {
            let dir = get_default_output_dir();
            std::fs::create_dir_all(&dir)?;
            let timestamp = Local::now().format("%Y%m%d_%H%M%S");
            dir.join(format!("frame_{}.png", timestamp))
        }
    };

    image.save_with_format(&output_path, image::ImageFormat::Png)?;
    info!(path = %output_path.display(), "Saved processed frame");
    println!("Saved: {}", output_path.display());

    Ok(())
}

/// Process synthetic frames as fast as possible and print the statistics
pub fn bench(config: &Config, opts: BenchOptions) -> AppResult<()> {
    let (width, height) = parse_resolution(&opts.resolution)?;
    let alternate = opts
        .alternate
        .as_deref()
        .map(parse_resolution)
        .transpose()?;
    let mode = opts.mode.unwrap_or(config.mode);

    // Synthetic frames need valid geometry before the processor sees them
    for (w, h) in std::iter::once((width, height)).chain(alternate) {
        FrameDimensions::new(w, h)?;
    }

    let build = |(w, h): (u32, u32)| {
        SyntheticFrame::new(
            w,
            h,
            opts.layout.chroma_layout(),
            opts.layout.chroma_order(),
            opts.padding,
            Pattern::HorizontalGradient,
            (110, 160),
        )
    };
    let mut frames = vec![build((width, height))];
    if let Some(size) = alternate {
        frames.push(build(size));
    }

    let mut processor = FrameProcessor::with_options(options_for(config, opts.layout));
    processor.initialize(width, height)?;
    processor.set_process_mode(mode);

    // Set up Ctrl+C handler
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| AppError::Other(format!("Failed to install Ctrl+C handler: {}", e)))?;

    println!(
        "Benchmarking {} {}x{} (padding {}, mode {})",
        opts.layout, width, height, opts.padding, mode
    );
    if let Some((w, h)) = alternate {
        println!("Alternating with {}x{}", w, h);
    }
    if opts.frames == 0 {
        println!("Running until Ctrl+C...");
    }

    let start = Instant::now();
    let mut count = 0u64;
    while opts.frames == 0 || count < opts.frames {
        if stop_flag.load(Ordering::SeqCst) {
            println!();
            println!("Stopping early...");
            break;
        }

        let frame = &frames[count as usize % frames.len()];
        processor.process_frame(&frame.as_raw())?;
        count += 1;

        if count % defaults::PROGRESS_INTERVAL == 0 {
            print!(
                "\rFrames: {} ({:.1} fps)",
                count,
                processor.stats().throughput_fps()
            );
            std::io::Write::flush(&mut std::io::stdout())?;
        }
    }
    println!();

    let elapsed = start.elapsed().as_secs_f64();
    println!(
        "Processed {} frames in {:.2}s ({:.1} fps wall clock)",
        count,
        elapsed,
        if elapsed > 0.0 {
            count as f64 / elapsed
        } else {
            0.0
        }
    );
    println!("{}", serde_json::to_string_pretty(processor.stats())?);

    Ok(())
}

/// Print the effective configuration
pub fn show_config(config: &Config) -> AppResult<()> {
    match Config::default_path() {
        Some(path) => eprintln!("Default location: {}", path.display()),
        None => eprintln!("No config directory on this platform"),
    }
    println!("{}", config.to_json()?);
    Ok(())
}

/// Get default output directory for processed frames
fn get_default_output_dir() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(paths::DEFAULT_SAVE_FOLDER)
}
