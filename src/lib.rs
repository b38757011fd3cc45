// SPDX-License-Identifier: GPL-3.0-only

//! Camera Preview - real-time YUV frame processing for camera previews
//!
//! This library turns raw YUV 4:2:0 camera frames (planar I420 or
//! semi-planar NV21/NV12, with arbitrary row padding) into packed RGBA
//! images, optionally converted to grayscale or to a Canny edge map.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`frame_processor`]: the stateful per-frame processor and its modes
//! - [`media`]: reconstruction, colour conversion, filters and buffers
//! - [`config`]: user configuration handling
//! - [`errors`]: error types shared by the library and the binary
//!
//! # Example
//!
//! ```
//! use camera_preview::{ChromaLayout, FrameProcessor, ProcessMode, SyntheticFrame};
//!
//! let frame = SyntheticFrame::flat(640, 480, ChromaLayout::SemiPlanar, 128);
//!
//! let mut processor = FrameProcessor::new();
//! processor.initialize(640, 480)?;
//! processor.set_process_mode(ProcessMode::Grayscale);
//!
//! let rgba = processor.process_frame(&frame.as_raw())?;
//! assert_eq!(rgba.len(), 640 * 480 * 4);
//! # Ok::<(), camera_preview::ProcessError>(())
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod frame_processor;
pub mod media;

// Re-export commonly used types
pub use config::Config;
pub use errors::{AppError, AppResult, ProcessError, ProcessResult};
pub use frame_processor::{FrameProcessor, ProcessMode, ProcessorOptions, ProcessorStats};
pub use media::{
    ChromaLayout, ChromaOrder, EdgeParams, FrameDimensions, Pattern, PlaneKind, RawFileLayout,
    RawFrame, RawPlane, SyntheticFrame,
};
