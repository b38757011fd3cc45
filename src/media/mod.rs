// SPDX-License-Identifier: GPL-3.0-only

//! Media processing building blocks used by the frame processor
//!
//! # Format reconstruction
//!
//! Camera frames arrive as YUV 4:2:0 with padded rows and either planar
//! (I420) or interleaved (NV21/NV12) chroma. The [`reconstruct`] module
//! validates the plane views and strips them into one contiguous buffer.
//!
//! # Colour conversion
//!
//! The [`convert`] module turns that buffer into packed RGBA (BT.601) and
//! moves between RGBA and single-channel luminance.
//!
//! # Filters
//!
//! The [`filters`] module holds the Gaussian blur and Canny edge detector.
//!
//! # Modules
//!
//! - [`types`]: frame geometry and borrowed plane views
//! - [`store`]: the reusable scratch-buffer arena
//! - [`synthetic`]: generated frames for tests and benchmarks
//! - [`raw_file`]: raw YUV dumps read from disk

pub mod convert;
pub mod filters;
pub mod raw_file;
pub mod reconstruct;
pub mod store;
pub mod synthetic;
pub mod types;

// Re-export commonly used types
pub use filters::{EdgeDetector, EdgeParams};
pub use raw_file::RawFileLayout;
pub use store::{FrameStore, ScratchSlot};
pub use synthetic::{Pattern, SyntheticFrame};
pub use types::{ChromaLayout, ChromaOrder, FrameDimensions, PlaneKind, RawFrame, RawPlane};
