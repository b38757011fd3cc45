// SPDX-License-Identifier: GPL-3.0-only

//! Stateful per-frame processor for the live preview
//!
//! The host calls [`FrameProcessor::initialize`] once with the preview size,
//! then hands every camera frame to [`FrameProcessor::process_frame`]. Each
//! frame is:
//!
//! 1. validated (dimensions, plane presence, strides and lengths),
//! 2. reconstructed into a contiguous 4:2:0 buffer,
//! 3. converted to packed RGBA,
//! 4. transformed according to the active [`ProcessMode`].
//!
//! All intermediate buffers live in a [`FrameStore`] and are reused across
//! frames; only a change of frame dimensions reallocates them.
//!
//! The processor is an owned value rather than a process-wide singleton. A
//! host that needs shared access from several threads wraps it in a
//! `Mutex`; frame processing and mode changes then serialize naturally.

pub mod types;

pub use types::{ProcessMode, ProcessorOptions, ProcessorStats};

use crate::errors::{ProcessError, ProcessResult};
use crate::media::convert;
use crate::media::filters::EdgeDetector;
use crate::media::reconstruct;
use crate::media::store::{FrameStore, ScratchSlot, ScratchViews};
use crate::media::types::{ChromaLayout, ChromaOrder, FrameDimensions, RawFrame};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Camera frame processor with reusable buffers
#[derive(Debug)]
pub struct FrameProcessor {
    store: FrameStore,
    mode: ProcessMode,
    options: ProcessorOptions,
    edges: EdgeDetector,
    stats: ProcessorStats,
}

impl Default for FrameProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameProcessor {
    /// Create an uninitialized processor with default options
    pub fn new() -> Self {
        Self::with_options(ProcessorOptions::default())
    }

    /// Create an uninitialized processor; no buffers are allocated yet
    pub fn with_options(options: ProcessorOptions) -> Self {
        Self {
            store: FrameStore::new(),
            mode: ProcessMode::Raw,
            edges: EdgeDetector::new(&options.edge),
            options,
            stats: ProcessorStats::default(),
        }
    }

    /// Prepare buffers for `width` x `height` frames and reset the mode to raw
    ///
    /// Any previous state is released first, so a failed call leaves the
    /// processor uninitialized.
    pub fn initialize(&mut self, width: u32, height: u32) -> ProcessResult<()> {
        self.store.release();
        self.mode = ProcessMode::Raw;

        match self.store.resize(width, height) {
            Ok(dims) => {
                self.stats.reallocations = self.store.allocation_count();
                info!(dims = %dims, "Frame processor initialized");
                Ok(())
            }
            Err(e) => {
                warn!(width, height, error = %e, "Frame processor initialization failed");
                Err(e)
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.store.is_initialized()
    }

    /// Current frame dimensions, `None` when uninitialized
    pub fn dimensions(&self) -> Option<FrameDimensions> {
        self.store.dimensions()
    }

    pub fn mode(&self) -> ProcessMode {
        self.mode
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    pub fn stats(&self) -> &ProcessorStats {
        &self.stats
    }

    /// Buffer arena, exposed for allocation accounting
    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    /// Select the mode from its integer code
    ///
    /// Unknown codes are logged and ignored; the active mode is kept. Returns
    /// whether the code was accepted.
    pub fn set_mode(&mut self, mode: i32) -> bool {
        match ProcessMode::try_from(mode) {
            Ok(mode) => {
                self.set_process_mode(mode);
                true
            }
            Err(code) => {
                warn!(code, current = %self.mode, "Ignoring unknown processing mode");
                false
            }
        }
    }

    pub fn set_process_mode(&mut self, mode: ProcessMode) {
        if self.mode != mode {
            debug!(from = %self.mode, to = %mode, "Processing mode changed");
        }
        self.mode = mode;
    }

    /// Process one frame and borrow the resulting RGBA image
    ///
    /// The returned slice is `width * height * 4` bytes and stays valid until
    /// the next mutable call. A frame whose dimensions differ from the
    /// current ones resizes the buffers first. On error the processor keeps
    /// its state and the next frame is processed normally.
    pub fn process_frame(&mut self, frame: &RawFrame<'_>) -> ProcessResult<&[u8]> {
        let started = Instant::now();

        match self.run(frame) {
            Ok(slot) => {
                self.stats.record_success(started.elapsed());
                self.stats.reallocations = self.store.allocation_count();
                trace!(
                    width = frame.width,
                    height = frame.height,
                    mode = %self.mode,
                    elapsed_us = started.elapsed().as_micros() as u64,
                    "Frame processed"
                );
                Ok(self.store.slot(slot))
            }
            Err(e) => {
                self.stats.record_failure();
                warn!(
                    width = frame.width,
                    height = frame.height,
                    error = %e,
                    "Frame rejected"
                );
                Err(e)
            }
        }
    }

    /// Process one frame and copy the RGBA result into `out`
    ///
    /// `out` is resized to fit; its capacity is reused across calls.
    pub fn process_frame_into(
        &mut self,
        frame: &RawFrame<'_>,
        out: &mut Vec<u8>,
    ) -> ProcessResult<()> {
        let rgba = self.process_frame(frame)?;
        out.clear();
        out.extend_from_slice(rgba);
        Ok(())
    }

    /// Free all buffers; frames are rejected until the next `initialize`
    pub fn release(&mut self) {
        if self.store.is_initialized() {
            info!("Frame processor released");
        }
        self.store.release();
    }

    fn run(&mut self, frame: &RawFrame<'_>) -> ProcessResult<ScratchSlot> {
        let current = self.store.dimensions().ok_or(ProcessError::NotInitialized)?;

        reconstruct::check_present(frame)?;

        let dims = if frame.width == current.width && frame.height == current.height {
            current
        } else {
            FrameDimensions::new(frame.width, frame.height)?
        };
        let layout = reconstruct::check_planes(frame, dims)?;

        // Validation passed; only now may the buffers change size
        self.store.resize(dims.width, dims.height)?;

        let mode = self.mode;
        let order = self.options.semi_planar_order;
        let edges = &self.edges;
        let views = self.store.views();

        contain_panic(|| transform(frame, dims, layout, order, mode, edges, views))
    }
}

/// Run one pipeline stage, reporting a panic as [`ProcessError::ConversionFailure`]
fn contain_panic<T>(stage: impl FnOnce() -> ProcessResult<T>) -> ProcessResult<T> {
    panic::catch_unwind(AssertUnwindSafe(stage))
        .unwrap_or_else(|payload| Err(ProcessError::ConversionFailure(panic_message(payload))))
}

/// Reconstruct, convert and apply `mode`; returns the slot holding the result
fn transform(
    frame: &RawFrame<'_>,
    dims: FrameDimensions,
    layout: ChromaLayout,
    order: ChromaOrder,
    mode: ProcessMode,
    edges: &EdgeDetector,
    views: ScratchViews<'_>,
) -> ProcessResult<ScratchSlot> {
    reconstruct::reconstruct(frame, dims, layout, views.planar);
    convert::planar_to_rgba(views.planar, dims, layout, order, views.packed)?;

    match mode {
        ProcessMode::Raw => Ok(ScratchSlot::Packed),
        ProcessMode::Grayscale => {
            convert::rgba_to_luma(views.packed, views.gray)?;
            convert::luma_to_rgba(views.gray, views.output)?;
            Ok(ScratchSlot::Output)
        }
        ProcessMode::EdgeDetect => {
            convert::rgba_to_luma(views.packed, views.gray)?;
            edges.apply(
                views.gray,
                views.edges,
                dims.width as usize,
                dims.height as usize,
            );
            convert::luma_to_rgba(views.gray, views.output)?;
            Ok(ScratchSlot::Output)
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "frame pipeline panicked".to_string()
    }
}
