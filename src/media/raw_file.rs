// SPDX-License-Identifier: GPL-3.0-only

//! Raw YUV 4:2:0 dumps read from disk
//!
//! A dump is the planes written back to back: luma rows, then either the U
//! and V planes (I420) or one interleaved chroma plane (NV21/NV12). Rows may
//! be padded to a common luma stride; I420 chroma rows use half of it.

use super::types::{ChromaLayout, ChromaOrder, FrameDimensions, PlaneKind, RawFrame, RawPlane};
use crate::errors::{ProcessError, ProcessResult};
use serde::{Deserialize, Serialize};

/// Plane arrangement of a raw dump
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RawFileLayout {
    /// Y, then U, then V
    I420,
    /// Y, then interleaved V/U pairs (Android default)
    #[default]
    Nv21,
    /// Y, then interleaved U/V pairs
    Nv12,
}

impl RawFileLayout {
    pub const ALL: [RawFileLayout; 3] = [
        RawFileLayout::I420,
        RawFileLayout::Nv21,
        RawFileLayout::Nv12,
    ];

    /// Get display name for the layout
    pub fn display_name(&self) -> &'static str {
        match self {
            RawFileLayout::I420 => "I420",
            RawFileLayout::Nv21 => "NV21",
            RawFileLayout::Nv12 => "NV12",
        }
    }

    pub fn chroma_layout(&self) -> ChromaLayout {
        match self {
            RawFileLayout::I420 => ChromaLayout::Planar,
            RawFileLayout::Nv21 | RawFileLayout::Nv12 => ChromaLayout::SemiPlanar,
        }
    }

    /// Pair order the processor must be configured with
    pub fn chroma_order(&self) -> ChromaOrder {
        match self {
            RawFileLayout::Nv12 => ChromaOrder::Uv,
            RawFileLayout::I420 | RawFileLayout::Nv21 => ChromaOrder::Vu,
        }
    }

    fn chroma_stride(&self, luma_stride: u32) -> u32 {
        match self.chroma_layout() {
            ChromaLayout::Planar => luma_stride / 2,
            ChromaLayout::SemiPlanar => luma_stride,
        }
    }

    /// Exact size of a dump with the given geometry
    pub fn file_len(&self, dims: FrameDimensions, luma_stride: u32) -> usize {
        let luma = luma_stride as usize * dims.height as usize;
        let chroma_rows = dims.chroma_height();
        let chroma = self.chroma_stride(luma_stride) as usize * chroma_rows;
        match self.chroma_layout() {
            ChromaLayout::Planar => luma + 2 * chroma,
            ChromaLayout::SemiPlanar => luma + chroma,
        }
    }
}

impl std::fmt::Display for RawFileLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Clip `start..start + len` to the data actually present
fn span(data: &[u8], start: usize, len: usize) -> &[u8] {
    let start = start.min(data.len());
    let end = start.saturating_add(len).min(data.len());
    &data[start..end]
}

/// Describe the planes of a dump as a [`RawFrame`]
///
/// `luma_stride` defaults to the width. A short file yields short planes,
/// which the processor reports as [`ProcessError::PlaneTooShort`] or
/// [`ProcessError::NullInput`].
pub fn frame_from_bytes(
    data: &[u8],
    width: u32,
    height: u32,
    layout: RawFileLayout,
    luma_stride: Option<u32>,
) -> ProcessResult<RawFrame<'_>> {
    let dims = FrameDimensions::new(width, height)?;
    let luma_stride = luma_stride.unwrap_or(width);
    if luma_stride < width {
        return Err(ProcessError::StrideTooSmall {
            plane: PlaneKind::Luma,
            stride: luma_stride,
            min: width,
        });
    }

    let luma_len = luma_stride as usize * height as usize;
    let chroma_stride = layout.chroma_stride(luma_stride);
    let chroma_len = chroma_stride as usize * dims.chroma_height();
    let luma = RawPlane::new(span(data, 0, luma_len), luma_stride, 1);

    let (chroma_a, chroma_b) = match layout.chroma_layout() {
        ChromaLayout::Planar => (
            RawPlane::new(span(data, luma_len, chroma_len), chroma_stride, 1),
            RawPlane::new(span(data, luma_len + chroma_len, chroma_len), chroma_stride, 1),
        ),
        ChromaLayout::SemiPlanar => {
            let plane = span(data, luma_len, chroma_len);
            (
                RawPlane::new(span(plane, 1, chroma_len), chroma_stride, 2),
                RawPlane::new(plane, chroma_stride, 2),
            )
        }
    };

    Ok(RawFrame {
        width,
        height,
        luma,
        chroma_a,
        chroma_b,
    })
}
