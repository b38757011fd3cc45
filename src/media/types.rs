// SPDX-License-Identifier: GPL-3.0-only

//! Frame description types shared by the store, reconstruction and conversion

use crate::errors::{ProcessError, ProcessResult};
use serde::{Deserialize, Serialize};

/// Validated frame dimensions
///
/// Both sides are non-zero and even, so every 4:2:0 chroma plane has exactly
/// `width / 2` by `height / 2` samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FrameDimensions {
    pub width: u32,
    pub height: u32,
}

impl FrameDimensions {
    /// Validate and create frame dimensions
    ///
    /// The pixel count must fit in a `u32` (edge hysteresis indexes pixels
    /// with it) and the packed RGBA size must fit in an allocation.
    pub fn new(width: u32, height: u32) -> ProcessResult<Self> {
        if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
            return Err(ProcessError::InvalidDimensions { width, height });
        }

        let addressable = width
            .checked_mul(height)
            .and_then(|pixels| (pixels as usize).checked_mul(4))
            .is_some_and(|packed| packed <= isize::MAX as usize);
        if !addressable {
            return Err(ProcessError::InvalidDimensions { width, height });
        }

        Ok(Self { width, height })
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn chroma_width(&self) -> usize {
        self.width as usize / 2
    }

    pub fn chroma_height(&self) -> usize {
        self.height as usize / 2
    }

    /// Bytes in one subsampled chroma plane
    pub fn chroma_plane_len(&self) -> usize {
        self.chroma_width() * self.chroma_height()
    }

    /// Bytes in a padding-free 4:2:0 frame (luma + both chroma planes)
    pub fn planar_len(&self) -> usize {
        self.pixel_count() * 3 / 2
    }

    /// Bytes in a packed RGBA frame
    pub fn packed_len(&self) -> usize {
        self.pixel_count() * 4
    }
}

impl std::fmt::Display for FrameDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Identifies one of the three planes of a raw frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneKind {
    Luma,
    /// First chroma plane (U for planar input)
    ChromaA,
    /// Second chroma plane (V for planar input, interleaved pair for semi-planar)
    ChromaB,
}

impl std::fmt::Display for PlaneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaneKind::Luma => write!(f, "luma"),
            PlaneKind::ChromaA => write!(f, "chroma-a"),
            PlaneKind::ChromaB => write!(f, "chroma-b"),
        }
    }
}

/// Memory layout of the chroma data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromaLayout {
    /// Two independent half-resolution chroma planes
    Planar,
    /// One half-resolution plane with both components interleaved
    SemiPlanar,
}

impl ChromaLayout {
    /// Infer the layout from the chroma pixel stride (2 = interleaved)
    pub fn from_pixel_stride(pixel_stride: u32) -> Self {
        if pixel_stride == 2 {
            ChromaLayout::SemiPlanar
        } else {
            ChromaLayout::Planar
        }
    }
}

/// Component order inside an interleaved chroma plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromaOrder {
    /// V first (NV21, the usual camera HAL preview layout)
    #[default]
    Vu,
    /// U first (NV12)
    Uv,
}

/// Borrowed view of one sensor plane
#[derive(Debug, Clone, Copy)]
pub struct RawPlane<'a> {
    pub data: &'a [u8],
    /// Bytes between the starts of consecutive rows
    pub row_stride: u32,
    /// Bytes between consecutive samples within a row
    pub pixel_stride: u32,
}

impl<'a> RawPlane<'a> {
    pub fn new(data: &'a [u8], row_stride: u32, pixel_stride: u32) -> Self {
        Self {
            data,
            row_stride,
            pixel_stride,
        }
    }

    /// Pixel stride with 0 treated as tightly packed
    pub(crate) fn step(&self) -> usize {
        self.pixel_stride.max(1) as usize
    }
}

/// One raw camera frame as delivered by the capture callback
///
/// For semi-planar frames `chroma_b` carries the interleaved pair; `chroma_a`
/// is only consulted to complete a truncated final row.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
    pub width: u32,
    pub height: u32,
    pub luma: RawPlane<'a>,
    pub chroma_a: RawPlane<'a>,
    pub chroma_b: RawPlane<'a>,
}

impl RawFrame<'_> {
    /// Chroma layout, inferred from the plane that is always read
    pub fn layout(&self) -> ChromaLayout {
        ChromaLayout::from_pixel_stride(self.chroma_b.pixel_stride)
    }

    pub fn plane(&self, kind: PlaneKind) -> &RawPlane<'_> {
        match kind {
            PlaneKind::Luma => &self.luma,
            PlaneKind::ChromaA => &self.chroma_a,
            PlaneKind::ChromaB => &self.chroma_b,
        }
    }
}
