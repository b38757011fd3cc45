// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic camera frames for tests and benchmarking
//!
//! Builds owned planes in either chroma layout, with optional row padding,
//! and lends them out as a [`RawFrame`] exactly as a camera HAL would.

use super::types::{ChromaLayout, ChromaOrder, RawFrame, RawPlane};

/// Luma fill pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Every sample has the same value
    Flat(u8),
    /// Left-to-right ramp from 16 to 235
    HorizontalGradient,
    /// Left half `low`, right half `high`
    VerticalStep { low: u8, high: u8 },
}

impl Pattern {
    fn luma_at(self, x: usize, width: usize) -> u8 {
        match self {
            Pattern::Flat(v) => v,
            Pattern::HorizontalGradient => {
                let span = width.saturating_sub(1).max(1);
                (16 + x * 219 / span) as u8
            }
            Pattern::VerticalStep { low, high } => {
                if x < width / 2 {
                    low
                } else {
                    high
                }
            }
        }
    }
}

/// Owned planes of a synthetic 4:2:0 frame
#[derive(Debug, Clone)]
pub struct SyntheticFrame {
    pub width: u32,
    pub height: u32,
    layout: ChromaLayout,
    luma: Vec<u8>,
    luma_stride: u32,
    /// Planar: U plane. Semi-planar: the interleaved plane.
    chroma_first: Vec<u8>,
    /// Planar: V plane. Unused for semi-planar.
    chroma_second: Vec<u8>,
    chroma_stride: u32,
}

impl SyntheticFrame {
    /// Build a frame with constant chroma `(u, v)`
    ///
    /// `padding` extra bytes, filled with `0xA5`, are appended to every row
    /// of every plane. Semi-planar frames store `order` pairs.
    pub fn new(
        width: u32,
        height: u32,
        layout: ChromaLayout,
        order: ChromaOrder,
        padding: u32,
        pattern: Pattern,
        (u, v): (u8, u8),
    ) -> Self {
        const PAD: u8 = 0xA5;
        let w = width as usize;
        let h = height as usize;
        let cw = w / 2;
        let ch = h / 2;

        let luma_stride = width + padding;
        let mut luma = vec![PAD; luma_stride as usize * h];
        for row in luma.chunks_exact_mut(luma_stride as usize) {
            for (x, px) in row[..w].iter_mut().enumerate() {
                *px = pattern.luma_at(x, w);
            }
        }

        let (chroma_first, chroma_second, chroma_stride) = match layout {
            ChromaLayout::Planar => {
                let stride = cw as u32 + padding;
                let mut a = vec![PAD; stride as usize * ch];
                let mut b = vec![PAD; stride as usize * ch];
                for (ra, rb) in a
                    .chunks_exact_mut(stride as usize)
                    .zip(b.chunks_exact_mut(stride as usize))
                {
                    ra[..cw].fill(u);
                    rb[..cw].fill(v);
                }
                (a, b, stride)
            }
            ChromaLayout::SemiPlanar => {
                let stride = width + padding;
                let pair = match order {
                    ChromaOrder::Vu => [v, u],
                    ChromaOrder::Uv => [u, v],
                };
                let mut plane = vec![PAD; stride as usize * ch];
                for row in plane.chunks_exact_mut(stride as usize) {
                    for dst in row[..w].chunks_exact_mut(2) {
                        dst.copy_from_slice(&pair);
                    }
                }
                (plane, Vec::new(), stride)
            }
        };

        Self {
            width,
            height,
            layout,
            luma,
            luma_stride,
            chroma_first,
            chroma_second,
            chroma_stride,
        }
    }

    /// Flat gray frame with neutral chroma, the simplest valid input
    pub fn flat(width: u32, height: u32, layout: ChromaLayout, luma: u8) -> Self {
        Self::new(
            width,
            height,
            layout,
            ChromaOrder::Vu,
            0,
            Pattern::Flat(luma),
            (128, 128),
        )
    }

    pub fn layout(&self) -> ChromaLayout {
        self.layout
    }

    /// Borrow the planes as a raw frame
    ///
    /// Semi-planar frames mimic the camera HAL: chroma-b is the interleaved
    /// plane and chroma-a is the same memory offset by one byte.
    pub fn as_raw(&self) -> RawFrame<'_> {
        let luma = RawPlane::new(&self.luma, self.luma_stride, 1);
        match self.layout {
            ChromaLayout::Planar => RawFrame {
                width: self.width,
                height: self.height,
                luma,
                chroma_a: RawPlane::new(&self.chroma_first, self.chroma_stride, 1),
                chroma_b: RawPlane::new(&self.chroma_second, self.chroma_stride, 1),
            },
            ChromaLayout::SemiPlanar => RawFrame {
                width: self.width,
                height: self.height,
                luma,
                chroma_a: RawPlane::new(
                    self.chroma_first.get(1..).unwrap_or_default(),
                    self.chroma_stride,
                    2,
                ),
                chroma_b: RawPlane::new(&self.chroma_first, self.chroma_stride, 2),
            },
        }
    }
}
