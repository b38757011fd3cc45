// SPDX-License-Identifier: GPL-3.0-only

//! Colour conversion between 4:2:0 YUV, packed RGBA and single-channel luma
//!
//! YUV to RGB uses BT.601 limited-range coefficients in 20-bit fixed point,
//! and RGB to luma uses BT.601 weights in 14-bit fixed point. Both are
//! integer-only so identical input always gives identical output.

use super::types::{ChromaLayout, ChromaOrder, FrameDimensions};
use crate::errors::{ProcessError, ProcessResult};

const SHIFT: u32 = 20;
const HALF: i32 = 1 << (SHIFT - 1);
const CY: i32 = 1_220_542;
const CUB: i32 = 2_116_026;
const CUG: i32 = -409_993;
const CVG: i32 = -852_492;
const CVR: i32 = 1_673_527;

const LUMA_SHIFT: u32 = 14;
const LUMA_R: u32 = 4_899;
const LUMA_G: u32 = 9_617;
const LUMA_B: u32 = 1_868;

/// Alpha written to every packed pixel
pub const OPAQUE: u8 = 255;

#[inline]
fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Precomputed chroma contributions shared by a 2x2 block
#[derive(Debug, Clone, Copy)]
struct ChromaTerms {
    r: i32,
    g: i32,
    b: i32,
}

impl ChromaTerms {
    #[inline]
    fn new(u: u8, v: u8) -> Self {
        let u = u as i32 - 128;
        let v = v as i32 - 128;
        Self {
            r: HALF + CVR * v,
            g: HALF + CVG * v + CUG * u,
            b: HALF + CUB * u,
        }
    }

    #[inline]
    fn apply(self, y: u8, out: &mut [u8; 4]) {
        let y = (y as i32 - 16).max(0) * CY;
        out[0] = clamp_u8((y + self.r) >> SHIFT);
        out[1] = clamp_u8((y + self.g) >> SHIFT);
        out[2] = clamp_u8((y + self.b) >> SHIFT);
        out[3] = OPAQUE;
    }
}

/// Convert a single YUV sample to RGB (BT.601, limited range)
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let mut px = [0u8; 4];
    ChromaTerms::new(u, v).apply(y, &mut px);
    [px[0], px[1], px[2]]
}

/// BT.601 luminance of an RGB triple
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let sum = r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B;
    ((sum + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

fn as_pixels_mut(rgba: &mut [u8]) -> ProcessResult<&mut [[u8; 4]]> {
    bytemuck::try_cast_slice_mut(rgba)
        .map_err(|e| ProcessError::ConversionFailure(format!("RGBA buffer: {:?}", e)))
}

fn as_pixels(rgba: &[u8]) -> ProcessResult<&[[u8; 4]]> {
    bytemuck::try_cast_slice(rgba)
        .map_err(|e| ProcessError::ConversionFailure(format!("RGBA buffer: {:?}", e)))
}

fn check_len(what: &str, actual: usize, needed: usize) -> ProcessResult<()> {
    if actual < needed {
        return Err(ProcessError::ConversionFailure(format!(
            "{} buffer holds {} bytes, need {}",
            what, actual, needed
        )));
    }
    Ok(())
}

/// Convert a contiguous 4:2:0 frame to packed RGBA
///
/// `planar` uses the layout produced by reconstruction: luma, then either two
/// chroma planes (U then V) or one interleaved plane in `order`.
pub fn planar_to_rgba(
    planar: &[u8],
    dims: FrameDimensions,
    layout: ChromaLayout,
    order: ChromaOrder,
    rgba: &mut [u8],
) -> ProcessResult<()> {
    check_len("planar", planar.len(), dims.planar_len())?;
    check_len("packed", rgba.len(), dims.packed_len())?;

    let width = dims.width as usize;
    let (luma, chroma) = planar[..dims.planar_len()].split_at(dims.pixel_count());
    let pixels = as_pixels_mut(&mut rgba[..dims.packed_len()])?;

    match layout {
        ChromaLayout::Planar => {
            let (u_plane, v_plane) = chroma.split_at(dims.chroma_plane_len());
            let cw = dims.chroma_width();
            convert_rows(luma, pixels, width, |row, cx| {
                let idx = row * cw + cx;
                ChromaTerms::new(u_plane[idx], v_plane[idx])
            });
        }
        ChromaLayout::SemiPlanar => {
            let (u_off, v_off) = match order {
                ChromaOrder::Vu => (1, 0),
                ChromaOrder::Uv => (0, 1),
            };
            convert_rows(luma, pixels, width, |row, cx| {
                let idx = row * width + cx * 2;
                ChromaTerms::new(chroma[idx + u_off], chroma[idx + v_off])
            });
        }
    }

    Ok(())
}

/// Shared row loop; `chroma_at(chroma_row, chroma_col)` yields the block terms
fn convert_rows<F>(luma: &[u8], pixels: &mut [[u8; 4]], width: usize, chroma_at: F)
where
    F: Fn(usize, usize) -> ChromaTerms,
{
    for (y, (luma_row, out_row)) in luma
        .chunks_exact(width)
        .zip(pixels.chunks_exact_mut(width))
        .enumerate()
    {
        let crow = y / 2;
        for (cx, (l, out)) in luma_row
            .chunks_exact(2)
            .zip(out_row.chunks_exact_mut(2))
            .enumerate()
        {
            let terms = chroma_at(crow, cx);
            terms.apply(l[0], &mut out[0]);
            terms.apply(l[1], &mut out[1]);
        }
    }
}

/// Extract BT.601 luminance from packed RGBA
pub fn rgba_to_luma(rgba: &[u8], gray: &mut [u8]) -> ProcessResult<()> {
    let pixels = as_pixels(rgba)?;
    check_len("gray", gray.len(), pixels.len())?;

    for (px, out) in pixels.iter().zip(gray.iter_mut()) {
        *out = luminance(px[0], px[1], px[2]);
    }
    Ok(())
}

/// Replicate a single-channel image into opaque RGBA
pub fn luma_to_rgba(gray: &[u8], rgba: &mut [u8]) -> ProcessResult<()> {
    let pixels = as_pixels_mut(rgba)?;
    check_len("packed", pixels.len(), gray.len())?;

    for (&g, out) in gray.iter().zip(pixels.iter_mut()) {
        *out = [g, g, g, OPAQUE];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuv_to_rgb_reference_points() {
        // Limited range black and white
        assert_eq!(yuv_to_rgb(16, 128, 128), [0, 0, 0]);
        assert_eq!(yuv_to_rgb(235, 128, 128), [255, 255, 255]);
        // Below the footroom clamps to black
        assert_eq!(yuv_to_rgb(0, 128, 128), [0, 0, 0]);
        // Neutral chroma always gives gray
        let [r, g, b] = yuv_to_rgb(128, 128, 128);
        assert_eq!((r, r), (g, b));
    }

    #[test]
    fn test_yuv_to_rgb_saturated_colors() {
        // BT.601 red: Y=81 U=90 V=240
        let [r, g, b] = yuv_to_rgb(81, 90, 240);
        assert!(r > 250);
        assert!(g < 5);
        assert!(b < 5);

        // BT.601 blue: Y=41 U=240 V=110
        let [r, g, b] = yuv_to_rgb(41, 240, 110);
        assert!(r < 5);
        assert!(g < 5);
        assert!(b > 250);
    }

    #[test]
    fn test_luminance_of_gray_is_identity() {
        for v in [0u8, 1, 77, 128, 254, 255] {
            assert_eq!(luminance(v, v, v), v);
        }
        assert_eq!(luminance(255, 0, 0), 76);
        assert_eq!(luminance(0, 255, 0), 150);
        assert_eq!(luminance(0, 0, 255), 29);
    }

    #[test]
    fn test_planar_and_interleaved_agree() {
        let dims = FrameDimensions::new(4, 2).unwrap();
        let luma = [20u8, 60, 100, 140, 180, 220, 235, 16];
        let (u0, u1, v0, v1) = (90u8, 200u8, 240u8, 60u8);

        let mut i420 = luma.to_vec();
        i420.extend_from_slice(&[u0, u1, v0, v1]);
        let mut nv21 = luma.to_vec();
        nv21.extend_from_slice(&[v0, u0, v1, u1]);
        let mut nv12 = luma.to_vec();
        nv12.extend_from_slice(&[u0, v0, u1, v1]);

        let mut a = vec![0u8; dims.packed_len()];
        let mut b = vec![0u8; dims.packed_len()];
        let mut c = vec![0u8; dims.packed_len()];
        planar_to_rgba(&i420, dims, ChromaLayout::Planar, ChromaOrder::Vu, &mut a).unwrap();
        planar_to_rgba(&nv21, dims, ChromaLayout::SemiPlanar, ChromaOrder::Vu, &mut b).unwrap();
        planar_to_rgba(&nv12, dims, ChromaLayout::SemiPlanar, ChromaOrder::Uv, &mut c).unwrap();

        assert_eq!(a, b);
        assert_eq!(a, c);
        // Top-left pixel uses the first chroma pair
        assert_eq!(&a[..3], &yuv_to_rgb(20, u0, v0));
        // Bottom-right pixel shares the second pair
        assert_eq!(&a[28..31], &yuv_to_rgb(16, u1, v1));
    }

    #[test]
    fn test_short_buffers_fail() {
        let dims = FrameDimensions::new(2, 2).unwrap();
        let planar = [0u8; 5];
        let mut rgba = [0u8; 16];
        let err = planar_to_rgba(&planar, dims, ChromaLayout::Planar, ChromaOrder::Vu, &mut rgba)
            .unwrap_err();
        assert!(matches!(err, ProcessError::ConversionFailure(_)));
    }

    #[test]
    fn test_luma_round_trip_through_rgba() {
        let gray = [0u8, 50, 200, 255];
        let mut rgba = [0u8; 16];
        luma_to_rgba(&gray, &mut rgba).unwrap();
        assert_eq!(&rgba[4..8], &[50, 50, 50, 255]);

        let mut back = [0u8; 4];
        rgba_to_luma(&rgba, &mut back).unwrap();
        assert_eq!(back, gray);
    }
}
