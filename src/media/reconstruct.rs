// SPDX-License-Identifier: GPL-3.0-only

//! Strided sensor planes to a contiguous 4:2:0 frame
//!
//! Camera HALs hand out planes whose rows are padded to an alignment and
//! whose chroma is either planar (I420) or interleaved (NV21/NV12). This
//! module validates the plane views against the frame geometry and copies
//! them row by row into one padding-free buffer:
//!
//! ```text
//! Planar:      [ Y: w*h ][ A: w/2*h/2 ][ B: w/2*h/2 ]
//! SemiPlanar:  [ Y: w*h ][ interleaved pairs: w*h/2 ]
//! ```

use super::types::{ChromaLayout, FrameDimensions, PlaneKind, RawFrame, RawPlane};
use crate::errors::{ProcessError, ProcessResult};

/// Bytes a plane must hold to address `rows` rows of `samples` samples
///
/// The final row only has to reach its last sample, since HALs commonly
/// omit the trailing padding.
fn required_len(rows: usize, samples: usize, row_stride: usize, step: usize) -> usize {
    (rows - 1) * row_stride + (samples - 1) * step + 1
}

fn check_stride(kind: PlaneKind, plane: &RawPlane<'_>, row_bytes: usize) -> ProcessResult<()> {
    if (plane.row_stride as usize) < row_bytes {
        return Err(ProcessError::StrideTooSmall {
            plane: kind,
            stride: plane.row_stride,
            min: u32::try_from(row_bytes).unwrap_or(u32::MAX),
        });
    }
    Ok(())
}

fn check_len(kind: PlaneKind, plane: &RawPlane<'_>, needed: usize) -> ProcessResult<()> {
    if plane.data.len() < needed {
        return Err(ProcessError::PlaneTooShort {
            plane: kind,
            needed,
            actual: plane.data.len(),
        });
    }
    Ok(())
}

/// Reject empty planes
pub fn check_present(frame: &RawFrame<'_>) -> ProcessResult<()> {
    for kind in [PlaneKind::Luma, PlaneKind::ChromaA, PlaneKind::ChromaB] {
        if frame.plane(kind).data.is_empty() {
            return Err(ProcessError::NullInput(kind));
        }
    }
    Ok(())
}

/// Validate every plane against the frame geometry
///
/// Returns the detected chroma layout. Runs before any buffer is touched so
/// a malformed frame never triggers a resize.
pub fn check_planes(frame: &RawFrame<'_>, dims: FrameDimensions) -> ProcessResult<ChromaLayout> {
    let width = dims.width as usize;
    let height = dims.height as usize;
    let cw = dims.chroma_width();
    let ch = dims.chroma_height();

    let luma = &frame.luma;
    check_stride(PlaneKind::Luma, luma, width.saturating_mul(luma.step()))?;
    check_len(
        PlaneKind::Luma,
        luma,
        required_len(height, width, luma.row_stride as usize, luma.step()),
    )?;

    let layout = frame.layout();
    match layout {
        ChromaLayout::SemiPlanar => {
            let b = &frame.chroma_b;
            check_stride(PlaneKind::ChromaB, b, width)?;
            let needed = required_len(ch, width, b.row_stride as usize, 1);
            // Final interleaved byte may live in chroma-a instead
            if b.data.len() + 1 == needed {
                let a = &frame.chroma_a;
                check_len(
                    PlaneKind::ChromaA,
                    a,
                    required_len(ch, cw, a.row_stride as usize, a.step()),
                )?;
            } else {
                check_len(PlaneKind::ChromaB, b, needed)?;
            }
        }
        ChromaLayout::Planar => {
            for kind in [PlaneKind::ChromaA, PlaneKind::ChromaB] {
                let plane = frame.plane(kind);
                check_stride(kind, plane, cw.saturating_mul(plane.step()))?;
                check_len(
                    kind,
                    plane,
                    required_len(ch, cw, plane.row_stride as usize, plane.step()),
                )?;
            }
        }
    }

    Ok(layout)
}

/// Copy `rows` rows of `samples` samples into a tightly packed destination
fn copy_plane(plane: &RawPlane<'_>, rows: usize, samples: usize, dst: &mut [u8]) {
    let stride = plane.row_stride as usize;
    let step = plane.step();

    for (row, dst_row) in dst.chunks_exact_mut(samples).take(rows).enumerate() {
        let start = row * stride;
        if step == 1 {
            dst_row.copy_from_slice(&plane.data[start..start + samples]);
        } else {
            for (i, out) in dst_row.iter_mut().enumerate() {
                *out = plane.data[start + i * step];
            }
        }
    }
}

/// Copy the interleaved chroma plane, completing a truncated final row
fn copy_interleaved(frame: &RawFrame<'_>, dims: FrameDimensions, dst: &mut [u8]) {
    let b = &frame.chroma_b;
    let width = dims.width as usize;
    let rows = dims.chroma_height();
    let stride = b.row_stride as usize;

    for (row, dst_row) in dst.chunks_exact_mut(width).take(rows).enumerate() {
        let start = row * stride;
        let available = b.data.len().saturating_sub(start).min(width);
        dst_row[..available].copy_from_slice(&b.data[start..start + available]);

        if available < width {
            let a = &frame.chroma_a;
            let last = (rows - 1) * a.row_stride as usize + (dims.chroma_width() - 1) * a.step();
            dst_row[width - 1] = a.data[last];
        }
    }
}

/// Rebuild a padding-free 4:2:0 frame from validated planes
///
/// `dst` must be at least [`FrameDimensions::planar_len`] bytes and the
/// frame must have passed [`check_planes`].
pub fn reconstruct(
    frame: &RawFrame<'_>,
    dims: FrameDimensions,
    layout: ChromaLayout,
    dst: &mut [u8],
) {
    let width = dims.width as usize;
    let height = dims.height as usize;
    let (luma, chroma) = dst[..dims.planar_len()].split_at_mut(dims.pixel_count());

    copy_plane(&frame.luma, height, width, luma);

    match layout {
        ChromaLayout::SemiPlanar => copy_interleaved(frame, dims, chroma),
        ChromaLayout::Planar => {
            let (a, b) = chroma.split_at_mut(dims.chroma_plane_len());
            copy_plane(&frame.chroma_a, dims.chroma_height(), dims.chroma_width(), a);
            copy_plane(&frame.chroma_b, dims.chroma_height(), dims.chroma_width(), b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(w: u32, h: u32) -> FrameDimensions {
        FrameDimensions::new(w, h).unwrap()
    }

    #[test]
    fn test_planar_strips_padding() {
        // 4x2 luma with stride 6, 2x1 chroma planes with stride 3
        let y = [1, 2, 3, 4, 0, 0, 5, 6, 7, 8];
        let u = [10, 11];
        let v = [20, 21, 0];
        let frame = RawFrame {
            width: 4,
            height: 2,
            luma: RawPlane::new(&y, 6, 1),
            chroma_a: RawPlane::new(&u, 3, 1),
            chroma_b: RawPlane::new(&v, 3, 1),
        };

        let d = dims(4, 2);
        let layout = check_planes(&frame, d).unwrap();
        assert_eq!(layout, ChromaLayout::Planar);

        let mut out = vec![0u8; d.planar_len()];
        reconstruct(&frame, d, layout, &mut out);
        assert_eq!(out, [1, 2, 3, 4, 5, 6, 7, 8, 10, 11, 20, 21]);
    }

    #[test]
    fn test_planar_gathers_with_pixel_stride() {
        let y = [0u8; 4];
        let u = [10, 99, 11, 99];
        let v = [20, 99, 21, 99];
        let frame = RawFrame {
            width: 2,
            height: 2,
            luma: RawPlane::new(&y, 2, 1),
            chroma_a: RawPlane::new(&u, 4, 3),
            chroma_b: RawPlane::new(&v, 4, 3),
        };
        // pixel stride 3 is still planar; one sample per row here
        let d = dims(2, 2);
        let layout = check_planes(&frame, d).unwrap();
        let mut out = vec![0u8; d.planar_len()];
        reconstruct(&frame, d, layout, &mut out);
        assert_eq!(&out[4..], &[10, 20]);
    }

    #[test]
    fn test_semi_planar_copies_pairs() {
        let y = [0u8; 8];
        let vu = [30, 40, 31, 41, 0xEE, 0xEE];
        let frame = RawFrame {
            width: 4,
            height: 2,
            luma: RawPlane::new(&y, 4, 1),
            chroma_a: RawPlane::new(&vu[1..], 6, 2),
            chroma_b: RawPlane::new(&vu, 6, 2),
        };

        let d = dims(4, 2);
        let layout = check_planes(&frame, d).unwrap();
        assert_eq!(layout, ChromaLayout::SemiPlanar);

        let mut out = vec![0u8; d.planar_len()];
        reconstruct(&frame, d, layout, &mut out);
        assert_eq!(&out[8..], &[30, 40, 31, 41]);
    }

    #[test]
    fn test_semi_planar_truncated_tail_uses_chroma_a() {
        // V plane view ends one byte early; the final U sample sits in chroma-a
        let y = [0u8; 8];
        let v_view = [30, 40, 31];
        let u_view = [40, 31, 41];
        let frame = RawFrame {
            width: 4,
            height: 2,
            luma: RawPlane::new(&y, 4, 1),
            chroma_a: RawPlane::new(&u_view, 4, 2),
            chroma_b: RawPlane::new(&v_view, 4, 2),
        };

        let d = dims(4, 2);
        let layout = check_planes(&frame, d).unwrap();
        let mut out = vec![0u8; d.planar_len()];
        reconstruct(&frame, d, layout, &mut out);
        assert_eq!(&out[8..], &[30, 40, 31, 41]);
    }

    #[test]
    fn test_short_luma_rejected() {
        let y = [0u8; 7];
        let c = [128u8; 2];
        let frame = RawFrame {
            width: 4,
            height: 2,
            luma: RawPlane::new(&y, 4, 1),
            chroma_a: RawPlane::new(&c, 2, 1),
            chroma_b: RawPlane::new(&c, 2, 1),
        };

        let err = check_planes(&frame, dims(4, 2)).unwrap_err();
        assert_eq!(
            err,
            ProcessError::PlaneTooShort {
                plane: PlaneKind::Luma,
                needed: 8,
                actual: 7
            }
        );
    }

    #[test]
    fn test_narrow_stride_rejected() {
        let y = [0u8; 16];
        let c = [128u8; 4];
        let frame = RawFrame {
            width: 4,
            height: 2,
            luma: RawPlane::new(&y, 3, 1),
            chroma_a: RawPlane::new(&c, 2, 1),
            chroma_b: RawPlane::new(&c, 2, 1),
        };

        assert!(matches!(
            check_planes(&frame, dims(4, 2)),
            Err(ProcessError::StrideTooSmall {
                plane: PlaneKind::Luma,
                stride: 3,
                min: 4
            })
        ));
    }

    #[test]
    fn test_huge_pixel_stride_saturates_minimum() {
        let y = [0u8; 16];
        let c = [128u8; 4];
        let frame = RawFrame {
            width: 4,
            height: 2,
            luma: RawPlane::new(&y, 4096, u32::MAX),
            chroma_a: RawPlane::new(&c, 2, 1),
            chroma_b: RawPlane::new(&c, 2, 1),
        };

        assert_eq!(
            check_planes(&frame, dims(4, 2)),
            Err(ProcessError::StrideTooSmall {
                plane: PlaneKind::Luma,
                stride: 4096,
                min: u32::MAX
            })
        );

        let frame = RawFrame {
            luma: RawPlane::new(&y, 4, 1),
            chroma_a: RawPlane::new(&c, 2, u32::MAX),
            ..frame
        };
        assert_eq!(
            check_planes(&frame, dims(4, 2)),
            Err(ProcessError::StrideTooSmall {
                plane: PlaneKind::ChromaA,
                stride: 2,
                min: u32::MAX
            })
        );
    }

    #[test]
    fn test_empty_plane_is_null_input() {
        let y = [0u8; 8];
        let c = [128u8; 2];
        let frame = RawFrame {
            width: 4,
            height: 2,
            luma: RawPlane::new(&y, 4, 1),
            chroma_a: RawPlane::new(&[], 2, 1),
            chroma_b: RawPlane::new(&c, 2, 1),
        };
        assert_eq!(
            check_present(&frame),
            Err(ProcessError::NullInput(PlaneKind::ChromaA))
        );
    }
}
