// SPDX-License-Identifier: GPL-3.0-only

//! Canny edge detection on 8-bit single-channel images
//!
//! Steps: 3x3 Sobel gradients (replicated border), L1 magnitude,
//! non-maximum suppression along the quantized gradient direction, then
//! dual-threshold hysteresis. The result overwrites the input with a binary
//! map (255 = edge, 0 = background).

use crate::media::store::EdgeWorkspace;

/// tan(22.5 deg) in 15-bit fixed point
const TG22: i32 = 13_573;

const CANDIDATE: u8 = 0;
const NOT_EDGE: u8 = 1;
const EDGE: u8 = 2;

/// Hysteresis thresholds on the L1 gradient magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub low: i32,
    pub high: i32,
}

impl Thresholds {
    /// Thresholds with `low <= high`, swapping if given in the wrong order
    pub fn new(low: i32, high: i32) -> Self {
        if low > high {
            Self {
                low: high,
                high: low,
            }
        } else {
            Self { low, high }
        }
    }
}

fn sobel(image: &[u8], ws: &mut EdgeWorkspace, width: usize, height: usize) {
    let at = |x: isize, y: isize| -> i32 {
        let x = x.clamp(0, width as isize - 1) as usize;
        let y = y.clamp(0, height as isize - 1) as usize;
        image[y * width + x] as i32
    };

    for y in 0..height {
        let yi = y as isize;
        for x in 0..width {
            let xi = x as isize;
            let tl = at(xi - 1, yi - 1);
            let tm = at(xi, yi - 1);
            let tr = at(xi + 1, yi - 1);
            let ml = at(xi - 1, yi);
            let mr = at(xi + 1, yi);
            let bl = at(xi - 1, yi + 1);
            let bm = at(xi, yi + 1);
            let br = at(xi + 1, yi + 1);

            let gx = (tr + 2 * mr + br) - (tl + 2 * ml + bl);
            let gy = (bl + 2 * bm + br) - (tl + 2 * tm + tr);

            let idx = y * width + x;
            ws.grad_x[idx] = gx as i16;
            ws.grad_y[idx] = gy as i16;
            ws.magnitude[idx] = gx.abs() + gy.abs();
        }
    }
}

/// Whether the pixel is a local maximum across the gradient direction
fn is_local_max(ws: &EdgeWorkspace, x: usize, y: usize, width: usize, height: usize) -> bool {
    let idx = y * width + x;
    let m = ws.magnitude[idx];
    let dx = ws.grad_x[idx] as i32;
    let dy = ws.grad_y[idx] as i32;

    // Magnitude outside the image counts as zero
    let mag = |ox: isize, oy: isize| -> i32 {
        let nx = x as isize + ox;
        let ny = y as isize + oy;
        if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
            0
        } else {
            ws.magnitude[ny as usize * width + nx as usize]
        }
    };

    let ax = dx.abs();
    let ay = dy.abs() << 15;
    let tg22x = ax * TG22;

    if ay < tg22x {
        // Mostly horizontal gradient
        m > mag(-1, 0) && m >= mag(1, 0)
    } else {
        let tg67x = tg22x + (ax << 16);
        if ay > tg67x {
            // Mostly vertical gradient
            m > mag(0, -1) && m >= mag(0, 1)
        } else {
            let s: isize = if (dx ^ dy) < 0 { -1 } else { 1 };
            m > mag(-s, -1) && m > mag(s, 1)
        }
    }
}

/// Detect edges in `image`, replacing it with the binary edge map
///
/// `ws` must be sized for at least `width * height` pixels.
pub fn detect_edges(
    image: &mut [u8],
    ws: &mut EdgeWorkspace,
    width: usize,
    height: usize,
    thresholds: Thresholds,
) {
    let n = width * height;
    sobel(image, ws, width, height);

    ws.stack.clear();
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let m = ws.magnitude[idx];
            let state = if m > thresholds.low && is_local_max(ws, x, y, width, height) {
                if m > thresholds.high {
                    ws.stack.push(idx as u32);
                    EDGE
                } else {
                    CANDIDATE
                }
            } else {
                NOT_EDGE
            };
            ws.state[idx] = state;
        }
    }

    // Grow strong edges through connected candidates
    while let Some(idx) = ws.stack.pop() {
        let idx = idx as usize;
        let (x, y) = ((idx % width) as isize, (idx / width) as isize);
        for oy in -1..=1 {
            for ox in -1..=1 {
                let nx = x + ox;
                let ny = y + oy;
                if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                    continue;
                }
                let nidx = ny as usize * width + nx as usize;
                if ws.state[nidx] == CANDIDATE {
                    ws.state[nidx] = EDGE;
                    ws.stack.push(nidx as u32);
                }
            }
        }
    }

    for (out, &state) in image[..n].iter_mut().zip(&ws.state[..n]) {
        *out = if state == EDGE { 255 } else { 0 };
    }
}
