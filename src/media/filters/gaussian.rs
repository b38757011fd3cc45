// SPDX-License-Identifier: GPL-3.0-only

//! Separable Gaussian blur on 8-bit single-channel images
//!
//! The kernel is quantized to 8 fractional bits (coefficients sum to 256).
//! The horizontal pass keeps the full 16-bit intermediate, the vertical pass
//! rounds back to 8 bits, so a flat image stays exactly flat.

/// Largest supported kernel size
pub const MAX_KERNEL_SIZE: usize = 15;

const FRACTION_BITS: u32 = 8;
const ONE: u32 = 1 << FRACTION_BITS;

/// Quantized 1-D Gaussian kernel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaussianKernel {
    weights: [u16; MAX_KERNEL_SIZE],
    size: usize,
}

impl GaussianKernel {
    /// Build a kernel of `size` taps
    ///
    /// The size is forced odd and into 3..=15. A non-positive `sigma` is
    /// derived from the size the same way common vision libraries do:
    /// `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
    pub fn new(size: usize, sigma: f64) -> Self {
        let size = size.clamp(3, MAX_KERNEL_SIZE) | 1;

        let sigma = if sigma > 0.0 {
            sigma
        } else {
            0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
        };

        let radius = (size / 2) as f64;
        let mut raw = [0.0f64; MAX_KERNEL_SIZE];
        for (i, w) in raw.iter_mut().take(size).enumerate() {
            let d = i as f64 - radius;
            *w = (-(d * d) / (2.0 * sigma * sigma)).exp();
        }
        let total: f64 = raw[..size].iter().sum();

        let mut weights = [0u16; MAX_KERNEL_SIZE];
        for (w, r) in weights.iter_mut().zip(&raw[..size]) {
            *w = (r / total * ONE as f64).round() as u16;
        }

        // Rounding drift goes to the centre tap so the kernel sums to exactly one
        let sum: i32 = weights[..size].iter().map(|&w| w as i32).sum();
        let center = size / 2;
        weights[center] = (weights[center] as i32 + ONE as i32 - sum) as u16;

        Self { weights, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn weights(&self) -> &[u16] {
        &self.weights[..self.size]
    }

    fn radius(&self) -> isize {
        (self.size / 2) as isize
    }
}

/// Mirror an out-of-range index without repeating the edge sample (`gfedcb|abcdefgh|gfedcba`)
#[inline]
pub(crate) fn reflect_101(mut i: isize, len: usize) -> usize {
    let n = len as isize;
    if n == 1 {
        return 0;
    }
    while i < 0 || i >= n {
        i = if i < 0 { -i } else { 2 * (n - 1) - i };
    }
    i as usize
}

/// Blur `image` in place, using `scratch` for the horizontal pass
///
/// Both buffers hold at least `width * height` elements.
pub fn blur_in_place(
    image: &mut [u8],
    scratch: &mut [u16],
    width: usize,
    height: usize,
    kernel: &GaussianKernel,
) {
    let weights = kernel.weights();
    let radius = kernel.radius();

    for (src, dst) in image
        .chunks_exact(width)
        .zip(scratch.chunks_exact_mut(width))
        .take(height)
    {
        for (x, out) in dst.iter_mut().enumerate() {
            let mut acc = 0u32;
            for (k, &w) in weights.iter().enumerate() {
                let sx = reflect_101(x as isize + k as isize - radius, width);
                acc += src[sx] as u32 * w as u32;
            }
            *out = acc as u16;
        }
    }

    let round = 1u32 << (2 * FRACTION_BITS - 1);
    for y in 0..height {
        let row = &mut image[y * width..(y + 1) * width];
        for (x, out) in row.iter_mut().enumerate() {
            let mut acc = 0u32;
            for (k, &w) in weights.iter().enumerate() {
                let sy = reflect_101(y as isize + k as isize - radius, height);
                acc += scratch[sy * width + x] as u32 * w as u32;
            }
            *out = ((acc + round) >> (2 * FRACTION_BITS)) as u8;
        }
    }
}
