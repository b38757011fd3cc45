// SPDX-License-Identifier: GPL-3.0-only

//! CPU image filters applied to the luminance plane
//!
//! The edge pipeline is Gaussian smoothing followed by Canny edge detection,
//! both working in place on the store's gray buffer with the preallocated
//! [`EdgeWorkspace`](crate::media::store::EdgeWorkspace).

pub mod canny;
pub mod gaussian;

use crate::media::store::EdgeWorkspace;
use serde::{Deserialize, Serialize};

pub use canny::Thresholds;
pub use gaussian::GaussianKernel;

/// Edge-detection tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    /// Gaussian kernel size (odd, 3..=15)
    pub blur_kernel_size: u32,
    /// Gaussian standard deviation; 0 derives it from the kernel size
    pub blur_sigma: f64,
    /// Magnitude above which a pixel may join an edge
    pub low_threshold: i32,
    /// Magnitude above which a pixel starts an edge
    pub high_threshold: i32,
}

impl EdgeParams {
    /// Check the values a config file may carry
    pub fn validate(&self) -> Result<(), String> {
        let size = self.blur_kernel_size as usize;
        if size < 3 || size > gaussian::MAX_KERNEL_SIZE || size % 2 == 0 {
            return Err(format!(
                "blur_kernel_size {} must be odd and within 3..={}",
                size,
                gaussian::MAX_KERNEL_SIZE
            ));
        }
        if !self.blur_sigma.is_finite() {
            return Err(format!("blur_sigma {} is not a number", self.blur_sigma));
        }
        if self.low_threshold < 0 || self.high_threshold < 0 {
            return Err(format!(
                "thresholds must be non-negative (low {}, high {})",
                self.low_threshold, self.high_threshold
            ));
        }
        Ok(())
    }
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            blur_sigma: 1.5,
            low_threshold: 50,
            high_threshold: 150,
        }
    }
}

/// Prepared edge pipeline (kernel quantized once, reused for every frame)
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDetector {
    kernel: GaussianKernel,
    thresholds: Thresholds,
}

impl EdgeDetector {
    pub fn new(params: &EdgeParams) -> Self {
        Self {
            kernel: GaussianKernel::new(params.blur_kernel_size as usize, params.blur_sigma),
            thresholds: Thresholds::new(params.low_threshold, params.high_threshold),
        }
    }

    pub fn kernel(&self) -> &GaussianKernel {
        &self.kernel
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Smooth `gray` and replace it with its binary edge map
    pub fn apply(&self, gray: &mut [u8], ws: &mut EdgeWorkspace, width: usize, height: usize) {
        gaussian::blur_in_place(gray, &mut ws.smooth, width, height, &self.kernel);
        canny::detect_edges(gray, ws, width, height, self.thresholds);
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new(&EdgeParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_validate() {
        assert!(EdgeParams::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let even = EdgeParams {
            blur_kernel_size: 4,
            ..Default::default()
        };
        assert!(even.validate().is_err());

        let negative = EdgeParams {
            low_threshold: -1,
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_detector_uses_params() {
        let detector = EdgeDetector::new(&EdgeParams {
            blur_kernel_size: 7,
            blur_sigma: 2.0,
            low_threshold: 200,
            high_threshold: 100,
        });
        assert_eq!(detector.kernel().size(), 7);
        assert_eq!(detector.thresholds(), Thresholds { low: 100, high: 200 });
    }
}
