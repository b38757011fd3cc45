// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the frame processor and the command-line tool

use crate::media::types::PlaneKind;
use std::fmt;

/// Result type alias for per-frame operations
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Frame processing errors
///
/// Every variant is recoverable: the failed call leaves the processor in the
/// state it had before the call (or cleanly uninitialized for `initialize`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// Width or height is zero or odd (4:2:0 needs even dimensions)
    InvalidDimensions { width: u32, height: u32 },
    /// Frame operation before `initialize` or after `release`
    NotInitialized,
    /// A required plane has no data
    NullInput(PlaneKind),
    /// A plane holds fewer bytes than its rows and strides address
    PlaneTooShort {
        plane: PlaneKind,
        needed: usize,
        actual: usize,
    },
    /// Row stride cannot hold one row of samples
    StrideTooSmall {
        plane: PlaneKind,
        stride: u32,
        min: u32,
    },
    /// The colour or edge pipeline failed for this frame
    ConversionFailure(String),
}

/// Command-line tool errors
#[derive(Debug)]
pub enum AppError {
    /// Frame processing error
    Process(ProcessError),
    /// Configuration errors
    Config(String),
    /// Filesystem errors
    Io(std::io::Error),
    /// PNG encoding errors
    Image(image::ImageError),
    /// Generic error with message
    Other(String),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::InvalidDimensions { width, height } => {
                write!(f, "Invalid frame dimensions: {}x{}", width, height)
            }
            ProcessError::NotInitialized => write!(f, "Processor not initialized"),
            ProcessError::NullInput(plane) => write!(f, "Missing {} plane data", plane),
            ProcessError::PlaneTooShort {
                plane,
                needed,
                actual,
            } => write!(
                f,
                "{} plane too short: need {} bytes, got {}",
                plane, needed, actual
            ),
            ProcessError::StrideTooSmall { plane, stride, min } => write!(
                f,
                "{} plane row stride {} is below the minimum of {}",
                plane, stride, min
            ),
            ProcessError::ConversionFailure(msg) => write!(f, "Conversion failed: {}", msg),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Process(e) => write!(f, "Processing error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Io(e) => write!(f, "I/O error: {}", e),
            AppError::Image(e) => write!(f, "Image error: {}", e),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ProcessError {}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Process(e) => Some(e),
            AppError::Io(e) => Some(e),
            AppError::Image(e) => Some(e),
            AppError::Config(_) | AppError::Other(_) => None,
        }
    }
}

impl From<ProcessError> for AppError {
    fn from(err: ProcessError) -> Self {
        AppError::Process(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Image(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}
