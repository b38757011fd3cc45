// SPDX-License-Identifier: GPL-3.0-only

//! Processing modes, processor options and runtime statistics

use crate::media::filters::EdgeParams;
use crate::media::types::ChromaOrder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transform applied to every converted frame
///
/// The integer values are a stable contract with the host: `0 = Raw`,
/// `1 = Grayscale`, `2 = EdgeDetect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessMode {
    /// Colour-converted frame, unmodified
    #[default]
    Raw,
    /// Luminance replicated into RGB
    Grayscale,
    /// Binary Canny edge map replicated into RGB
    EdgeDetect,
}

impl ProcessMode {
    /// All modes in integer order
    pub const ALL: [ProcessMode; 3] = [
        ProcessMode::Raw,
        ProcessMode::Grayscale,
        ProcessMode::EdgeDetect,
    ];

    pub fn as_i32(self) -> i32 {
        match self {
            ProcessMode::Raw => 0,
            ProcessMode::Grayscale => 1,
            ProcessMode::EdgeDetect => 2,
        }
    }

    /// Get display name for the mode
    pub fn display_name(&self) -> &'static str {
        match self {
            ProcessMode::Raw => "Raw",
            ProcessMode::Grayscale => "Grayscale",
            ProcessMode::EdgeDetect => "Edge detect",
        }
    }

    /// Next mode in integer order, wrapping around (preview toggle button)
    pub fn next(self) -> Self {
        Self::ALL[(self.as_i32() as usize + 1) % Self::ALL.len()]
    }
}

impl TryFrom<i32> for ProcessMode {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ProcessMode::Raw),
            1 => Ok(ProcessMode::Grayscale),
            2 => Ok(ProcessMode::EdgeDetect),
            other => Err(other),
        }
    }
}

impl std::str::FromStr for ProcessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" | "0" => Ok(ProcessMode::Raw),
            "grayscale" | "gray" | "1" => Ok(ProcessMode::Grayscale),
            "edge_detect" | "edge-detect" | "edges" | "canny" | "2" => {
                Ok(ProcessMode::EdgeDetect)
            }
            other => Err(format!(
                "unknown mode '{}' (expected raw, grayscale or edges)",
                other
            )),
        }
    }
}

impl std::fmt::Display for ProcessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Processor tuning that stays fixed for the processor's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorOptions {
    /// Gaussian and Canny parameters for [`ProcessMode::EdgeDetect`]
    pub edge: EdgeParams,
    /// Pair order of interleaved chroma
    pub semi_planar_order: ChromaOrder,
}

/// Per-processor counters and latency figures
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessorStats {
    pub frames_processed: u64,
    pub frames_failed: u64,
    /// Buffer (re)allocations performed by the store
    pub reallocations: u64,
    pub last_latency_ms: f64,
    pub average_latency_ms: f64,
    pub max_latency_ms: f64,
    #[serde(skip)]
    total_latency: Duration,
}

impl ProcessorStats {
    pub(crate) fn record_success(&mut self, elapsed: Duration) {
        self.frames_processed += 1;
        self.total_latency += elapsed;

        let ms = elapsed.as_secs_f64() * 1000.0;
        self.last_latency_ms = ms;
        self.max_latency_ms = self.max_latency_ms.max(ms);
        self.average_latency_ms =
            self.total_latency.as_secs_f64() * 1000.0 / self.frames_processed as f64;
    }

    pub(crate) fn record_failure(&mut self) {
        self.frames_failed += 1;
    }

    /// Frames per second implied by the average latency (0 before any frame)
    pub fn throughput_fps(&self) -> f64 {
        if self.average_latency_ms > 0.0 {
            1000.0 / self.average_latency_ms
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_integer_contract() {
        for mode in ProcessMode::ALL {
            assert_eq!(ProcessMode::try_from(mode.as_i32()), Ok(mode));
        }
        assert_eq!(ProcessMode::try_from(3), Err(3));
        assert_eq!(ProcessMode::try_from(-1), Err(-1));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("raw".parse::<ProcessMode>(), Ok(ProcessMode::Raw));
        assert_eq!("Gray".parse::<ProcessMode>(), Ok(ProcessMode::Grayscale));
        assert_eq!("canny".parse::<ProcessMode>(), Ok(ProcessMode::EdgeDetect));
        assert!("sepia".parse::<ProcessMode>().is_err());
    }

    #[test]
    fn test_mode_cycles() {
        assert_eq!(ProcessMode::Raw.next(), ProcessMode::Grayscale);
        assert_eq!(ProcessMode::EdgeDetect.next(), ProcessMode::Raw);
    }

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&ProcessMode::EdgeDetect).unwrap();
        assert_eq!(json, "\"edge_detect\"");
        let mode: ProcessMode = serde_json::from_str("\"grayscale\"").unwrap();
        assert_eq!(mode, ProcessMode::Grayscale);
    }

    #[test]
    fn test_stats_latency() {
        let mut stats = ProcessorStats::default();
        assert_eq!(stats.throughput_fps(), 0.0);

        stats.record_success(Duration::from_millis(10));
        stats.record_success(Duration::from_millis(30));
        stats.record_failure();

        assert_eq!(stats.frames_processed, 2);
        assert_eq!(stats.frames_failed, 1);
        assert!((stats.average_latency_ms - 20.0).abs() < 1e-9);
        assert!((stats.max_latency_ms - 30.0).abs() < 1e-9);
        assert!((stats.last_latency_ms - 30.0).abs() < 1e-9);
        assert!((stats.throughput_fps() - 50.0).abs() < 1e-9);
    }
}
