// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Common camera preview resolutions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewResolution {
    /// 640x480
    Vga,
    /// 1280x720
    Hd,
    /// 1920x1080
    FullHd,
}

impl PreviewResolution {
    /// Get all resolutions, smallest first
    pub const ALL: [PreviewResolution; 3] = [
        PreviewResolution::Vga,
        PreviewResolution::Hd,
        PreviewResolution::FullHd,
    ];

    /// Get display name for the resolution
    pub fn display_name(&self) -> &'static str {
        match self {
            PreviewResolution::Vga => "VGA",
            PreviewResolution::Hd => "720p",
            PreviewResolution::FullHd => "1080p",
        }
    }

    pub fn size(&self) -> (u32, u32) {
        match self {
            PreviewResolution::Vga => (640, 480),
            PreviewResolution::Hd => (1280, 720),
            PreviewResolution::FullHd => (1920, 1080),
        }
    }
}

/// Parse a `WIDTHxHEIGHT` string (e.g. `1280x720`)
pub fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid width '{}': {}", w, e))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid height '{}': {}", h, e))?;
    Ok((width, height))
}

/// Benchmark defaults
pub mod bench {
    /// Frames processed when no count is given
    pub const DEFAULT_FRAMES: u64 = 300;

    /// Extra bytes per row, roughly what camera HALs add for alignment
    pub const DEFAULT_PADDING: u32 = 32;

    /// Progress line interval in frames
    pub const PROGRESS_INTERVAL: u64 = 30;
}

/// File and directory names
pub mod paths {
    /// Directory under the user config dir
    pub const CONFIG_DIR_NAME: &str = "camera-preview";

    /// Config file inside [`CONFIG_DIR_NAME`]
    pub const CONFIG_FILE_NAME: &str = "config.json";

    /// Folder under the pictures dir for exported frames
    pub const DEFAULT_SAVE_FOLDER: &str = "Camera Preview";
}

/// Application information
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}
