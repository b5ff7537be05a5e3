use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    BORDER_COLOR, DEFAULT_JPEG_QUALITY, DEFAULT_LANDSCAPE_MAX_WIDTH, DEFAULT_MAX_UPLOAD_BYTES,
    DEFAULT_MAX_ZOOM_FACTOR, DEFAULT_PADDING, DEFAULT_PORTRAIT_MAX_WIDTH, GRID_COLOR, MASK_COLOR,
};
use crate::error::Result;

/// All tunables of a crop session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropperConfig {
    /// Margin (viewport pixels) around the crop box.
    #[serde(default = "default_padding")]
    pub padding: f64,
    /// Maximum zoom as a multiple of the minimum covering zoom.
    #[serde(default = "default_max_zoom_factor")]
    pub max_zoom_factor: f64,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

fn default_padding() -> f64 {
    DEFAULT_PADDING
}
fn default_max_zoom_factor() -> f64 {
    DEFAULT_MAX_ZOOM_FACTOR
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            max_zoom_factor: DEFAULT_MAX_ZOOM_FACTOR,
            export: ExportConfig::default(),
            upload: UploadConfig::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl CropperConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Width cap when the aspect ratio is >= 1.
    pub landscape_max_width: u32,
    /// Width cap when the aspect ratio is < 1.
    pub portrait_max_width: u32,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            landscape_max_width: DEFAULT_LANDSCAPE_MAX_WIDTH,
            portrait_max_width: DEFAULT_PORTRAIT_MAX_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ExportConfig {
    /// Output width cap for the given aspect ratio.
    pub fn max_width_for(&self, aspect_ratio: f64) -> u32 {
        if aspect_ratio >= 1.0 {
            self.landscape_max_width
        } else {
            self.portrait_max_width
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// RGBA colours of the preview overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub mask: [u8; 4],
    pub border: [u8; 4],
    pub grid: [u8; 4],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            mask: MASK_COLOR,
            border: BORDER_COLOR,
            grid: GRID_COLOR,
        }
    }
}
