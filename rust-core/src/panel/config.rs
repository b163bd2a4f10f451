//! Panel configuration
//! 
//! Plot style is an explicit value handed to the renderer when it is built,
//! never a process-wide default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::measurement::io::FILE_EXTENSION;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Panel config not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid panel config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not read panel config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Axis labels for one view mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
}

/// Plot appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    /// Line width in points
    pub line_width: f32,

    /// RGBA colour of the real part trace
    pub real_color: [u8; 4],

    /// RGBA colour of the imaginary part trace
    pub imag_color: [u8; 4],

    /// RGBA colour of the magnitude trace
    pub magnitude_color: [u8; 4],

    pub show_grid: bool,

    /// Also draw the magnitude trace
    pub show_magnitude: bool,

    pub time_labels: AxisLabels,
    pub frequency_labels: AxisLabels,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            real_color: [31, 119, 180, 255],
            imag_color: [255, 127, 14, 255],
            magnitude_color: [44, 160, 44, 255],
            show_grid: true,
            show_magnitude: true,
            time_labels: AxisLabels {
                x: "t (µs)".to_string(),
                y: "Magnitude (a.u.)".to_string(),
            },
            frequency_labels: AxisLabels {
                x: "Frequency offset (MHz)".to_string(),
                y: "Magnitude (a.u.)".to_string(),
            },
        }
    }
}

/// Measurement panel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Initial text of the frequency field (MHz)
    pub frequency_text: String,

    /// Initial text of the averages field
    pub averages_text: String,

    /// Extension appended to saved measurement files
    pub file_extension: String,

    pub plot_style: PlotStyle,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            frequency_text: "100.0".to_string(),
            averages_text: "1".to_string(),
            file_extension: FILE_EXTENSION.to_string(),
            plot_style: PlotStyle::default(),
        }
    }
}

impl PanelConfig {
    /// Load from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
