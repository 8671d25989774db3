use crate::ascii::BlendScale;
use crate::geometry::MAX_OUTPUT_PIXELS;
use crate::palette::Density;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Parameters for one image to ASCII conversion
///
/// Loaded from TOML, every field is optional and falls back to its default:
///
/// ```toml
/// output_width = 80
/// density = "fine"
/// contrast = 1.3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionParams {
    /// Target column count, default 100
    pub output_width: u32,
    /// Character ramp, default medium
    pub density: Density,
    /// Reserved, not consulted by the mapping
    pub color: bool,
    /// Brightness multiplier, 1.0 leaves the image unchanged
    pub brightness: f32,
    /// Contrast multiplier around the mean gray, 1.0 leaves the image unchanged
    pub contrast: f32,
    /// Invert every channel after the tone adjustments
    pub invert: bool,
    /// Blend weight in [0, 1] between luminance and local detail, default 0.7
    pub detail_preservation: f32,
    /// Scale of the local intensity inside the blend, default raw
    pub blend_scale: BlendScale,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            output_width: 100,
            density: Density::Medium,
            color: false,
            brightness: 1.0,
            contrast: 1.0,
            invert: false,
            detail_preservation: 0.7,
            blend_scale: BlendScale::Raw,
        }
    }
}

/// Errors raised while building or loading conversion parameters
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("output_width must be at least 1, got {0}")]
    ZeroWidth(u32),
    #[error("output_width must be at most {MAX_OUTPUT_PIXELS}, got {0}")]
    WidthTooLarge(u32),
    #[error("brightness must be a positive finite number, got {0}")]
    InvalidBrightness(f32),
    #[error("contrast must be a positive finite number, got {0}")]
    InvalidContrast(f32),
    #[error("detail_preservation must be between 0.0 and 1.0, got {0}")]
    InvalidDetail(f32),
    #[error("unknown density '{0}', expected fine, medium or coarse")]
    UnknownDensity(String),
    #[error("failed to read parameter file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse parameter file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConversionParams {
    /// Validates the parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_width == 0 {
            return Err(ConfigError::ZeroWidth(self.output_width));
        }
        if self.output_width as u64 > MAX_OUTPUT_PIXELS {
            return Err(ConfigError::WidthTooLarge(self.output_width));
        }
        if !self.brightness.is_finite() || self.brightness <= 0.0 {
            return Err(ConfigError::InvalidBrightness(self.brightness));
        }
        if !self.contrast.is_finite() || self.contrast <= 0.0 {
            return Err(ConfigError::InvalidContrast(self.contrast));
        }
        if !(0.0..=1.0).contains(&self.detail_preservation) {
            return Err(ConfigError::InvalidDetail(self.detail_preservation));
        }
        Ok(())
    }

    /// Parse and validate parameters from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let params: ConversionParams = toml::from_str(content)?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse and validate a TOML parameter file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
