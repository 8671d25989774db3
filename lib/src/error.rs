use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a failed conversion
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FaultKind {
    /// Parameters rejected, or an output grid too large for them, before any resizing
    Config,
    /// Image could not be read or decoded
    Input,
    /// Anything else that aborted the pipeline
    Internal,
}

/// A conversion that produced no artwork
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Invalid conversion parameters: {0}")]
    InvalidParams(#[from] ConfigError),
    #[error("Error converting image '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Error converting image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Output of {width}x{height} characters exceeds the limit of {limit}")]
    TooLarge { width: u32, height: u32, limit: u64 },
    #[error("Error converting image: {0}")]
    Internal(String),
}

impl ConversionError {
    pub fn kind(&self) -> FaultKind {
        match self {
            ConversionError::InvalidParams(_) | ConversionError::TooLarge { .. } => {
                FaultKind::Config
            }
            ConversionError::Open { .. } | ConversionError::Decode(_) => FaultKind::Input,
            ConversionError::Internal(_) => FaultKind::Internal,
        }
    }
}
