//! Errors raised while preparing or sequencing rasterized frames.
//!
//! Decode failures are collected by the image cache and never abort a frame;
//! the other variants stop an export before or between frames.

use puppet_animation_core::LayerId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum RasterError {
    #[error("image for layer '{layer}' could not be decoded: {reason}")]
    ImageDecode { layer: LayerId, reason: String },

    #[error("invalid canvas size {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("canvas {width}x{height} exceeds the {max}px side limit")]
    CanvasTooLarge { width: f32, height: f32, max: u32 },

    #[error("export cancelled after {completed} of {total} frame(s)")]
    Cancelled { completed: u32, total: u32 },
}

impl RasterError {
    /// Coarse category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::ImageDecode { .. } => "decode",
            Self::InvalidDimensions { .. } | Self::CanvasTooLarge { .. } => "validation",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}
