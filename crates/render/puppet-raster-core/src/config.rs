//! Export configuration.

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::color::parse_background;

pub const DEFAULT_PADDING: f32 = 20.0;
pub const DEFAULT_FALLBACK_EXTENT: f32 = 512.0;
pub const DEFAULT_MAX_CANVAS_SIDE: u32 = 8192;

/// Which poses the canvas bounding box is measured from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundsSampling {
    /// Rest transforms and rest joint positions only. Animated excursions
    /// past the rest extents are clipped.
    #[default]
    RestPose,
    /// Resolved layers and posed joints of every frame.
    Animated,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Fixed canvas width. With only one of width/height set, the other
    /// follows the bounding box aspect ratio.
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Hex background; `None` leaves the canvas transparent.
    pub background: Option<String>,
    pub padding: f32,
    /// Side of the square used when the character has nothing to measure.
    pub fallback_extent: f32,
    pub bounds_sampling: BoundsSampling,
    pub draw_skeleton: bool,
    /// Largest canvas side in pixels. Larger canvases are rejected.
    pub max_canvas_side: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            background: None,
            padding: DEFAULT_PADDING,
            fallback_extent: DEFAULT_FALLBACK_EXTENT,
            bounds_sampling: BoundsSampling::default(),
            draw_skeleton: false,
            max_canvas_side: DEFAULT_MAX_CANVAS_SIDE,
        }
    }
}

impl ExportOptions {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn background_rgba(&self) -> Option<Rgba<u8>> {
        self.background.as_deref().map(parse_background)
    }
}
