//! Canvas bounds and the world -> canvas mapping.
//!
//! The bounding box is measured once per export and reused for every frame
//! so the output sequence stays spatially aligned.

use log::debug;
use serde::{Deserialize, Serialize};

use puppet_animation_core::{Engine, Transform};

use crate::config::{BoundsSampling, ExportOptions};
use crate::error::RasterError;
use crate::image_cache::ImageCache;

/// Axis-aligned box in character space.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Square `[0, extent]` box.
    pub fn square(extent: f32) -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: extent,
            max_y: extent,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn padded(self, pad: f32) -> Self {
        Self {
            min_x: self.min_x - pad,
            min_y: self.min_y - pad,
            max_x: self.max_x + pad,
            max_y: self.max_y + pad,
        }
    }
}

/// Running min/max accumulator. Empty until the first point.
#[derive(Clone, Debug, Default)]
struct Extents(Option<Bounds>);

impl Extents {
    fn point(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.0 = Some(match self.0 {
            None => Bounds {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            },
            Some(b) => Bounds {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        });
    }

    /// A `w` x `h` image placed by `t`, or just its position without a size.
    fn layer(&mut self, t: &Transform, size: Option<(u32, u32)>) {
        match size {
            Some((w, h)) => {
                for (cx, cy) in layer_corners(t, w as f32, h as f32) {
                    self.point(cx, cy);
                }
            }
            None => self.point(t.x, t.y),
        }
    }
}

/// Corners of an image of size `w` x `h` centered on `t`, after scale and
/// clockwise rotation (y-down).
pub fn layer_corners(t: &Transform, w: f32, h: f32) -> [(f32, f32); 4] {
    let (sin, cos) = t.rotation.to_radians().sin_cos();
    let hw = w * 0.5 * t.scale_x;
    let hh = h * 0.5 * t.scale_y;
    [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
        .map(|(x, y)| (t.x + x * cos - y * sin, t.y + x * sin + y * cos))
}

/// Measure the padded bounding box of the snapshot held by `engine`.
///
/// A character with nothing to measure yields the fallback square, unpadded.
pub fn measure(engine: &Engine, images: &ImageCache, opts: &ExportOptions) -> Bounds {
    let character = engine.character();
    let mut ext = Extents::default();
    match opts.bounds_sampling {
        BoundsSampling::RestPose => {
            for layer in &character.layers {
                ext.layer(&layer.transform, images.size(layer.id.as_str()));
            }
            for joint in &character.joints {
                ext.point(joint.x, joint.y);
            }
        }
        BoundsSampling::Animated => {
            for frame in 0..engine.frame_count() {
                let state = engine.frame_state(frame);
                for layer in &state.layers {
                    ext.layer(&layer.transform, images.size(layer.layer_id.as_str()));
                }
                for (_, p) in state.pose.iter() {
                    ext.point(p.x, p.y);
                }
            }
        }
    }
    match ext.0 {
        Some(b) => {
            let padded = b.padded(opts.padding.max(0.0));
            debug!(
                "bounds {:?}: {}x{} at ({}, {})",
                opts.bounds_sampling,
                padded.width(),
                padded.height(),
                padded.min_x,
                padded.min_y
            );
            padded
        }
        None => {
            debug!("nothing to measure; using {} square", opts.fallback_extent);
            Bounds::square(opts.fallback_extent)
        }
    }
}

/// Maps character space onto a fixed-size canvas.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub bounds: Bounds,
    /// Canvas pixels per character unit.
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Viewport {
    /// Fit `bounds` into the requested canvas. Without fixed dimensions the
    /// canvas is the box size at scale 1; with them the box is scaled
    /// uniformly and centered. Neither side may exceed `max_side`.
    pub fn fit(
        bounds: Bounds,
        width: Option<u32>,
        height: Option<u32>,
        max_side: u32,
    ) -> Result<Self, RasterError> {
        let bw = bounds.width().max(1.0);
        let bh = bounds.height().max(1.0);
        if !bw.is_finite() || !bh.is_finite() {
            return Err(RasterError::CanvasTooLarge {
                width: bw,
                height: bh,
                max: max_side,
            });
        }
        let (w, h, scale) = match (width, height) {
            (None, None) => (bw.ceil(), bh.ceil(), 1.0),
            (Some(w), Some(h)) => (w as f32, h as f32, (w as f32 / bw).min(h as f32 / bh)),
            (Some(w), None) => {
                let s = w as f32 / bw;
                (w as f32, (bh * s).ceil(), s)
            }
            (None, Some(h)) => {
                let s = h as f32 / bh;
                ((bw * s).ceil(), h as f32, s)
            }
        };
        // Checked in f32 so an oversized box is not saturated into range.
        if w > max_side as f32 || h > max_side as f32 {
            return Err(RasterError::CanvasTooLarge {
                width: w,
                height: h,
                max: max_side,
            });
        }
        let (w, h) = (w as u32, h as u32);
        if w as u64 * h as u64 * 4 > isize::MAX as u64 {
            return Err(RasterError::CanvasTooLarge {
                width: w as f32,
                height: h as f32,
                max: max_side,
            });
        }
        if w == 0 || h == 0 || !scale.is_finite() || scale <= 0.0 {
            return Err(RasterError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        Ok(Self {
            width: w,
            height: h,
            bounds,
            scale,
            offset_x: (w as f32 - bw * scale) * 0.5,
            offset_y: (h as f32 - bh * scale) * 0.5,
        })
    }

    #[inline]
    pub fn to_canvas(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.bounds.min_x) * self.scale + self.offset_x,
            (y - self.bounds.min_y) * self.scale + self.offset_y,
        )
    }

    #[inline]
    pub fn to_world(&self, cx: f32, cy: f32) -> (f32, f32) {
        (
            (cx - self.offset_x) / self.scale + self.bounds.min_x,
            (cy - self.offset_y) / self.scale + self.bounds.min_y,
        )
    }
}
