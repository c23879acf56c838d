//! Frame rasterization: pose -> layer transforms -> RGBA canvas.
//!
//! Layers are drawn in ascending `order`, each image centered on its resolved
//! position, scaled, rotated clockwise about its center and composited
//! source-over at the layer's opacity. Pixels are sampled nearest-neighbour
//! at pixel centers.

use image::{Rgba, RgbaImage};
use log::debug;

use puppet_animation_core::{Character, Engine, FrameState, Motion, Snapshot, Transform};

use crate::bounds::{layer_corners, measure, Viewport};
use crate::color::parse_hex;
use crate::config::ExportOptions;
use crate::error::RasterError;
use crate::image_cache::ImageCache;

const BONE_COLOR: Rgba<u8> = Rgba([226, 232, 240, 255]);
const FALLBACK_JOINT_COLOR: Rgba<u8> = Rgba([0xef, 0x44, 0x44, 255]);
const BONE_WIDTH: f32 = 2.0;
const JOINT_RADIUS: f32 = 4.0;

/// Straight-alpha source-over of `src` (alpha pre-scaled by `opacity`) onto `dst`.
#[inline]
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>, opacity: f32) {
    let sa = src[3] as f32 / 255.0 * opacity;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let v = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Canvas pixel range `[lo, hi)` covering canvas coordinates `[a, b]`.
fn pixel_span(a: f32, b: f32, limit: u32) -> (u32, u32) {
    let lo = a.floor().max(0.0) as u32;
    let hi = (b.ceil().max(0.0) as u32).min(limit);
    (lo.min(limit), hi)
}

/// Draw `img` with transform `t` onto `canvas`.
fn draw_image(canvas: &mut RgbaImage, vp: &Viewport, img: &RgbaImage, t: &Transform, opacity: f32) {
    if opacity <= 0.0 || t.scale_x == 0.0 || t.scale_y == 0.0 {
        return;
    }
    let (iw, ih) = img.dimensions();
    let (w, h) = (iw as f32, ih as f32);

    let corners = layer_corners(t, w, h).map(|(x, y)| vp.to_canvas(x, y));
    let min_x = corners.iter().map(|c| c.0).fold(f32::INFINITY, f32::min);
    let max_x = corners.iter().map(|c| c.0).fold(f32::NEG_INFINITY, f32::max);
    let min_y = corners.iter().map(|c| c.1).fold(f32::INFINITY, f32::min);
    let max_y = corners.iter().map(|c| c.1).fold(f32::NEG_INFINITY, f32::max);
    let (x0, x1) = pixel_span(min_x, max_x, canvas.width());
    let (y0, y1) = pixel_span(min_y, max_y, canvas.height());

    let (sin, cos) = t.rotation.to_radians().sin_cos();
    for py in y0..y1 {
        for px in x0..x1 {
            let (wx, wy) = vp.to_world(px as f32 + 0.5, py as f32 + 0.5);
            let (dx, dy) = (wx - t.x, wy - t.y);
            // Inverse rotation, then inverse scale, into image space.
            let lx = (dx * cos + dy * sin) / t.scale_x + w * 0.5;
            let ly = (-dx * sin + dy * cos) / t.scale_y + h * 0.5;
            if lx < 0.0 || ly < 0.0 || lx >= w || ly >= h {
                continue;
            }
            let src = *img.get_pixel(lx as u32, ly as u32);
            blend_over(canvas.get_pixel_mut(px, py), src, opacity);
        }
    }
}

fn fill_disc(canvas: &mut RgbaImage, cx: f32, cy: f32, r: f32, color: Rgba<u8>) {
    let (x0, x1) = pixel_span(cx - r, cx + r, canvas.width());
    let (y0, y1) = pixel_span(cy - r, cy + r, canvas.height());
    for py in y0..y1 {
        for px in x0..x1 {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r * r {
                blend_over(canvas.get_pixel_mut(px, py), color, 1.0);
            }
        }
    }
}

fn draw_segment(canvas: &mut RgbaImage, a: (f32, f32), b: (f32, f32), width: f32, color: Rgba<u8>) {
    let half = width * 0.5;
    let (x0, x1) = pixel_span(a.0.min(b.0) - half, a.0.max(b.0) + half, canvas.width());
    let (y0, y1) = pixel_span(a.1.min(b.1) - half, a.1.max(b.1) + half, canvas.height());
    let (vx, vy) = (b.0 - a.0, b.1 - a.1);
    let len2 = vx * vx + vy * vy;
    for py in y0..y1 {
        for px in x0..x1 {
            let (qx, qy) = (px as f32 + 0.5 - a.0, py as f32 + 0.5 - a.1);
            let t = if len2 > 0.0 {
                ((qx * vx + qy * vy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (ex, ey) = (qx - vx * t, qy - vy * t);
            if ex * ex + ey * ey <= half * half {
                blend_over(canvas.get_pixel_mut(px, py), color, 1.0);
            }
        }
    }
}

/// Bones between posed joints, then joint dots. Bones with a missing
/// endpoint are skipped.
fn draw_skeleton(canvas: &mut RgbaImage, vp: &Viewport, engine: &Engine, state: &FrameState) {
    let character = engine.character();
    let px = |id: &str| state.pose.get(id).map(|p| vp.to_canvas(p.x, p.y));
    let line = (BONE_WIDTH * vp.scale).max(1.0);
    for bone in engine.skeleton().valid_bones(&character.bones) {
        if let (Some(a), Some(b)) = (px(bone.start_joint_id.as_str()), px(bone.end_joint_id.as_str())) {
            draw_segment(canvas, a, b, line, BONE_COLOR);
        }
    }
    let radius = (JOINT_RADIUS * vp.scale).max(1.5);
    for joint in &character.joints {
        if let Some((cx, cy)) = px(joint.id.as_str()) {
            let color = parse_hex(&joint.color).unwrap_or(FALLBACK_JOINT_COLOR);
            fill_disc(canvas, cx, cy, radius, color);
        }
    }
}

/// Renders frames of one snapshot onto a fixed viewport.
///
/// The viewport is measured once at construction and shared by every frame.
pub struct Rasterizer<'a> {
    engine: &'a Engine,
    images: &'a ImageCache,
    viewport: Viewport,
    background: Option<Rgba<u8>>,
    draw_skeleton: bool,
}

impl<'a> Rasterizer<'a> {
    pub fn new(engine: &'a Engine, images: &'a ImageCache, opts: &ExportOptions) -> Result<Self, RasterError> {
        let bounds = measure(engine, images, opts);
        let viewport = Viewport::fit(bounds, opts.width, opts.height, opts.max_canvas_side)?;
        debug!(
            "rasterizer viewport {}x{} at scale {}",
            viewport.width, viewport.height, viewport.scale
        );
        Ok(Self {
            engine,
            images,
            viewport,
            background: opts.background_rgba(),
            draw_skeleton: opts.draw_skeleton,
        })
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn render(&self, frame: u32) -> RgbaImage {
        let state = self.engine.frame_state(frame);
        self.render_state(&state)
    }

    /// Draw an already evaluated frame.
    pub fn render_state(&self, state: &FrameState) -> RgbaImage {
        let vp = &self.viewport;
        let mut canvas = match self.background {
            Some(bg) => RgbaImage::from_pixel(vp.width, vp.height, bg),
            None => RgbaImage::new(vp.width, vp.height),
        };
        for layer in state.visible_layers() {
            // Layers without a decoded image were reported by the cache.
            let Some(img) = self.images.get(layer.layer_id.as_str()) else {
                continue;
            };
            draw_image(&mut canvas, vp, img, &layer.transform, layer.opacity.clamp(0.0, 1.0));
        }
        if self.draw_skeleton {
            draw_skeleton(&mut canvas, vp, self.engine, state);
        }
        canvas
    }
}

/// One-shot render of a single frame. Exports should build a
/// [`Rasterizer`] once instead so the viewport is shared.
pub fn render_frame(
    character: &Character,
    motion: &Motion,
    frame: u32,
    images: &ImageCache,
    opts: &ExportOptions,
) -> Result<RgbaImage, RasterError> {
    let engine = Engine::new(Snapshot::capture(character, motion));
    let rasterizer = Rasterizer::new(&engine, images, opts)?;
    Ok(rasterizer.render(frame))
}
