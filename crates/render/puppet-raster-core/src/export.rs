//! Full-motion export: decode pre-pass, one viewport, frames `0..frame_count`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::RgbaImage;
use log::{debug, info};

use puppet_animation_core::{Engine, Snapshot};

use crate::bounds::Viewport;
use crate::config::ExportOptions;
use crate::error::RasterError;
use crate::image_cache::ImageCache;
use crate::raster::Rasterizer;

/// Shared early-abort flag, checked between frames.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Ordered, same-size frames handed to an external encoder.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub looping: bool,
    /// Mapping used for every frame.
    pub viewport: Viewport,
    pub frames: Vec<RgbaImage>,
}

impl FrameSequence {
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Render every frame of `snapshot`'s motion.
///
/// `progress` is called with `(frames_done, total)` after each frame. On
/// cancellation the partial output is dropped and `RasterError::Cancelled`
/// is returned.
pub fn render_motion(
    snapshot: Snapshot,
    opts: &ExportOptions,
    cancel: &CancelToken,
    progress: impl FnMut(u32, u32),
) -> Result<FrameSequence, RasterError> {
    let images = ImageCache::decode_all(snapshot.character());
    let engine = Engine::new(snapshot);
    render_with(&engine, &images, opts, cancel, progress)
}

/// Like [`render_motion`] with an engine and decoded images the caller
/// already holds (e.g. shared with a live preview).
pub fn render_with(
    engine: &Engine,
    images: &ImageCache,
    opts: &ExportOptions,
    cancel: &CancelToken,
    mut progress: impl FnMut(u32, u32),
) -> Result<FrameSequence, RasterError> {
    let rasterizer = Rasterizer::new(engine, images, opts)?;
    let total = engine.frame_count();
    let mut frames = Vec::with_capacity(total as usize);
    for frame in 0..total {
        if cancel.is_cancelled() {
            debug!("export cancelled before frame {frame}");
            return Err(RasterError::Cancelled {
                completed: frame,
                total,
            });
        }
        frames.push(rasterizer.render(frame));
        debug!("rendered frame {}/{total}", frame + 1);
        progress(frame + 1, total);
    }
    let vp = *rasterizer.viewport();
    info!(
        "exported '{}': {} frame(s) at {}x{}",
        engine.motion().name,
        frames.len(),
        vp.width,
        vp.height
    );
    Ok(FrameSequence {
        width: vp.width,
        height: vp.height,
        fps: engine.motion().fps,
        looping: engine.motion().looping,
        viewport: vp,
        frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!token.is_cancelled());
        other.cancel();
        assert!(token.is_cancelled());
    }
}
