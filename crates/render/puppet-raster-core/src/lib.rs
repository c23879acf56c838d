//! Puppet Raster Core
//!
//! CPU rasterizer for puppet rigs evaluated by `puppet-animation-core`.
//! Images are decoded once up front; frames are drawn onto a viewport that is
//! measured once per export so every frame has the same size and alignment.

pub mod bounds;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod image_cache;
pub mod raster;

pub use bounds::{Bounds, Viewport};
pub use config::{BoundsSampling, ExportOptions};
pub use error::RasterError;
pub use export::{render_motion, render_with, CancelToken, FrameSequence};
pub use image_cache::ImageCache;
pub use raster::{render_frame, Rasterizer};
