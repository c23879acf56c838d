//! Easing catalog and temporal interpolation.

pub mod easing;
pub mod functions;

pub use easing::{ease, Easing};
pub use functions::{lerp, lerp_eased, lerp_f32, segment_progress};
