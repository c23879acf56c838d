//! Interpolation helpers:
//! - lerp_f32 (plain blend)
//! - lerp (clamp -> ease -> blend), the temporal interpolator
//! - segment_progress (position of a frame inside a keyframe span)

use super::easing::Easing;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Eased interpolation between `start` and `end`.
///
/// `t` is clamped to [0,1] before easing, so out-of-range inputs collapse
/// onto the boundary values.
#[inline]
pub fn lerp(start: f32, end: f32, t: f32, easing: &str) -> f32 {
    lerp_eased(start, end, t, Easing::from_name(easing))
}

/// [`lerp`] with a pre-parsed easing.
#[inline]
pub fn lerp_eased(start: f32, end: f32, t: f32, easing: Easing) -> f32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    lerp_f32(start, end, easing.apply(t))
}

/// Normalized progress of `frame` in the span `[from, to]`.
/// A zero-length span yields 0 instead of dividing by zero.
#[inline]
pub fn segment_progress(from: u32, to: u32, frame: u32) -> f32 {
    if to <= from {
        return 0.0;
    }
    (frame.saturating_sub(from)) as f32 / (to - from) as f32
}
