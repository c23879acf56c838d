//! Easing catalog: named time-remapping curves.
//!
//! Inputs are expected in [0,1]; outputs are not clamped. `easeOutElastic`
//! overshoots above 1 and `step` jumps at the end of the span.

use std::f32::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Typed easing curve. Parsed once from the stored name.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseInCubic,
    EaseInQuart,
    EaseOut,
    EaseOutCubic,
    EaseOutQuart,
    EaseInOut,
    EaseInOutCubic,
    EaseOutElastic,
    EaseOutBounce,
    /// Hold the departure value until the arrival keyframe.
    Step,
}

impl Easing {
    /// All catalog entries in a stable order.
    pub const ALL: [Easing; 12] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseInCubic,
        Easing::EaseInQuart,
        Easing::EaseOut,
        Easing::EaseOutCubic,
        Easing::EaseOutQuart,
        Easing::EaseInOut,
        Easing::EaseInOutCubic,
        Easing::EaseOutElastic,
        Easing::EaseOutBounce,
        Easing::Step,
    ];

    /// Parse a stored easing name. Unknown names fall back to `Linear`.
    ///
    /// Accepts the editor's camelCase names and the backend's kebab-case
    /// spellings (`ease-in`, `ease-out`, `ease-in-out`).
    pub fn from_name(name: &str) -> Easing {
        Self::lookup(name).unwrap_or(Easing::Linear)
    }

    /// Strict variant of [`Self::from_name`].
    pub fn lookup(name: &str) -> Option<Easing> {
        let e = match name {
            "linear" => Easing::Linear,
            "easeIn" | "ease-in" => Easing::EaseIn,
            "easeInCubic" => Easing::EaseInCubic,
            "easeInQuart" => Easing::EaseInQuart,
            "easeOut" | "ease-out" => Easing::EaseOut,
            "easeOutCubic" => Easing::EaseOutCubic,
            "easeOutQuart" => Easing::EaseOutQuart,
            "easeInOut" | "ease-in-out" => Easing::EaseInOut,
            "easeInOutCubic" => Easing::EaseInOutCubic,
            "easeOutElastic" => Easing::EaseOutElastic,
            "easeOutBounce" => Easing::EaseOutBounce,
            "step" => Easing::Step,
            _ => return None,
        };
        Some(e)
    }

    /// Canonical (editor) name.
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "easeIn",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseInQuart => "easeInQuart",
            Easing::EaseOut => "easeOut",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseOutQuart => "easeOutQuart",
            Easing::EaseInOut => "easeInOut",
            Easing::EaseInOutCubic => "easeInOutCubic",
            Easing::EaseOutElastic => "easeOutElastic",
            Easing::EaseOutBounce => "easeOutBounce",
            Easing::Step => "step",
        }
    }

    /// Remap `t`. The caller clamps `t` to [0,1].
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseInCubic => t * t * t,
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutElastic => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    let c4 = (2.0 * PI) / 3.0;
                    2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
                }
            }
            Easing::EaseOutBounce => bounce_out(t),
            Easing::Step => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

/// Evaluate the named easing at `t` (`ease(name, t)`).
#[inline]
pub fn ease(name: &str, t: f32) -> f32 {
    Easing::from_name(name).apply(t)
}
