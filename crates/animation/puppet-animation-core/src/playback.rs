//! Playhead: maps elapsed wall time onto a motion's frame range.

use serde::{Deserialize, Serialize};

use crate::data::Motion;

fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Playback cursor for one motion.
///
/// Time advances in seconds. Looping motions wrap at `frame_count`; the rest
/// stop on the last frame and report `finished`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playhead {
    pub fps: u32,
    pub frame_count: u32,
    pub looping: bool,
    pub speed: f32,
    time: f32,
    finished: bool,
}

impl Playhead {
    pub fn new(motion: &Motion) -> Self {
        Self {
            fps: motion.fps.max(1),
            frame_count: motion.frame_count.max(1),
            looping: motion.looping,
            speed: 1.0,
            time: 0.0,
            finished: false,
        }
    }

    fn duration(&self) -> f32 {
        self.frame_count as f32 / self.fps as f32
    }

    /// Elapsed playback time in seconds, already wrapped or clamped.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Current integer frame, always in `[0, frame_count - 1]`.
    pub fn frame(&self) -> u32 {
        // Nudge so a time set from `frame / fps` maps back to `frame`.
        let f = (self.time * self.fps as f32 + 1e-4).floor();
        if f <= 0.0 {
            0
        } else {
            (f as u32).min(self.frame_count - 1)
        }
    }

    /// Advance by `dt` seconds and return the new frame.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.finished || !dt.is_finite() {
            return self.frame();
        }
        let t = self.time + dt * self.speed;
        let duration = self.duration();
        if self.looping {
            self.time = fmod(t, duration);
        } else if t >= duration {
            // Park on the start of the last frame.
            self.time = (self.frame_count - 1) as f32 / self.fps as f32;
            self.finished = true;
        } else {
            self.time = t.max(0.0);
        }
        self.frame()
    }

    /// Jump to `frame`, clamped to the range. Clears `finished`.
    pub fn scrub(&mut self, frame: u32) {
        let frame = frame.min(self.frame_count - 1);
        self.time = frame as f32 / self.fps as f32;
        self.finished = false;
    }

    pub fn rewind(&mut self) {
        self.scrub(0);
    }
}
