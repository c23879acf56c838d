//! Per-joint track sampling.
//!
//! Model:
//! - Each joint owns a track of keys sorted ascending by frame, at most one
//!   key per frame (a later duplicate overwrites an earlier one).
//! - Before the first key and after the last key the track holds the end
//!   values verbatim. No extrapolation, no easing.
//! - Between keys, segment [prev -> next] uses `next.easing`: the easing
//!   belongs to the arrival key.
//!
//! API:
//! - JointTrack::from_keyframes(..) builds a track once.
//! - JointTrack::sample(frame) returns the joint pose, or None for an empty track.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::data::Keyframe;
use crate::interp::{lerp_eased, segment_progress, Easing};

/// Resolved joint position and rotation at one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointPose {
    pub x: f32,
    pub y: f32,
    /// Degrees.
    pub rotation: f32,
}

impl JointPose {
    #[inline]
    pub fn new(x: f32, y: f32, rotation: f32) -> Self {
        Self { x, y, rotation }
    }
}

/// One key of a sampled track with its easing already parsed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackKey {
    pub frame: u32,
    pub pose: JointPose,
    pub easing: Easing,
}

impl From<&Keyframe> for TrackKey {
    fn from(k: &Keyframe) -> Self {
        Self {
            frame: k.frame_number,
            pose: JointPose::new(k.x, k.y, k.rotation),
            easing: Easing::from_name(&k.easing),
        }
    }
}

/// Where a frame falls relative to a track's keys.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Segment {
    /// Clamp to key `i`.
    Hold(usize),
    /// Interpolate keys `prev` and `prev + 1` at `progress`.
    Between { prev: usize, progress: f32 },
}

/// Sorted, de-duplicated keys for one joint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JointTrack {
    keys: Vec<TrackKey>,
}

impl JointTrack {
    /// Build a track from one joint's keyframes in insertion order.
    pub fn from_keyframes<'a>(keyframes: impl IntoIterator<Item = &'a Keyframe>) -> Self {
        let mut keys: Vec<TrackKey> = keyframes.into_iter().map(TrackKey::from).collect();
        // Stable: equal frames keep insertion order, so the dedup below keeps the last.
        keys.sort_by_key(|k| k.frame);
        let before = keys.len();
        let mut deduped: Vec<TrackKey> = Vec::with_capacity(keys.len());
        for key in keys {
            match deduped.last_mut() {
                Some(last) if last.frame == key.frame => *last = key,
                _ => deduped.push(key),
            }
        }
        if deduped.len() != before {
            warn!(
                "dropped {} keyframe(s) sharing a frame with a later keyframe",
                before - deduped.len()
            );
        }
        Self { keys: deduped }
    }

    #[inline]
    pub fn keys(&self) -> &[TrackKey] {
        &self.keys
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn first_frame(&self) -> Option<u32> {
        self.keys.first().map(|k| k.frame)
    }

    pub fn last_frame(&self) -> Option<u32> {
        self.keys.last().map(|k| k.frame)
    }

    fn find_segment(&self, frame: u32) -> Option<Segment> {
        let n = self.keys.len();
        if n == 0 {
            return None;
        }
        if frame <= self.keys[0].frame {
            return Some(Segment::Hold(0));
        }
        if frame >= self.keys[n - 1].frame {
            return Some(Segment::Hold(n - 1));
        }
        // First key strictly after `frame`; at least 1 and at most n - 1 here.
        let next = self.keys.partition_point(|k| k.frame <= frame);
        let prev = next - 1;
        let progress = segment_progress(self.keys[prev].frame, self.keys[next].frame, frame);
        Some(Segment::Between { prev, progress })
    }

    /// Sample the track at `frame`. Returns None for an empty track.
    pub fn sample(&self, frame: u32) -> Option<JointPose> {
        match self.find_segment(frame)? {
            Segment::Hold(i) => Some(self.keys[i].pose),
            Segment::Between { prev, progress } => {
                let a = &self.keys[prev];
                let b = &self.keys[prev + 1];
                let easing = b.easing;
                Some(JointPose {
                    x: lerp_eased(a.pose.x, b.pose.x, progress, easing),
                    y: lerp_eased(a.pose.y, b.pose.y, progress, easing),
                    rotation: lerp_eased(a.pose.rotation, b.pose.rotation, progress, easing),
                })
            }
        }
    }
}
