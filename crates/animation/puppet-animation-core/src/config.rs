//! Core configuration for puppet-animation-core.

use serde::{Deserialize, Serialize};

use crate::data::{Joint, Motion, DEFAULT_FPS, DEFAULT_FRAME_COUNT, DEFAULT_JOINT_COLOR};
use crate::error::RigError;
use crate::ids::JointId;

/// What happens to keyframes beyond the range when a motion's frame count
/// shrinks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FrameCountPolicy {
    /// Keep them stored but ignore them during evaluation. They come back if
    /// the range grows again.
    #[default]
    Dormant,
    /// Delete them.
    Prune,
    /// Move them onto the new last frame. A keyframe already on that frame
    /// for the same joint is overwritten.
    Clamp,
}

/// Defaults applied when creating records and editing motions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub default_fps: u32,
    pub default_frame_count: u32,
    pub frame_count_policy: FrameCountPolicy,
    pub default_joint_color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_fps: DEFAULT_FPS,
            default_frame_count: DEFAULT_FRAME_COUNT,
            frame_count_policy: FrameCountPolicy::default(),
            default_joint_color: DEFAULT_JOINT_COLOR.to_string(),
        }
    }
}

impl Config {
    /// A fresh motion using the configured fps and frame count.
    pub fn new_motion(&self, name: impl Into<String>) -> Motion {
        Motion {
            name: name.into(),
            fps: self.default_fps.max(1),
            frame_count: self.default_frame_count.max(1),
            ..Motion::default()
        }
    }

    /// A root joint with the configured marker color.
    pub fn new_joint(&self, id: impl Into<JointId>, name: impl Into<String>, x: f32, y: f32) -> Joint {
        Joint {
            color: self.default_joint_color.clone(),
            ..Joint::new(id, name, x, y)
        }
    }

    /// Resize `motion` under the configured [`FrameCountPolicy`].
    pub fn set_frame_count(&self, motion: &mut Motion, n: u32) -> Result<(), RigError> {
        motion.set_frame_count(n, self.frame_count_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.default_fps, 12);
        assert_eq!(cfg.default_frame_count, 30);
        assert_eq!(cfg.frame_count_policy, FrameCountPolicy::Dormant);
        let m = cfg.new_motion("walk");
        assert_eq!((m.fps, m.frame_count), (12, 30));
    }

    #[test]
    fn joints_take_the_configured_color() {
        let cfg = Config {
            default_joint_color: "#22c55e".to_string(),
            ..Config::default()
        };
        let joint = cfg.new_joint("j", "hip", 1.0, 2.0);
        assert_eq!(joint.color, "#22c55e");
        assert_eq!(joint.rest_position(), (1.0, 2.0));
        assert_eq!(Config::default().new_joint("k", "k", 0.0, 0.0).color, DEFAULT_JOINT_COLOR);
    }

    #[test]
    fn resizing_follows_the_configured_policy() {
        let prune = Config {
            frame_count_policy: FrameCountPolicy::Prune,
            ..Config::default()
        };
        let mut m = prune.new_motion("m");
        m.upsert_keyframe(crate::data::Keyframe::new("j", 0, 0.0, 0.0)).unwrap();
        m.upsert_keyframe(crate::data::Keyframe::new("j", 20, 0.0, 0.0)).unwrap();
        let mut dormant = m.clone();

        prune.set_frame_count(&mut m, 10).unwrap();
        assert_eq!(m.keyframes.len(), 1);

        Config::default().set_frame_count(&mut dormant, 10).unwrap();
        assert_eq!((dormant.keyframes.len(), dormant.frame_count), (2, 10));
        assert!(prune.set_frame_count(&mut m, 0).is_err());
    }

    #[test]
    fn policy_round_trips_through_json() {
        let cfg = Config {
            frame_count_policy: FrameCountPolicy::Prune,
            ..Config::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"prune\""));
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.frame_count_policy, FrameCountPolicy::Prune);
    }
}
