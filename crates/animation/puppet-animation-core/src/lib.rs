//! Puppet Animation Core
//!
//! Data model and pose evaluation for 2D puppet rigs: a character is a set
//! of image layers driven by a joint skeleton, and a motion is a list of
//! per-joint keyframes. Evaluation is synchronous and never fails; edit
//! commands and record loading validate and return [`RigError`].

pub mod binding;
pub mod config;
pub mod data;
pub mod edit;
pub mod engine;
pub mod error;
pub mod ids;
pub mod interp;
pub mod patch;
pub mod playback;
pub mod pose;
pub mod sampling;
pub mod skeleton;
pub mod stored;

pub use binding::{resolve as resolve_layer_transform, LayerBindings};
pub use config::{Config, FrameCountPolicy};
pub use data::{Bone, Character, Joint, Keyframe, Layer, Motion, Transform};
pub use engine::{Engine, FrameState, ResolvedLayer, Snapshot};
pub use error::RigError;
pub use ids::{BoneId, JointId, KeyframeId, LayerId};
pub use interp::{ease, lerp, Easing};
pub use patch::{BoneRename, JointPatch, KeyframePatch, LayerPatch, MotionPatch, TransformPatch};
pub use playback::Playhead;
pub use pose::{pose_at, Pose};
pub use sampling::{JointPose, JointTrack};
pub use skeleton::SkeletonIndex;
pub use stored::{parse_character_json, parse_motion_json};
