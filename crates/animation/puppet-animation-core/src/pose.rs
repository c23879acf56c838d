//! Skeleton pose evaluation.
//!
//! A pose maps every input joint to its position and rotation at one frame.
//! Joints without keyframes rest at their authored position with rotation 0.
//! Keyframes that reference unknown joints are ignored. When joint ids are
//! duplicated, the first entry is evaluated and later ones are skipped.

use hashbrown::HashMap;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::{Joint, Keyframe};
use crate::ids::JointId;
use crate::sampling::{JointPose, JointTrack};

/// Resolved joint poses keyed by joint id, in input joint order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pose(IndexMap<JointId, JointPose>);

impl Pose {
    pub fn with_capacity(n: usize) -> Self {
        Self(IndexMap::with_capacity(n))
    }

    pub fn insert(&mut self, joint: JointId, pose: JointPose) {
        self.0.insert(joint, pose);
    }

    #[inline]
    pub fn get(&self, joint: &str) -> Option<&JointPose> {
        self.0.get(joint)
    }

    #[inline]
    pub fn contains(&self, joint: &str) -> bool {
        self.0.contains_key(joint)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JointId, &JointPose)> {
        self.0.iter()
    }
}

impl FromIterator<(JointId, JointPose)> for Pose {
    fn from_iter<I: IntoIterator<Item = (JointId, JointPose)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Pose of a joint that has no keyframes.
#[inline]
pub fn rest_pose(joint: &Joint) -> JointPose {
    JointPose::new(joint.x, joint.y, 0.0)
}

/// Evaluate the pose of `joints` at `frame` from a flat keyframe list.
///
/// Builds the per-joint tracks on every call. Callers evaluating many frames
/// of the same data should go through [`crate::engine::Engine`], which builds
/// them once.
pub fn pose_at(joints: &[Joint], keyframes: &[Keyframe], frame: u32) -> Pose {
    let mut by_joint: HashMap<&str, Vec<&Keyframe>> = HashMap::with_capacity(joints.len());
    for joint in joints {
        by_joint.entry(joint.id.as_str()).or_default();
    }
    let mut dangling = 0usize;
    for kf in keyframes {
        match by_joint.get_mut(kf.joint_id.as_str()) {
            Some(list) => list.push(kf),
            None => dangling += 1,
        }
    }
    if dangling > 0 {
        debug!("pose_at: skipped {dangling} keyframe(s) for unknown joints");
    }

    let mut pose = Pose::with_capacity(joints.len());
    for joint in joints {
        // Duplicate ids: the first entry owns the id.
        if pose.contains(joint.id.as_str()) {
            continue;
        }
        let track = by_joint
            .remove(joint.id.as_str())
            .map(JointTrack::from_keyframes)
            .unwrap_or_default();
        let p = track.sample(frame).unwrap_or_else(|| rest_pose(joint));
        pose.insert(joint.id.clone(), p);
    }
    pose
}
