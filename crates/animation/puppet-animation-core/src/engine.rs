//! Snapshot engine: immutable character + motion with precomputed indexes.
//!
//! Methods:
//! - Snapshot::capture / from_shared pin the data being evaluated
//! - Engine::new builds the skeleton index, layer bindings and joint tracks once
//! - pose_at, layer_transform, layer_transforms, frame_state are `&self` and
//!   may be called from several threads at once

use std::sync::Arc;

use hashbrown::HashMap;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::binding::LayerBindings;
use crate::data::{Character, Keyframe, Layer, Motion, Transform};
use crate::ids::LayerId;
use crate::pose::{rest_pose, Pose};
use crate::sampling::{JointPose, JointTrack};
use crate::skeleton::SkeletonIndex;

/// Shared, read-only view of a character and one of its motions.
///
/// Editing produces new records; a snapshot keeps evaluating the data it was
/// captured from.
#[derive(Clone, Debug)]
pub struct Snapshot {
    character: Arc<Character>,
    motion: Arc<Motion>,
}

impl Snapshot {
    pub fn capture(character: &Character, motion: &Motion) -> Self {
        Self {
            character: Arc::new(character.clone()),
            motion: Arc::new(motion.clone()),
        }
    }

    pub fn from_shared(character: Arc<Character>, motion: Arc<Motion>) -> Self {
        Self { character, motion }
    }

    #[inline]
    pub fn character(&self) -> &Character {
        &self.character
    }

    #[inline]
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn shared_character(&self) -> Arc<Character> {
        Arc::clone(&self.character)
    }
}

/// Render-ready state of one layer at one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLayer {
    pub layer_id: LayerId,
    pub order: i32,
    pub visible: bool,
    pub opacity: f32,
    pub transform: Transform,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameState {
    pub frame: u32,
    pub pose: Pose,
    /// All layers in draw order, hidden ones included.
    pub layers: Vec<ResolvedLayer>,
}

impl FrameState {
    pub fn visible_layers(&self) -> impl Iterator<Item = &ResolvedLayer> {
        self.layers.iter().filter(|l| l.visible)
    }
}

/// One track per joint slot from the motion's active keyframes.
fn build_tracks(character: &Character, motion: &Motion, skeleton: &SkeletonIndex) -> Vec<JointTrack> {
    let mut by_joint: HashMap<&str, Vec<&Keyframe>> = HashMap::with_capacity(character.joints.len());
    let mut dangling = 0usize;
    for kf in motion.active_keyframes() {
        if skeleton.contains(kf.joint_id.as_str()) {
            by_joint.entry(kf.joint_id.as_str()).or_default().push(kf);
        } else {
            dangling += 1;
        }
    }
    if dangling > 0 {
        warn!("engine: ignoring {dangling} keyframe(s) for unknown joints");
    }
    character
        .joints
        .iter()
        .map(|j| {
            by_joint
                .get(j.id.as_str())
                .map(|kfs| JointTrack::from_keyframes(kfs.iter().copied()))
                .unwrap_or_default()
        })
        .collect()
}

#[derive(Debug)]
pub struct Engine {
    snapshot: Snapshot,
    skeleton: SkeletonIndex,
    bindings: LayerBindings,
    /// One track per joint slot.
    tracks: Vec<JointTrack>,
    /// Layer slots sorted by `order`.
    draw_order: Vec<usize>,
}

impl Engine {
    pub fn new(snapshot: Snapshot) -> Self {
        let character = snapshot.character();
        let motion = snapshot.motion();

        let skeleton = SkeletonIndex::build(&character.joints);
        let bindings = LayerBindings::build(&character.joints);

        let tracks = build_tracks(character, motion, &skeleton);

        let mut draw_order: Vec<usize> = (0..character.layers.len()).collect();
        draw_order.sort_by_key(|&i| character.layers[i].order);

        debug!(
            "engine: {} joint(s), {} layer(s), {} binding(s), {} frame(s)",
            character.joints.len(),
            character.layers.len(),
            bindings.len(),
            motion.frame_count
        );
        Self {
            snapshot,
            skeleton,
            bindings,
            tracks,
            draw_order,
        }
    }

    #[inline]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[inline]
    pub fn character(&self) -> &Character {
        self.snapshot.character()
    }

    #[inline]
    pub fn motion(&self) -> &Motion {
        self.snapshot.motion()
    }

    #[inline]
    pub fn skeleton(&self) -> &SkeletonIndex {
        &self.skeleton
    }

    #[inline]
    pub fn bindings(&self) -> &LayerBindings {
        &self.bindings
    }

    pub fn frame_count(&self) -> u32 {
        self.motion().frame_count
    }

    /// Layers in draw order (ascending `order`).
    pub fn layers_in_draw_order(&self) -> impl Iterator<Item = &Layer> {
        let layers = &self.character().layers;
        self.draw_order.iter().map(move |&i| &layers[i])
    }

    /// Pose of every joint at `frame`.
    pub fn pose_at(&self, frame: u32) -> Pose {
        let joints = &self.character().joints;
        let mut pose = Pose::with_capacity(joints.len());
        for (joint, track) in joints.iter().zip(&self.tracks) {
            if pose.contains(joint.id.as_str()) {
                continue;
            }
            let p: JointPose = track.sample(frame).unwrap_or_else(|| rest_pose(joint));
            pose.insert(joint.id.clone(), p);
        }
        pose
    }

    /// Resolved transform of layer `id` under `pose`, or None for an unknown layer.
    pub fn layer_transform(&self, id: &str, pose: &Pose) -> Option<Transform> {
        self.character()
            .layer(id)
            .map(|layer| self.bindings.resolve(layer, pose))
    }

    /// Resolved transforms of all layers, in draw order.
    pub fn layer_transforms(&self, pose: &Pose) -> IndexMap<LayerId, Transform> {
        self.layers_in_draw_order()
            .map(|layer| (layer.id.clone(), self.bindings.resolve(layer, pose)))
            .collect()
    }

    pub fn frame_state(&self, frame: u32) -> FrameState {
        let pose = self.pose_at(frame);
        let layers = self
            .layers_in_draw_order()
            .map(|layer| ResolvedLayer {
                layer_id: layer.id.clone(),
                order: layer.order,
                visible: layer.visible,
                opacity: layer.opacity,
                transform: self.bindings.resolve(layer, &pose),
            })
            .collect();
        FrameState { frame, pose, layers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Joint, Keyframe};
    use crate::pose::pose_at;

    fn arm() -> (Character, Motion) {
        let mut c = Character::new("arm");
        c.layers.push(Layer::new("front", "front", 2).with_transform(Transform::at(20.0, 0.0)));
        c.layers.push(Layer::new("back", "back", 1));
        c.joints.push(Joint::new("J1", "shoulder", 0.0, 0.0).with_layer("front"));
        c.joints.push(Joint::new("J2", "elbow", 10.0, 0.0).with_parent("J1"));

        let mut m = Motion::new("wave");
        m.frame_count = 10;
        m.keyframes.push(Keyframe::new("J1", 0, 0.0, 0.0));
        m.keyframes.push(Keyframe::new("J1", 4, 100.0, 0.0).with_rotation(40.0));
        m.keyframes.push(Keyframe::new("ghost", 2, 5.0, 5.0));
        (c, m)
    }

    #[test]
    fn engine_matches_direct_evaluation() {
        let (c, m) = arm();
        let engine = Engine::new(Snapshot::capture(&c, &m));
        for frame in 0..m.frame_count {
            assert_eq!(engine.pose_at(frame), pose_at(&c.joints, &m.keyframes, frame));
        }
    }

    #[test]
    fn frame_state_is_in_draw_order_with_bound_transforms() {
        let (c, m) = arm();
        let engine = Engine::new(Snapshot::capture(&c, &m));
        let state = engine.frame_state(2);
        let ids: Vec<&str> = state.layers.iter().map(|l| l.layer_id.as_str()).collect();
        assert_eq!(ids, ["back", "front"]);
        assert_eq!(state.layers[1].transform.x, 70.0);
        assert_eq!(state.layers[1].transform.rotation, 20.0);
        assert_eq!(state.layers[0].transform, Transform::default());
        assert_eq!(engine.layer_transform("front", &state.pose), Some(state.layers[1].transform));
        assert_eq!(engine.layer_transform("nope", &state.pose), None);
    }

    #[test]
    fn duplicate_joint_ids_match_direct_evaluation() {
        let (mut c, m) = arm();
        c.joints.push(Joint::new("J1", "shadow", 50.0, 50.0));
        let engine = Engine::new(Snapshot::capture(&c, &m));
        for frame in [0, 2, 4, 9] {
            let pose = engine.pose_at(frame);
            assert_eq!(pose, pose_at(&c.joints, &m.keyframes, frame));
            assert_eq!(pose.len(), 2);
        }
        assert_eq!(engine.pose_at(4).get("J1"), Some(&JointPose::new(100.0, 0.0, 40.0)));
    }

    #[test]
    fn dormant_keyframes_do_not_drive_the_pose() {
        let (c, mut m) = arm();
        m.frame_count = 3;
        let engine = Engine::new(Snapshot::capture(&c, &m));
        // Only the frame-0 key is active, so J1 holds it.
        assert_eq!(engine.pose_at(2).get("J1"), Some(&JointPose::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
        assert_send_sync::<Snapshot>();
    }
}
