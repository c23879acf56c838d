//! Edit commands over [`Character`] and [`Motion`].
//!
//! Commands check the rig invariants before mutating and leave the record
//! untouched when they fail:
//! - joint ids are unique, parents exist and the parent chain has no cycle;
//! - bones reference existing joints, never the same joint twice, and each
//!   unordered joint pair has at most one bone;
//! - layer ids and orders are unique, and a layer is bound by at most one joint;
//! - a motion holds at most one keyframe per `(joint, frame)`.

use hashbrown::HashSet;
use log::debug;

use crate::config::FrameCountPolicy;
use crate::data::{Bone, Character, Joint, Keyframe, Layer, Motion};
use crate::error::RigError;
use crate::ids::{JointId, KeyframeId, LayerId};
use crate::patch::{BoneRename, JointPatch, KeyframePatch, LayerPatch};
use crate::skeleton::SkeletonIndex;

impl Character {
    fn joint_slot(&self, id: &str) -> Result<usize, RigError> {
        self.joints
            .iter()
            .position(|j| j.id == id)
            .ok_or_else(|| RigError::JointNotFound(id.into()))
    }

    fn layer_slot(&self, id: &str) -> Result<usize, RigError> {
        self.layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| RigError::LayerNotFound(id.into()))
    }

    /// Checks that `joint` (already present or about to be) can bind `layer`.
    fn check_binding(&self, joint: &JointId, layer: &LayerId) -> Result<(), RigError> {
        if self.layer(layer.as_str()).is_none() {
            return Err(RigError::MissingLayer {
                joint: joint.clone(),
                layer: layer.clone(),
            });
        }
        match self.joint_for_layer(layer.as_str()) {
            Some(other) if &other.id != joint => Err(RigError::LayerAlreadyBound {
                layer: layer.clone(),
                joint: other.id.clone(),
            }),
            _ => Ok(()),
        }
    }

    pub fn add_joint(&mut self, joint: Joint) -> Result<(), RigError> {
        if self.joint(joint.id.as_str()).is_some() {
            return Err(RigError::DuplicateJoint(joint.id));
        }
        if let Some(parent) = &joint.parent_id {
            if *parent == joint.id {
                return Err(RigError::Cycle(joint.id));
            }
            if self.joint(parent.as_str()).is_none() {
                return Err(RigError::MissingParent {
                    joint: joint.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
        if let Some(layer) = &joint.layer_id {
            self.check_binding(&joint.id, layer)?;
        }
        self.joints.push(joint);
        Ok(())
    }

    /// Apply `patch` to joint `id`. Re-parenting under one of the joint's own
    /// descendants is rejected.
    pub fn update_joint(&mut self, id: &str, patch: &JointPatch) -> Result<(), RigError> {
        let slot = self.joint_slot(id)?;
        let updated = patch.apply_to(&self.joints[slot])?;
        if let Some(Some(parent)) = &patch.parent_id {
            if self.joint(parent.as_str()).is_none() {
                return Err(RigError::MissingParent {
                    joint: updated.id.clone(),
                    parent: parent.clone(),
                });
            }
            if SkeletonIndex::build(&self.joints).is_ancestor(id, parent.as_str()) {
                return Err(RigError::Cycle(updated.id));
            }
        }
        if let Some(Some(layer)) = &patch.layer_id {
            self.check_binding(&updated.id, layer)?;
        }
        self.joints[slot] = updated;
        Ok(())
    }

    /// Remove joint `id` and everything that depends on it: bones touching it
    /// are dropped, its children move up to its parent, and its keyframes are
    /// removed from each of `motions`.
    pub fn remove_joint(&mut self, id: &str, motions: &mut [Motion]) -> Result<Joint, RigError> {
        let slot = self.joint_slot(id)?;
        let removed = self.joints.remove(slot);

        let bones_before = self.bones.len();
        self.bones.retain(|b| !b.touches(&removed.id));

        let mut reparented = 0usize;
        for joint in &mut self.joints {
            if joint.parent_id.as_ref() == Some(&removed.id) {
                joint.parent_id = removed.parent_id.clone();
                reparented += 1;
            }
        }

        let mut keyframes = 0usize;
        for motion in motions.iter_mut() {
            let before = motion.keyframes.len();
            motion.keyframes.retain(|k| k.joint_id != removed.id);
            keyframes += before - motion.keyframes.len();
        }

        debug!(
            "removed joint '{}': {} bone(s), {} keyframe(s), {} child(ren) re-parented",
            removed.id,
            bones_before - self.bones.len(),
            keyframes,
            reparented
        );
        Ok(removed)
    }

    pub fn add_bone(&mut self, bone: Bone) -> Result<(), RigError> {
        if self.bone(bone.id.as_str()).is_some() {
            return Err(RigError::DuplicateBone(bone.id));
        }
        for end in [&bone.start_joint_id, &bone.end_joint_id] {
            if self.joint(end.as_str()).is_none() {
                return Err(RigError::DanglingBone {
                    bone: bone.id.clone(),
                    joint: end.clone(),
                });
            }
        }
        if bone.start_joint_id == bone.end_joint_id {
            return Err(RigError::SelfBone(bone.start_joint_id));
        }
        if self
            .bones
            .iter()
            .any(|b| b.connects(&bone.start_joint_id, &bone.end_joint_id))
        {
            return Err(RigError::DuplicateBonePair(bone.start_joint_id, bone.end_joint_id));
        }
        self.bones.push(bone);
        Ok(())
    }

    pub fn rename_bone(&mut self, id: &str, rename: &BoneRename) -> Result<(), RigError> {
        let bone = self
            .bones
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| RigError::BoneNotFound(id.into()))?;
        *bone = rename.apply_to(bone)?;
        Ok(())
    }

    pub fn remove_bone(&mut self, id: &str) -> Result<Bone, RigError> {
        let slot = self
            .bones
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| RigError::BoneNotFound(id.into()))?;
        Ok(self.bones.remove(slot))
    }

    pub fn add_layer(&mut self, layer: Layer) -> Result<(), RigError> {
        if self.layer(layer.id.as_str()).is_some() {
            return Err(RigError::DuplicateLayer(layer.id));
        }
        if self.layers.iter().any(|l| l.order == layer.order) {
            return Err(RigError::DuplicateLayerOrder(layer.order));
        }
        if !(0.0..=1.0).contains(&layer.opacity) {
            return Err(RigError::invalid(
                "layer.opacity",
                format!("{} is outside [0,1]", layer.opacity),
            ));
        }
        self.layers.push(layer);
        Ok(())
    }

    pub fn update_layer(&mut self, id: &str, patch: &LayerPatch) -> Result<(), RigError> {
        let slot = self.layer_slot(id)?;
        let updated = patch.apply_to(&self.layers[slot])?;
        if let Some(order) = patch.order {
            if self.layers.iter().any(|l| l.id != id && l.order == order) {
                return Err(RigError::DuplicateLayerOrder(order));
            }
        }
        self.layers[slot] = updated;
        Ok(())
    }

    /// Remove layer `id`; the joint bound to it, if any, becomes unbound.
    pub fn remove_layer(&mut self, id: &str) -> Result<Layer, RigError> {
        let slot = self.layer_slot(id)?;
        let removed = self.layers.remove(slot);
        for joint in &mut self.joints {
            if joint.layer_id.as_ref() == Some(&removed.id) {
                joint.layer_id = None;
            }
        }
        Ok(removed)
    }

    /// Check every rig invariant. Returns the first violation found.
    pub fn validate(&self) -> Result<(), RigError> {
        let mut joint_ids: HashSet<&str> = HashSet::with_capacity(self.joints.len());
        for j in &self.joints {
            if !joint_ids.insert(j.id.as_str()) {
                return Err(RigError::DuplicateJoint(j.id.clone()));
            }
        }
        let mut layer_ids: HashSet<&str> = HashSet::with_capacity(self.layers.len());
        let mut orders: HashSet<i32> = HashSet::with_capacity(self.layers.len());
        for l in &self.layers {
            if !layer_ids.insert(l.id.as_str()) {
                return Err(RigError::DuplicateLayer(l.id.clone()));
            }
            if !orders.insert(l.order) {
                return Err(RigError::DuplicateLayerOrder(l.order));
            }
            if !(0.0..=1.0).contains(&l.opacity) {
                return Err(RigError::invalid(
                    "layer.opacity",
                    format!("{} is outside [0,1]", l.opacity),
                ));
            }
        }

        let mut bound: HashSet<&str> = HashSet::new();
        for j in &self.joints {
            if let Some(parent) = &j.parent_id {
                if *parent == j.id {
                    return Err(RigError::Cycle(j.id.clone()));
                }
                if !joint_ids.contains(parent.as_str()) {
                    return Err(RigError::MissingParent {
                        joint: j.id.clone(),
                        parent: parent.clone(),
                    });
                }
            }
            if let Some(layer) = &j.layer_id {
                if !layer_ids.contains(layer.as_str()) {
                    return Err(RigError::MissingLayer {
                        joint: j.id.clone(),
                        layer: layer.clone(),
                    });
                }
                if !bound.insert(layer.as_str()) {
                    let first = self
                        .joint_for_layer(layer.as_str())
                        .map(|o| o.id.clone())
                        .unwrap_or_else(|| j.id.clone());
                    return Err(RigError::LayerAlreadyBound {
                        layer: layer.clone(),
                        joint: first,
                    });
                }
            }
        }
        if let Some(first) = SkeletonIndex::build(&self.joints).cyclic_joints().first() {
            return Err(RigError::Cycle((*first).clone()));
        }

        let mut bone_ids: HashSet<&str> = HashSet::with_capacity(self.bones.len());
        let mut pairs: HashSet<(&str, &str)> = HashSet::with_capacity(self.bones.len());
        for b in &self.bones {
            if !bone_ids.insert(b.id.as_str()) {
                return Err(RigError::DuplicateBone(b.id.clone()));
            }
            for end in [&b.start_joint_id, &b.end_joint_id] {
                if !joint_ids.contains(end.as_str()) {
                    return Err(RigError::DanglingBone {
                        bone: b.id.clone(),
                        joint: end.clone(),
                    });
                }
            }
            if b.start_joint_id == b.end_joint_id {
                return Err(RigError::SelfBone(b.start_joint_id.clone()));
            }
            let (s, e) = (b.start_joint_id.as_str(), b.end_joint_id.as_str());
            let key = if s <= e { (s, e) } else { (e, s) };
            if !pairs.insert(key) {
                return Err(RigError::DuplicateBonePair(
                    b.start_joint_id.clone(),
                    b.end_joint_id.clone(),
                ));
            }
        }
        Ok(())
    }
}

impl Motion {
    /// Insert `keyframe`, or overwrite the one already stored at the same
    /// `(joint, frame)`. The overwritten keyframe keeps its id and slot; new
    /// keyframes are inserted so storage stays sorted by frame.
    /// Returns the id of the stored keyframe.
    pub fn upsert_keyframe(&mut self, keyframe: Keyframe) -> Result<KeyframeId, RigError> {
        if !self.contains_frame(keyframe.frame_number) {
            return Err(RigError::invalid(
                "keyframe.frameNumber",
                format!(
                    "{} is outside [0, {}]",
                    keyframe.frame_number,
                    self.last_frame()
                ),
            ));
        }
        for (field, v) in [
            ("keyframe.x", keyframe.x),
            ("keyframe.y", keyframe.y),
            ("keyframe.rotation", keyframe.rotation),
        ] {
            if !v.is_finite() {
                return Err(RigError::invalid(field, format!("{v} is not finite")));
            }
        }
        if let Some(existing) = self
            .keyframes
            .iter_mut()
            .find(|k| k.joint_id == keyframe.joint_id && k.frame_number == keyframe.frame_number)
        {
            let id = existing.id.clone();
            *existing = Keyframe { id: id.clone(), ..keyframe };
            return Ok(id);
        }
        if self.keyframes.iter().any(|k| k.id == keyframe.id) {
            return Err(RigError::DuplicateKeyframe(keyframe.id));
        }
        let id = keyframe.id.clone();
        let at = self
            .keyframes
            .partition_point(|k| k.frame_number <= keyframe.frame_number);
        self.keyframes.insert(at, keyframe);
        Ok(id)
    }

    pub fn update_keyframe(&mut self, id: &str, patch: &KeyframePatch) -> Result<(), RigError> {
        let kf = self
            .keyframes
            .iter_mut()
            .find(|k| k.id == id)
            .ok_or_else(|| RigError::KeyframeNotFound(id.into()))?;
        *kf = patch.apply_to(kf)?;
        Ok(())
    }

    pub fn remove_keyframe(&mut self, id: &str) -> Result<Keyframe, RigError> {
        let slot = self
            .keyframes
            .iter()
            .position(|k| k.id == id)
            .ok_or_else(|| RigError::KeyframeNotFound(id.into()))?;
        Ok(self.keyframes.remove(slot))
    }

    /// Keyframes of one joint, ascending by frame.
    pub fn keyframes_for(&self, joint: &str) -> Vec<&Keyframe> {
        let mut out: Vec<&Keyframe> = self.keyframes.iter().filter(|k| k.joint_id == joint).collect();
        out.sort_by_key(|k| k.frame_number);
        out
    }

    /// Change the frame range. Growing never touches keyframes; shrinking
    /// handles the keyframes left outside `[0, n - 1]` per `policy`.
    pub fn set_frame_count(&mut self, n: u32, policy: FrameCountPolicy) -> Result<(), RigError> {
        if n == 0 {
            return Err(RigError::invalid("motion.frameCount", "must be positive"));
        }
        let last = n - 1;
        match policy {
            FrameCountPolicy::Dormant => {}
            FrameCountPolicy::Prune => {
                let before = self.keyframes.len();
                self.keyframes.retain(|k| k.frame_number <= last);
                debug!("pruned {} keyframe(s) past frame {last}", before - self.keyframes.len());
            }
            FrameCountPolicy::Clamp => {
                let mut moved: Vec<Keyframe> = Vec::new();
                self.keyframes.retain(|k| {
                    if k.frame_number > last {
                        moved.push(k.clone());
                        false
                    } else {
                        true
                    }
                });
                // Ascending, so the latest source frame is written last and wins.
                moved.sort_by_key(|k| k.frame_number);
                for mut kf in moved {
                    kf.frame_number = last;
                    match self
                        .keyframes
                        .iter_mut()
                        .find(|k| k.joint_id == kf.joint_id && k.frame_number == last)
                    {
                        Some(existing) => *existing = kf,
                        None => self.keyframes.push(kf),
                    }
                }
            }
        }
        self.frame_count = n;
        Ok(())
    }

    /// Copy of this motion under `name` with fresh keyframe ids.
    pub fn duplicate(&self, name: impl Into<String>) -> Motion {
        Motion {
            name: name.into(),
            keyframes: self
                .keyframes
                .iter()
                .map(|k| Keyframe {
                    id: KeyframeId::generate(),
                    ..k.clone()
                })
                .collect(),
            ..self.clone()
        }
    }

    /// Keyframes whose joint is missing from `character`.
    pub fn dangling_keyframes<'a>(&'a self, character: &'a Character) -> impl Iterator<Item = &'a Keyframe> + 'a {
        self.keyframes
            .iter()
            .filter(move |k| character.joint(k.joint_id.as_str()).is_none())
    }

    /// Check motion settings, keyframe uniqueness and joint references.
    pub fn validate(&self, character: &Character) -> Result<(), RigError> {
        if self.fps == 0 {
            return Err(RigError::invalid("motion.fps", "must be positive"));
        }
        if self.frame_count == 0 {
            return Err(RigError::invalid("motion.frameCount", "must be positive"));
        }
        let mut ids: HashSet<&str> = HashSet::with_capacity(self.keyframes.len());
        let mut coords: HashSet<(&str, u32)> = HashSet::with_capacity(self.keyframes.len());
        for k in &self.keyframes {
            if !ids.insert(k.id.as_str()) {
                return Err(RigError::DuplicateKeyframe(k.id.clone()));
            }
            if !coords.insert((k.joint_id.as_str(), k.frame_number)) {
                return Err(RigError::invalid(
                    "keyframe.frameNumber",
                    format!("joint '{}' has two keyframes at frame {}", k.joint_id, k.frame_number),
                ));
            }
        }
        if let Some(k) = self.dangling_keyframes(character).next() {
            return Err(RigError::DanglingKeyframe {
                keyframe: k.id.clone(),
                joint: k.joint_id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> Character {
        let mut c = Character::new("rig");
        c.add_layer(Layer::new("torso_img", "torso", 0)).unwrap();
        c.add_layer(Layer::new("arm_img", "arm", 1)).unwrap();
        c.add_joint(Joint::new("root", "root", 0.0, 0.0).with_layer("torso_img"))
            .unwrap();
        c.add_joint(Joint::new("elbow", "elbow", 10.0, 0.0).with_parent("root"))
            .unwrap();
        c.add_joint(Joint::new("hand", "hand", 20.0, 0.0).with_parent("elbow"))
            .unwrap();
        c.add_bone(Bone::new("b1", "upper", "root", "elbow")).unwrap();
        c.add_bone(Bone::new("b2", "lower", "elbow", "hand")).unwrap();
        c
    }

    #[test]
    fn add_joint_checks_references() {
        let mut c = rig();
        assert_eq!(
            c.add_joint(Joint::new("root", "again", 0.0, 0.0)),
            Err(RigError::DuplicateJoint("root".into()))
        );
        assert!(matches!(
            c.add_joint(Joint::new("x", "x", 0.0, 0.0).with_parent("nope")),
            Err(RigError::MissingParent { .. })
        ));
        assert!(matches!(
            c.add_joint(Joint::new("x", "x", 0.0, 0.0).with_layer("torso_img")),
            Err(RigError::LayerAlreadyBound { .. })
        ));
        assert!(matches!(
            c.add_joint(Joint::new("x", "x", 0.0, 0.0).with_layer("missing")),
            Err(RigError::MissingLayer { .. })
        ));
        assert_eq!(c.joints.len(), 3);
        c.validate().unwrap();
    }

    #[test]
    fn reparenting_under_a_descendant_is_a_cycle() {
        let mut c = rig();
        let patch = JointPatch {
            parent_id: Some(Some("hand".into())),
            ..Default::default()
        };
        assert_eq!(c.update_joint("root", &patch), Err(RigError::Cycle("root".into())));
        assert_eq!(c.joint("root").unwrap().parent_id, None);
    }

    #[test]
    fn removing_a_joint_cascades() {
        let mut c = rig();
        let mut walk = Motion::new("walk");
        walk.upsert_keyframe(Keyframe::new("elbow", 0, 1.0, 1.0)).unwrap();
        walk.upsert_keyframe(Keyframe::new("hand", 0, 1.0, 1.0)).unwrap();

        let removed = c.remove_joint("elbow", std::slice::from_mut(&mut walk)).unwrap();
        assert_eq!(removed.id, JointId::from("elbow"));
        assert!(c.bones.is_empty());
        assert_eq!(c.joint("hand").unwrap().parent_id, Some(JointId::from("root")));
        assert_eq!(walk.keyframes.len(), 1);
        assert_eq!(walk.keyframes[0].joint_id, JointId::from("hand"));
        c.validate().unwrap();
    }

    #[test]
    fn bone_pairs_are_unique_in_either_direction() {
        let mut c = rig();
        assert!(matches!(
            c.add_bone(Bone::new("b3", "rev", "elbow", "root")),
            Err(RigError::DuplicateBonePair(..))
        ));
        assert_eq!(
            c.add_bone(Bone::new("b3", "self", "hand", "hand")),
            Err(RigError::SelfBone("hand".into()))
        );
        assert!(matches!(
            c.add_bone(Bone::new("b3", "ghost", "hand", "ghost")),
            Err(RigError::DanglingBone { .. })
        ));
        c.add_bone(Bone::new("b3", "skip", "root", "hand")).unwrap();
        c.rename_bone("b3", &BoneRename { name: "reach".into() }).unwrap();
        assert_eq!(c.remove_bone("b3").unwrap().name, "reach");
    }

    #[test]
    fn layer_orders_are_unique_and_removal_unbinds() {
        let mut c = rig();
        assert_eq!(
            c.add_layer(Layer::new("x", "x", 1)),
            Err(RigError::DuplicateLayerOrder(1))
        );
        let patch = LayerPatch {
            order: Some(0),
            ..Default::default()
        };
        assert_eq!(c.update_layer("arm_img", &patch), Err(RigError::DuplicateLayerOrder(0)));
        c.remove_layer("torso_img").unwrap();
        assert_eq!(c.joint("root").unwrap().layer_id, None);
        c.validate().unwrap();
    }

    #[test]
    fn validate_reports_hand_built_violations() {
        let mut c = rig();
        c.joints[0].parent_id = Some("hand".into());
        assert!(matches!(c.validate(), Err(RigError::Cycle(_))));

        let mut c = rig();
        c.bones.push(Bone::new("b9", "dup", "hand", "elbow"));
        assert!(matches!(c.validate(), Err(RigError::DuplicateBonePair(..))));
    }

    #[test]
    fn upsert_overwrites_the_same_coordinate() {
        let mut m = Motion::new("m");
        let first = m.upsert_keyframe(Keyframe::new("j", 5, 1.0, 1.0)).unwrap();
        let second = m
            .upsert_keyframe(Keyframe::new("j", 5, 9.0, 9.0).with_easing("easeIn"))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(m.keyframes.len(), 1);
        assert_eq!((m.keyframes[0].x, m.keyframes[0].easing.as_str()), (9.0, "easeIn"));
    }

    #[test]
    fn upsert_rejects_frames_past_the_range() {
        let mut m = Motion::new("m");
        let err = m.upsert_keyframe(Keyframe::new("j", 500, 0.0, 0.0)).unwrap_err();
        assert!(matches!(
            err,
            RigError::InvalidValue {
                field: "keyframe.frameNumber",
                ..
            }
        ));
        assert!(m.keyframes.is_empty());
        m.upsert_keyframe(Keyframe::new("j", m.last_frame(), 0.0, 0.0)).unwrap();
    }

    #[test]
    fn upsert_keeps_storage_sorted_by_frame() {
        let mut m = Motion::new("m");
        m.upsert_keyframe(Keyframe::new("j", 9, 0.0, 0.0)).unwrap();
        m.upsert_keyframe(Keyframe::new("k", 2, 0.0, 0.0)).unwrap();
        m.upsert_keyframe(Keyframe::new("j", 5, 0.0, 0.0)).unwrap();
        m.upsert_keyframe(Keyframe::new("k", 9, 0.0, 0.0)).unwrap();
        let frames: Vec<u32> = m.keyframes.iter().map(|k| k.frame_number).collect();
        assert_eq!(frames, [2, 5, 9, 9]);
    }

    #[test]
    fn keyframes_for_is_sorted() {
        let mut m = Motion::new("m");
        m.upsert_keyframe(Keyframe::new("j", 9, 0.0, 0.0)).unwrap();
        m.upsert_keyframe(Keyframe::new("k", 1, 0.0, 0.0)).unwrap();
        m.upsert_keyframe(Keyframe::new("j", 2, 0.0, 0.0)).unwrap();
        let frames: Vec<u32> = m.keyframes_for("j").iter().map(|k| k.frame_number).collect();
        assert_eq!(frames, [2, 9]);
    }

    fn shrinking_motion() -> Motion {
        let mut m = Motion::new("m");
        m.frame_count = 20;
        m.upsert_keyframe(Keyframe::new("j", 0, 0.0, 0.0)).unwrap();
        m.upsert_keyframe(Keyframe::new("j", 12, 12.0, 0.0)).unwrap();
        m.upsert_keyframe(Keyframe::new("j", 15, 15.0, 0.0)).unwrap();
        m
    }

    #[test]
    fn shrink_policies() {
        let mut dormant = shrinking_motion();
        dormant.set_frame_count(10, FrameCountPolicy::Dormant).unwrap();
        assert_eq!(dormant.keyframes.len(), 3);
        assert_eq!(dormant.active_keyframes().count(), 1);

        let mut pruned = shrinking_motion();
        pruned.set_frame_count(10, FrameCountPolicy::Prune).unwrap();
        assert_eq!(pruned.keyframes.len(), 1);

        let mut clamped = shrinking_motion();
        clamped.set_frame_count(10, FrameCountPolicy::Clamp).unwrap();
        let kfs = clamped.keyframes_for("j");
        assert_eq!(kfs.len(), 2);
        assert_eq!((kfs[1].frame_number, kfs[1].x), (9, 15.0));

        assert!(clamped.set_frame_count(0, FrameCountPolicy::Clamp).is_err());
    }

    #[test]
    fn duplicate_gets_fresh_keyframe_ids() {
        let m = shrinking_motion();
        let copy = m.duplicate("copy");
        assert_eq!(copy.keyframes.len(), m.keyframes.len());
        assert!(copy
            .keyframes
            .iter()
            .zip(&m.keyframes)
            .all(|(a, b)| a.id != b.id && a.frame_number == b.frame_number));
    }

    #[test]
    fn motion_validate_flags_dangling_keyframes() {
        let c = rig();
        let mut m = Motion::new("m");
        m.upsert_keyframe(Keyframe::new("hand", 0, 0.0, 0.0)).unwrap();
        m.validate(&c).unwrap();
        m.keyframes.push(Keyframe::new("ghost", 0, 0.0, 0.0));
        assert!(matches!(m.validate(&c), Err(RigError::DanglingKeyframe { .. })));
    }
}
