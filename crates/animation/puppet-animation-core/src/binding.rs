//! Layer bindings and the layer transform resolver.
//!
//! A joint drives at most one layer through its `layer_id`. The resolved
//! layer transform is additive: the joint's displacement from its rest
//! position is added to the layer's rest position, and the joint's rotation
//! is added to the layer's rest rotation. Scale is never driven by joints.

use hashbrown::HashMap;
use log::warn;

use crate::data::{Joint, Layer, Transform};
use crate::ids::{JointId, LayerId};
use crate::pose::Pose;
use crate::sampling::JointPose;

/// Apply a posed joint to a layer's rest transform.
#[inline]
pub fn apply_joint(rest: &Transform, joint: &Joint, posed: &JointPose) -> Transform {
    Transform {
        x: rest.x + (posed.x - joint.x),
        y: rest.y + (posed.y - joint.y),
        rotation: rest.rotation + posed.rotation,
        scale_x: rest.scale_x,
        scale_y: rest.scale_y,
    }
}

/// Resolve the render transform of `layer` for `pose`.
///
/// Unbound layers, and layers whose joint is missing from the pose, keep
/// their rest transform.
pub fn resolve(layer: &Layer, pose: &Pose, joints: &[Joint]) -> Transform {
    let bound = joints
        .iter()
        .find(|j| j.layer_id.as_ref().is_some_and(|l| *l == layer.id));
    match bound.and_then(|j| pose.get(j.id.as_str()).map(|p| (j, p))) {
        Some((joint, posed)) => apply_joint(&layer.transform, joint, posed),
        None => layer.transform,
    }
}

/// Precomputed layer -> driving joint lookup.
#[derive(Clone, Debug, Default)]
pub struct LayerBindings {
    by_layer: HashMap<LayerId, Joint>,
}

impl LayerBindings {
    pub fn build(joints: &[Joint]) -> Self {
        let mut by_layer: HashMap<LayerId, Joint> = HashMap::new();
        for joint in joints {
            let Some(layer) = joint.layer_id.as_ref() else {
                continue;
            };
            // First binding wins, matching the linear scan in `resolve`.
            if let Some(existing) = by_layer.get(layer) {
                warn!(
                    "layer '{}' bound by both '{}' and '{}'; keeping '{}'",
                    layer, existing.id, joint.id, existing.id
                );
                continue;
            }
            by_layer.insert(layer.clone(), joint.clone());
        }
        Self { by_layer }
    }

    /// Joint driving `layer`, if any.
    pub fn joint_for(&self, layer: &str) -> Option<&Joint> {
        self.by_layer.get(layer)
    }

    pub fn joint_id_for(&self, layer: &str) -> Option<&JointId> {
        self.joint_for(layer).map(|j| &j.id)
    }

    pub fn len(&self) -> usize {
        self.by_layer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_layer.is_empty()
    }

    /// Same result as [`resolve`] without scanning the joint list.
    pub fn resolve(&self, layer: &Layer, pose: &Pose) -> Transform {
        match self
            .joint_for(layer.id.as_str())
            .and_then(|j| pose.get(j.id.as_str()).map(|p| (j, p)))
        {
            Some((joint, posed)) => apply_joint(&layer.transform, joint, posed),
            None => layer.transform,
        }
    }
}
