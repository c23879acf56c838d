//! Typed partial updates for rig records.
//!
//! Each patch names the fields it may change. `validate` checks the values on
//! their own; `apply_to` validates, then returns the updated record without
//! touching the original. Referential checks (parents, bound layers) need the
//! whole character and live in [`crate::edit`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::data::{Bone, Joint, Keyframe, Layer, Motion, Transform};
use crate::error::RigError;
use crate::ids::{JointId, LayerId};

fn finite(field: &'static str, v: Option<f32>) -> Result<(), RigError> {
    match v {
        Some(v) if !v.is_finite() => Err(RigError::invalid(field, format!("{v} is not finite"))),
        _ => Ok(()),
    }
}

// A present `null` must read as "clear", not as "absent".
fn double_option<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

fn non_empty(field: &'static str, v: &Option<String>) -> Result<(), RigError> {
    match v {
        Some(s) if s.trim().is_empty() => Err(RigError::invalid(field, "must not be empty")),
        _ => Ok(()),
    }
}

/// Partial update of a [`Transform`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub rotation: Option<f32>,
    pub scale_x: Option<f32>,
    pub scale_y: Option<f32>,
}

impl TransformPatch {
    pub fn validate(&self) -> Result<(), RigError> {
        finite("transform.x", self.x)?;
        finite("transform.y", self.y)?;
        finite("transform.rotation", self.rotation)?;
        finite("transform.scaleX", self.scale_x)?;
        finite("transform.scaleY", self.scale_y)?;
        Ok(())
    }

    pub fn apply_to(&self, t: &Transform) -> Result<Transform, RigError> {
        self.validate()?;
        Ok(Transform {
            x: self.x.unwrap_or(t.x),
            y: self.y.unwrap_or(t.y),
            rotation: self.rotation.unwrap_or(t.rotation),
            scale_x: self.scale_x.unwrap_or(t.scale_x),
            scale_y: self.scale_y.unwrap_or(t.scale_y),
        })
    }
}

/// Partial update of a [`Joint`].
///
/// `parent_id` and `layer_id` use a nested option: `Some(None)` clears the
/// reference, `None` leaves it alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JointPatch {
    pub name: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    #[serde(deserialize_with = "double_option")]
    pub parent_id: Option<Option<JointId>>,
    #[serde(deserialize_with = "double_option")]
    pub layer_id: Option<Option<LayerId>>,
    pub color: Option<String>,
}

impl JointPatch {
    pub fn validate(&self) -> Result<(), RigError> {
        non_empty("joint.name", &self.name)?;
        non_empty("joint.color", &self.color)?;
        finite("joint.x", self.x)?;
        finite("joint.y", self.y)?;
        Ok(())
    }

    pub fn apply_to(&self, joint: &Joint) -> Result<Joint, RigError> {
        self.validate()?;
        if let Some(Some(parent)) = &self.parent_id {
            if *parent == joint.id {
                return Err(RigError::Cycle(joint.id.clone()));
            }
        }
        let mut out = joint.clone();
        if let Some(name) = &self.name {
            out.name = name.clone();
        }
        if let Some(x) = self.x {
            out.x = x;
        }
        if let Some(y) = self.y {
            out.y = y;
        }
        if let Some(parent) = &self.parent_id {
            out.parent_id = parent.clone();
        }
        if let Some(layer) = &self.layer_id {
            out.layer_id = layer.clone();
        }
        if let Some(color) = &self.color {
            out.color = color.clone();
        }
        Ok(out)
    }
}

/// Bones carry no geometry of their own; only the name can change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneRename {
    pub name: String,
}

impl BoneRename {
    pub fn validate(&self) -> Result<(), RigError> {
        if self.name.trim().is_empty() {
            return Err(RigError::invalid("bone.name", "must not be empty"));
        }
        Ok(())
    }

    pub fn apply_to(&self, bone: &Bone) -> Result<Bone, RigError> {
        self.validate()?;
        let mut out = bone.clone();
        out.name = self.name.clone();
        Ok(out)
    }
}

/// Partial update of a [`Layer`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub order: Option<i32>,
    pub visible: Option<bool>,
    pub opacity: Option<f32>,
    pub transform: Option<TransformPatch>,
}

impl LayerPatch {
    pub fn validate(&self) -> Result<(), RigError> {
        non_empty("layer.name", &self.name)?;
        if let Some(o) = self.opacity {
            if !(0.0..=1.0).contains(&o) {
                return Err(RigError::invalid("layer.opacity", format!("{o} is outside [0,1]")));
            }
        }
        if let Some(t) = &self.transform {
            t.validate()?;
        }
        Ok(())
    }

    pub fn apply_to(&self, layer: &Layer) -> Result<Layer, RigError> {
        self.validate()?;
        let mut out = layer.clone();
        if let Some(name) = &self.name {
            out.name = name.clone();
        }
        if let Some(image) = &self.image {
            out.image = Some(image.clone());
        }
        if let Some(order) = self.order {
            out.order = order;
        }
        if let Some(visible) = self.visible {
            out.visible = visible;
        }
        if let Some(opacity) = self.opacity {
            out.opacity = opacity;
        }
        if let Some(t) = &self.transform {
            out.transform = t.apply_to(&layer.transform)?;
        }
        Ok(out)
    }
}

/// Partial update of a [`Keyframe`]. The owning joint and frame are the
/// keyframe's identity and cannot be patched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyframePatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub rotation: Option<f32>,
    pub easing: Option<String>,
}

impl KeyframePatch {
    pub fn validate(&self) -> Result<(), RigError> {
        finite("keyframe.x", self.x)?;
        finite("keyframe.y", self.y)?;
        finite("keyframe.rotation", self.rotation)?;
        if let Some(e) = &self.easing {
            if crate::interp::Easing::lookup(e).is_none() {
                return Err(RigError::invalid("keyframe.easing", format!("unknown easing '{e}'")));
            }
        }
        Ok(())
    }

    pub fn apply_to(&self, kf: &Keyframe) -> Result<Keyframe, RigError> {
        self.validate()?;
        let mut out = kf.clone();
        if let Some(x) = self.x {
            out.x = x;
        }
        if let Some(y) = self.y {
            out.y = y;
        }
        if let Some(r) = self.rotation {
            out.rotation = r;
        }
        if let Some(e) = &self.easing {
            out.easing = e.clone();
        }
        Ok(out)
    }
}

/// Partial update of a [`Motion`]'s settings. Frame count changes go through
/// [`Motion::set_frame_count`] so the shrink policy is applied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MotionPatch {
    pub name: Option<String>,
    pub fps: Option<u32>,
    pub frame_count: Option<u32>,
    #[serde(rename = "loop")]
    pub looping: Option<bool>,
}

impl MotionPatch {
    pub fn validate(&self) -> Result<(), RigError> {
        non_empty("motion.name", &self.name)?;
        if self.fps == Some(0) {
            return Err(RigError::invalid("motion.fps", "must be positive"));
        }
        if self.frame_count == Some(0) {
            return Err(RigError::invalid("motion.frameCount", "must be positive"));
        }
        Ok(())
    }

    pub fn apply_to(
        &self,
        motion: &Motion,
        policy: crate::config::FrameCountPolicy,
    ) -> Result<Motion, RigError> {
        self.validate()?;
        let mut out = motion.clone();
        if let Some(name) = &self.name {
            out.name = name.clone();
        }
        if let Some(fps) = self.fps {
            out.fps = fps;
        }
        if let Some(looping) = self.looping {
            out.looping = looping;
        }
        if let Some(n) = self.frame_count {
            out.set_frame_count(n, policy)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrameCountPolicy;

    #[test]
    fn transform_patch_touches_only_named_fields() {
        let t = Transform::at(1.0, 2.0);
        let p = TransformPatch {
            rotation: Some(45.0),
            ..Default::default()
        };
        let out = p.apply_to(&t).unwrap();
        assert_eq!((out.x, out.y, out.rotation, out.scale_x), (1.0, 2.0, 45.0, 1.0));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let p = TransformPatch {
            x: Some(f32::NAN),
            ..Default::default()
        };
        assert!(matches!(p.validate(), Err(RigError::InvalidValue { field: "transform.x", .. })));
    }

    #[test]
    fn bone_rename_keeps_endpoints() {
        let bone = Bone::new("b", "upper", "a", "c");
        let out = BoneRename { name: "forearm".into() }.apply_to(&bone).unwrap();
        assert_eq!(out.name, "forearm");
        assert_eq!(out.end_joint_id, JointId::from("c"));
        assert!(BoneRename { name: " ".into() }.apply_to(&bone).is_err());
    }

    #[test]
    fn opacity_must_stay_in_unit_range() {
        let layer = Layer::new("l", "l", 0);
        let p = LayerPatch {
            opacity: Some(1.5),
            ..Default::default()
        };
        assert!(p.apply_to(&layer).is_err());
        let ok = LayerPatch {
            opacity: Some(0.25),
            visible: Some(false),
            ..Default::default()
        };
        let out = ok.apply_to(&layer).unwrap();
        assert_eq!((out.opacity, out.visible), (0.25, false));
    }

    #[test]
    fn joint_patch_can_clear_references() {
        let j = Joint::new("j", "j", 0.0, 0.0).with_parent("p").with_layer("l");
        let p = JointPatch {
            parent_id: Some(None),
            ..Default::default()
        };
        let out = p.apply_to(&j).unwrap();
        assert_eq!(out.parent_id, None);
        assert_eq!(out.layer_id, Some(LayerId::from("l")));
        let self_parent = JointPatch {
            parent_id: Some(Some("j".into())),
            ..Default::default()
        };
        assert_eq!(self_parent.apply_to(&j), Err(RigError::Cycle("j".into())));
    }

    #[test]
    fn keyframe_patch_rejects_unknown_easing() {
        let kf = Keyframe::new("j", 0, 0.0, 0.0);
        let bad = KeyframePatch {
            easing: Some("wobble".into()),
            ..Default::default()
        };
        assert!(bad.apply_to(&kf).is_err());
        let good = KeyframePatch {
            easing: Some("ease-in-out".into()),
            x: Some(3.0),
            ..Default::default()
        };
        let out = good.apply_to(&kf).unwrap();
        assert_eq!((out.x, out.easing.as_str()), (3.0, "ease-in-out"));
    }

    #[test]
    fn motion_patch_rejects_zero_rates() {
        let m = Motion::new("m");
        let p = MotionPatch {
            fps: Some(0),
            ..Default::default()
        };
        assert!(p.apply_to(&m, FrameCountPolicy::Dormant).is_err());
        let p = MotionPatch {
            fps: Some(24),
            looping: Some(false),
            ..Default::default()
        };
        let out = p.apply_to(&m, FrameCountPolicy::Dormant).unwrap();
        assert_eq!((out.fps, out.looping), (24, false));
    }

    #[test]
    fn patches_deserialize_from_partial_json() {
        let p: LayerPatch =
            serde_json::from_str(r#"{"opacity":0.5,"transform":{"scaleX":2}}"#).unwrap();
        assert_eq!(p.opacity, Some(0.5));
        assert_eq!(p.transform.unwrap().scale_x, Some(2.0));

        let clear: JointPatch = serde_json::from_str(r#"{"layerId":null}"#).unwrap();
        assert_eq!(clear.layer_id, Some(None));
        assert_eq!(clear.parent_id, None);
    }
}
