//! Canonical rig data model: character (layers, joints, bones) and motion
//! (keyframes).
//!
//! Field names follow the editor's camelCase records; the backend's
//! snake_case spellings are accepted as aliases on input.

use serde::{Deserialize, Serialize};

use crate::ids::{BoneId, JointId, KeyframeId, LayerId};

pub const DEFAULT_JOINT_COLOR: &str = "#ef4444";
pub const DEFAULT_EASING: &str = "linear";
pub const DEFAULT_FPS: u32 = 12;
pub const DEFAULT_FRAME_COUNT: u32 = 30;

fn default_joint_color() -> String {
    DEFAULT_JOINT_COLOR.to_string()
}

fn default_easing() -> String {
    DEFAULT_EASING.to_string()
}

fn default_true() -> bool {
    true
}

fn default_one() -> f32 {
    1.0
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}

fn default_frame_count() -> u32 {
    DEFAULT_FRAME_COUNT
}

/// 2D transform: position, rotation in degrees, per-axis scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "default_one", alias = "scale_x")]
    pub scale_x: f32,
    #[serde(default = "default_one", alias = "scale_y")]
    pub scale_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Transform {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }
}

/// A named, animatable point in character space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Joint {
    pub id: JointId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default, alias = "parent_id", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<JointId>,
    #[serde(default, alias = "layer_id", skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<LayerId>,
    #[serde(default = "default_joint_color")]
    pub color: String,
}

impl Joint {
    pub fn new(id: impl Into<JointId>, name: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            x,
            y,
            parent_id: None,
            layer_id: None,
            color: default_joint_color(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<JointId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    pub fn with_layer(mut self, layer: impl Into<LayerId>) -> Self {
        self.layer_id = Some(layer.into());
        self
    }

    #[inline]
    pub fn rest_position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Visual connector between two joints. Carries no transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bone {
    pub id: BoneId,
    pub name: String,
    #[serde(alias = "start_joint_id")]
    pub start_joint_id: JointId,
    #[serde(alias = "end_joint_id")]
    pub end_joint_id: JointId,
}

impl Bone {
    pub fn new(
        id: impl Into<BoneId>,
        name: impl Into<String>,
        start: impl Into<JointId>,
        end: impl Into<JointId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_joint_id: start.into(),
            end_joint_id: end.into(),
        }
    }

    /// True if this bone connects `a` and `b` in either direction.
    pub fn connects(&self, a: &JointId, b: &JointId) -> bool {
        (&self.start_joint_id == a && &self.end_joint_id == b)
            || (&self.start_joint_id == b && &self.end_joint_id == a)
    }

    pub fn touches(&self, joint: &JointId) -> bool {
        &self.start_joint_id == joint || &self.end_joint_id == joint
    }
}

/// Independently transformable raster image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    /// Encoded image payload (data URL or bare base64). Opaque to evaluation.
    #[serde(default, alias = "image_data", alias = "imageData", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_one")]
    pub opacity: f32,
    #[serde(default)]
    pub transform: Transform,
}

impl Layer {
    pub fn new(id: impl Into<LayerId>, name: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: None,
            order,
            visible: true,
            opacity: 1.0,
            transform: Transform::default(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_image(mut self, payload: impl Into<String>) -> Self {
        self.image = Some(payload.into());
        self
    }
}

/// Authored joint position/rotation at an integer frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    pub id: KeyframeId,
    #[serde(alias = "joint_id")]
    pub joint_id: JointId,
    #[serde(alias = "frame_number")]
    pub frame_number: u32,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub rotation: f32,
    /// Easing of the segment that *arrives* at this keyframe.
    #[serde(default = "default_easing")]
    pub easing: String,
}

impl Keyframe {
    pub fn new(joint: impl Into<JointId>, frame_number: u32, x: f32, y: f32) -> Self {
        Self {
            id: KeyframeId::generate(),
            joint_id: joint.into(),
            frame_number,
            x,
            y,
            rotation: 0.0,
            easing: default_easing(),
        }
    }

    pub fn with_id(mut self, id: impl Into<KeyframeId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = easing.into();
        self
    }
}

/// Skeleton plus layers. Owns joints and bones.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub joints: Vec<Joint>,
    #[serde(default)]
    pub bones: Vec<Bone>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn joint(&self, id: &str) -> Option<&Joint> {
        self.joints.iter().find(|j| j.id == id)
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn bone(&self, id: &str) -> Option<&Bone> {
        self.bones.iter().find(|b| b.id == id)
    }

    /// Joint whose `layer_id` points at `layer`.
    pub fn joint_for_layer(&self, layer: &str) -> Option<&Joint> {
        self.joints
            .iter()
            .find(|j| j.layer_id.as_ref().is_some_and(|l| l == layer))
    }

    /// Layers sorted ascending by `order` (draw order).
    pub fn layers_in_draw_order(&self) -> Vec<&Layer> {
        let mut layers: Vec<&Layer> = self.layers.iter().collect();
        layers.sort_by_key(|l| l.order);
        layers
    }
}

/// Named animation over a fixed frame range. Owns its keyframes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Motion {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_frame_count", alias = "frame_count")]
    pub frame_count: u32,
    #[serde(default = "default_true", rename = "loop")]
    pub looping: bool,
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            name: String::new(),
            fps: DEFAULT_FPS,
            frame_count: DEFAULT_FRAME_COUNT,
            looping: true,
            keyframes: Vec::new(),
        }
    }
}

impl Motion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Index of the last playable frame.
    #[inline]
    pub fn last_frame(&self) -> u32 {
        self.frame_count.saturating_sub(1)
    }

    /// True if `frame` lies inside `[0, frame_count - 1]`.
    #[inline]
    pub fn contains_frame(&self, frame: u32) -> bool {
        frame < self.frame_count
    }

    /// Keyframes that take part in evaluation. Keyframes left beyond the
    /// range by a frame-count shrink stay stored but are dormant.
    pub fn active_keyframes(&self) -> impl Iterator<Item = &Keyframe> {
        self.keyframes
            .iter()
            .filter(move |k| self.contains_frame(k.frame_number))
    }

    /// Duration in seconds at the motion's fps.
    pub fn duration_seconds(&self) -> f32 {
        if self.fps == 0 {
            return 0.0;
        }
        self.frame_count as f32 / self.fps as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_records_deserialize_with_defaults() {
        let joint: Joint = serde_json::from_value(serde_json::json!({
            "id": "joint_001", "name": "head", "x": 100, "y": 50,
            "parent_id": null, "layer_id": "layer_001"
        }))
        .unwrap();
        assert_eq!(joint.layer_id, Some(LayerId::from("layer_001")));
        assert_eq!(joint.color, DEFAULT_JOINT_COLOR);

        let kf: Keyframe = serde_json::from_value(serde_json::json!({
            "id": "kf_001", "joint_id": "joint_001", "frame_number": 3,
            "x": 1, "y": 2, "scale_x": 1, "scale_y": 1, "easing": "ease-in-out"
        }))
        .unwrap();
        assert_eq!(kf.frame_number, 3);
        assert_eq!(kf.rotation, 0.0);
        assert_eq!(kf.easing, "ease-in-out");

        let motion: Motion = serde_json::from_value(serde_json::json!({
            "name": "walk", "character_id": "c1"
        }))
        .unwrap();
        assert_eq!((motion.fps, motion.frame_count, motion.looping), (12, 30, true));
    }

    #[test]
    fn editor_records_serialize_in_camel_case() {
        let layer = Layer::new("l1", "arm", 2).with_transform(Transform::at(5.0, 6.0));
        let json = serde_json::to_value(&layer).unwrap();
        assert_eq!(json["transform"]["scaleX"], 1.0);
        assert_eq!(json["order"], 2);
        assert!(json.get("image").is_none());

        let motion = Motion::new("idle");
        let json = serde_json::to_value(&motion).unwrap();
        assert_eq!(json["frameCount"], 30);
        assert_eq!(json["loop"], true);
    }

    #[test]
    fn bone_pairs_are_unordered() {
        let bone = Bone::new("b", "upper", "a", "b");
        assert!(bone.connects(&"a".into(), &"b".into()));
        assert!(bone.connects(&"b".into(), &"a".into()));
        assert!(!bone.connects(&"a".into(), &"c".into()));
    }

    #[test]
    fn dormant_keyframes_are_filtered_from_the_active_set() {
        let mut motion = Motion::new("m");
        motion.frame_count = 10;
        motion.keyframes.push(Keyframe::new("j", 9, 0.0, 0.0));
        motion.keyframes.push(Keyframe::new("j", 10, 0.0, 0.0));
        assert_eq!(motion.active_keyframes().count(), 1);
        assert_eq!(motion.last_frame(), 9);
    }

    #[test]
    fn draw_order_sorts_by_order_key() {
        let mut c = Character::new("c");
        c.layers.push(Layer::new("top", "top", 5));
        c.layers.push(Layer::new("bottom", "bottom", -1));
        let ids: Vec<&str> = c.layers_in_draw_order().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["bottom", "top"]);
    }
}
