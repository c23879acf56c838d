//! Error types for rig editing and record parsing.
//!
//! Pose evaluation itself never fails: dangling references and degenerate
//! spans degrade locally. These errors surface from edit commands, patch
//! validation and stored-record parsing.

use thiserror::Error;

use crate::ids::{BoneId, JointId, KeyframeId, LayerId};

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum RigError {
    #[error("duplicate joint id '{0}'")]
    DuplicateJoint(JointId),
    #[error("duplicate bone id '{0}'")]
    DuplicateBone(BoneId),
    #[error("duplicate layer id '{0}'")]
    DuplicateLayer(LayerId),
    #[error("duplicate keyframe id '{0}'")]
    DuplicateKeyframe(KeyframeId),

    #[error("joint '{0}' not found")]
    JointNotFound(JointId),
    #[error("bone '{0}' not found")]
    BoneNotFound(BoneId),
    #[error("layer '{0}' not found")]
    LayerNotFound(LayerId),
    #[error("keyframe '{0}' not found")]
    KeyframeNotFound(KeyframeId),

    #[error("joint '{joint}' references missing parent '{parent}'")]
    MissingParent { joint: JointId, parent: JointId },
    #[error("parent assignment would create a cycle through joint '{0}'")]
    Cycle(JointId),
    #[error("bone '{bone}' references missing joint '{joint}'")]
    DanglingBone { bone: BoneId, joint: JointId },
    #[error("a bone between '{0}' and '{1}' already exists")]
    DuplicateBonePair(JointId, JointId),
    #[error("bone cannot connect joint '{0}' to itself")]
    SelfBone(JointId),
    #[error("layer '{layer}' is already driven by joint '{joint}'")]
    LayerAlreadyBound { layer: LayerId, joint: JointId },
    #[error("joint '{joint}' binds missing layer '{layer}'")]
    MissingLayer { joint: JointId, layer: LayerId },
    #[error("layer order {0} is used by more than one layer")]
    DuplicateLayerOrder(i32),
    #[error("keyframe '{keyframe}' references missing joint '{joint}'")]
    DanglingKeyframe { keyframe: KeyframeId, joint: JointId },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl RigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    /// Coarse category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::DuplicateJoint(_)
            | Self::DuplicateBone(_)
            | Self::DuplicateLayer(_)
            | Self::DuplicateKeyframe(_)
            | Self::DuplicateBonePair(..)
            | Self::DuplicateLayerOrder(_) => "duplicate",
            Self::JointNotFound(_)
            | Self::BoneNotFound(_)
            | Self::LayerNotFound(_)
            | Self::KeyframeNotFound(_) => "lookup",
            Self::MissingParent { .. }
            | Self::Cycle(_)
            | Self::DanglingBone { .. }
            | Self::SelfBone(_)
            | Self::LayerAlreadyBound { .. }
            | Self::MissingLayer { .. }
            | Self::DanglingKeyframe { .. } => "integrity",
            Self::InvalidValue { .. } => "validation",
            Self::Parse(_) => "parse",
        }
    }
}

impl From<serde_json::Error> for RigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_record() {
        let err = RigError::DanglingBone {
            bone: "b1".into(),
            joint: "ghost".into(),
        };
        assert_eq!(err.to_string(), "bone 'b1' references missing joint 'ghost'");
        assert_eq!(err.category(), "integrity");
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let err: RigError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.category(), "parse");
    }
}
