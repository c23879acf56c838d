//! Persisted record loading.
//!
//! Accepts the editor's camelCase records and the backend's snake_case
//! documents (extra fields such as timestamps or `character_id` are ignored).
//! Motions are normalized before validation:
//! - keyframes sorted ascending by frame (stable);
//! - duplicate `(joint, frame)` entries collapsed, keeping the last;
//! - unknown easing names replaced by `"linear"`.

use hashbrown::{HashMap, HashSet};
use log::warn;

use crate::data::{Character, Motion, DEFAULT_EASING};
use crate::error::RigError;
use crate::interp::Easing;

/// Parse and validate a character document.
pub fn parse_character_json(s: &str) -> Result<Character, RigError> {
    let character: Character = serde_json::from_str(s)?;
    character.validate()?;
    Ok(character)
}

/// Parse, normalize and validate a motion document.
///
/// Joint references are not checked here; use [`Motion::validate`] with the
/// owning character for that.
pub fn parse_motion_json(s: &str) -> Result<Motion, RigError> {
    let mut motion: Motion = serde_json::from_str(s)?;
    normalize_motion(&mut motion);
    if motion.fps == 0 {
        return Err(RigError::invalid("motion.fps", "must be positive"));
    }
    if motion.frame_count == 0 {
        return Err(RigError::invalid("motion.frameCount", "must be positive"));
    }
    check_keyframes(&motion)?;
    Ok(motion)
}

/// Keyframe ids are unique and every coordinate is finite.
fn check_keyframes(motion: &Motion) -> Result<(), RigError> {
    let mut ids: HashSet<&str> = HashSet::with_capacity(motion.keyframes.len());
    for k in &motion.keyframes {
        if !ids.insert(k.id.as_str()) {
            return Err(RigError::DuplicateKeyframe(k.id.clone()));
        }
        for (field, v) in [
            ("keyframe.x", k.x),
            ("keyframe.y", k.y),
            ("keyframe.rotation", k.rotation),
        ] {
            if !v.is_finite() {
                return Err(RigError::invalid(field, format!("{v} is not finite")));
            }
        }
    }
    Ok(())
}

/// Sort keyframes by frame and collapse duplicates in place.
pub fn normalize_motion(motion: &mut Motion) {
    for k in &mut motion.keyframes {
        if Easing::lookup(&k.easing).is_none() {
            warn!("keyframe '{}' has unknown easing '{}'; using linear", k.id, k.easing);
            k.easing = DEFAULT_EASING.to_string();
        }
    }

    motion.keyframes.sort_by_key(|k| k.frame_number);

    let before = motion.keyframes.len();
    let keep: Vec<bool> = {
        // Index of the last occurrence of each coordinate.
        let mut last: HashMap<(&str, u32), usize> = HashMap::with_capacity(before);
        for (i, k) in motion.keyframes.iter().enumerate() {
            last.insert((k.joint_id.as_str(), k.frame_number), i);
        }
        if last.len() == before {
            return;
        }
        let mut keep = vec![false; before];
        for &i in last.values() {
            keep[i] = true;
        }
        keep
    };
    let mut slot = 0usize;
    motion.keyframes.retain(|_| {
        let k = keep[slot];
        slot += 1;
        k
    });
    warn!(
        "motion '{}': collapsed {} duplicate keyframe(s)",
        motion.name,
        before - motion.keyframes.len()
    );
}
