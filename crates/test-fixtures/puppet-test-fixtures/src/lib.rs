//! Shared rig fixtures for tests and benches.
//!
//! Fixtures live under `fixtures/` at the workspace root and are named in
//! `fixtures/manifest.json`. Characters and motions are stored in the
//! backend's snake_case document format.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    characters: HashMap<String, String>,
    motions: HashMap<String, MotionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MotionEntry {
    Path(String),
    Detailed { path: String, character: String },
}

impl MotionEntry {
    fn as_path(&self) -> &str {
        match self {
            MotionEntry::Path(path) => path,
            MotionEntry::Detailed { path, .. } => path,
        }
    }

    fn character(&self) -> Option<&str> {
        match self {
            MotionEntry::Path(_) => None,
            MotionEntry::Detailed { character, .. } => Some(character),
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod characters {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.characters.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.characters, "character", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.characters, "character", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.characters, "character", name)?;
        Ok(resolve_path(rel))
    }
}

pub mod motions {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.motions.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.motions, "motion", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.motions, "motion", name)?;
        super::load_json(entry.as_path())
    }

    /// Name of the character fixture this motion was authored against.
    pub fn character(name: &str) -> Result<Option<String>> {
        let entry = lookup(&MANIFEST.motions, "motion", name)?;
        Ok(entry.character().map(str::to_string))
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.motions, "motion", name)?;
        Ok(resolve_path(entry.as_path()))
    }
}
