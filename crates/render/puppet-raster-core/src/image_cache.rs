//! Decoded layer images.
//!
//! Decoding is the only expensive, fallible step of rasterization, so it runs
//! once as a parallel pre-pass before any frame is drawn. Layers whose image
//! is missing or fails to decode are recorded and skipped while drawing.

use base64::prelude::*;
use hashbrown::HashMap;
use image::RgbaImage;
use log::{debug, warn};
use rayon::prelude::*;

use puppet_animation_core::{Character, LayerId};

use crate::error::RasterError;

/// Decode a layer payload: a `data:<mime>;base64,<data>` URL or bare base64.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, String> {
    let payload = payload.trim();
    let encoded = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| "data URL has no ',' separator".to_string())?;
            if !header.ends_with(";base64") {
                return Err(format!("unsupported data URL encoding '{header}'"));
            }
            data
        }
        None => payload,
    };
    BASE64_STANDARD
        .decode(encoded)
        .map_err(|e| format!("invalid base64: {e}"))
}

/// Decode a payload all the way to RGBA pixels.
pub fn decode_image(payload: &str) -> Result<RgbaImage, String> {
    let bytes = decode_payload(payload)?;
    let img = image::load_from_memory(&bytes).map_err(|e| e.to_string())?;
    Ok(img.to_rgba8())
}

#[derive(Debug, Default)]
pub struct ImageCache {
    images: HashMap<LayerId, RgbaImage>,
    failures: Vec<RasterError>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every layer image of `character` in parallel.
    pub fn decode_all(character: &Character) -> Self {
        let results: Vec<(LayerId, Result<RgbaImage, String>)> = character
            .layers
            .par_iter()
            .filter_map(|layer| {
                layer
                    .image
                    .as_deref()
                    .map(|payload| (layer.id.clone(), decode_image(payload)))
            })
            .collect();

        let mut cache = Self::new();
        for (layer, result) in results {
            match result {
                Ok(img) => {
                    cache.images.insert(layer, img);
                }
                Err(reason) => {
                    warn!("layer '{layer}' skipped: {reason}");
                    cache.failures.push(RasterError::ImageDecode { layer, reason });
                }
            }
        }
        debug!(
            "decoded {} layer image(s), {} failure(s)",
            cache.images.len(),
            cache.failures.len()
        );
        cache
    }

    /// Register an already-decoded image.
    pub fn insert(&mut self, layer: impl Into<LayerId>, image: RgbaImage) {
        self.images.insert(layer.into(), image);
    }

    #[inline]
    pub fn get(&self, layer: &str) -> Option<&RgbaImage> {
        self.images.get(layer)
    }

    /// Pixel size of the decoded image for `layer`.
    pub fn size(&self, layer: &str) -> Option<(u32, u32)> {
        self.get(layer).map(|img| img.dimensions())
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Decode failures collected by [`Self::decode_all`].
    pub fn failures(&self) -> &[RasterError] {
        &self.failures
    }
}
