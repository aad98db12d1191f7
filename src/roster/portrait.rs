//! Character portraits
//!
//! Portraits are stored as PNG bytes inside the save document (base64
//! encoded). Uploaded images are normalised to a fixed square size first.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, RgbaImage};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::character::Race;

/// Width and height every uploaded portrait is resized to
pub const PORTRAIT_SIZE: u32 = 300;

#[derive(Debug, Error)]
pub enum PortraitError {
    #[error("portrait image is empty")]
    Empty,
    #[error("could not decode portrait image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("could not encode portrait image: {0}")]
    Encode(#[source] image::ImageError),
}

/// PNG-encoded portrait image
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Portrait(Vec<u8>);

impl Portrait {
    /// Wrap bytes that are already a stored portrait
    pub fn from_png(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decode an uploaded image (PNG, JPEG), resize it to
    /// `PORTRAIT_SIZE` x `PORTRAIT_SIZE` and re-encode as PNG
    pub fn from_upload(bytes: &[u8]) -> Result<Self, PortraitError> {
        if bytes.is_empty() {
            return Err(PortraitError::Empty);
        }
        let image = image::load_from_memory(bytes).map_err(PortraitError::Decode)?;
        Self::from_image(&image)
    }

    /// Resize and encode an in-memory image
    pub fn from_image(image: &DynamicImage) -> Result<Self, PortraitError> {
        let resized = image.resize_exact(PORTRAIT_SIZE, PORTRAIT_SIZE, FilterType::Triangle);
        let png = encode_png(&resized.to_rgba8())?;
        Ok(Self(png))
    }

    /// Decode the stored bytes back into an image
    pub fn decode(&self) -> Result<DynamicImage, PortraitError> {
        if self.0.is_empty() {
            return Err(PortraitError::Empty);
        }
        image::load_from_memory(&self.0).map_err(PortraitError::Decode)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Portrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Portrait({} bytes)", self.0.len())
    }
}

impl Serialize for Portrait {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Portrait {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64
            .decode(encoded.as_bytes())
            .map(Portrait)
            .map_err(serde::de::Error::custom)
    }
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, PortraitError> {
    let mut buffer = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(Cursor::new(&mut buffer));

    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(PortraitError::Encode)?;

    Ok(buffer)
}

/// Stock portraits grouped by race, used for random recruits
#[derive(Debug, Clone, Default)]
pub struct PortraitPool {
    by_race: HashMap<Race, Vec<Portrait>>,
}

impl PortraitPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, race: Race, portrait: Portrait) {
        self.by_race.entry(race).or_default().push(portrait);
    }

    /// Load `<dir>/<race>/*.png|jpg`, one subdirectory per race
    /// (`human`, `elf`, ...). Unreadable images are skipped.
    pub fn load_dir(dir: &Path) -> Self {
        let mut pool = Self::new();
        for &race in Race::all() {
            let race_dir = dir.join(race.name().to_lowercase());
            let Ok(entries) = fs::read_dir(&race_dir) else {
                log::debug!("No portrait directory for {}", race.name());
                continue;
            };
            for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
                let loaded = fs::read(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|bytes| Portrait::from_upload(&bytes).map_err(|e| e.to_string()));
                match loaded {
                    Ok(portrait) => pool.add(race, portrait),
                    Err(e) => log::warn!("Skipping portrait {}: {}", path.display(), e),
                }
            }
        }
        log::info!("Loaded {} stock portraits", pool.len());
        pool
    }

    /// Random portrait for a race, if any were loaded
    pub fn random_for<R: Rng>(&self, race: Race, rng: &mut R) -> Option<&Portrait> {
        let portraits = self.by_race.get(&race)?;
        if portraits.is_empty() {
            return None;
        }
        portraits.get(rng.gen_range(0..portraits.len()))
    }

    pub fn count_for(&self, race: Race) -> usize {
        self.by_race.get(&race).map(|p| p.len()).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.by_race.values().map(|p| p.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
