// Author: Dustin Pilgrim
// License: MIT

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

pub const DEFAULT_COVER_IMAGE: &str = "/images/audio-placeholder.jpg";

fn default_cover_image() -> String {
    DEFAULT_COVER_IMAGE.to_string()
}

/// One recording in the exhibit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub work: String,
    #[serde(default)]
    pub composer: String,
    #[serde(default)]
    pub catalog_number: String,
    #[serde(default)]
    pub performers: String,
    /// Release year, or a date whose last four-digit group is the year.
    #[serde(default)]
    pub released: String,
    #[serde(default)]
    pub conductor: String,
    /// Media path, relative to the configured media root.
    pub file: String,
    #[serde(default = "default_cover_image")]
    pub cover_image: String,
    #[serde(default)]
    pub duration_secs: u32,
}

impl Track {
    /// Year used for ordering; 0 when `released` has no four-digit year.
    pub fn year(&self) -> u32 {
        self.released
            .split(|c: char| !c.is_ascii_digit())
            .filter(|part| part.len() == 4)
            .last()
            .and_then(|part| part.parse().ok())
            .unwrap_or(0)
    }

    /// Title, composer and release date are all required for the info panel.
    pub fn has_metadata(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.composer.trim().is_empty()
            && !self.released.trim().is_empty()
    }

    /// Placeholder art counts as a missing cover.
    pub fn has_cover(&self) -> bool {
        let cover = self.cover_image.trim();
        !cover.is_empty() && !cover.contains("placeholder.svg") && cover != DEFAULT_COVER_IMAGE
    }
}

/// Tracks in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn from_tracks(mut tracks: Vec<Track>) -> Self {
        tracks.sort_by_key(Track::year);
        Self { tracks }
    }

    /// Missing file means an empty catalog; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!("catalog: {} not found, starting with no tracks", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read catalog {}", path.display()))?;
        let tracks: Vec<Track> = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("failed to parse catalog {}", path.display()))?;

        tracing::info!("catalog: loaded {} tracks from {}", tracks.len(), path.display());
        Ok(Self::from_tracks(tracks))
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, id: u32) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Result of one availability scan, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilityReport {
    pub available: Vec<u32>,
    pub unavailable: Vec<u32>,
    pub missing_metadata: Vec<u32>,
    pub missing_covers: Vec<u32>,
}

impl AvailabilityReport {
    pub fn is_available(&self, id: u32) -> bool {
        self.available.contains(&id)
    }

    /// Short markers for one track, as shown in the `tracks` listing.
    pub fn flags(&self, id: u32) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.unavailable.contains(&id) {
            flags.push("unavailable");
        } else if !self.available.contains(&id) {
            flags.push("unchecked");
        }
        if self.missing_metadata.contains(&id) {
            flags.push("no metadata");
        }
        if self.missing_covers.contains(&id) {
            flags.push("no cover");
        }
        flags
    }
}

/// Existence cache for media files, keyed by the catalog `file` value.
#[derive(Debug)]
pub struct AvailabilityCache {
    media_root: PathBuf,
    checked: HashMap<String, bool>,
}

impl AvailabilityCache {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
            checked: HashMap::new(),
        }
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Point at a new media root; cached results are dropped with the old one.
    pub fn set_media_root(&mut self, media_root: impl Into<PathBuf>) {
        self.media_root = media_root.into();
        self.clear();
    }

    pub fn resolve(&self, file: &str) -> PathBuf {
        self.media_root.join(file.trim_start_matches('/'))
    }

    /// A regular, non-empty file counts as playable.
    pub fn is_available(&mut self, track: &Track) -> bool {
        if let Some(&hit) = self.checked.get(&track.file) {
            return hit;
        }

        let path = self.resolve(&track.file);
        let ok = fs::metadata(&path)
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false);

        if !ok {
            tracing::warn!("catalog: track {} unavailable ({})", track.id, path.display());
        }

        self.checked.insert(track.file.clone(), ok);
        ok
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }

    pub fn check_all(&mut self, catalog: &Catalog) -> AvailabilityReport {
        let mut report = AvailabilityReport::default();
        for track in catalog.tracks() {
            if self.is_available(track) {
                report.available.push(track.id);
            } else {
                report.unavailable.push(track.id);
            }
            if !track.has_metadata() {
                report.missing_metadata.push(track.id);
            }
            if !track.has_cover() {
                report.missing_covers.push(track.id);
            }
        }
        report
    }
}
