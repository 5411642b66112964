//! `project.timeline` persistence.
//!
//! The document is the timeline itself: `{ "tracks": [...], "duration": n }`
//! with camelCase clip keys. Clip and track identities are not stored, so a
//! loaded timeline gets fresh ones. Indices and the cached duration are
//! checked against the track layout on load and repaired.

use doubleclips_core::{DoubleClipsError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::timeline::Timeline;

/// File name of the timeline document inside a project directory.
pub const TIMELINE_FILE_NAME: &str = "project.timeline";

/// File name of the export settings document inside a project directory.
pub const SETTINGS_FILE_NAME: &str = "project.settings";

/// What had to be fixed while loading a document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadRepairs {
    /// Track or clip indices that disagreed with list positions.
    pub indices_fixed: usize,
    /// Stored duration, when it disagreed with the recomputed one.
    pub stale_duration: Option<f64>,
    /// Keyframes dropped or merged to restore the minimum spacing.
    pub keyframes_merged: usize,
}

impl LoadRepairs {
    pub fn is_clean(&self) -> bool {
        self.indices_fixed == 0 && self.stale_duration.is_none() && self.keyframes_merged == 0
    }
}

/// A timeline read from or written to disk.
#[derive(Debug, Clone, Default)]
pub struct TimelineDocument {
    pub timeline: Timeline,
    pub repairs: LoadRepairs,
}

impl TimelineDocument {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            repairs: LoadRepairs::default(),
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.timeline)
            .map_err(|e| DoubleClipsError::Encode(format!("Failed to serialize timeline: {}", e)))
    }

    /// Deserialize from JSON bytes, repairing indices, keyframe spacing and
    /// duration.
    ///
    /// Missing optional clip fields take their defaults; a clip without a
    /// `type` fails the whole document.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let mut timeline: Timeline = serde_json::from_slice(data)
            .map_err(|e| DoubleClipsError::Decode(format!("Invalid timeline: {}", e)))?;
        let repairs = repair(&mut timeline);
        Ok(Self { timeline, repairs })
    }

    /// Save to a file path. The data is written to a sibling temporary file
    /// which then replaces the target.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        let tmp = temp_path(path);
        std::fs::write(&tmp, data)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    /// Load from a file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let doc = Self::from_json(&data)?;
        info!(
            path = %path.display(),
            tracks = doc.timeline.track_count(),
            clips = doc.timeline.clip_count(),
            "loaded timeline"
        );
        Ok(doc)
    }

    /// Load from a file path, falling back to an empty timeline when the
    /// file is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %path.display(), "starting with an empty timeline: {}", e);
                Self::default()
            }
        }
    }

    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }
}

/// Path of the timeline document inside a project directory.
pub fn timeline_path(project_dir: &Path) -> PathBuf {
    project_dir.join(TIMELINE_FILE_NAME)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn repair(timeline: &mut Timeline) -> LoadRepairs {
    let mut repairs = LoadRepairs::default();

    repairs.indices_fixed = timeline.reindex();
    if repairs.indices_fixed > 0 {
        warn!(fixed = repairs.indices_fixed, "repaired track and clip indices on load");
    }

    let spacing = timeline.settings().min_keyframe_spacing;
    repairs.keyframes_merged = timeline
        .tracks_mut()
        .iter_mut()
        .flat_map(|track| track.clips_mut().iter_mut())
        .map(|clip| clip.keyframes.normalize(spacing))
        .sum();
    if repairs.keyframes_merged > 0 {
        warn!(
            merged = repairs.keyframes_merged,
            spacing, "merged keyframes closer than the minimum spacing on load"
        );
    }

    let stored = timeline.duration();
    let computed = timeline.recompute_duration();
    if (stored - computed).abs() > 1e-6 {
        warn!(stored, computed, "stored timeline duration was stale");
        repairs.stale_duration = Some(stored);
    }
    repairs
}
