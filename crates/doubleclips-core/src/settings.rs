//! Editing and export settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DoubleClipsError, Result};

/// Default limits for interactive editing.
pub mod limits {
    /// Shortest duration a trim can leave a clip with (seconds).
    pub const MIN_CLIP_DURATION: f64 = 0.5;

    /// Keyframes closer than this snap onto each other (seconds).
    pub const MIN_KEYFRAME_SPACING: f64 = 0.01;

    /// Clip edges within this distance snap together (seconds).
    pub const SNAP_THRESHOLD_SECONDS: f64 = 0.1;

    /// Rotation within this many degrees of a snap angle snaps to it.
    pub const ROTATE_SNAP_THRESHOLD_DEGREES: f64 = 3.0;

    /// Rotation snap angle step (degrees).
    pub const ROTATE_SNAP_DEGREES: f64 = 90.0;
}

/// Tunables of the editing core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditSettings {
    pub min_clip_duration: f64,
    pub min_keyframe_spacing: f64,
    pub snap_threshold_seconds: f64,
    pub rotate_snap_threshold_degrees: f64,
    pub rotate_snap_degrees: f64,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            min_clip_duration: limits::MIN_CLIP_DURATION,
            min_keyframe_spacing: limits::MIN_KEYFRAME_SPACING,
            snap_threshold_seconds: limits::SNAP_THRESHOLD_SECONDS,
            rotate_snap_threshold_degrees: limits::ROTATE_SNAP_THRESHOLD_DEGREES,
            rotate_snap_degrees: limits::ROTATE_SNAP_DEGREES,
        }
    }
}

impl EditSettings {
    /// Read settings from a JSON file. Missing keys take their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let settings: Self = serde_json::from_slice(&data)
            .map_err(|e| DoubleClipsError::Decode(format!("Invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject negative or non-finite limits.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("minClipDuration", self.min_clip_duration),
            ("minKeyframeSpacing", self.min_keyframe_spacing),
            ("snapThresholdSeconds", self.snap_threshold_seconds),
            ("rotateSnapThresholdDegrees", self.rotate_snap_threshold_degrees),
            ("rotateSnapDegrees", self.rotate_snap_degrees),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(DoubleClipsError::Validation(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Export settings, persisted as `project.settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSettings {
    pub video_width: u32,
    pub video_height: u32,
    pub frame_rate: u32,
    pub crf: u32,
    pub clip_cap: u32,
    pub preset: String,
    pub tune: String,
    pub is_stretch_to_full: bool,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            video_width: 1080,
            video_height: 1920,
            frame_rate: 30,
            crf: 23,
            clip_cap: 10,
            preset: "medium".to_string(),
            tune: "zerolatency".to_string(),
            is_stretch_to_full: false,
        }
    }
}

impl VideoSettings {
    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            DoubleClipsError::Encode(format!("Failed to serialize video settings: {}", e))
        })
    }

    /// Deserialize from JSON bytes.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
            .map_err(|e| DoubleClipsError::Decode(format!("Invalid video settings: {}", e)))
    }
}
