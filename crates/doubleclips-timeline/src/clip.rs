//! Clip types for the timeline.

use doubleclips_core::{
    AnimatedProperty, DoubleClipsError, EasingType, Keyframe, KeyframeInsert, Result, TimeRange,
    VideoProperties,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::media::MediaProbe;

/// Stable identity of a clip. Not persisted; regenerated on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(Uuid);

impl ClipId {
    /// Generate a fresh identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What a clip places on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClipType {
    Video,
    Audio,
    Image,
    Text,
    Transition,
    Effect,
}

impl ClipType {
    /// Whether the clip references decodable media.
    pub fn is_media(self) -> bool {
        matches!(self, Self::Video | Self::Audio | Self::Image)
    }
}

/// Named effect reference. The parameter bag is not modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectTemplate {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub style: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub offset: f64,
}

impl EffectTemplate {
    pub fn new(style: impl Into<String>, duration: f64, offset: f64) -> Self {
        Self {
            kind: None,
            style: style.into(),
            duration,
            offset,
        }
    }
}

/// How the outgoing and incoming clips overlap during a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionMode {
    /// The transition finishes as the outgoing clip ends.
    EndFirst,
    /// The transition is centered on the cut.
    Overlap,
    /// The transition starts as the incoming clip begins.
    BeginSecond,
}

/// Transition attached to a clip's trailing edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionClip {
    pub track_index: usize,
    pub start_time: f64,
    pub duration: f64,
    pub effect: EffectTemplate,
    pub mode: TransitionMode,
}

impl TransitionClip {
    /// Timeline range the transition occupies for a clip ending at `clip_end`.
    pub fn window(&self, clip_end: f64) -> TimeRange {
        let d = self.duration.max(0.0);
        match self.mode {
            TransitionMode::EndFirst => TimeRange::new(clip_end - d, d),
            TransitionMode::Overlap => TimeRange::new(clip_end - d / 2.0, d),
            TransitionMode::BeginSecond => TimeRange::new(clip_end, d),
        }
    }
}

/// Which edge of a clip is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimEdge {
    Left,
    Right,
}

/// Copyable reference to a placed clip: identity plus the track index it was
/// last known to live on. May go stale after structural edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipHandle {
    pub id: ClipId,
    pub track_index: usize,
}

/// A clip on the timeline.
///
/// Times are seconds. `start_time` and `duration` are in timeline space;
/// `start_clip_trim`, `end_clip_trim` and `original_duration` are in source
/// space. `track_index` is a back-reference maintained by the timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    #[serde(skip)]
    id: ClipId,
    #[serde(rename = "type")]
    pub clip_type: ClipType,
    #[serde(default)]
    pub clip_name: String,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub start_clip_trim: f64,
    #[serde(default)]
    pub end_clip_trim: f64,
    #[serde(default)]
    pub original_duration: f64,
    #[serde(default)]
    pub(crate) track_index: usize,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub video_properties: VideoProperties,
    #[serde(default)]
    pub keyframes: AnimatedProperty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<EffectTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_transition: Option<TransitionClip>,
    #[serde(default)]
    pub end_transition_enabled: bool,
    #[serde(default, rename = "isClipHasAudio")]
    pub has_audio: bool,
    #[serde(default)]
    pub is_mute: bool,
    #[serde(default)]
    pub is_locked_for_template: bool,
    #[serde(default)]
    pub is_reverse: bool,
}

impl Clip {
    /// Create a clip covering its whole source: `original_duration` equals
    /// `duration` and both trims start at zero.
    pub fn new(clip_type: ClipType, name: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self {
            id: ClipId::new(),
            clip_type,
            clip_name: name.into(),
            start_time,
            duration,
            start_clip_trim: 0.0,
            end_clip_trim: 0.0,
            original_duration: duration,
            track_index: 0,
            width: 0,
            height: 0,
            video_properties: VideoProperties::default(),
            keyframes: AnimatedProperty::new(),
            effect: None,
            text_content: None,
            font_size: None,
            end_transition: None,
            end_transition_enabled: false,
            has_audio: false,
            is_mute: false,
            is_locked_for_template: false,
            is_reverse: false,
        }
    }

    /// Create a clip for a media source, asking the backend for its length,
    /// audio presence and dimensions.
    pub fn from_media(
        clip_type: ClipType,
        name: impl Into<String>,
        start_time: f64,
        probe: &dyn MediaProbe,
    ) -> Result<Self> {
        let name = name.into();
        let duration = probe
            .duration(&name)
            .filter(|d| d.is_finite() && *d > 0.0)
            .ok_or_else(|| DoubleClipsError::SourceUnavailable(name.clone()))?;
        let mut clip = Self::new(clip_type, name, start_time, duration);
        clip.has_audio = probe.has_audio(&clip.clip_name);
        if let Some((width, height)) = probe.dimensions(&clip.clip_name) {
            clip.width = width;
            clip.height = height;
        }
        Ok(clip)
    }

    /// Builder-style flag for clips carrying an audio stream.
    pub fn with_audio(mut self, has_audio: bool) -> Self {
        self.has_audio = has_audio;
        self
    }

    /// Builder-style source trim and length.
    pub fn with_source(mut self, start_clip_trim: f64, original_duration: f64) -> Self {
        self.start_clip_trim = start_clip_trim;
        self.original_duration = original_duration;
        self.end_clip_trim = (original_duration - self.duration - start_clip_trim).max(0.0);
        self
    }

    pub fn id(&self) -> ClipId {
        self.id
    }

    /// Index of the owning track, as last set by the timeline.
    pub fn track_index(&self) -> usize {
        self.track_index
    }

    pub fn handle(&self) -> ClipHandle {
        ClipHandle {
            id: self.id,
            track_index: self.track_index,
        }
    }

    /// Timeline end time (exclusive).
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Placement on the timeline.
    pub fn timeline_range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.duration)
    }

    /// Portion of the source that plays.
    pub fn source_range(&self) -> TimeRange {
        TimeRange::new(self.start_clip_trim, self.duration)
    }

    /// Whether the clip plays source time beyond its known source length.
    pub fn exceeds_source(&self) -> bool {
        self.original_duration > 0.0
            && self.start_clip_trim + self.duration > self.original_duration + 1e-9
    }

    /// Evaluated transform at clip-local time `local`.
    pub fn properties_at(&self, local: f64) -> VideoProperties {
        self.keyframes.evaluate(local, &self.video_properties)
    }

    /// Insert a keyframe at clip-local `time`, enforcing `min_spacing`.
    pub fn add_keyframe(
        &mut self,
        time: f64,
        value: VideoProperties,
        easing: EasingType,
        min_spacing: f64,
    ) -> Result<KeyframeInsert> {
        self.keyframes
            .insert(Keyframe::new(time, value, easing), min_spacing)
    }

    /// Copy of this clip with a fresh identity.
    pub fn duplicate(&self) -> Self {
        Self {
            id: ClipId::new(),
            ..self.clone()
        }
    }

    /// Cut this clip at global time `at`, returning the trailing part.
    ///
    /// Times on or outside the clip's edges are rejected without mutation.
    /// The trailing clip starts at `at` with its source trim advanced by the
    /// local split offset; this clip keeps its start and trims and is
    /// shortened. Keyframes are partitioned between the two halves.
    pub fn split_off(&mut self, at: f64) -> Option<Clip> {
        if !self.timeline_range().contains_strictly(at) {
            return None;
        }
        let local = at - self.start_time;

        let mut tail = self.duplicate();
        tail.start_time = at;
        tail.duration = self.duration - local;
        tail.start_clip_trim = self.start_clip_trim + local;
        tail.keyframes = self.keyframes.split_at(local);
        tail.end_transition = None;
        tail.end_transition_enabled = false;

        // The cut moves this clip's trailing edge, so its transition goes with the tail.
        if let Some(transition) = self.end_transition.take() {
            tail.end_transition = Some(transition);
            tail.end_transition_enabled = self.end_transition_enabled;
            self.end_transition_enabled = false;
        }

        self.duration = local;
        Some(tail)
    }

    /// Drag the left edge by `delta` seconds (positive = right).
    ///
    /// Duration never drops below `min_duration` (or the current duration if
    /// already shorter) and the start trim never goes negative. Returns the
    /// distance the edge actually moved.
    pub fn drag_left_edge(&mut self, delta: f64, min_duration: f64) -> f64 {
        if delta == 0.0 || !delta.is_finite() {
            return 0.0;
        }
        let floor = min_duration.min(self.duration);
        let new_duration = (self.duration - delta).max(floor);
        let actual = self.duration - new_duration;
        self.duration = new_duration;
        self.start_time += actual;
        self.start_clip_trim = (self.start_clip_trim + actual).max(0.0);
        actual
    }

    /// Drag the right edge by `delta` seconds (positive = right).
    ///
    /// Recomputes `end_clip_trim` from the source length. Returns the
    /// distance the edge actually moved.
    pub fn drag_right_edge(&mut self, delta: f64, min_duration: f64) -> f64 {
        if delta == 0.0 || !delta.is_finite() {
            return 0.0;
        }
        let floor = min_duration.min(self.duration);
        let new_duration = (self.duration + delta).max(floor);
        let actual = new_duration - self.duration;
        self.duration = new_duration;
        self.end_clip_trim = (self.original_duration - new_duration - self.start_clip_trim).max(0.0);
        actual
    }

    /// Drag either edge.
    pub fn drag_edge(&mut self, edge: TrimEdge, delta: f64, min_duration: f64) -> f64 {
        match edge {
            TrimEdge::Left => self.drag_left_edge(delta, min_duration),
            TrimEdge::Right => self.drag_right_edge(delta, min_duration),
        }
    }

    /// Whether the composition builder emits anything for this clip type.
    pub fn is_renderable(&self) -> bool {
        self.clip_type.is_media()
    }

    /// Whether the clip contributes to its track's video lane.
    pub fn emits_video(&self) -> bool {
        self.clip_type == ClipType::Video
    }

    /// Whether the clip contributes to its track's audio lane.
    pub fn emits_audio(&self) -> bool {
        matches!(self.clip_type, ClipType::Video | ClipType::Audio) && self.has_audio && !self.is_mute
    }
}
