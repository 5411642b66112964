//! Seams to the platform media stack.
//!
//! The timeline never decodes media itself. A [`MediaProbe`] answers
//! questions about a source when clips are created, and a
//! [`CompositionBackend`] receives the segments of a built plan.

use doubleclips_core::Result;
use std::collections::HashMap;

use crate::composition::{LaneKind, Segment};

/// Read-only facts about media sources, keyed by source name.
pub trait MediaProbe {
    /// Length of the source in seconds, or `None` if it cannot be opened.
    fn duration(&self, source: &str) -> Option<f64>;

    /// Whether the source carries an audio stream.
    fn has_audio(&self, source: &str) -> bool;

    /// Whether the source carries a video stream.
    fn has_video(&self, source: &str) -> bool {
        self.duration(source).is_some()
    }

    /// Pixel dimensions, when known.
    fn dimensions(&self, _source: &str) -> Option<(u32, u32)> {
        None
    }
}

/// Receives the segments of a composition plan, track by track.
pub trait CompositionBackend {
    /// Called once per track before its segments, in ascending track order.
    fn begin_track(&mut self, _timeline_index: usize) {}

    /// Place one segment. A source the backend cannot open should be
    /// reported as `SourceUnavailable`.
    fn insert_segment(&mut self, lane: LaneKind, segment: &Segment) -> Result<()>;
}

/// Facts about one media source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaInfo {
    pub duration: f64,
    pub has_audio: bool,
    pub has_video: bool,
    pub width: u32,
    pub height: u32,
}

impl MediaInfo {
    pub fn video(duration: f64, width: u32, height: u32, has_audio: bool) -> Self {
        Self {
            duration,
            has_audio,
            has_video: true,
            width,
            height,
        }
    }

    pub fn audio(duration: f64) -> Self {
        Self {
            duration,
            has_audio: true,
            has_video: false,
            width: 0,
            height: 0,
        }
    }
}

/// In-memory probe over a fixed set of sources.
#[derive(Debug, Clone, Default)]
pub struct MediaCatalog {
    sources: HashMap<String, MediaInfo>,
}

impl MediaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a source.
    pub fn insert(&mut self, source: impl Into<String>, info: MediaInfo) {
        self.sources.insert(source.into(), info);
    }

    pub fn get(&self, source: &str) -> Option<&MediaInfo> {
        self.sources.get(source)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.sources.contains_key(source)
    }
}

impl MediaProbe for MediaCatalog {
    fn duration(&self, source: &str) -> Option<f64> {
        self.get(source).map(|info| info.duration)
    }

    fn has_audio(&self, source: &str) -> bool {
        self.get(source).is_some_and(|info| info.has_audio)
    }

    fn has_video(&self, source: &str) -> bool {
        self.get(source).is_some_and(|info| info.has_video)
    }

    fn dimensions(&self, source: &str) -> Option<(u32, u32)> {
        self.get(source)
            .filter(|info| info.has_video)
            .map(|info| (info.width, info.height))
    }
}
