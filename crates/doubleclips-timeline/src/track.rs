//! Track types for the timeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::clip::{Clip, ClipId};

/// Stable identity of a track. Not persisted; regenerated on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A horizontal lane of clips.
///
/// Clips are kept in insertion order, which is not necessarily time order.
/// `timeline_index` mirrors the track's position in its timeline and is only
/// changed by timeline operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(skip)]
    id: TrackId,
    #[serde(default)]
    timeline_index: usize,
    #[serde(default)]
    clips: Vec<Clip>,
}

impl Track {
    /// Create an empty track at the given position.
    pub(crate) fn new(timeline_index: usize) -> Self {
        Self {
            id: TrackId::new(),
            timeline_index,
            clips: Vec::new(),
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    /// Position of this track in its timeline.
    pub fn timeline_index(&self) -> usize {
        self.timeline_index
    }

    /// Clips in insertion order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Find a clip by ID. Returns (index, &Clip).
    pub fn find_clip(&self, id: ClipId) -> Option<(usize, &Clip)> {
        self.clips.iter().enumerate().find(|(_, clip)| clip.id() == id)
    }

    /// Find a clip mutably by ID. Returns (index, &mut Clip).
    pub(crate) fn find_clip_mut(&mut self, id: ClipId) -> Option<(usize, &mut Clip)> {
        self.clips
            .iter_mut()
            .enumerate()
            .find(|(_, clip)| clip.id() == id)
    }

    pub(crate) fn clips_mut(&mut self) -> &mut [Clip] {
        &mut self.clips
    }

    /// Clip at list position `index`.
    pub fn clip_at(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index)
    }

    /// Clips covering timeline time `time`, in list order.
    pub fn clips_at_time(&self, time: f64) -> impl Iterator<Item = &Clip> {
        self.clips
            .iter()
            .filter(move |clip| clip.timeline_range().contains(time))
    }

    /// Latest clip end on this track, or zero when empty.
    pub fn end_time(&self) -> f64 {
        self.clips
            .iter()
            .map(Clip::end_time)
            .fold(0.0, f64::max)
    }

    /// Append a clip, stamping it with this track's index.
    pub(crate) fn push_clip(&mut self, mut clip: Clip) {
        clip.track_index = self.timeline_index;
        self.clips.push(clip);
    }

    /// Insert a clip at list position `index` (clamped to the end).
    pub(crate) fn insert_clip(&mut self, index: usize, mut clip: Clip) {
        clip.track_index = self.timeline_index;
        let index = index.min(self.clips.len());
        self.clips.insert(index, clip);
    }

    /// Remove a clip by ID.
    pub(crate) fn remove_clip(&mut self, id: ClipId) -> Option<Clip> {
        let (index, _) = self.find_clip(id)?;
        Some(self.clips.remove(index))
    }

    /// Move the track to `index`, updating every clip's back-reference.
    /// Returns how many values actually changed.
    pub(crate) fn set_timeline_index(&mut self, index: usize) -> usize {
        let mut changed = usize::from(self.timeline_index != index);
        self.timeline_index = index;
        for clip in &mut self.clips {
            if clip.track_index != index {
                clip.track_index = index;
                changed += 1;
            }
        }
        changed
    }
}
