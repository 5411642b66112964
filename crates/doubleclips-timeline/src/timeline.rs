//! The timeline: ordered tracks, cached duration and structural operations.

use doubleclips_core::{DoubleClipsError, EditSettings, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clip::{Clip, ClipHandle, ClipId};
use crate::track::{Track, TrackId};

/// An ordered stack of tracks.
///
/// `duration` is a cache of the latest clip end across all tracks and is
/// recomputed after every structural edit. `settings` configures editing
/// limits and is not part of the persisted document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    tracks: Vec<Track>,
    duration: f64,
    #[serde(skip)]
    settings: EditSettings,
}

impl Timeline {
    /// Create an empty timeline with default editing limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty timeline with the given editing limits.
    pub fn with_settings(settings: EditSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &EditSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: EditSettings) {
        self.settings = settings;
    }

    /// Cached total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Tracks in timeline order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Track at position `index`.
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Track with the given identity.
    pub fn track_by_id(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    /// Total number of clips across all tracks.
    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(Track::clip_count).sum()
    }

    /// Iterate every clip, track by track.
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.tracks.iter().flat_map(|t| t.clips().iter())
    }

    // ── Structural edits ────────────────────────────────────────

    /// Append an empty track. Its index is the prior track count.
    pub fn add_track(&mut self) -> TrackId {
        let track = Track::new(self.tracks.len());
        let id = track.id();
        debug!(index = track.timeline_index(), "add track");
        self.tracks.push(track);
        id
    }

    /// Remove a track by identity, then renumber the remaining tracks and
    /// their clips to match list positions.
    pub fn remove_track(&mut self, id: TrackId) -> Option<Track> {
        let index = self.tracks.iter().position(|t| t.id() == id)?;
        let removed = self.tracks.remove(index);
        debug!(index, clips = removed.clip_count(), "remove track");
        self.reindex();
        self.recompute_duration();
        Some(removed)
    }

    /// Drop every track.
    pub fn clear(&mut self) {
        debug!(tracks = self.tracks.len(), "clear timeline");
        self.tracks.clear();
        self.duration = 0.0;
    }

    /// Append a clip to a track. The clip's track index is set to the
    /// track's position.
    pub fn add_clip(&mut self, track: TrackId, clip: Clip) -> Option<ClipHandle> {
        let track = self.tracks.iter_mut().find(|t| t.id() == track)?;
        track.push_clip(clip);
        let handle = track.clips().last().map(Clip::handle);
        debug!(track = track.timeline_index(), "add clip");
        self.recompute_duration();
        handle
    }

    /// Append a clip to the track at position `index`.
    pub fn add_clip_at(&mut self, index: usize, clip: Clip) -> Option<ClipHandle> {
        let id = self.tracks.get(index)?.id();
        self.add_clip(id, clip)
    }

    /// Remove a clip from a specific track by identity.
    pub fn remove_clip(&mut self, track: TrackId, clip: ClipId) -> Option<Clip> {
        let removed = self
            .tracks
            .iter_mut()
            .find(|t| t.id() == track)?
            .remove_clip(clip)?;
        debug!(clip = %clip, "remove clip");
        self.recompute_duration();
        Some(removed)
    }

    /// Delete the clip a handle refers to.
    ///
    /// The handle's track index selects the track; an index outside the
    /// track list is a no-op. A clip no longer on that track is left alone.
    pub fn delete_clip(&mut self, handle: ClipHandle) -> Option<Clip> {
        let track_count = self.tracks.len();
        let Some(track) = self.tracks.get_mut(handle.track_index) else {
            debug!(
                track = handle.track_index,
                tracks = track_count,
                "delete ignored: track index out of range"
            );
            return None;
        };
        let Some(removed) = track.remove_clip(handle.id) else {
            debug!(clip = %handle.id, track = handle.track_index, "delete ignored: clip not on track");
            return None;
        };
        debug!(clip = %handle.id, track = handle.track_index, "delete clip");
        self.recompute_duration();
        Some(removed)
    }

    /// Recompute the cached duration as the latest clip end, or zero.
    pub fn recompute_duration(&mut self) -> f64 {
        self.duration = self.tracks.iter().map(Track::end_time).fold(0.0, f64::max);
        self.duration
    }

    /// Renumber tracks and clips to their list positions. Returns the number
    /// of indices that changed.
    pub(crate) fn reindex(&mut self) -> usize {
        self.tracks
            .iter_mut()
            .enumerate()
            .map(|(i, track)| track.set_timeline_index(i))
            .sum()
    }

    // ── Clip lookup ─────────────────────────────────────────────

    /// Locate a clip by identity. Returns (track position, clip position).
    pub fn find_clip(&self, id: ClipId) -> Option<(usize, usize)> {
        self.tracks.iter().enumerate().find_map(|(ti, track)| {
            track.find_clip(id).map(|(ci, _)| (ti, ci))
        })
    }

    /// Resolve a handle to (track position, clip position).
    ///
    /// The handle's track is searched first; if the clip moved, every other
    /// track is searched. Fails with `StaleReference` if the clip is gone.
    pub fn locate(&self, handle: ClipHandle) -> Result<(usize, usize)> {
        if let Some((ci, _)) = self
            .tracks
            .get(handle.track_index)
            .and_then(|t| t.find_clip(handle.id))
        {
            return Ok((handle.track_index, ci));
        }
        self.find_clip(handle.id).ok_or_else(|| {
            DoubleClipsError::StaleReference(format!(
                "clip {} (track {}) is no longer on the timeline",
                handle.id, handle.track_index
            ))
        })
    }

    /// Resolve a handle, logging and swallowing a stale reference.
    pub(crate) fn resolve(&self, handle: ClipHandle) -> Option<(usize, usize)> {
        match self.locate(handle) {
            Ok(pos) => Some(pos),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    /// The clip a handle refers to.
    pub fn clip(&self, handle: ClipHandle) -> Option<&Clip> {
        let (ti, ci) = self.locate(handle).ok()?;
        self.tracks[ti].clip_at(ci)
    }

    /// Refresh a handle to the clip's current track.
    pub fn refresh(&self, handle: ClipHandle) -> Option<ClipHandle> {
        self.clip(handle).map(Clip::handle)
    }

    /// Mutate a clip's content in place, then recompute the duration.
    ///
    /// The clip's identity and track index cannot be changed this way.
    pub fn update_clip<R>(&mut self, handle: ClipHandle, f: impl FnOnce(&mut Clip) -> R) -> Option<R> {
        let (ti, _) = self.resolve(handle)?;
        let (_, clip) = self.tracks[ti].find_clip_mut(handle.id)?;
        let track_index = clip.track_index;
        let result = f(clip);
        clip.track_index = track_index;
        self.recompute_duration();
        Some(result)
    }

    pub(crate) fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    /// Clone of the timeline for use off the editing thread.
    pub fn snapshot(&self) -> Timeline {
        self.clone()
    }
}
