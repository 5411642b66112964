//! Clip edits: split, trim, clone, move and keyframing.
//!
//! Every edit takes a [`ClipHandle`]. A handle whose clip has left the
//! timeline is logged and the edit is skipped without touching anything.
//! [`EditCommand`] wraps the same edits as values so callers can queue
//! them and inspect what changed.

use doubleclips_core::{
    DoubleClipsError, EasingType, Keyframe, KeyframeInsert, Result, VideoProperties,
};
use tracing::{debug, warn};

use crate::clip::{Clip, ClipHandle, TrimEdge};
use crate::snapping::SnappingEngine;
use crate::timeline::Timeline;
use crate::track::{Track, TrackId};

impl Timeline {
    /// Split a clip at global time `at`.
    ///
    /// The trailing part is inserted right after the original in the track
    /// the clip belongs to, or appended there if the original cannot be found
    /// in it. Returns the new clip's handle; `None` if `at` is not strictly
    /// inside the clip or the handle is stale.
    pub fn split_clip(&mut self, handle: ClipHandle, at: f64) -> Option<ClipHandle> {
        let (ti, ci) = self.resolve(handle)?;
        let owner = self.tracks()[ti].clips()[ci].track_index();
        if owner >= self.track_count() {
            warn!(clip = %handle.id, track = owner, "split ignored: clip refers to a missing track");
            return None;
        }

        let tracks = self.tracks_mut();
        let Some(tail) = tracks[ti]
            .find_clip_mut(handle.id)
            .and_then(|(_, clip)| clip.split_off(at))
        else {
            debug!(clip = %handle.id, at, "split ignored: time not inside clip");
            return None;
        };
        let tail_handle = ClipHandle {
            id: tail.id(),
            track_index: owner,
        };

        match tracks[owner].find_clip(handle.id).map(|(i, _)| i) {
            Some(pos) => tracks[owner].insert_clip(pos + 1, tail),
            None => {
                warn!(clip = %handle.id, track = owner, "split: original not on its track, appending");
                tracks[owner].push_clip(tail);
            }
        }
        debug!(clip = %handle.id, at, "split clip");
        self.recompute_duration();
        Some(tail_handle)
    }

    /// Drag one edge of a clip by `delta` seconds, limited by the configured
    /// minimum clip duration. Returns the distance the edge moved.
    pub fn trim_clip(&mut self, handle: ClipHandle, edge: TrimEdge, delta: f64) -> Option<f64> {
        let (ti, _) = self.resolve(handle)?;
        let min_duration = self.settings().min_clip_duration;
        let moved = self.tracks_mut()[ti]
            .find_clip_mut(handle.id)
            .map(|(_, clip)| clip.drag_edge(edge, delta, min_duration))?;
        debug!(clip = %handle.id, ?edge, delta, moved, "trim clip");
        self.recompute_duration();
        Some(moved)
    }

    /// Duplicate a clip and place the copy right after it, starting where
    /// the original ends.
    pub fn clone_clip(&mut self, handle: ClipHandle) -> Option<ClipHandle> {
        let (ti, ci) = self.resolve(handle)?;
        let tracks = self.tracks_mut();
        let source = tracks[ti].clip_at(ci)?;
        let mut copy = source.duplicate();
        copy.start_time = source.end_time();
        let copy_handle = ClipHandle {
            id: copy.id(),
            track_index: tracks[ti].timeline_index(),
        };
        tracks[ti].insert_clip(ci + 1, copy);
        debug!(clip = %handle.id, "clone clip");
        self.recompute_duration();
        Some(copy_handle)
    }

    /// Move a clip to start near `new_start`.
    ///
    /// Either edge snaps to other clips' edges or zero within the configured
    /// threshold, and the result never starts before zero. Returns the
    /// start actually applied.
    pub fn move_clip(&mut self, handle: ClipHandle, new_start: f64) -> Option<f64> {
        let (ti, ci) = self.resolve(handle)?;
        let clip = self.tracks()[ti].clip_at(ci)?;
        let points = SnappingEngine::collect_snap_points(self, Some(handle.id));
        let engine = SnappingEngine::new(self.settings().snap_threshold_seconds);
        let start = engine.snap_clip(clip, new_start, &points).max(0.0);

        self.tracks_mut()[ti]
            .find_clip_mut(handle.id)
            .map(|(_, clip)| clip.start_time = start)?;
        debug!(clip = %handle.id, new_start, start, "move clip");
        self.recompute_duration();
        Some(start)
    }

    /// Add or replace a keyframe at clip-local `time`, honoring the
    /// configured minimum keyframe spacing.
    pub fn add_keyframe(
        &mut self,
        handle: ClipHandle,
        time: f64,
        value: VideoProperties,
        easing: EasingType,
    ) -> Result<KeyframeInsert> {
        let (ti, _) = self.locate(handle)?;
        let spacing = self.settings().min_keyframe_spacing;
        let clip = self.clip_in_track_mut(ti, handle)?;
        let result = clip.add_keyframe(time, value, easing, spacing)?;
        debug!(clip = %handle.id, time, ?result, "add keyframe");
        Ok(result)
    }

    /// Remove the keyframe within the minimum spacing of clip-local `time`.
    pub fn remove_keyframe(&mut self, handle: ClipHandle, time: f64) -> Option<Keyframe> {
        let (ti, _) = self.resolve(handle)?;
        let tolerance = self.settings().min_keyframe_spacing;
        let clip = self.clip_in_track_mut(ti, handle).ok()?;
        clip.keyframes.remove_near(time, tolerance)
    }

    fn clip_in_track_mut(&mut self, ti: usize, handle: ClipHandle) -> Result<&mut Clip> {
        self.tracks_mut()[ti]
            .find_clip_mut(handle.id)
            .map(|(_, clip)| clip)
            .ok_or_else(|| {
                DoubleClipsError::StaleReference(format!(
                    "clip {} vanished from track {}",
                    handle.id, ti
                ))
            })
    }
}

// ── Edit commands ───────────────────────────────────────────────

/// A timeline edit expressed as a value.
#[derive(Debug, Clone)]
pub enum EditCommand {
    AddTrack,
    RemoveTrack {
        track: TrackId,
    },
    AddClip {
        track: TrackId,
        clip: Clip,
    },
    DeleteClip {
        clip: ClipHandle,
    },
    /// Split at a global timeline time.
    SplitClip {
        clip: ClipHandle,
        at: f64,
    },
    TrimClip {
        clip: ClipHandle,
        edge: TrimEdge,
        delta: f64,
    },
    MoveClip {
        clip: ClipHandle,
        start: f64,
    },
    CloneClip {
        clip: ClipHandle,
    },
    /// Commands applied in order. Failed steps are skipped.
    Batch(Vec<EditCommand>),
}

/// What an applied [`EditCommand`] changed.
#[derive(Debug, Clone)]
pub enum EditOutcome {
    TrackAdded(TrackId),
    TrackRemoved(Track),
    ClipAdded(ClipHandle),
    ClipRemoved(Clip),
    ClipSplit { head: ClipHandle, tail: ClipHandle },
    ClipTrimmed { clip: ClipHandle, moved: f64 },
    ClipMoved { clip: ClipHandle, start: f64 },
    ClipCloned(ClipHandle),
    Batch(Vec<EditOutcome>),
}

impl EditCommand {
    /// Apply this command to a timeline. `None` means nothing changed.
    pub fn apply(self, timeline: &mut Timeline) -> Option<EditOutcome> {
        match self {
            Self::AddTrack => Some(EditOutcome::TrackAdded(timeline.add_track())),
            Self::RemoveTrack { track } => timeline.remove_track(track).map(EditOutcome::TrackRemoved),
            Self::AddClip { track, clip } => timeline.add_clip(track, clip).map(EditOutcome::ClipAdded),
            Self::DeleteClip { clip } => timeline.delete_clip(clip).map(EditOutcome::ClipRemoved),
            Self::SplitClip { clip, at } => {
                let tail = timeline.split_clip(clip, at)?;
                let head = timeline.refresh(clip).unwrap_or(clip);
                Some(EditOutcome::ClipSplit { head, tail })
            }
            Self::TrimClip { clip, edge, delta } => timeline
                .trim_clip(clip, edge, delta)
                .map(|moved| EditOutcome::ClipTrimmed { clip, moved }),
            Self::MoveClip { clip, start } => timeline
                .move_clip(clip, start)
                .map(|start| EditOutcome::ClipMoved { clip, start }),
            Self::CloneClip { clip } => timeline.clone_clip(clip).map(EditOutcome::ClipCloned),
            Self::Batch(commands) => {
                let outcomes: Vec<_> = commands
                    .into_iter()
                    .filter_map(|cmd| cmd.apply(timeline))
                    .collect();
                (!outcomes.is_empty()).then_some(EditOutcome::Batch(outcomes))
            }
        }
    }
}
