//! Playback composition plan.
//!
//! Turns a timeline into per-track video and audio lanes of segments, each
//! mapping a window of a source onto a window of timeline time. The plan is
//! a pure value; a [`CompositionBackend`] realizes it on a media stack.

use doubleclips_core::{DoubleClipsError, TimeRange};
use serde::Serialize;
use tracing::{debug, warn};

use crate::clip::{Clip, ClipId};
use crate::media::CompositionBackend;
use crate::timeline::Timeline;
use crate::track::Track;
use crate::worker::BuildCancel;

/// Which lane of a track a segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneKind {
    Video,
    Audio,
}

/// One source window placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub clip_id: ClipId,
    pub source_id: String,
    pub source_trim_range: TimeRange,
    pub target_time_range: TimeRange,
}

impl Segment {
    /// Segment playing `[start_clip_trim, +duration)` of the clip's source at
    /// `[start_time, +duration)` on the timeline.
    pub fn from_clip(clip: &Clip) -> Self {
        Self {
            clip_id: clip.id(),
            source_id: clip.clip_name.clone(),
            source_trim_range: clip.source_range(),
            target_time_range: clip.timeline_range(),
        }
    }

    /// The sub-segment covering `[start, end)` of timeline time, with the
    /// source window cut by the same offsets.
    fn window(&self, start: f64, end: f64) -> Self {
        let offset = start - self.target_time_range.start;
        Self {
            clip_id: self.clip_id,
            source_id: self.source_id.clone(),
            source_trim_range: TimeRange::new(self.source_trim_range.start + offset, end - start),
            target_time_range: TimeRange::from_start_end(start, end),
        }
    }

    /// The parts of this segment outside `cut`: none, one, or two pieces.
    pub fn subtract(&self, cut: TimeRange) -> Vec<Segment> {
        let target = self.target_time_range;
        if !target.overlaps(cut) {
            return vec![self.clone()];
        }
        let mut pieces = Vec::with_capacity(2);
        if cut.start > target.start {
            pieces.push(self.window(target.start, cut.start));
        }
        if cut.end() < target.end() {
            pieces.push(self.window(cut.end(), target.end()));
        }
        pieces.retain(|p| !p.target_time_range.is_empty());
        pieces
    }
}

/// The two lanes built from one track.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPlan {
    pub timeline_index: usize,
    pub video_segments: Vec<Segment>,
    pub audio_segments: Vec<Segment>,
}

impl TrackPlan {
    pub fn lane(&self, kind: LaneKind) -> &[Segment] {
        match kind {
            LaneKind::Video => &self.video_segments,
            LaneKind::Audio => &self.audio_segments,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.video_segments.is_empty() && self.audio_segments.is_empty()
    }
}

/// Two segments of one lane covering the same timeline time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneOverlap {
    pub timeline_index: usize,
    pub lane: LaneKind,
    pub first: ClipId,
    pub second: ClipId,
    pub range: TimeRange,
}

/// Lanes for every track, in ascending track order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompositionPlan {
    pub tracks: Vec<TrackPlan>,
    pub duration: f64,
}

impl CompositionPlan {
    /// Build the plan for a timeline.
    ///
    /// Tracks are visited by ascending `timeline_index`. Video, image and
    /// audio clips are considered; text, effect and transition clips are
    /// skipped. Segments keep track list order and may overlap; overlaps are
    /// logged and left for [`CompositionPlan::flattened`] or the backend.
    /// Clips are not validated; an empty duration still yields segments.
    pub fn build(timeline: &Timeline) -> Self {
        let mut plan = Self {
            tracks: Vec::with_capacity(timeline.track_count()),
            duration: timeline.duration(),
        };
        for track in tracks_in_order(timeline) {
            plan.tracks.push(build_track(track));
        }
        plan.warn_overlaps();
        plan
    }

    /// Like [`CompositionPlan::build`], checking `cancel` between tracks.
    /// Returns `None` once cancelled.
    pub fn build_cancellable(timeline: &Timeline, cancel: &BuildCancel) -> Option<Self> {
        let mut plan = Self {
            tracks: Vec::with_capacity(timeline.track_count()),
            duration: timeline.duration(),
        };
        for track in tracks_in_order(timeline) {
            if cancel.is_cancelled() {
                debug!(built = plan.tracks.len(), "composition build cancelled");
                return None;
            }
            plan.tracks.push(build_track(track));
        }
        if cancel.is_cancelled() {
            return None;
        }
        plan.warn_overlaps();
        Some(plan)
    }

    /// Total number of segments across all lanes.
    pub fn segment_count(&self) -> usize {
        self.tracks
            .iter()
            .map(|t| t.video_segments.len() + t.audio_segments.len())
            .sum()
    }

    /// Every pair of segments sharing timeline time within one lane.
    pub fn overlaps(&self) -> Vec<LaneOverlap> {
        let mut found = Vec::new();
        for track in &self.tracks {
            for lane in [LaneKind::Video, LaneKind::Audio] {
                lane_overlaps(track.timeline_index, lane, track.lane(lane), &mut found);
            }
        }
        found
    }

    /// Copy of the plan with overlaps resolved in every lane: a segment later
    /// in track order cuts away the parts of earlier ones it covers.
    pub fn flattened(&self) -> Self {
        Self {
            tracks: self
                .tracks
                .iter()
                .map(|t| TrackPlan {
                    timeline_index: t.timeline_index,
                    video_segments: flatten_lane(&t.video_segments),
                    audio_segments: flatten_lane(&t.audio_segments),
                })
                .collect(),
            duration: self.duration,
        }
    }

    /// Hand every segment to a backend. Failing segments are skipped and
    /// their errors returned; the rest are still inserted.
    pub fn realize(&self, backend: &mut dyn CompositionBackend) -> Vec<DoubleClipsError> {
        let mut errors = Vec::new();
        for track in &self.tracks {
            backend.begin_track(track.timeline_index);
            for lane in [LaneKind::Video, LaneKind::Audio] {
                for segment in track.lane(lane) {
                    if let Err(e) = backend.insert_segment(lane, segment) {
                        warn!(
                            track = track.timeline_index,
                            ?lane,
                            source = %segment.source_id,
                            "segment skipped: {}",
                            e
                        );
                        errors.push(e);
                    }
                }
            }
        }
        errors
    }

    fn warn_overlaps(&self) {
        for overlap in self.overlaps() {
            warn!(
                track = overlap.timeline_index,
                lane = ?overlap.lane,
                range = %overlap.range,
                "overlapping segments in lane"
            );
        }
    }
}

fn tracks_in_order(timeline: &Timeline) -> Vec<&Track> {
    let mut tracks: Vec<&Track> = timeline.tracks().iter().collect();
    tracks.sort_by_key(|t| t.timeline_index());
    tracks
}

fn build_track(track: &Track) -> TrackPlan {
    let mut plan = TrackPlan {
        timeline_index: track.timeline_index(),
        ..TrackPlan::default()
    };
    for clip in track.clips().iter().filter(|c| c.is_renderable()) {
        if clip.duration <= 0.0 || !clip.duration.is_finite() {
            warn!(
                clip = %clip.id(),
                duration = clip.duration,
                "clip with empty duration in composition"
            );
        }
        if clip.emits_video() {
            plan.video_segments.push(Segment::from_clip(clip));
        }
        if clip.emits_audio() {
            plan.audio_segments.push(Segment::from_clip(clip));
        }
    }
    plan
}

fn lane_overlaps(
    timeline_index: usize,
    lane: LaneKind,
    segments: &[Segment],
    found: &mut Vec<LaneOverlap>,
) {
    let mut sorted: Vec<&Segment> = segments.iter().collect();
    sorted.sort_by(|a, b| {
        a.target_time_range
            .start
            .total_cmp(&b.target_time_range.start)
    });

    // Earlier segments whose range may still reach later starts.
    let mut active: Vec<&Segment> = Vec::new();
    for segment in sorted {
        let start = segment.target_time_range.start;
        active.retain(|prev| prev.target_time_range.end() > start);
        for prev in &active {
            if let Some(range) = prev
                .target_time_range
                .intersection(segment.target_time_range)
            {
                found.push(LaneOverlap {
                    timeline_index,
                    lane,
                    first: prev.clip_id,
                    second: segment.clip_id,
                    range,
                });
            }
        }
        active.push(segment);
    }
}

/// Resolve overlaps in one lane. Segments are applied in order and each cuts
/// the parts of earlier segments it covers, splitting one in two if it lands
/// in the middle. The result is sorted by timeline start.
pub fn flatten_lane(segments: &[Segment]) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::with_capacity(segments.len());
    for segment in segments {
        let cut = segment.target_time_range;
        out = out
            .into_iter()
            .flat_map(|existing| existing.subtract(cut))
            .collect();
        out.push(segment.clone());
    }
    out.sort_by(|a, b| {
        a.target_time_range
            .start
            .total_cmp(&b.target_time_range.start)
    });
    out
}
