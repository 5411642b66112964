//! Edge snapping for clip moves and trims.

use doubleclips_core::limits;

use crate::clip::{Clip, ClipId};
use crate::timeline::Timeline;

/// A time on the timeline that can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    pub time: f64,
    pub kind: SnapKind,
}

/// Kind of snap point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    /// Start or end of another clip.
    ClipEdge,
    /// The timeline origin.
    Origin,
}

/// Computes snap targets for dragged times.
#[derive(Debug, Clone, Copy)]
pub struct SnappingEngine {
    pub enabled: bool,
    /// Maximum distance (seconds) a time is pulled to a snap point.
    pub threshold: f64,
}

impl SnappingEngine {
    pub fn new(threshold: f64) -> Self {
        Self {
            enabled: true,
            threshold,
        }
    }

    /// Collect clip edges from every track, plus the origin. Edges of the
    /// clip `exclude` are skipped.
    pub fn collect_snap_points(timeline: &Timeline, exclude: Option<ClipId>) -> Vec<SnapPoint> {
        let mut points = vec![SnapPoint {
            time: 0.0,
            kind: SnapKind::Origin,
        }];
        for clip in timeline.clips().filter(|c| Some(c.id()) != exclude) {
            points.push(SnapPoint {
                time: clip.start_time,
                kind: SnapKind::ClipEdge,
            });
            points.push(SnapPoint {
                time: clip.end_time(),
                kind: SnapKind::ClipEdge,
            });
        }
        points
    }

    /// Find the closest snap point within the threshold.
    pub fn find_snap(&self, time: f64, points: &[SnapPoint]) -> Option<SnapPoint> {
        if !self.enabled {
            return None;
        }
        points
            .iter()
            .map(|p| (p, (p.time - time).abs()))
            .filter(|&(_, dist)| dist <= self.threshold)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| *p)
    }

    /// Snap a proposed start for `clip`, trying both its leading and trailing
    /// edges and keeping whichever lands closer.
    pub fn snap_clip(&self, clip: &Clip, new_start: f64, points: &[SnapPoint]) -> f64 {
        let by_start = self
            .find_snap(new_start, points)
            .map(|p| (p.time, (p.time - new_start).abs()));
        let new_end = new_start + clip.duration;
        let by_end = self
            .find_snap(new_end, points)
            .map(|p| (p.time - clip.duration, (p.time - new_end).abs()));

        match (by_start, by_end) {
            (Some(s), Some(e)) if e.1 < s.1 => e.0,
            (Some(s), _) => s.0,
            (None, Some(e)) => e.0,
            (None, None) => new_start,
        }
    }
}

impl Default for SnappingEngine {
    fn default() -> Self {
        Self::new(limits::SNAP_THRESHOLD_SECONDS)
    }
}

/// Snap `time` to the nearest clip edge (or zero) within `threshold`,
/// ignoring the edges of `exclude`.
pub fn snap_time(time: f64, timeline: &Timeline, exclude: Option<ClipId>, threshold: f64) -> f64 {
    let points = SnappingEngine::collect_snap_points(timeline, exclude);
    SnappingEngine::new(threshold)
        .find_snap(time, &points)
        .map_or(time, |p| p.time)
}
