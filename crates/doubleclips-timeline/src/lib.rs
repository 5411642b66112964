//! DoubleClips Timeline - Timeline data model and playback composition
//!
//! Implements the editing structure of a DoubleClips project:
//! - Timelines of ordered tracks holding clips
//! - Structural edits, split, edge trims, cloning and snapping
//! - Composition plans for a playback backend, built inline or on a worker
//! - `project.timeline` persistence

pub mod clip;
pub mod composition;
pub mod edit;
pub mod media;
pub mod serialization;
pub mod snapping;
pub mod timeline;
pub mod track;
pub mod worker;

pub use clip::{
    Clip, ClipHandle, ClipId, ClipType, EffectTemplate, TransitionClip, TransitionMode, TrimEdge,
};
pub use composition::{flatten_lane, CompositionPlan, LaneKind, LaneOverlap, Segment, TrackPlan};
pub use edit::{EditCommand, EditOutcome};
pub use media::{CompositionBackend, MediaCatalog, MediaInfo, MediaProbe};
pub use serialization::{LoadRepairs, TimelineDocument, SETTINGS_FILE_NAME, TIMELINE_FILE_NAME};
pub use snapping::{snap_time, SnapKind, SnapPoint, SnappingEngine};
pub use timeline::Timeline;
pub use track::{Track, TrackId};
pub use worker::{BuildCancel, BuildWorker};
