//! DoubleClips Core - Foundation types for the editing engine
//!
//! This crate provides the leaf types the timeline is built from:
//! - Easing curves (EasingType)
//! - Property snapshots and keyframe animation (VideoProperties, AnimatedProperty)
//! - Time ranges in seconds (TimeRange)
//! - Editing limits and export settings (EditSettings, VideoSettings)

pub mod easing;
pub mod error;
pub mod keyframe;
pub mod properties;
pub mod settings;
pub mod time;

pub use easing::EasingType;
pub use error::{DoubleClipsError, Result};
pub use keyframe::{AnimatedProperty, Keyframe, KeyframeInsert};
pub use properties::VideoProperties;
pub use settings::{limits, EditSettings, VideoSettings};
pub use time::TimeRange;
