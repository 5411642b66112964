//! Keyframe animation of clip properties.
//!
//! An [`AnimatedProperty`] holds time-sorted keyframes in clip-local seconds.
//! Interpolation between two keyframes uses the easing curve of the earlier
//! one and blends every [`VideoProperties`] field.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::easing::EasingType;
use crate::error::{DoubleClipsError, Result};
use crate::properties::VideoProperties;
use crate::time::{approx_eq, TimeRange};

// ── Keyframe ────────────────────────────────────────────────────

/// A snapshot of clip properties at a clip-local time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Seconds from clip start, in timeline space.
    pub time: f64,
    /// Property values at this keyframe.
    pub value: VideoProperties,
    /// Easing curve to use when interpolating TO the next keyframe.
    pub easing: EasingType,
}

impl Keyframe {
    /// Create a new keyframe.
    pub fn new(time: f64, value: VideoProperties, easing: EasingType) -> Self {
        Self {
            time,
            value,
            easing,
        }
    }
}

/// Outcome of [`AnimatedProperty::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyframeInsert {
    /// A new keyframe was placed at this index.
    Inserted(usize),
    /// The insert landed within the minimum spacing of the keyframe at this
    /// index, which took the new value and easing.
    Replaced(usize),
}

impl KeyframeInsert {
    /// Index of the affected keyframe.
    pub fn index(self) -> usize {
        match self {
            Self::Inserted(i) | Self::Replaced(i) => i,
        }
    }
}

// ── Animated property ───────────────────────────────────────────

/// Keyframe track for one clip.
///
/// An empty track means the clip is static and evaluates to its base
/// properties. Persisted as `{ "keyframes": [...] }`; loading sorts the
/// keyframes by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "KeyframeList")]
pub struct AnimatedProperty {
    /// Sorted list of keyframes.
    #[serde(default)]
    keyframes: Vec<Keyframe>,
}

/// Persisted keyframes, in whatever order the document holds them.
#[derive(Deserialize)]
struct KeyframeList {
    #[serde(default)]
    keyframes: Vec<Keyframe>,
}

impl From<KeyframeList> for AnimatedProperty {
    fn from(list: KeyframeList) -> Self {
        Self::from_keyframes(list.keyframes)
    }
}

impl AnimatedProperty {
    /// Create an empty (static) track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a track from keyframes in any order. Equal times keep their
    /// relative order.
    pub fn from_keyframes(mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keyframes }
    }

    /// Insert a keyframe, keeping time order.
    ///
    /// A keyframe closer than `min_spacing` to an existing one snaps onto it:
    /// the existing keyframe keeps its time and takes the new value and easing.
    pub fn insert(&mut self, keyframe: Keyframe, min_spacing: f64) -> Result<KeyframeInsert> {
        if !keyframe.time.is_finite() {
            return Err(DoubleClipsError::Validation(format!(
                "keyframe time must be finite, got {}",
                keyframe.time
            )));
        }
        let min_spacing = min_spacing.max(0.0);

        let nearest = self
            .keyframes
            .iter()
            .enumerate()
            .map(|(i, kf)| (i, (kf.time - keyframe.time).abs()))
            .filter(|&(_, dist)| dist < min_spacing || dist == 0.0)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((idx, _)) = nearest {
            let existing = &mut self.keyframes[idx];
            existing.value = keyframe.value;
            existing.easing = keyframe.easing;
            return Ok(KeyframeInsert::Replaced(idx));
        }

        let pos = self.keyframes.partition_point(|kf| kf.time < keyframe.time);
        self.keyframes.insert(pos, keyframe);
        Ok(KeyframeInsert::Inserted(pos))
    }

    /// Remove the keyframe nearest to `time`, if one lies within `tolerance`.
    pub fn remove_near(&mut self, time: f64, tolerance: f64) -> Option<Keyframe> {
        let (idx, _) = self
            .keyframes
            .iter()
            .enumerate()
            .map(|(i, kf)| (i, (kf.time - time).abs()))
            .filter(|&(_, dist)| dist <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        Some(self.keyframes.remove(idx))
    }

    /// Evaluate the track at clip-local time `t`.
    ///
    /// Empty tracks return `base`. Times outside the keyframe span clamp to
    /// the first or last keyframe.
    pub fn evaluate(&self, t: f64, base: &VideoProperties) -> VideoProperties {
        let (first, last) = match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return *base,
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // first.time < t < last.time, so both neighbours exist
        let idx = self.keyframes.partition_point(|kf| kf.time <= t) - 1;
        let a = &self.keyframes[idx];
        let b = &self.keyframes[idx + 1];
        match Self::interpolate(a, b, t) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "keyframe interval collapsed during evaluation");
                b.value
            }
        }
    }

    /// Interpolate between two keyframes at time `t`.
    ///
    /// Fails when both keyframes share a time; insertion through
    /// [`AnimatedProperty::insert`] with a positive spacing prevents this.
    pub fn interpolate(a: &Keyframe, b: &Keyframe, t: f64) -> Result<VideoProperties> {
        let span = b.time - a.time;
        if span <= 0.0 {
            return Err(DoubleClipsError::DegenerateInterval { at: a.time });
        }
        let u = ((t - a.time) / span).clamp(0.0, 1.0);
        Ok(a.value.lerp(&b.value, a.easing.apply(u)))
    }

    /// Partition the track at clip-local time `local`.
    ///
    /// `self` keeps the keyframes at or before `local`; the returned track
    /// holds those at or after it, shifted by `-local`. When no keyframe
    /// sits on the split point, both halves gain one holding the evaluated
    /// value there, so playback across the cut is unchanged.
    pub fn split_at(&mut self, local: f64) -> AnimatedProperty {
        if self.keyframes.is_empty() {
            return Self::new();
        }

        let boundary = self.evaluate(local, &VideoProperties::default());
        let boundary_easing = self
            .keyframes
            .iter()
            .rev()
            .find(|kf| kf.time <= local)
            .unwrap_or(&self.keyframes[0])
            .easing;
        let on_boundary = self.keyframes.iter().any(|kf| approx_eq(kf.time, local));

        let mut tail: Vec<Keyframe> = self
            .keyframes
            .iter()
            .filter(|kf| kf.time >= local || approx_eq(kf.time, local))
            .map(|kf| Keyframe {
                time: (kf.time - local).max(0.0),
                ..*kf
            })
            .collect();
        self.keyframes
            .retain(|kf| kf.time <= local || approx_eq(kf.time, local));

        if !on_boundary {
            self.keyframes
                .push(Keyframe::new(local, boundary, boundary_easing));
            tail.insert(0, Keyframe::new(0.0, boundary, boundary_easing));
        }

        Self { keyframes: tail }
    }

    /// Enforce the spacing invariant on a track built from outside data.
    ///
    /// Keyframes with a non-finite time are dropped. A keyframe closer than
    /// `min_spacing` to the one kept before it merges into that one, which
    /// keeps its time and takes the later value and easing, as
    /// [`AnimatedProperty::insert`] would. Returns how many keyframes went.
    pub fn normalize(&mut self, min_spacing: f64) -> usize {
        let before = self.keyframes.len();
        let mut kept: Vec<Keyframe> = Vec::with_capacity(before);
        for kf in self.keyframes.drain(..).filter(|kf| kf.time.is_finite()) {
            match kept.last_mut() {
                Some(prev) if kf.time - prev.time < min_spacing || kf.time == prev.time => {
                    prev.value = kf.value;
                    prev.easing = kf.easing;
                }
                _ => kept.push(kf),
            }
        }
        self.keyframes = kept;
        before - self.keyframes.len()
    }

    /// Move every keyframe by `offset` seconds.
    pub fn shift(&mut self, offset: f64) {
        for kf in &mut self.keyframes {
            kf.time += offset;
        }
    }

    /// Smallest gap between two consecutive keyframes.
    pub fn min_gap(&self) -> Option<f64> {
        self.keyframes
            .windows(2)
            .map(|w| w[1].time - w[0].time)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Get all keyframes (read-only).
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Number of keyframes.
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the track has no keyframes.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Whether this track is animated (has more than one keyframe).
    pub fn is_animated(&self) -> bool {
        self.keyframes.len() > 1
    }

    /// Get the time range spanned by keyframes.
    pub fn time_range(&self) -> Option<TimeRange> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;
        Some(TimeRange::from_start_end(first.time, last.time))
    }
}

impl fmt::Display for AnimatedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnimatedProperty({} keyframes)", self.keyframes.len())
    }
}

// ── Tests ───────────────────────────────────────────────────────
