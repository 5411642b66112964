//! Time ranges in timeline seconds.
//!
//! Project documents store every time as floating-point seconds, so ranges
//! are plain `f64` pairs. Comparisons that decide editing preconditions use
//! [`TIME_EPSILON`] to absorb accumulated rounding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when comparing two times for equality.
pub const TIME_EPSILON: f64 = 1e-9;

/// A time range with inclusive start and exclusive end, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time (inclusive)
    pub start: f64,
    /// Duration of the range
    pub duration: f64,
}

impl TimeRange {
    /// Create a new time range from start and duration.
    #[inline]
    pub fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }

    /// Create a time range from start and end times.
    #[inline]
    pub fn from_start_end(start: f64, end: f64) -> Self {
        Self {
            start,
            duration: end - start,
        }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> f64 {
        self.start + self.duration
    }

    /// Check if a time is within this range.
    #[inline]
    pub fn contains(self, time: f64) -> bool {
        time >= self.start && time < self.end()
    }

    /// Check if a time lies strictly between start and end.
    #[inline]
    pub fn contains_strictly(self, time: f64) -> bool {
        time > self.start + TIME_EPSILON && time < self.end() - TIME_EPSILON
    }

    /// Whether the range has no extent.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.duration <= TIME_EPSILON
    }

    /// Check if two ranges overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end() - TIME_EPSILON && other.start < self.end() - TIME_EPSILON
    }

    /// Compute the intersection of two ranges, if any.
    pub fn intersection(self, other: Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        Some(Self::from_start_end(start, end))
    }

    /// The same range moved by `offset` seconds.
    #[inline]
    pub fn shifted(self, offset: f64) -> Self {
        Self::new(self.start + offset, self.duration)
    }

    /// Empty range starting at zero.
    pub const EMPTY: Self = Self {
        start: 0.0,
        duration: 0.0,
    };
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}s, {:.3}s)", self.start, self.end())
    }
}

/// Approximate equality for two times.
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_EPSILON
}
