//! Error types for DoubleClips.

use thiserror::Error;

/// Main error type for timeline editing operations.
#[derive(Error, Debug)]
pub enum DoubleClipsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation's preconditions were not met.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Two bracketing keyframes share the same time.
    #[error("Degenerate keyframe interval at {at}s")]
    DegenerateInterval { at: f64 },

    /// A persisted document is missing a mandatory field or holds an unknown literal.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A value could not be written out as a document.
    #[error("Encode error: {0}")]
    Encode(String),

    /// A clip or track back-reference points at something that no longer exists.
    #[error("Stale reference: {0}")]
    StaleReference(String),

    /// Reported by the media backend when a source cannot be resolved.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Result type alias for DoubleClips operations.
pub type Result<T> = std::result::Result<T, DoubleClipsError>;
