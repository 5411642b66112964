//! Integration test crate for DoubleClips.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the core and timeline crates to verify they work together.

#[cfg(test)]
mod timeline;


#[cfg(test)]
mod persistence;
