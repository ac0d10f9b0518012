//! Shared utilities for the clef package manager.
//!
//! This crate provides cross-cutting concerns used by all other clef crates:
//! error types, filesystem and home-directory helpers, hashing, and terminal
//! progress indicators.

pub mod errors;
pub mod fs;
pub mod hash;
pub mod progress;
