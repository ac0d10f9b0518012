//! Core data types for the clef package manager.
//!
//! This crate defines the building blocks of a clef installation: package
//! references and version matching, the local package catalog, global
//! settings, and installed-LilyPond lookup.
//!
//! This crate is intentionally free of network I/O.

/// Entry file every package exposes at its directory root.
pub const PACKAGE_ENTRY_FILE: &str = "package.ly";

/// Extensions tried, in order, when an include reference names no file as-is.
pub const FILE_EXTENSIONS: &[&str] = &[".ly", ".ily"];

/// Version shown for packages pinned to a local path (`name@forced`).
pub const FORCED_VERSION: &str = "forced";

pub mod catalog;
pub mod lilypond;
pub mod reference;
pub mod settings;
pub mod version;
