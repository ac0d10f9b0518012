//! Typed parsing of package references.
//!
//! A package reference is the literal argument of a `\require` directive:
//! `name`, `name@0.2`, `name@>=0.1`, `name@~>0.1.3`, or `name:path` to pin
//! the package to a local directory. The literal text (the *clause*) is kept
//! around, since the lookup tables handed to the wrapper generator are keyed
//! by it.

use std::fmt;
use std::path::PathBuf;

use clef_util::errors::ClefError;

use crate::version::VersionSpecifier;

/// Require argument that cancels itself: scanned, then skipped.
pub const NULL_SENTINEL: &str = "null";

/// A parsed package reference.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageRef {
    /// The reference text as recorded for lookup tables. For the `name:path`
    /// form this is the bare name; otherwise it is the text as written.
    pub clause: String,
    pub name: String,
    pub specifier: VersionSpecifier,
    /// Local path pin from the `name:path` form.
    pub forced_path: Option<PathBuf>,
}

impl PackageRef {
    /// Parse a require argument. Fails only on an empty package name.
    pub fn parse(text: &str) -> Result<Self, ClefError> {
        let text = text.trim();
        if text.is_empty() || text.starts_with(':') {
            return Err(ClefError::MalformedReference {
                reference: text.to_string(),
            });
        }
        if let Some((name, path)) = split_qualified(text) {
            return Ok(Self {
                clause: name.to_string(),
                name: name.to_string(),
                specifier: VersionSpecifier::Any,
                forced_path: Some(PathBuf::from(path)),
            });
        }
        // The name runs up to the first `@`, `>` or `~`; a separating `@` is
        // optional, so `b~>0.1` and `b@~>0.1` are the same requirement.
        let split = text.find(['@', '>', '~']);
        let (name, spec) = match split {
            Some(at) => {
                let spec = &text[at..];
                (&text[..at], spec.strip_prefix('@').unwrap_or(spec))
            }
            None => (text, ""),
        };
        if name.is_empty() {
            return Err(ClefError::MalformedReference {
                reference: text.to_string(),
            });
        }
        Ok(Self {
            clause: text.to_string(),
            name: name.to_string(),
            specifier: VersionSpecifier::parse(spec),
            forced_path: None,
        })
    }
}

/// Split a package-qualified reference of the form `name:rest`.
///
/// Used for the `name:path` pin form of requires and for package-relative
/// include references. The name part must look like a package name, so
/// paths with colons elsewhere are not misread.
pub fn split_qualified(text: &str) -> Option<(&str, &str)> {
    let (name, rest) = text.split_once(':')?;
    if name.is_empty() || rest.is_empty() {
        return None;
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return None;
    }
    Some((name, rest))
}

/// A `name@version` id, the currency of the package store and of resolution
/// output. Bare names are versionless installs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageId {
    pub name: String,
    pub version: Option<String>,
}

impl PackageId {
    pub fn new(name: &str, version: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            version: version.map(str::to_string),
        }
    }

    /// Split a store id into name and version.
    pub fn parse(id: &str) -> Self {
        match id.split_once('@') {
            Some((name, version)) if !version.is_empty() => Self::new(name, Some(version)),
            Some((name, _)) => Self::new(name, None),
            None => Self::new(id, None),
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => f.write_str(&self.name),
        }
    }
}
