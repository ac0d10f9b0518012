//! Package version parsing, comparison, and requirement matching.
//!
//! Package versions are looser than semver: most are two- or three-segment
//! numeric strings (`0.2`, `1.4.2`), but opaque tags such as `dev` or `abc`
//! are legal and compare lexically. Requirements support three forms:
//! - exact (`0.2`, or an opaque tag),
//! - `>=X` (at least),
//! - `~>X` (pessimistic: at least `X`, keeping the leading segments of `X`
//!   fixed).

use std::cmp::Ordering;
use std::fmt;

/// A package version: dotted numeric segments when the string parses as
/// such, otherwise an opaque tag compared lexically.
#[derive(Debug, Clone)]
pub struct Version {
    pub original: String,
    segments: Option<Vec<u64>>,
}

impl Version {
    pub fn parse(version: &str) -> Self {
        Self {
            original: version.to_string(),
            segments: parse_segments(version),
        }
    }

    /// Whether the version is plain dotted-numeric (`1.2.3`, not `dev`).
    pub fn is_numeric(&self) -> bool {
        self.segments.is_some()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.segments, &other.segments) {
            (Some(a), Some(b)) => compare_numeric(a, b),
            _ => self.original.cmp(&other.original),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two version strings by the package ordering rules.
pub fn compare(a: &str, b: &str) -> Ordering {
    Version::parse(a).cmp(&Version::parse(b))
}

fn parse_segments(version: &str) -> Option<Vec<u64>> {
    if version.is_empty() {
        return None;
    }
    let mut segments = Vec::new();
    for token in version.split('.') {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        segments.push(token.parse().ok()?);
    }
    Some(segments)
}

/// Missing trailing segments count as zero, so `1.2 == 1.2.0`.
fn compare_numeric(a: &[u64], b: &[u64]) -> Ordering {
    let max_len = a.len().max(b.len());
    for i in 0..max_len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        let ord = x.cmp(&y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// A parsed version requirement from a package reference.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionSpecifier {
    /// No constraint: every installed version qualifies.
    Any,
    /// Semantic equality when both sides are numeric, literal otherwise.
    Exact(String),
    /// `>=X`: any numeric version at or above `X`.
    AtLeast(Version),
    /// `~>X`: at least `X`, below the next increment of `X`'s second-to-last
    /// segment (`~>0.1.3` admits `0.1.x` for `x >= 3`).
    Pessimistic(Version),
}

impl VersionSpecifier {
    /// Parse the text after `@` in a package reference.
    ///
    /// Never fails: an operator followed by a non-numeric operand degrades to
    /// an exact match on the operand, and any other unrecognized text is an
    /// exact (opaque) match.
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        if spec.is_empty() {
            return Self::Any;
        }
        if let Some(rest) = spec.strip_prefix(">=") {
            let version = Version::parse(rest.trim());
            return if version.is_numeric() {
                Self::AtLeast(version)
            } else {
                Self::Exact(rest.trim().to_string())
            };
        }
        if let Some(rest) = spec.strip_prefix("~>") {
            let version = Version::parse(rest.trim());
            return if version.is_numeric() {
                Self::Pessimistic(version)
            } else {
                Self::Exact(rest.trim().to_string())
            };
        }
        Self::Exact(spec.to_string())
    }

    /// Check whether an installed version satisfies this requirement.
    ///
    /// `None` stands for a versionless install, which only the unconstrained
    /// requirement accepts.
    pub fn matches(&self, candidate: Option<&str>) -> bool {
        let candidate = match candidate {
            Some(c) => c,
            None => return matches!(self, Self::Any),
        };
        match self {
            Self::Any => true,
            Self::Exact(spec) => {
                let c = Version::parse(candidate);
                let s = Version::parse(spec);
                if c.is_numeric() && s.is_numeric() {
                    c == s
                } else {
                    candidate == spec
                }
            }
            Self::AtLeast(min) => {
                let c = Version::parse(candidate);
                c.is_numeric() && c >= *min
            }
            Self::Pessimistic(base) => {
                let c = Version::parse(candidate);
                c.is_numeric() && c >= *base && c < bump(base)
            }
        }
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => Ok(()),
            Self::Exact(s) => f.write_str(s),
            Self::AtLeast(v) => write!(f, ">={v}"),
            Self::Pessimistic(v) => write!(f, "~>{v}"),
        }
    }
}

/// Upper bound of a pessimistic requirement: drop the last segment (when
/// there is more than one), then increment the remaining last segment.
/// `bump(0.1.3) == 0.2`, `bump(1.2) == 2`, `bump(2) == 3`.
fn bump(version: &Version) -> Version {
    let mut segments = match &version.segments {
        Some(segments) if !segments.is_empty() => segments.clone(),
        _ => return version.clone(),
    };
    if segments.len() > 1 {
        segments.pop();
    }
    if let Some(last) = segments.last_mut() {
        *last += 1;
    }
    let text = segments
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".");
    Version::parse(&text)
}

/// Extract a version from a tag-like name (`v1.2.3`, `2.24.1`).
///
/// Strips one leading `v`; names whose remainder does not start with a digit
/// yield `None`, so non-version tags and stray directories can be skipped.
pub fn version_from_tag(tag: &str) -> Option<Version> {
    let rest = tag.strip_prefix('v').unwrap_or(tag);
    if rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        Some(Version::parse(rest))
    } else {
        None
    }
}
