//! Installed LilyPond versions.
//!
//! clef keeps LilyPond installations under `<home>/lilyponds/<version>/`.
//! This module lists them and tracks which one is the default; downloading
//! and running LilyPond itself happens outside clef.

use std::path::Path;

use tracing::debug;

use clef_util::errors::ClefError;

use crate::settings::Settings;
use crate::version::version_from_tag;

/// Installed LilyPond versions, sorted ascending.
///
/// Directory names that are not version-like (`tmp`, partial downloads) are
/// skipped. LilyPond releases are plain three-segment versions, so semver
/// ordering applies.
pub fn installed_versions(lilyponds_dir: &Path) -> Result<Vec<semver::Version>, ClefError> {
    let mut versions = Vec::new();
    if !lilyponds_dir.is_dir() {
        return Ok(versions);
    }
    for entry in std::fs::read_dir(lilyponds_dir).map_err(ClefError::Io)? {
        let entry = entry.map_err(ClefError::Io)?;
        if !entry.path().is_dir() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(tag) = version_from_tag(name) else {
            continue;
        };
        match semver::Version::parse(&tag.original) {
            Ok(version) => versions.push(version),
            Err(e) => debug!("skipping non-release directory {name}: {e}"),
        }
    }
    versions.sort();
    Ok(versions)
}

/// The default LilyPond version: the configured one when set, otherwise the
/// highest installed, otherwise `None`.
pub fn default_version(
    lilyponds_dir: &Path,
    settings: &Settings,
) -> Result<Option<String>, ClefError> {
    if let Some(configured) = &settings.lilypond.default {
        return Ok(Some(configured.clone()));
    }
    Ok(installed_versions(lilyponds_dir)?
        .last()
        .map(|v| v.to_string()))
}

/// Record `version` as the default. Fails unless that version is installed.
pub fn set_default(
    lilyponds_dir: &Path,
    settings: &mut Settings,
    version: &str,
) -> Result<(), ClefError> {
    let wanted = semver::Version::parse(version).map_err(|e| ClefError::Lilypond {
        message: format!("Invalid LilyPond version {version:?}: {e}"),
    })?;
    let installed = installed_versions(lilyponds_dir)?;
    if !installed.contains(&wanted) {
        return Err(ClefError::Lilypond {
            message: format!("LilyPond {version} is not installed"),
        });
    }
    settings.lilypond.default = Some(wanted.to_string());
    Ok(())
}
