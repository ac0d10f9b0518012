//! The local package catalog.
//!
//! Installed packages live under a single store directory, one
//! `name@version` entry per package version, each exposing a `package.ly`
//! entry file. The catalog scans that directory once per resolution and
//! answers which installed versions satisfy a reference.
//!
//! A *forced path* pins a package name to a local directory (or entry file)
//! for the catalog's lifetime: every installed version of the name is
//! replaced by a single synthetic `name@forced` entry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use clef_util::errors::ClefError;

use crate::reference::{PackageId, PackageRef};
use crate::version::Version;
use crate::{FORCED_VERSION, PACKAGE_ENTRY_FILE};

/// One installed (or forced) package version.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: PackageId,
    /// The version's entry file.
    pub path: PathBuf,
}

impl CatalogEntry {
    /// The package directory this version lives in.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new(""))
    }
}

/// View over the package store for one resolution.
#[derive(Debug, Clone)]
pub struct PackageCatalog {
    packages_dir: PathBuf,
    forced: BTreeMap<String, PathBuf>,
    scanned: Option<BTreeMap<String, CatalogEntry>>,
}

impl PackageCatalog {
    pub fn new(packages_dir: impl Into<PathBuf>) -> Self {
        Self {
            packages_dir: packages_dir.into(),
            forced: BTreeMap::new(),
            scanned: None,
        }
    }

    /// Pin `name` to a local directory or entry file. Takes effect on the
    /// next lookup and lasts for this catalog's lifetime.
    pub fn force_path(&mut self, name: &str, path: impl Into<PathBuf>) {
        self.forced.insert(name.to_string(), path.into());
        self.scanned = None;
    }

    pub fn forced_path(&self, name: &str) -> Option<&Path> {
        self.forced.get(name).map(PathBuf::as_path)
    }

    /// Every available version, keyed by version-id (`name@version`, or the
    /// bare name for versionless installs).
    pub fn available(&mut self) -> Result<&BTreeMap<String, CatalogEntry>, ClefError> {
        if self.scanned.is_none() {
            self.scanned = Some(self.scan()?);
        }
        Ok(self.scanned.get_or_insert_with(BTreeMap::new))
    }

    /// Installed versions of `name` that satisfy `reference`'s specifier.
    ///
    /// A forced pin satisfies every requirement written for its name, no
    /// matter the specifier: the pin is the user saying "use this copy".
    pub fn find_matching(
        &mut self,
        reference: &PackageRef,
    ) -> Result<BTreeMap<String, CatalogEntry>, ClefError> {
        let pinned = self.forced.contains_key(&reference.name);
        let mut matches = BTreeMap::new();
        for (id_text, entry) in self.available()? {
            if entry.id.name != reference.name {
                continue;
            }
            if pinned || reference.specifier.matches(entry.id.version.as_deref()) {
                matches.insert(id_text.clone(), entry.clone());
            }
        }
        Ok(matches)
    }

    /// Directory of the highest installed version of `name` (the forced
    /// directory when the name is pinned).
    pub fn package_dir(&mut self, name: &str) -> Result<Option<PathBuf>, ClefError> {
        let mut best: Option<(Version, PathBuf)> = None;
        for entry in self.available()?.values() {
            if entry.id.name != name {
                continue;
            }
            let version = Version::parse(entry.id.version.as_deref().unwrap_or("0"));
            let dir = entry.dir().to_path_buf();
            match &best {
                Some((current, _)) if *current >= version => {}
                _ => best = Some((version, dir)),
            }
        }
        Ok(best.map(|(_, dir)| dir))
    }

    fn scan(&self) -> Result<BTreeMap<String, CatalogEntry>, ClefError> {
        let mut entries = BTreeMap::new();
        if self.packages_dir.is_dir() {
            for dir_entry in std::fs::read_dir(&self.packages_dir).map_err(ClefError::Io)? {
                let dir_entry = dir_entry.map_err(ClefError::Io)?;
                let file_name = dir_entry.file_name();
                let Some(id_text) = file_name.to_str() else {
                    continue;
                };
                let entry_file = dir_entry.path().join(PACKAGE_ENTRY_FILE);
                if !entry_file.is_file() {
                    debug!("skipping store entry without {}: {}", PACKAGE_ENTRY_FILE, id_text);
                    continue;
                }
                entries.insert(
                    id_text.to_string(),
                    CatalogEntry {
                        id: PackageId::parse(id_text),
                        path: entry_file,
                    },
                );
            }
        }
        for (name, path) in &self.forced {
            entries.retain(|_, entry| entry.id.name != *name);
            let entry_file = if path.is_dir() {
                path.join(PACKAGE_ENTRY_FILE)
            } else {
                path.clone()
            };
            let id = PackageId::new(name, Some(FORCED_VERSION));
            entries.insert(
                id.to_string(),
                CatalogEntry {
                    id,
                    path: entry_file,
                },
            );
        }
        Ok(entries)
    }
}
