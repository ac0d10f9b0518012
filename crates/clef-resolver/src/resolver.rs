//! Dependency resolution for document files.
//!
//! Resolution is a single pipeline per call: scan the user file and
//! everything it pulls in into a dependency tree, prune the tree, then
//! score version permutations down to a definite version list. The
//! resolver owns its catalog view and option set for the duration of one
//! call; nothing carries over between calls.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use tracing::debug;

use clef_core::catalog::PackageCatalog;
use clef_core::reference::{split_qualified, PackageId, PackageRef, NULL_SENTINEL};
use clef_core::FILE_EXTENSIONS;
use clef_util::errors::ClefError;
use clef_util::fs;

use crate::permute;
use crate::prune;
use crate::scanner::{self, DirectiveKind};
use crate::tree::{DependencySpec, DependencyTree, LeafId};

/// Knobs for a single resolution run.
#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Extra directories searched for included files, after the including
    /// file's own directory.
    pub include_paths: Vec<PathBuf>,
    /// References required on top of the user file's own directives, as if
    /// written at its top.
    pub ext_requires: Vec<String>,
    /// Package names pinned to local paths before scanning starts.
    pub forced_paths: BTreeMap<String, PathBuf>,
    /// Tolerate unmatched requirements and skip pruning; used by commands
    /// that report what is missing instead of failing on it.
    pub ignore_missing: bool,
}

/// The outcome of a resolution: everything wrapper generation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub user_file: PathBuf,
    /// Selected `name@version` ids.
    pub definite_versions: Vec<String>,
    /// Reference clause to package name, over every requirement that
    /// survived pruning.
    pub package_refs: BTreeMap<String, String>,
    /// Package name to the directory of its selected version.
    pub package_dirs: BTreeMap<String, PathBuf>,
    /// References to load before the user file itself.
    pub preload: Vec<String>,
}

/// Resolves one user file against a package catalog.
pub struct DependencyResolver {
    user_file: PathBuf,
    catalog: PackageCatalog,
    options: ResolverOptions,
}

impl DependencyResolver {
    pub fn new(
        user_file: impl AsRef<Path>,
        catalog: PackageCatalog,
        options: ResolverOptions,
    ) -> Self {
        Self {
            user_file: fs::absolute(user_file.as_ref()),
            catalog,
            options,
        }
    }

    /// Resolve the user file's requirements into definite package versions
    /// plus the lookup tables consumed by the wrapper generator.
    pub fn resolve(&mut self) -> Result<Resolution, ClefError> {
        let tree = self.compile_dependency_tree()?;
        let definite_versions = permute::resolve_tree(&tree)?;
        debug!("resolved {} to {:?}", self.user_file.display(), definite_versions);

        let mut package_dirs = BTreeMap::new();
        for version_id in &definite_versions {
            let name = PackageId::parse(version_id).name;
            if let Some(entry_file) = tree.entry_file(version_id) {
                let dir = entry_file.parent().unwrap_or(Path::new(""));
                package_dirs.insert(name, dir.to_path_buf());
            }
        }

        Ok(Resolution {
            user_file: self.user_file.clone(),
            definite_versions,
            package_refs: collect_package_refs(&tree),
            package_dirs,
            preload: self.options.ext_requires.clone(),
        })
    }

    /// Scan the user file and everything it pulls in, and return the pruned
    /// dependency tree.
    ///
    /// Files wait in a FIFO queue and are read at most once per absolute
    /// path, so diamond and cyclic includes terminate. Included files keep
    /// populating the leaf of the file that included them; required
    /// packages hang their own leaves below it.
    pub fn compile_dependency_tree(&mut self) -> Result<DependencyTree, ClefError> {
        for (name, path) in self.options.forced_paths.clone() {
            self.catalog.force_path(&name, fs::absolute(&path));
        }

        let user_file = self.user_file.clone();
        let mut tree = DependencyTree::new(user_file.clone());
        let mut queue: VecDeque<(PathBuf, LeafId)> = VecDeque::new();
        let mut processed: HashSet<PathBuf> = HashSet::new();
        queue.push_back((user_file.clone(), tree.root()));

        let mut entry_file_scanned = false;
        while let Some((file, leaf)) = queue.pop_front() {
            if !processed.insert(file.clone()) {
                continue;
            }
            self.process_file(&mut tree, &mut queue, &file, leaf)?;
            if !entry_file_scanned {
                entry_file_scanned = true;
                let root = tree.root();
                let user_dir = user_file.parent().unwrap_or(Path::new("")).to_path_buf();
                for reference in self.options.ext_requires.clone() {
                    self.process_require(&mut tree, &mut queue, &reference, root, &user_dir, &user_file, 0)?;
                }
            }
        }

        if !self.options.ignore_missing {
            prune::remove_unfulfilled(&mut tree)?;
            prune::squash_old_versions(&mut tree);
        }
        Ok(tree)
    }

    fn process_file(
        &mut self,
        tree: &mut DependencyTree,
        queue: &mut VecDeque<(PathBuf, LeafId)>,
        path: &Path,
        leaf: LeafId,
    ) -> Result<(), ClefError> {
        let source = std::fs::read_to_string(path).map_err(|e| ClefError::Generic {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        let current_dir = path.parent().unwrap_or(Path::new("")).to_path_buf();
        for directive in scanner::scan(&source) {
            match directive.kind {
                DirectiveKind::Require => {
                    self.process_require(
                        tree,
                        queue,
                        &directive.reference,
                        leaf,
                        &current_dir,
                        path,
                        directive.line,
                    )?;
                }
                _ => {
                    let resolved = resolve_include(
                        &directive.reference,
                        &current_dir,
                        &self.options.include_paths,
                        &mut self.catalog,
                        path,
                        directive.line,
                    )?;
                    queue.push_back((resolved, leaf));
                }
            }
        }
        Ok(())
    }

    /// Handle one require reference found on `leaf`.
    ///
    /// Matching catalog versions become (shared) version leaves queued for
    /// scanning; the reference itself attaches to `leaf` as a spec. An
    /// unmatched reference still attaches an empty spec, which is what lets
    /// pruning invalidate the version that declared it, but an unmatched
    /// reference on the root is an authoring error and fails right away.
    fn process_require(
        &mut self,
        tree: &mut DependencyTree,
        queue: &mut VecDeque<(PathBuf, LeafId)>,
        raw: &str,
        leaf: LeafId,
        current_dir: &Path,
        file: &Path,
        line: usize,
    ) -> Result<(), ClefError> {
        if raw == NULL_SENTINEL {
            return Ok(());
        }
        let reference = PackageRef::parse(raw)?;
        if let Some(path) = &reference.forced_path {
            let forced = fs::expand_path(path, current_dir);
            debug!("pinning {} to {}", reference.name, forced.display());
            self.catalog.force_path(&reference.name, forced);
        }

        let matches = self.catalog.find_matching(&reference)?;
        if matches.is_empty() && leaf == tree.root() && !self.options.ignore_missing {
            return Err(ClefError::NoPackageFound {
                reference: raw.to_string(),
                file: file.to_path_buf(),
                line,
            });
        }

        let mut versions: BTreeMap<String, LeafId> = BTreeMap::new();
        for (version_id, entry) in &matches {
            let sub = tree.version_leaf(version_id, &entry.path);
            queue.push_back((entry.path.clone(), sub));
            versions.insert(version_id.clone(), sub);
        }

        match tree.leaf_mut(leaf).dependencies.entry(reference.name.clone()) {
            Entry::Occupied(slot) => {
                // A repeated reference is fine as long as it selects the
                // same versions; the first clause stays on record.
                let spec = slot.get();
                if !spec.versions.keys().eq(versions.keys()) {
                    return Err(ClefError::RequirementConflict {
                        package: reference.name,
                        existing: spec.clause.clone(),
                        conflicting: reference.clause,
                    });
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(DependencySpec {
                    clause: reference.clause,
                    versions,
                });
            }
        }
        Ok(())
    }
}

/// Locate the target of an include reference.
///
/// A `package:path` reference searches inside the named package's
/// directory (highest installed version) when the package is present;
/// everything else searches the including file's directory first and the
/// configured include paths after it. Each root is tried with the
/// reference as written, then with the document suffixes appended.
pub(crate) fn resolve_include(
    reference: &str,
    current_dir: &Path,
    include_paths: &[PathBuf],
    catalog: &mut PackageCatalog,
    file: &Path,
    line: usize,
) -> Result<PathBuf, ClefError> {
    let mut roots: Vec<PathBuf> = Vec::new();
    let mut target = reference;
    if let Some((package, rest)) = split_qualified(reference) {
        if let Some(dir) = catalog.package_dir(package)? {
            roots.push(dir);
            target = rest;
        }
    }
    if roots.is_empty() {
        roots.push(current_dir.to_path_buf());
        roots.extend(include_paths.iter().cloned());
    }

    for root in &roots {
        for suffix in std::iter::once("").chain(FILE_EXTENSIONS.iter().copied()) {
            let candidate = fs::expand_path(Path::new(&format!("{target}{suffix}")), root);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    Err(ClefError::IncludeNotFound {
        reference: reference.to_string(),
        file: file.to_path_buf(),
        line,
    })
}

/// Clause-to-name map over every spec reachable from the root.
fn collect_package_refs(tree: &DependencyTree) -> BTreeMap<String, String> {
    let mut refs = BTreeMap::new();
    let mut visited = HashSet::new();
    let mut stack = vec![tree.root()];
    while let Some(leaf) = stack.pop() {
        if !visited.insert(leaf) {
            continue;
        }
        for (package, spec) in &tree.leaf(leaf).dependencies {
            refs.insert(spec.clause.clone(), package.clone());
            stack.extend(spec.versions.values().copied());
        }
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn include_search_prefers_the_including_directory() {
        let dir = tempdir().unwrap();
        let near = dir.path().join("music/lib.ly");
        let far = dir.path().join("shared/lib.ly");
        write(&near, "%");
        write(&far, "%");

        let mut catalog = PackageCatalog::new(dir.path().join("packages"));
        let found = resolve_include(
            "lib.ly",
            &dir.path().join("music"),
            &[dir.path().join("shared")],
            &mut catalog,
            Path::new("/music/song.ly"),
            1,
        )
        .unwrap();
        assert_eq!(found, near);
    }

    #[test]
    fn include_search_tries_document_suffixes() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("music/parts/flute.ily"), "%");

        let mut catalog = PackageCatalog::new(dir.path().join("packages"));
        let found = resolve_include(
            "parts/flute",
            &dir.path().join("music"),
            &[],
            &mut catalog,
            Path::new("/music/song.ly"),
            1,
        )
        .unwrap();
        assert_eq!(found, dir.path().join("music/parts/flute.ily"));
    }

    #[test]
    fn package_qualified_include_searches_the_package_dir() {
        let dir = tempdir().unwrap();
        let packages = dir.path().join("packages");
        write(&packages.join("p@0.1/package.ly"), "%");
        write(&packages.join("p@0.1/inc.ly"), "%");

        let mut catalog = PackageCatalog::new(&packages);
        let found = resolve_include(
            "p:inc.ly",
            &dir.path().join("elsewhere"),
            &[],
            &mut catalog,
            Path::new("/music/song.ly"),
            3,
        )
        .unwrap();
        assert_eq!(found, packages.join("p@0.1/inc.ly"));
    }

    #[test]
    fn missing_include_reports_the_source_location() {
        let dir = tempdir().unwrap();
        let mut catalog = PackageCatalog::new(dir.path().join("packages"));
        let err = resolve_include(
            "nowhere.ly",
            dir.path(),
            &[],
            &mut catalog,
            Path::new("/music/song.ly"),
            7,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ClefError::IncludeNotFound { reference, file, line }
                if reference == "nowhere.ly" && file == Path::new("/music/song.ly") && line == 7
        ));
    }
}
