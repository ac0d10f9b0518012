//! The dependency tree: an arena of leaves addressed by stable ids.
//!
//! Every matched package version owns exactly one leaf, shared between all
//! requirements that matched it. Shared leaves are what make circular
//! package references representable, and what the pruning and permutation
//! passes key their memos on.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Stable handle of one leaf in a [`DependencyTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafId(usize);

/// One `\require` occurrence: the literal clause as authored, and the
/// version-ids currently believed to satisfy it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    pub clause: String,
    /// version-id (`name@version`, or a bare name) to the version's leaf.
    pub versions: BTreeMap<String, LeafId>,
}

/// A node in the dependency tree: everything required starting from one
/// file or one package version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyLeaf {
    /// Package name to the requirement attached for it. At most one spec
    /// per name; a second, incompatible require for the same name is a
    /// requirement conflict.
    pub dependencies: BTreeMap<String, DependencySpec>,
}

/// The tree built for one resolution: a leaf arena, the root leaf for the
/// user file, and the entry file recorded for every matched version.
#[derive(Debug, Clone)]
pub struct DependencyTree {
    user_file: PathBuf,
    leaves: Vec<DependencyLeaf>,
    root: LeafId,
    version_leaves: BTreeMap<String, LeafId>,
    entry_files: BTreeMap<String, PathBuf>,
}

impl DependencyTree {
    pub fn new(user_file: impl Into<PathBuf>) -> Self {
        Self {
            user_file: user_file.into(),
            leaves: vec![DependencyLeaf::default()],
            root: LeafId(0),
            version_leaves: BTreeMap::new(),
            entry_files: BTreeMap::new(),
        }
    }

    pub fn user_file(&self) -> &Path {
        &self.user_file
    }

    pub fn root(&self) -> LeafId {
        self.root
    }

    pub fn leaf(&self, id: LeafId) -> &DependencyLeaf {
        &self.leaves[id.0]
    }

    pub fn leaf_mut(&mut self, id: LeafId) -> &mut DependencyLeaf {
        &mut self.leaves[id.0]
    }

    /// The shared leaf for a version-id, created on first use. The entry
    /// file is recorded so resolution output can report package
    /// directories.
    pub fn version_leaf(&mut self, version_id: &str, entry_file: &Path) -> LeafId {
        self.entry_files
            .insert(version_id.to_string(), entry_file.to_path_buf());
        if let Some(id) = self.version_leaves.get(version_id) {
            return *id;
        }
        let id = LeafId(self.leaves.len());
        self.leaves.push(DependencyLeaf::default());
        self.version_leaves.insert(version_id.to_string(), id);
        id
    }

    /// Entry file recorded for a version-id during the build.
    pub fn entry_file(&self, version_id: &str) -> Option<&Path> {
        self.entry_files.get(version_id).map(PathBuf::as_path)
    }

    /// Direct dependency names: the packages the root leaf requires.
    pub fn root_dependency_names(&self) -> Vec<String> {
        self.leaf(self.root).dependencies.keys().cloned().collect()
    }
}
