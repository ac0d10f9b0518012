//! Tree pruning passes, run after building and before permutation scoring.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use clef_core::reference::PackageId;
use clef_core::version::compare;
use clef_util::errors::ClefError;

use crate::tree::{DependencyTree, LeafId};

/// Remove versions whose own requirements cannot be met.
///
/// Depth-first over the tree: a version is invalid when, after its leaf has
/// been pruned, any of the leaf's specs has no surviving versions. Each
/// version-id is examined once per pass; a version seen again (shared
/// leaves, reference cycles) counts as valid, which is what terminates
/// cycles. A root requirement whose versions all drop out is fatal.
pub fn remove_unfulfilled(tree: &mut DependencyTree) -> Result<(), ClefError> {
    let mut examined = HashSet::new();
    prune_leaf(tree, tree.root(), true, &mut examined)
}

fn prune_leaf(
    tree: &mut DependencyTree,
    leaf: LeafId,
    raise_on_missing: bool,
    examined: &mut HashSet<String>,
) -> Result<(), ClefError> {
    let names: Vec<String> = tree.leaf(leaf).dependencies.keys().cloned().collect();
    for name in names {
        let candidates: Vec<(String, LeafId)> = match tree.leaf(leaf).dependencies.get(&name) {
            Some(spec) => spec
                .versions
                .iter()
                .map(|(version_id, sub)| (version_id.clone(), *sub))
                .collect(),
            None => continue,
        };
        let mut surviving = BTreeMap::new();
        for (version_id, sub) in candidates {
            let keep = if examined.contains(&version_id) {
                true
            } else {
                examined.insert(version_id.clone());
                prune_leaf(tree, sub, false, examined)?;
                tree.leaf(sub)
                    .dependencies
                    .values()
                    .all(|spec| !spec.versions.is_empty())
            };
            if keep {
                surviving.insert(version_id, sub);
            } else {
                debug!("dropping {}: unsatisfied transitive requirement", version_id);
            }
        }
        let exhausted = surviving.is_empty();
        if let Some(spec) = tree.leaf_mut(leaf).dependencies.get_mut(&name) {
            spec.versions = surviving;
        }
        if exhausted && raise_on_missing {
            return Err(ClefError::UnsatisfiedDependency { package: name });
        }
    }
    Ok(())
}

/// Collapse redundant older versions.
///
/// When a package is referenced through exactly one distinct clause in the
/// whole tree, and every candidate version of a referencing spec declares
/// identical dependencies, only the highest version is kept: the candidates
/// are interchangeable, and the highest avoids needless downgrades.
/// Packages referenced under two or more clauses, or whose candidates
/// differ in their requirements, are left alone.
pub fn squash_old_versions(tree: &mut DependencyTree) {
    for (package, clauses) in collect_specifiers(tree) {
        if clauses.len() != 1 {
            continue;
        }
        for sites in clauses.into_values() {
            for leaf in sites {
                squash_spec(tree, leaf, &package);
            }
        }
    }
}

/// Package name to clause to the leaves referencing the package under that
/// clause, over the part of the tree reachable from the root.
fn collect_specifiers(tree: &DependencyTree) -> BTreeMap<String, BTreeMap<String, Vec<LeafId>>> {
    let mut specifiers: BTreeMap<String, BTreeMap<String, Vec<LeafId>>> = BTreeMap::new();
    let mut visited = HashSet::new();
    let mut stack = vec![tree.root()];
    while let Some(leaf) = stack.pop() {
        if !visited.insert(leaf) {
            continue;
        }
        for (package, spec) in &tree.leaf(leaf).dependencies {
            specifiers
                .entry(package.clone())
                .or_default()
                .entry(spec.clause.clone())
                .or_default()
                .push(leaf);
            stack.extend(spec.versions.values().copied());
        }
    }
    specifiers
}

fn squash_spec(tree: &mut DependencyTree, leaf: LeafId, package: &str) {
    let candidates: Vec<(String, LeafId)> = match tree.leaf(leaf).dependencies.get(package) {
        Some(spec) if spec.versions.len() > 1 => spec
            .versions
            .iter()
            .map(|(version_id, sub)| (version_id.clone(), *sub))
            .collect(),
        _ => return,
    };
    let first = dependency_signature(tree, candidates[0].1);
    if !candidates
        .iter()
        .all(|(_, sub)| dependency_signature(tree, *sub) == first)
    {
        return;
    }
    let highest = candidates
        .into_iter()
        .map(|(version_id, _)| version_id)
        .max_by(|a, b| compare_version_ids(a, b));
    let Some(highest) = highest else { return };
    debug!("squashing {}: keeping {}", package, highest);
    if let Some(spec) = tree.leaf_mut(leaf).dependencies.get_mut(package) {
        spec.versions.retain(|version_id, _| *version_id == highest);
    }
}

/// What a leaf requires, as (package, clause, version-id set) triples. One
/// level is a full structural identity: each version-id maps to a single
/// shared leaf, so equal id sets imply equal sub-structure.
fn dependency_signature(tree: &DependencyTree, leaf: LeafId) -> Vec<(String, String, Vec<String>)> {
    tree.leaf(leaf)
        .dependencies
        .iter()
        .map(|(package, spec)| {
            (
                package.clone(),
                spec.clause.clone(),
                spec.versions.keys().cloned().collect(),
            )
        })
        .collect()
}

fn compare_version_ids(a: &str, b: &str) -> Ordering {
    let a_version = PackageId::parse(a).version.unwrap_or_else(|| "0".to_string());
    let b_version = PackageId::parse(b).version.unwrap_or_else(|| "0".to_string());
    compare(&a_version, &b_version)
}
