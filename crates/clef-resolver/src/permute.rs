//! Permutation resolution: enumerate version-choice combinations over a
//! pruned tree, drop the inconsistent ones, and pick the winner.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use clef_core::reference::PackageId;
use clef_core::version::Version;
use clef_util::errors::ClefError;

use crate::tree::{DependencyTree, LeafId};

/// Nested view of the tree used for chain enumeration: package name to
/// version-id to that version's own nested view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimplifiedTree(pub BTreeMap<String, BTreeMap<String, SimplifiedTree>>);

/// Resolve a built and pruned tree into the definite version list.
pub fn resolve_tree(tree: &DependencyTree) -> Result<Vec<String>, ClefError> {
    let direct: BTreeSet<String> = tree.root_dependency_names().into_iter().collect();
    if direct.is_empty() {
        return Ok(Vec::new());
    }
    let mut on_path = HashSet::new();
    let simplified = simplify(tree, tree.root(), &mut on_path);
    let candidates = filter_inconsistent(cartesian_product(chain_lists(&simplified)));
    debug!("scoring {} candidate combinations", candidates.len());
    match select_highest(candidates, &direct) {
        Some(winner) => Ok(winner),
        None => Err(ClefError::Unsatisfiable {
            file: tree.user_file().to_path_buf(),
        }),
    }
}

/// Convert the leaf graph into plain nested maps.
///
/// Truncation is keyed on the current descent path: a leaf that is its own
/// ancestor contributes an empty nested map, which terminates cycles while
/// leaving the cycle's one full expansion in place. Leaves shared between
/// separate branches (diamonds) expand under each branch, so every branch
/// enumerates its complete version chains.
pub fn simplify(tree: &DependencyTree, leaf: LeafId, on_path: &mut HashSet<LeafId>) -> SimplifiedTree {
    if !on_path.insert(leaf) {
        return SimplifiedTree::default();
    }
    let mut simplified = BTreeMap::new();
    for (package, spec) in &tree.leaf(leaf).dependencies {
        let mut versions = BTreeMap::new();
        for (version_id, sub) in &spec.versions {
            versions.insert(version_id.clone(), simplify(tree, *sub, on_path));
        }
        simplified.insert(package.clone(), versions);
    }
    on_path.remove(&leaf);
    SimplifiedTree(simplified)
}

/// One list of version chains per package. Each chain is a chosen
/// version-id followed by one chain of its first nested package; chains of
/// the remaining nested packages surface through the later cartesian
/// passes over the tree below them.
pub fn chain_lists(tree: &SimplifiedTree) -> Vec<Vec<Vec<String>>> {
    let mut lists = Vec::new();
    for versions in tree.0.values() {
        let mut chains = Vec::new();
        for (version_id, nested) in versions {
            let sub_lists = chain_lists(nested);
            match sub_lists.first() {
                None => chains.push(vec![version_id.clone()]),
                Some(first) => {
                    for sub_chain in first {
                        let mut chain = Vec::with_capacity(1 + sub_chain.len());
                        chain.push(version_id.clone());
                        chain.extend(sub_chain.iter().cloned());
                        chains.push(chain);
                    }
                }
            }
        }
        lists.push(chains);
    }
    lists
}

/// Cartesian product across the per-package chain lists, each combination
/// flattened into a single candidate.
pub fn cartesian_product(lists: Vec<Vec<Vec<String>>>) -> Vec<Vec<String>> {
    if lists.is_empty() {
        return Vec::new();
    }
    let mut candidates: Vec<Vec<String>> = vec![Vec::new()];
    for chains in lists {
        let mut next = Vec::with_capacity(candidates.len().saturating_mul(chains.len()));
        for prefix in &candidates {
            for chain in &chains {
                let mut combined = prefix.clone();
                combined.extend(chain.iter().cloned());
                next.push(combined);
            }
        }
        candidates = next;
    }
    candidates
}

/// Drop candidates that pin the same package at two different versions
/// (circular references and diamond pulls produce them), and de-duplicate
/// the survivors preserving first-occurrence order. Versionless ids never
/// conflict with anything.
pub fn filter_inconsistent(candidates: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let mut valid = Vec::new();
    'candidates: for candidate in candidates {
        let mut chosen: HashMap<String, String> = HashMap::new();
        for version_id in &candidate {
            let id = PackageId::parse(version_id);
            let Some(version) = id.version else { continue };
            match chosen.get(&id.name) {
                Some(existing) if *existing != version => continue 'candidates,
                _ => {
                    chosen.insert(id.name, version);
                }
            }
        }
        let mut seen = HashSet::new();
        let deduped: Vec<String> = candidate
            .into_iter()
            .filter(|version_id| seen.insert(version_id.clone()))
            .collect();
        valid.push(deduped);
    }
    valid
}

/// Pick the highest-scoring candidate by linear scan. Later candidates win
/// ties, so the enumeration order pins the result.
pub fn select_highest(candidates: Vec<Vec<String>>, direct: &BTreeSet<String>) -> Option<Vec<String>> {
    let mut iter = candidates.into_iter();
    let mut best = iter.next()?;
    for candidate in iter {
        if compare_candidates(&candidate, &best, direct) != Ordering::Less {
            best = candidate;
        }
    }
    Some(best)
}

/// Compare two candidates package by package, in `x`'s occurrence order.
/// The first unequal comparison on a user-required package decides
/// outright; the rest accumulate into a net score whose sign orders the
/// pair. Packages absent from either side contribute nothing.
fn compare_candidates(x: &[String], y: &[String], direct: &BTreeSet<String>) -> Ordering {
    let y_versions: HashMap<String, Version> = candidate_versions(y).into_iter().collect();
    let mut score = 0i64;
    for (package, x_version) in candidate_versions(x) {
        let Some(y_version) = y_versions.get(&package) else { continue };
        let ordering = x_version.cmp(y_version);
        if ordering != Ordering::Equal && direct.contains(&package) {
            return ordering;
        }
        score += match ordering {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        };
    }
    score.cmp(&0)
}

/// Package-to-version view of a candidate, in first-occurrence order. A
/// repeated name keeps its first position but takes the later version;
/// versionless ids count as version `0`.
fn candidate_versions(candidate: &[String]) -> Vec<(String, Version)> {
    let mut order: Vec<(String, Version)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for version_id in candidate {
        let id = PackageId::parse(version_id);
        let version = Version::parse(id.version.as_deref().unwrap_or("0"));
        match index.get(&id.name) {
            Some(at) => order[*at].1 = version,
            None => {
                index.insert(id.name.clone(), order.len());
                order.push((id.name, version));
            }
        }
    }
    order
}
