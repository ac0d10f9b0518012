//! Dependency resolution engine for clef: directive scanning, dependency
//! tree construction, pruning, permutation scoring, and the downstream
//! wrapper and flatten transforms.

pub mod permute;
pub mod prune;
pub mod resolver;
pub mod scanner;
pub mod transform;
pub mod tree;
pub mod wrapper;
