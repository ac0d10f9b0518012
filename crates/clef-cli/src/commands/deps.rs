use std::path::{Path, PathBuf};

use miette::Result;

use clef_core::catalog::PackageCatalog;
use clef_core::settings::Settings;
use clef_resolver::resolver::DependencyResolver;
use clef_util::fs;

pub fn exec(
    file: &Path,
    include: Vec<PathBuf>,
    require: Vec<String>,
    force: Vec<String>,
    missing: bool,
) -> Result<()> {
    let settings = Settings::load()?;
    let mut options = super::resolver_options(&settings, include, require, force)?;
    // Report what the file references, matched or not, instead of failing
    // on the first missing package.
    options.ignore_missing = true;

    let catalog = PackageCatalog::new(fs::packages_dir());
    let mut resolver = DependencyResolver::new(file, catalog, options);
    let tree = resolver.compile_dependency_tree()?;

    for spec in tree.leaf(tree.root()).dependencies.values() {
        let unmatched = spec.versions.is_empty();
        if missing && !unmatched {
            continue;
        }
        if unmatched {
            println!("{} => (no matching package installed)", spec.clause);
        } else {
            let versions: Vec<&str> = spec.versions.keys().map(String::as_str).collect();
            println!("{} => {}", spec.clause, versions.join(", "));
        }
    }
    Ok(())
}
