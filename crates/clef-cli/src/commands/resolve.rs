use std::path::{Path, PathBuf};

use miette::Result;

use clef_core::catalog::PackageCatalog;
use clef_core::settings::Settings;
use clef_resolver::resolver::DependencyResolver;
use clef_util::{fs, progress};

pub fn exec(
    file: &Path,
    include: Vec<PathBuf>,
    require: Vec<String>,
    force: Vec<String>,
) -> Result<()> {
    let settings = Settings::load()?;
    let options = super::resolver_options(&settings, include, require, force)?;
    let catalog = PackageCatalog::new(fs::packages_dir());
    let mut resolver = DependencyResolver::new(file, catalog, options);

    progress::status("Resolving", &file.display().to_string());
    let resolution = resolver.resolve()?;
    if resolution.definite_versions.is_empty() {
        progress::status_info("Resolved", "no package requirements");
        return Ok(());
    }
    for version_id in &resolution.definite_versions {
        println!("{version_id}");
    }
    Ok(())
}
