use std::path::{Path, PathBuf};

use miette::Result;

use clef_core::catalog::PackageCatalog;
use clef_core::lilypond;
use clef_core::settings::Settings;
use clef_resolver::resolver::DependencyResolver;
use clef_resolver::wrapper::{self, WrapperOptions};
use clef_util::{fs, progress};

pub fn exec(
    file: &Path,
    include: Vec<PathBuf>,
    require: Vec<String>,
    force: Vec<String>,
    always: bool,
) -> Result<()> {
    let settings = Settings::load()?;
    let options = super::resolver_options(&settings, include, require, force)?;
    let catalog = PackageCatalog::new(fs::packages_dir());
    let mut resolver = DependencyResolver::new(file, catalog, options);

    progress::status("Resolving", &file.display().to_string());
    let resolution = resolver.resolve()?;

    let wrapper_options = WrapperOptions {
        lilypond_version: lilypond::default_version(&fs::lilyponds_dir(), &settings)?,
        force: always,
        ..WrapperOptions::default()
    };
    let wrapper = wrapper::wrap(&resolution, &wrapper_options)?;
    if wrapper == resolution.user_file {
        progress::status_info("Unchanged", "no package references, nothing to wrap");
    } else {
        progress::status("Wrapping", &wrapper.display().to_string());
    }
    println!("{}", wrapper.display());
    Ok(())
}
