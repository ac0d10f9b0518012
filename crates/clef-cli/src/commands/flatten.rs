use std::path::{Path, PathBuf};

use miette::Result;

use clef_core::catalog::PackageCatalog;
use clef_core::settings::Settings;
use clef_resolver::transform;
use clef_util::errors::ClefError;
use clef_util::{fs, progress};

pub fn exec(file: &Path, output: Option<&Path>, include: Vec<PathBuf>) -> Result<()> {
    let settings = Settings::load()?;
    let mut include_paths = include;
    include_paths.extend(settings.resolver.include_paths.iter().cloned());

    let mut catalog = PackageCatalog::new(fs::packages_dir());
    let flattened = transform::flatten(file, &mut catalog, &include_paths)?;

    match output {
        Some(out) => {
            std::fs::write(out, flattened).map_err(ClefError::Io)?;
            progress::status("Flattened", &out.display().to_string());
        }
        None => print!("{flattened}"),
    }
    Ok(())
}
