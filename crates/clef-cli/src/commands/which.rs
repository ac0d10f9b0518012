use miette::Result;

use clef_core::catalog::PackageCatalog;
use clef_core::reference::{PackageId, PackageRef};
use clef_core::version;
use clef_util::errors::ClefError;
use clef_util::fs;

pub fn exec(package: &str) -> Result<()> {
    let reference = PackageRef::parse(package)?;
    let mut catalog = PackageCatalog::new(fs::packages_dir());
    let matches = catalog.find_matching(&reference)?;

    let best = matches.iter().max_by(|(a, _), (b, _)| {
        let left = PackageId::parse(a).version.unwrap_or_default();
        let right = PackageId::parse(b).version.unwrap_or_default();
        version::compare(&left, &right)
    });
    match best {
        Some((_, entry)) => {
            println!("{}", entry.dir().display());
            Ok(())
        }
        None => Err(ClefError::Generic {
            message: format!("No installed package matches {package:?}"),
        }
        .into()),
    }
}
