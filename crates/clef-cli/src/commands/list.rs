use std::collections::BTreeMap;

use miette::Result;

use clef_core::catalog::PackageCatalog;
use clef_core::reference::PackageId;
use clef_core::settings::Settings;
use clef_core::{lilypond, version};
use clef_util::fs;

pub fn exec(pattern: Option<&str>) -> Result<()> {
    if pattern == Some("lilypond") {
        return list_lilyponds();
    }

    let mut catalog = PackageCatalog::new(fs::packages_dir());
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for version_id in catalog.available()?.keys() {
        let id = PackageId::parse(version_id);
        if pattern.is_some_and(|p| !id.name.contains(p)) {
            continue;
        }
        grouped.entry(id.name).or_default().push(version_id.clone());
    }

    if grouped.is_empty() {
        println!("No packages installed.");
        return Ok(());
    }
    for (name, mut version_ids) in grouped {
        version_ids.sort_by(|a, b| {
            let left = PackageId::parse(a).version.unwrap_or_default();
            let right = PackageId::parse(b).version.unwrap_or_default();
            version::compare(&left, &right)
        });
        println!("{name}");
        for version_id in version_ids {
            println!("   {version_id}");
        }
    }
    Ok(())
}

fn list_lilyponds() -> Result<()> {
    let settings = Settings::load()?;
    let dir = fs::lilyponds_dir();
    let versions = lilypond::installed_versions(&dir)?;
    if versions.is_empty() {
        println!("No LilyPond versions installed.");
        return Ok(());
    }
    let default = lilypond::default_version(&dir, &settings)?;
    for version in versions {
        let rendered = version.to_string();
        let marker = if default.as_deref() == Some(rendered.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{marker} {rendered}");
    }
    Ok(())
}
