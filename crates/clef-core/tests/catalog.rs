use std::path::Path;

use clef_core::catalog::PackageCatalog;
use clef_core::reference::PackageRef;
use tempfile::TempDir;

fn install_package(store: &Path, id: &str, content: &str) {
    let dir = store.join(id);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("package.ly"), content).unwrap();
}

#[test]
fn test_scan_lists_installed_versions() {
    let tmp = TempDir::new().unwrap();
    install_package(tmp.path(), "a@0.1", "");
    install_package(tmp.path(), "a@0.2", "");
    install_package(tmp.path(), "b", "");

    let mut catalog = PackageCatalog::new(tmp.path());
    let available = catalog.available().unwrap();
    let ids: Vec<&str> = available.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["a@0.1", "a@0.2", "b"]);
    assert_eq!(available["b"].id.version, None);
}

#[test]
fn test_scan_skips_entries_without_entry_file() {
    let tmp = TempDir::new().unwrap();
    install_package(tmp.path(), "a@0.1", "");
    std::fs::create_dir_all(tmp.path().join("junk@0.9")).unwrap();

    let mut catalog = PackageCatalog::new(tmp.path());
    assert_eq!(catalog.available().unwrap().len(), 1);
}

#[test]
fn test_find_matching_filters_by_specifier() {
    let tmp = TempDir::new().unwrap();
    install_package(tmp.path(), "a@0.1", "");
    install_package(tmp.path(), "a@0.2", "");
    install_package(tmp.path(), "a@0.3", "");

    let mut catalog = PackageCatalog::new(tmp.path());

    let any = PackageRef::parse("a").unwrap();
    assert_eq!(catalog.find_matching(&any).unwrap().len(), 3);

    let at_least = PackageRef::parse("a@>=0.2").unwrap();
    let ids: Vec<String> = catalog
        .find_matching(&at_least)
        .unwrap()
        .into_keys()
        .collect();
    assert_eq!(ids, vec!["a@0.2", "a@0.3"]);

    let exact = PackageRef::parse("a@0.1").unwrap();
    assert_eq!(catalog.find_matching(&exact).unwrap().len(), 1);

    let other = PackageRef::parse("zzz").unwrap();
    assert!(catalog.find_matching(&other).unwrap().is_empty());
}

#[test]
fn test_forced_path_replaces_installed_versions() {
    let tmp = TempDir::new().unwrap();
    install_package(tmp.path(), "b@0.1", "");
    install_package(tmp.path(), "b@0.2", "");

    let local = TempDir::new().unwrap();
    std::fs::write(local.path().join("package.ly"), "").unwrap();

    let mut catalog = PackageCatalog::new(tmp.path());
    catalog.force_path("b", local.path());

    let reference = PackageRef::parse("b").unwrap();
    let matches = catalog.find_matching(&reference).unwrap();
    let ids: Vec<String> = matches.keys().cloned().collect();
    assert_eq!(ids, vec!["b@forced"]);
    assert_eq!(matches["b@forced"].path, local.path().join("package.ly"));
    assert_eq!(matches["b@forced"].dir(), local.path());
}

#[test]
fn test_forced_path_satisfies_any_specifier() {
    let tmp = TempDir::new().unwrap();
    install_package(tmp.path(), "b@0.1", "");

    let local = TempDir::new().unwrap();
    std::fs::write(local.path().join("package.ly"), "").unwrap();

    let mut catalog = PackageCatalog::new(tmp.path());
    catalog.force_path("b", local.path());

    for clause in ["b@>=0.2.0", "b@~>0.3.0", "b@9.9"] {
        let reference = PackageRef::parse(clause).unwrap();
        let ids: Vec<String> = catalog
            .find_matching(&reference)
            .unwrap()
            .into_keys()
            .collect();
        assert_eq!(ids, vec!["b@forced"], "clause {clause}");
    }
}

#[test]
fn test_forced_path_may_name_the_entry_file_itself() {
    let tmp = TempDir::new().unwrap();
    let local = TempDir::new().unwrap();
    let entry = local.path().join("custom.ly");
    std::fs::write(&entry, "").unwrap();

    let mut catalog = PackageCatalog::new(tmp.path());
    catalog.force_path("b", &entry);

    let matches = catalog
        .find_matching(&PackageRef::parse("b").unwrap())
        .unwrap();
    assert_eq!(matches["b@forced"].path, entry);
}

#[test]
fn test_package_dir_picks_highest_version() {
    let tmp = TempDir::new().unwrap();
    install_package(tmp.path(), "a@0.2", "");
    install_package(tmp.path(), "a@0.10", "");

    let mut catalog = PackageCatalog::new(tmp.path());
    let dir = catalog.package_dir("a").unwrap().unwrap();
    assert_eq!(dir, tmp.path().join("a@0.10"));
    assert_eq!(catalog.package_dir("zzz").unwrap(), None);
}

#[test]
fn test_missing_store_dir_is_empty() {
    let tmp = TempDir::new().unwrap();
    let mut catalog = PackageCatalog::new(tmp.path().join("nope"));
    assert!(catalog.available().unwrap().is_empty());
}
