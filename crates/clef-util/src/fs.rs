use std::path::{Component, Path, PathBuf};

/// Root of the clef data directory.
///
/// Defaults to `~/.clef`; the `CLEF_HOME` environment variable overrides it
/// (tests point this at temp dirs).
pub fn clef_home() -> PathBuf {
    if let Some(home) = std::env::var_os("CLEF_HOME") {
        return PathBuf::from(home);
    }
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".clef")
}

/// Directory holding installed packages, one `name@version` entry per dir.
pub fn packages_dir() -> PathBuf {
    clef_home().join("packages")
}

/// Directory holding installed LilyPond versions.
pub fn lilyponds_dir() -> PathBuf {
    clef_home().join("lilyponds")
}

/// Directory for the runtime support library shipped with clef.
pub fn lib_dir() -> PathBuf {
    clef_home().join("lib")
}

/// Directory for generated wrapper documents.
pub fn wrappers_dir() -> PathBuf {
    clef_home().join("wrappers")
}

/// Path of the global settings file.
pub fn settings_file() -> PathBuf {
    clef_home().join("settings.toml")
}

/// Ensure a directory exists, creating it and any parents if needed.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Resolve `path` against `base` lexically: the result is absolute (when
/// `base` is), with `.` and `..` components collapsed. The filesystem is not
/// consulted, so symlinks are left alone and the path need not exist.
pub fn expand_path(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let mut expanded = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Popping past the root is a no-op, as in `/..` -> `/`.
                expanded.pop();
            }
            other => expanded.push(other.as_os_str()),
        }
    }
    expanded
}

/// `expand_path` against the current working directory.
pub fn absolute(path: &Path) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    expand_path(path, &cwd)
}
