//! Wrapper generation.
//!
//! A document with package references is compiled through a generated
//! wrapper: it loads the runtime support library, announces the resolved
//! reference and directory tables, preloads externally required packages
//! and finally includes the user file itself.

use std::path::{Path, PathBuf};

use tracing::debug;

use clef_util::errors::ClefError;
use clef_util::{fs, hash};

use crate::resolver::Resolution;

/// The bundled runtime support library.
const SUPPORT_LIB: &str = include_str!("../etc/clef.ly");

/// Name of the support library file under the lib directory.
pub const SUPPORT_LIB_FILE: &str = "clef.ly";

#[derive(Debug, Clone, Default)]
pub struct WrapperOptions {
    /// Emit a `\version` statement at the top of the wrapper.
    pub lilypond_version: Option<String>,
    /// Initial current-package-dir value; defaults to the process working
    /// directory.
    pub current_package_dir: Option<PathBuf>,
    /// Wrap even when the file has no package references.
    pub force: bool,
    /// Where wrapper files are written; defaults to the wrappers directory
    /// under the clef home.
    pub wrappers_dir: Option<PathBuf>,
    /// Support library to include; defaults to the copy installed under
    /// the clef home.
    pub lib_path: Option<PathBuf>,
}

/// Write a wrapper document for `resolution` and return its path.
///
/// A file without package references needs no wrapper: its own path is
/// returned untouched unless `force` is set.
pub fn wrap(resolution: &Resolution, options: &WrapperOptions) -> Result<PathBuf, ClefError> {
    if resolution.package_refs.is_empty() && !options.force {
        return Ok(resolution.user_file.clone());
    }

    let lib_path = match &options.lib_path {
        Some(path) => path.clone(),
        None => ensure_support_lib()?,
    };
    let source = render(resolution, options, &lib_path);

    let wrappers_dir = match &options.wrappers_dir {
        Some(dir) => dir.clone(),
        None => fs::wrappers_dir(),
    };
    fs::ensure_dir(&wrappers_dir).map_err(ClefError::Io)?;
    let wrapper_path = wrappers_dir.join(wrapper_file_name(&resolution.user_file));
    std::fs::write(&wrapper_path, source).map_err(ClefError::Io)?;
    debug!("wrote wrapper {}", wrapper_path.display());
    Ok(wrapper_path)
}

/// Install the bundled support library under the clef home, rewriting the
/// installed copy when the bundled text changed.
pub fn ensure_support_lib() -> Result<PathBuf, ClefError> {
    let dir = fs::lib_dir();
    let path = dir.join(SUPPORT_LIB_FILE);
    if std::fs::read_to_string(&path).ok().as_deref() != Some(SUPPORT_LIB) {
        fs::ensure_dir(&dir).map_err(ClefError::Io)?;
        std::fs::write(&path, SUPPORT_LIB).map_err(ClefError::Io)?;
        debug!("installed support library at {}", path.display());
    }
    Ok(path)
}

/// Render the wrapper source.
fn render(resolution: &Resolution, options: &WrapperOptions, lib_path: &Path) -> String {
    let user_filename = &resolution.user_file;
    let user_dirname = user_filename.parent().unwrap_or(Path::new(""));
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let current_package_dir = options.current_package_dir.as_deref().unwrap_or(&cwd);

    let mut out = String::new();
    if let Some(version) = &options.lilypond_version {
        out.push_str(&format!("\\version \"{version}\"\n\n"));
    }
    out.push_str("#(ly:set-option 'relative-includes #t)\n");
    out.push_str(&format!("\\include {}\n\n", scheme_quote_path(lib_path)));

    out.push_str("#(begin\n");
    out.push_str(&format!("  (define clef:cwd {})\n", scheme_quote_path(&cwd)));
    out.push_str(&format!(
        "  (define clef:input-filename {})\n",
        scheme_quote_path(user_filename)
    ));
    out.push_str(&format!(
        "  (define clef:input-dirname {})\n",
        scheme_quote_path(user_dirname)
    ));
    out.push_str(&format!(
        "  (define clef:current-package-dir {})\n",
        scheme_quote_path(current_package_dir)
    ));
    for (clause, name) in &resolution.package_refs {
        out.push_str(&format!(
            "  (hash-set! clef:package-refs {} {})\n",
            scheme_quote(clause),
            scheme_quote(name)
        ));
    }
    for (name, dir) in &resolution.package_dirs {
        out.push_str(&format!(
            "  (hash-set! clef:package-dirs {} {})\n",
            scheme_quote(name),
            scheme_quote_path(dir)
        ));
    }
    out.push_str(")\n\n");
    out.push_str("#(ly:debug \"package loader is ready\")\n\n");

    for reference in &resolution.preload {
        out.push_str(&format!("\\require {}\n", scheme_quote(reference)));
    }
    if !resolution.preload.is_empty() {
        out.push('\n');
    }

    out.push_str(&format!("\\include {}\n\n", scheme_quote_path(user_filename)));
    out.push_str("#(clef:call-finalizers)\n");
    out
}

/// Quote a string as a scheme string literal.
fn scheme_quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Quote a path as a scheme string literal. Backslash separators are
/// normalized to forward slashes, which the document processor accepts on
/// every platform.
fn scheme_quote_path(path: &Path) -> String {
    let text = path.display().to_string();
    let text = if cfg!(windows) {
        text.replace('\\', "/")
    } else {
        text
    };
    scheme_quote(&text)
}

/// Wrapper file name: the user file's stem plus a short digest of its
/// absolute path, so same-named files in different directories do not
/// collide in the shared wrappers directory.
fn wrapper_file_name(user_file: &Path) -> String {
    let stem = user_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("wrapper");
    let digest = hash::short_digest(user_file.to_string_lossy().as_bytes());
    format!("{stem}-{digest}.ly")
}
