//! Source flattening.
//!
//! Rewrites a document into a single self-contained file by inlining the
//! transitive closure of its include directives. Require directives pass
//! through untouched; inlined content is delimited by `%%% <path>` marker
//! lines so origins stay traceable in the output.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clef_core::catalog::PackageCatalog;
use clef_util::errors::ClefError;
use clef_util::fs;

use crate::resolver::resolve_include;
use crate::scanner::{self, DirectiveKind};

/// Flatten `user_file` and return the combined source.
pub fn flatten(
    user_file: &Path,
    catalog: &mut PackageCatalog,
    include_paths: &[PathBuf],
) -> Result<String, ClefError> {
    let user_file = fs::absolute(user_file);
    let mut included = HashSet::new();
    let mut stack = Vec::new();
    flatten_file(&user_file, catalog, include_paths, &mut included, &mut stack)
}

fn flatten_file(
    path: &Path,
    catalog: &mut PackageCatalog,
    include_paths: &[PathBuf],
    included: &mut HashSet<PathBuf>,
    stack: &mut Vec<PathBuf>,
) -> Result<String, ClefError> {
    included.insert(path.to_path_buf());
    stack.push(path.to_path_buf());

    let source = std::fs::read_to_string(path).map_err(|e| ClefError::Generic {
        message: format!("failed to read {}: {e}", path.display()),
    })?;
    let current_dir = path.parent().unwrap_or(Path::new("")).to_path_buf();

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for directive in scanner::scan(&source) {
        if directive.kind == DirectiveKind::Require {
            // Stays in place; copied along with the surrounding text.
            continue;
        }
        let target = resolve_include(
            &directive.reference,
            &current_dir,
            include_paths,
            catalog,
            path,
            directive.line,
        )?;
        out.push_str(&source[cursor..directive.span.start]);
        cursor = directive.span.end;

        if directive.kind == DirectiveKind::PIncludeOnce && included.contains(&target) {
            // Already part of the output; the directive expands to nothing.
            continue;
        }
        if stack.contains(&target) {
            return Err(ClefError::Generic {
                message: format!(
                    "circular include of {} in {}",
                    target.display(),
                    path.display()
                ),
            });
        }
        let inlined = flatten_file(&target, catalog, include_paths, included, stack)?;
        out.push_str(&format!("\n%%% {}\n{}\n", target.display(), inlined));
    }
    out.push_str(&source[cursor..]);

    stack.pop();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn inlines_included_files_with_marker_lines() {
        let dir = tempdir().unwrap();
        let main = dir.path().join("main.ly");
        let sub = dir.path().join("sub.ly");
        write(&main, "head\n\\include \"sub.ly\"\ntail\n");
        write(&sub, "body\n");

        let mut catalog = PackageCatalog::new(dir.path().join("packages"));
        let flattened = flatten(&main, &mut catalog, &[]).unwrap();
        let sub = fs::absolute(&sub);
        assert_eq!(
            flattened,
            format!("head\n\n%%% {}\nbody\n\n\ntail\n", sub.display())
        );
    }

    #[test]
    fn require_directives_pass_through_unchanged() {
        let dir = tempdir().unwrap();
        let main = dir.path().join("main.ly");
        let sub = dir.path().join("sub.ly");
        write(&main, "\\require \"a\"\n\\include \"sub.ly\"\n");
        write(&sub, "body\n");

        let mut catalog = PackageCatalog::new(dir.path().join("packages"));
        let flattened = flatten(&main, &mut catalog, &[]).unwrap();
        assert!(flattened.contains("\\require \"a\""));
        assert!(flattened.contains("body"));
        assert!(!flattened.contains("\\include"));
    }

    #[test]
    fn pinclude_once_expands_a_file_a_single_time() {
        let dir = tempdir().unwrap();
        let main = dir.path().join("main.ly");
        let sub = dir.path().join("sub.ly");
        write(
            &main,
            "\\pincludeOnce \"sub.ly\"\n\\pincludeOnce \"sub.ly\"\n",
        );
        write(&sub, "body\n");

        let mut catalog = PackageCatalog::new(dir.path().join("packages"));
        let flattened = flatten(&main, &mut catalog, &[]).unwrap();
        assert_eq!(flattened.matches("body").count(), 1);
        assert_eq!(flattened.matches("%%%").count(), 1);
    }

    #[test]
    fn pinclude_expands_a_file_every_time() {
        let dir = tempdir().unwrap();
        let main = dir.path().join("main.ly");
        let sub = dir.path().join("sub.ly");
        write(&main, "\\pinclude \"sub.ly\"\n\\pinclude \"sub.ly\"\n");
        write(&sub, "body\n");

        let mut catalog = PackageCatalog::new(dir.path().join("packages"));
        let flattened = flatten(&main, &mut catalog, &[]).unwrap();
        assert_eq!(flattened.matches("body").count(), 2);
    }

    #[test]
    fn missing_include_reports_file_and_line() {
        let dir = tempdir().unwrap();
        let main = dir.path().join("main.ly");
        write(&main, "music\n\\include \"gone.ly\"\n");

        let mut catalog = PackageCatalog::new(dir.path().join("packages"));
        let err = flatten(&main, &mut catalog, &[]).unwrap_err();
        assert!(matches!(
            err,
            ClefError::IncludeNotFound { reference, line, .. }
                if reference == "gone.ly" && line == 2
        ));
    }

    #[test]
    fn circular_includes_fail_instead_of_recursing() {
        let dir = tempdir().unwrap();
        let one = dir.path().join("one.ly");
        let two = dir.path().join("two.ly");
        write(&one, "\\include \"two.ly\"\n");
        write(&two, "\\include \"one.ly\"\n");

        let mut catalog = PackageCatalog::new(dir.path().join("packages"));
        let err = flatten(&one, &mut catalog, &[]).unwrap_err();
        assert!(matches!(
            err,
            ClefError::Generic { message } if message.contains("circular include")
        ));
    }
}
