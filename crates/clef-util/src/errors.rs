use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all clef operations.
#[derive(Debug, Error, Diagnostic)]
pub enum ClefError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An include reference could not be resolved to a file.
    #[error("Cannot find include file {} (referenced from {}:{})", .reference, .file.display(), .line)]
    #[diagnostic(help("Check the include name and any -I include paths"))]
    IncludeNotFound {
        reference: String,
        file: PathBuf,
        line: usize,
    },

    /// A require clause matched no installed package version.
    #[error("No package found for requirement {} (required from {}:{})", .reference, .file.display(), .line)]
    #[diagnostic(help("Install the package, or loosen the version requirement"))]
    NoPackageFound {
        reference: String,
        file: PathBuf,
        line: usize,
    },

    /// Two requires for the same package disagree on which versions qualify.
    #[error("Conflicting requirements for package {package}: {existing} vs {conflicting}")]
    RequirementConflict {
        package: String,
        existing: String,
        conflicting: String,
    },

    /// Every candidate version of a package lost one of its own dependencies.
    #[error("No valid version found for package {package}")]
    UnsatisfiedDependency { package: String },

    /// No combination of package versions satisfies all requirements.
    #[error("Failed to satisfy dependency requirements for {}", .file.display())]
    Unsatisfiable { file: PathBuf },

    /// A package reference with an empty or unparsable name.
    #[error("Malformed package reference {reference:?}")]
    MalformedReference { reference: String },

    /// Settings file could not be read or written.
    #[error("Settings error: {message}")]
    #[diagnostic(help("Check your settings.toml for syntax errors"))]
    Settings { message: String },

    /// LilyPond installation lookup or selection failed.
    #[error("LilyPond error: {message}")]
    Lilypond { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type ClefResult<T> = miette::Result<T>;
