//! CLI argument definitions for clef.
//!
//! Uses `clap` derive macros to define the full command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "clef",
    version,
    about = "A package manager for LilyPond",
    long_about = "clef manages packages for the LilyPond music engraver: it resolves the \
                  packages a score depends on, prepares wrapper files that load them at \
                  compile time, and tracks installed LilyPond versions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the packages a file depends on
    Deps {
        /// Document file to scan
        file: PathBuf,
        /// Extra include search directories
        #[arg(short = 'I', long, value_name = "PATH")]
        include: Vec<PathBuf>,
        /// Additional package references resolved before the file's own
        #[arg(short, long, value_name = "PKG")]
        require: Vec<String>,
        /// Pin a package to a local directory
        #[arg(long, value_name = "NAME:PATH")]
        force: Vec<String>,
        /// Show only requirements with no matching installed package
        #[arg(long)]
        missing: bool,
    },

    /// Resolve a file's requirements into definite package versions
    Resolve {
        /// Document file to resolve
        file: PathBuf,
        /// Extra include search directories
        #[arg(short = 'I', long, value_name = "PATH")]
        include: Vec<PathBuf>,
        /// Additional package references resolved before the file's own
        #[arg(short, long, value_name = "PKG")]
        require: Vec<String>,
        /// Pin a package to a local directory
        #[arg(long, value_name = "NAME:PATH")]
        force: Vec<String>,
    },

    /// List installed packages
    List {
        /// Name filter, or `lilypond` to list LilyPond versions instead
        pattern: Option<String>,
    },

    /// Print the directory of the highest installed version matching a reference
    Which {
        /// Package reference (name, name@0.1, "name@>=0.1")
        package: String,
    },

    /// Resolve a file and write the wrapper that loads its packages
    Wrap {
        /// Document file to wrap
        file: PathBuf,
        /// Extra include search directories
        #[arg(short = 'I', long, value_name = "PATH")]
        include: Vec<PathBuf>,
        /// Additional package references resolved before the file's own
        #[arg(short, long, value_name = "PKG")]
        require: Vec<String>,
        /// Pin a package to a local directory
        #[arg(long, value_name = "NAME:PATH")]
        force: Vec<String>,
        /// Write a wrapper even when the file references no packages
        #[arg(long)]
        always: bool,
    },

    /// Inline every include into a single self-contained file
    Flatten {
        /// Document file to flatten
        file: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
        /// Extra include search directories
        #[arg(short = 'I', long, value_name = "PATH")]
        include: Vec<PathBuf>,
    },

    /// Set the default LilyPond version
    Use {
        /// An installed LilyPond version (e.g., 2.24.1)
        version: String,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
