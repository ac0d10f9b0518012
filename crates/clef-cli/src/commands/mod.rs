//! Command dispatch and handler modules.

mod deps;
mod flatten;
mod list;
mod resolve;
mod use_;
mod which;
mod wrap;

use std::path::PathBuf;

use miette::Result;

use clef_core::settings::Settings;
use clef_resolver::resolver::ResolverOptions;
use clef_util::errors::ClefError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Deps {
            file,
            include,
            require,
            force,
            missing,
        } => deps::exec(&file, include, require, force, missing),
        Command::Resolve {
            file,
            include,
            require,
            force,
        } => resolve::exec(&file, include, require, force),
        Command::List { pattern } => list::exec(pattern.as_deref()),
        Command::Which { package } => which::exec(&package),
        Command::Wrap {
            file,
            include,
            require,
            force,
            always,
        } => wrap::exec(&file, include, require, force, always),
        Command::Flatten {
            file,
            output,
            include,
        } => flatten::exec(&file, output.as_deref(), include),
        Command::Use { version } => use_::exec(&version),
    }
}

/// Build resolver options from command-line flags plus the include paths
/// configured in settings.
fn resolver_options(
    settings: &Settings,
    include: Vec<PathBuf>,
    require: Vec<String>,
    force: Vec<String>,
) -> Result<ResolverOptions> {
    let mut options = ResolverOptions {
        include_paths: include,
        ext_requires: require,
        ..ResolverOptions::default()
    };
    options
        .include_paths
        .extend(settings.resolver.include_paths.iter().cloned());

    for pin in force {
        let parsed = pin
            .split_once(':')
            .filter(|(name, path)| !name.is_empty() && !path.is_empty());
        let Some((name, path)) = parsed else {
            return Err(ClefError::Generic {
                message: format!("Invalid --force value {pin:?}, expected NAME:PATH"),
            }
            .into());
        };
        options
            .forced_paths
            .insert(name.to_string(), PathBuf::from(path));
    }
    Ok(options)
}
