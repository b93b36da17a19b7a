//! Reinstall-script generation for installed Homebrew formulae.
//!
//! Walks every installed formula, rebuilds the dependency graph between them
//! and emits a POSIX shell script that re-installs the whole set in
//! topological order, each formula with the options it was originally built
//! with. The emitted script keeps going when a single install fails and
//! reports the failures at the end of the run.
//!
//! # Architecture
//!
//! - [`metadata::MetadataSource`]: where installed-formula records come from
//! - [`graph::DepGraph`]: insertion-ordered dependency graph with a
//!   cycle-tolerant topological sort
//! - [`command::InstallCommand`]: one "install formula X with options O" line
//! - [`script`]: renders the ordered commands into the final shell script

pub mod cellar;
pub mod command;
pub mod graph;
pub mod metadata;
pub mod script;

use colored::Colorize;
use thiserror::Error;

use crate::dump::command::InstallCommand;
use crate::dump::graph::DepGraph;
use crate::dump::metadata::MetadataSource;

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("nothing to dump since no formulae are installed")]
    NothingInstalled,

    #[error(transparent)]
    Metadata(#[from] anyhow::Error),
}

/// Outcome of one dump run.
pub struct DumpReport {
    /// The rendered reinstall script.
    pub script: String,
    /// Installed formulae whose metadata could not be loaded, in
    /// enumeration order. Non-empty means the script is incomplete.
    pub unavailable: Vec<String>,
}

/// Generate the reinstall script for everything `source` reports as installed.
///
/// Per-formula metadata failures are recoverable: the formula is reported on
/// stderr, listed in the script's warning block and skipped. Only an empty
/// installed set is fatal.
pub fn generate(source: &dyn MetadataSource, verbose: bool) -> Result<DumpReport, DumpError> {
    let installed = source.installed()?;
    if installed.is_empty() {
        return Err(DumpError::NothingInstalled);
    }

    let mut graph = DepGraph::new();
    let mut unavailable = Vec::new();
    for name in installed {
        match source.load(&name) {
            Ok(meta) => {
                let mut options = Vec::new();
                if !meta.from_bottle {
                    options.push("--build-from-source".to_string());
                }
                options.extend(meta.used_options);
                let command = InstallCommand::new(name.as_str(), options);
                graph.insert(name, meta.deps, command);
            }
            Err(e) => {
                error(&format!("Cannot load formula '{name}': {e}"));
                unavailable.push(name);
            }
        }
    }

    let commands = graph.topological_order();
    if verbose {
        for command in &commands {
            info(&format!(
                "{}: {}",
                command.name(),
                command.options().join(" ")
            ));
        }
    }

    let script = script::render(&commands, &unavailable);
    Ok(DumpReport {
        script,
        unavailable,
    })
}

fn error(msg: &str) {
    eprintln!("{}: {}", "Error".red(), msg);
}

fn info(msg: &str) {
    eprintln!("{}: {}", "Info".yellow(), msg);
}
