mod dump;

use clap::Parser;
use colored::Colorize;
use std::process::exit;

use crate::dump::DumpError;
use crate::dump::cellar::CellarMetadata;

/// Dump a shell script that re-installs every installed Homebrew formula
/// with its original install options, in dependency order.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print each formula and its install options to stderr while dumping
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let cellar = match CellarMetadata::discover() {
        Ok(cellar) => cellar,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            exit(1);
        }
    };

    match dump::generate(&cellar, cli.verbose) {
        Ok(report) => {
            print!("{}", report.script);
            if !report.unavailable.is_empty() {
                // The script was still produced, but it is incomplete.
                exit(1);
            }
        }
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            match e {
                DumpError::NothingInstalled => exit(2),
                _ => exit(1),
            }
        }
    }
}
