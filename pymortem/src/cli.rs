//! Command line interface configuration using `clap`.

use clap::Parser;
use std::path::PathBuf;

/// Arguments and flags accepted by the program.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory (or single file) to scan for dead symbols.
    #[arg(default_value = ".")]
    pub project_dir: PathBuf,

    /// Output findings as JSON on stdout instead of diagnostic lines.
    #[arg(long)]
    pub json: bool,

    /// Scan files that gitignore rules would normally hide.
    #[arg(long)]
    pub no_gitignore: bool,

    /// Print scan details to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}
