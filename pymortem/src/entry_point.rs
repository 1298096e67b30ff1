//! Shared entry point: argument handling, scan orchestration, rendering,
//! and the exit-status contract (nonzero iff any diagnostic was produced).

use crate::cli::Cli;
use crate::engine::Morgue;
use crate::report;
use crate::suppress::SuppressionEngine;
use crate::utils::collect_python_files;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;

/// Runs the analyzer with the given arguments (without the program name).
///
/// Diagnostic lines go to stderr; `--json` findings go to stdout.
///
/// # Errors
///
/// Returns an error when a file cannot be read or parsed, or when a present
/// user suppression config is malformed.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    let mut program_args = vec!["pymortem".to_owned()];
    program_args.extend(args);

    let cli = match Cli::try_parse_from(program_args) {
        Ok(cli) => cli,
        Err(error) => match error.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{error}");
                return Ok(0);
            }
            _ => {
                eprint!("{error}");
                return Ok(2);
            }
        },
    };

    run(&cli)
}

/// Runs a scan for already-parsed options and returns the exit code.
pub fn run(cli: &Cli) -> Result<i32> {
    let files = collect_python_files(&cli.project_dir, !cli.no_gitignore);
    if cli.verbose {
        eprintln!("[VERBOSE] pymortem v{}", env!("CARGO_PKG_VERSION"));
        eprintln!(
            "[VERBOSE] Scanning {} files with {} threads",
            files.len(),
            rayon::current_num_threads()
        );
    }

    let index = Morgue::default().scan_files(&files)?;

    let suppressions = SuppressionEngine::from_environment()?;
    let mut unused = report::apply_suppressions(report::unused_definitions(&index), &suppressions);
    report::sort_definitions(&mut unused);

    if cli.json {
        println!("{}", report::render_json(&unused)?);
    } else if !unused.is_empty() {
        eprintln!("{}", report::render_text(&unused));
    }

    if cli.verbose {
        if unused.is_empty() {
            eprintln!("{}", "No dead symbols found.".green());
        } else {
            eprintln!(
                "{}",
                format!("{} dead symbols found.", unused.len()).red().bold()
            );
        }
    }

    Ok(i32::from(!unused.is_empty()))
}
