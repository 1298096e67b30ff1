//! Tests for the shared entry point's exit-status contract.

use pymortem::cli::Cli;
use pymortem::entry_point;
use std::fs;
use tempfile::tempdir;

fn cli_for(project_dir: &std::path::Path) -> Cli {
    Cli {
        project_dir: project_dir.to_path_buf(),
        json: false,
        no_gitignore: true,
        verbose: false,
    }
}

#[test]
fn test_exit_status_is_nonzero_iff_findings() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.py"), "def stale():\n    pass\n").unwrap();
    assert_eq!(entry_point::run(&cli_for(dir.path())).unwrap(), 1);

    let clean = tempdir().unwrap();
    fs::write(clean.path().join("main.py"), "def used():\n    pass\n\nused()\n").unwrap();
    assert_eq!(entry_point::run(&cli_for(clean.path())).unwrap(), 0);
}

#[test]
fn test_usage_errors_exit_with_two() {
    let code = entry_point::run_with_args(vec!["--definitely-not-a-flag".to_owned()]).unwrap();
    assert_eq!(code, 2);
}
