//! Tests for the rendered diagnostics: line format, deterministic ordering,
//! and JSON output.

use pymortem::engine::Morgue;
use pymortem::report;
use pymortem::utils::normalize_display_path;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn write_file(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn render(files: &[PathBuf]) -> String {
    let index = Morgue::default().scan_files(files).unwrap();
    let mut unused = report::unused_definitions(&index);
    report::sort_definitions(&mut unused);
    report::render_text(&unused)
}

#[test]
fn test_diagnostic_line_format() {
    let dir = tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "main.py",
        r"
def fresh():
    return 1

def stale():
    return 2

fresh()
",
    );

    let expected = format!(
        "{}:5:5: UNUSED_FUNCTION unused stale",
        normalize_display_path(&file)
    );
    assert_eq!(render(&[file]), expected);
}

#[test]
fn test_empty_file_line_format() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "blank.py", "   \n");

    let expected = format!(
        "{}:1:1: EMPTY_FILE unused blank.py",
        normalize_display_path(&file)
    );
    assert_eq!(render(&[file]), expected);
}

#[test]
fn test_sort_is_by_file_then_line_then_lowercase_name() {
    let dir = tempdir().unwrap();
    let beta = write_file(dir.path(), "beta.py", "zulu = 1\n");
    let alpha = write_file(dir.path(), "alpha.py", "after = 1\nbravo, Alpha = 1, 2\n");

    // Input order deliberately reversed; the report re-sorts.
    let rendered = render(&[beta, alpha]);
    let names: Vec<&str> = rendered
        .lines()
        .map(|line| line.rsplit(' ').next().unwrap())
        .collect();
    assert_eq!(names, vec!["after", "Alpha", "bravo", "zulu"]);
}

#[test]
fn test_json_rendering() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "main.py", "def stale():\n    pass\n");

    let index = Morgue::default().scan_files(&[file]).unwrap();
    let mut unused = report::unused_definitions(&index);
    report::sort_definitions(&mut unused);
    let json = report::render_json(&unused).unwrap();

    assert!(json.contains("\"kind\": \"UNUSED_FUNCTION\""));
    assert!(json.contains("\"name\": \"stale\""));
    assert!(json.contains("\"line\": 1"));
}

#[test]
fn test_no_findings_render_empty() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "main.py", "def used():\n    pass\n\nused()\n");
    assert!(render(&[file]).is_empty());
}
