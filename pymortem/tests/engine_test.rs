//! Test suite for the project driver and the core definition/usage rules.

use pymortem::engine::Morgue;
use pymortem::index::DefinitionKind;
use pymortem::report;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn write_file(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn unused_names(index: &pymortem::index::SymbolIndex) -> Vec<String> {
    report::unused_definitions(index)
        .iter()
        .map(|definition| definition.name.clone())
        .collect()
}

#[test]
fn test_unused_function_is_reported() {
    let dir = tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "main.py",
        r#"
def used_function():
    return "used"

def unused_function():
    return "unused"

result = used_function()
"#,
    );

    let index = Morgue::default().scan_files(&[file]).unwrap();
    let unused = unused_names(&index);
    assert!(unused.contains(&"unused_function".to_owned()));
    assert!(!unused.contains(&"used_function".to_owned()));
}

#[test]
fn test_usage_before_definition_counts() {
    let dir = tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "main.py",
        r"
def run():
    return helper()

def helper():
    return 1
",
    );

    let index = Morgue::default().scan_files(&[file]).unwrap();
    let unused = unused_names(&index);
    assert!(!unused.contains(&"helper".to_owned()));
    assert!(unused.contains(&"run".to_owned()));
}

#[test]
fn test_usage_crosses_files() {
    let dir = tempdir().unwrap();
    let lib = write_file(dir.path(), "lib.py", "def helper():\n    return 1\n");
    let app = write_file(dir.path(), "app.py", "from lib import helper\nhelper()\n");

    let index = Morgue::default().scan_files(&[app, lib]).unwrap();
    let unused = unused_names(&index);
    assert!(!unused.contains(&"helper".to_owned()));
}

#[test]
fn test_import_alias_shifts_the_report() {
    let dir = tempdir().unwrap();
    let first = write_file(dir.path(), "first.py", "import socket as sock\n");
    let second = write_file(dir.path(), "second.py", "import socket\n");

    let index = Morgue::default().scan_files(&[first, second]).unwrap();
    let unused = unused_names(&index);

    // The alias is the binding; the original name is used by virtue of the
    // re-export.
    assert!(unused.contains(&"sock".to_owned()));
    assert!(!unused.contains(&"socket".to_owned()));
}

#[test]
fn test_dotted_import_defines_first_segment() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "main.py", "import os.path\n");

    let index = Morgue::default().scan_files(&[file]).unwrap();
    let unused = unused_names(&index);
    assert!(unused.contains(&"os".to_owned()));
}

#[test]
fn test_future_imports_are_skipped() {
    let dir = tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "main.py",
        "from __future__ import annotations\n",
    );

    let index = Morgue::default().scan_files(&[file]).unwrap();
    assert!(index.definitions.is_empty());
    assert!(!index.is_used("annotations"));
}

#[test]
fn test_delete_counts_as_usage() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "main.py", "cache = {}\ndel cache\n");

    let index = Morgue::default().scan_files(&[file]).unwrap();
    assert!(!unused_names(&index).contains(&"cache".to_owned()));
}

#[test]
fn test_object_and_self_never_count_as_usage() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "main.py", "base = object\n");

    let index = Morgue::default().scan_files(&[file]).unwrap();
    assert!(!index.is_used("object"));
    assert!(!index.is_used("self"));
}

#[test]
fn test_attribute_write_and_read() {
    let dir = tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "main.py",
        r"
class Gauge:
    def __init__(self):
        self.level = 0
        self.high_water = 0

def read(gauge):
    return gauge.level
",
    );

    let index = Morgue::default().scan_files(&[file]).unwrap();
    let unused = unused_names(&index);
    assert!(unused.contains(&"high_water".to_owned()));
    assert!(!unused.contains(&"level".to_owned()));
}

#[test]
fn test_undecorated_class_is_never_flagged() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "main.py", "class Orphan:\n    pass\n");

    let index = Morgue::default().scan_files(&[file]).unwrap();
    assert!(unused_names(&index).is_empty());
}

#[test]
fn test_decorated_class_yields_one_entry_per_decorator() {
    let dir = tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "main.py",
        r"
@first
@second
class Doubled:
    pass
",
    );

    let index = Morgue::default().scan_files(&[file]).unwrap();
    let entries: Vec<_> = index
        .definitions
        .iter()
        .filter(|definition| {
            definition.name == "Doubled" && definition.kind == DefinitionKind::UnusedClass
        })
        .collect();
    assert_eq!(entries.len(), 2);
}

#[test]
fn test_empty_file_is_a_finding() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "blank.py", "  \n\t\n");

    let index = Morgue::default().scan_files(&[file]).unwrap();
    assert_eq!(index.definitions.len(), 1);
    let definition = &index.definitions[0];
    assert_eq!(definition.kind, DefinitionKind::EmptyFile);
    assert_eq!(definition.name, "blank.py");
    assert_eq!((definition.line, definition.col), (1, 1));
}

#[test]
fn test_parse_failure_aborts_the_run() {
    let dir = tempdir().unwrap();
    let good = write_file(dir.path(), "good.py", "value = 1\n");
    let bad = write_file(dir.path(), "bad.py", "def broken(:\n");

    let result = Morgue::default().scan_files(&[good, bad]);
    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("bad.py"));
}

#[test]
fn test_scan_project_collects_sorted_python_files() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "pkg/b.py", "def later(): pass\n");
    write_file(dir.path(), "pkg/a.py", "def early(): pass\n");
    write_file(dir.path(), "pkg/notes.txt", "not python\n");

    let index = Morgue::default().scan_project(dir.path()).unwrap();
    let names: Vec<_> = index
        .definitions
        .iter()
        .map(|definition| definition.name.clone())
        .collect();
    assert_eq!(names, vec!["early", "later"]);
}

#[test]
fn test_runs_are_idempotent() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "main.py",
        r"
import json

def stale():
    pass

limit = 10
",
    );
    write_file(dir.path(), "empty.py", "\n");

    let render = || {
        let index = Morgue::default().scan_project(dir.path()).unwrap();
        let mut unused = report::unused_definitions(&index);
        report::sort_definitions(&mut unused);
        report::render_text(&unused)
    };

    let first = render();
    let second = render();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}
