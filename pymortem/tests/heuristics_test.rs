//! Tests for the dynamic-usage heuristics: reflection calls, template
//! placeholders, export lists, match patterns, and string annotations.

use pymortem::engine::Morgue;
use pymortem::index::SymbolIndex;
use pymortem::report;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn scan_single(content: &str) -> SymbolIndex {
    let dir = tempdir().unwrap();
    let path: PathBuf = dir.path().join("module.py");
    fs::write(&path, content).unwrap();
    Morgue::default().scan_files(&[path]).unwrap()
}

fn unused_names(index: &SymbolIndex) -> Vec<String> {
    report::unused_definitions(index)
        .iter()
        .map(|definition| definition.name.clone())
        .collect()
}

#[test]
fn test_getattr_string_argument_is_usage() {
    let index = scan_single(
        r#"
class Box:
    def __init__(self):
        self.width = 5

value = getattr(box, "width", None)
"#,
    );
    assert!(!unused_names(&index).contains(&"width".to_owned()));
}

#[test]
fn test_hasattr_string_argument_is_usage() {
    let index = scan_single(
        r#"
class Box:
    def __init__(self):
        self.height = 5

present = hasattr(box, "height")
"#,
    );
    assert!(!unused_names(&index).contains(&"height".to_owned()));
}

#[test]
fn test_getattr_with_non_literal_argument_is_ignored() {
    let index = scan_single(
        r"
class Box:
    def __init__(self):
        self.depth = 5

value = getattr(box, key, None)
",
    );
    assert!(unused_names(&index).contains(&"depth".to_owned()));
}

#[test]
fn test_percent_locals_placeholders_are_usages() {
    let index = scan_single(
        r#"
greeting = "hello"
audience = "world"
banner = "%(greeting)s, %(audience)s!" % locals()
"#,
    );
    let unused = unused_names(&index);
    assert!(!unused.contains(&"greeting".to_owned()));
    assert!(!unused.contains(&"audience".to_owned()));
    assert!(unused.contains(&"banner".to_owned()));
}

#[test]
fn test_percent_without_locals_is_ignored() {
    let index = scan_single(
        r#"
greeting = "hello"
banner = "%(greeting)s" % {"greeting": greeting}
"#,
    );
    // The dict value is a direct read, but the placeholder itself must not
    // have been the reason: drop the read and the name stays unused.
    let other = scan_single(
        r#"
greeting = "hello"
banner = "%(greeting)s" % data
"#,
    );
    assert!(!unused_names(&index).contains(&"greeting".to_owned()));
    assert!(unused_names(&other).contains(&"greeting".to_owned()));
}

#[test]
fn test_format_locals_fields_are_usages() {
    let index = scan_single(
        r#"
width = 3
height = 4
table = "{width} x {height[0]} x {width}".format(**locals())
"#,
    );
    let unused = unused_names(&index);
    assert!(!unused.contains(&"width".to_owned()));
    assert!(!unused.contains(&"height".to_owned()));
    assert!(unused.contains(&"table".to_owned()));
}

#[test]
fn test_malformed_format_template_is_tolerated() {
    let index = scan_single(
        r#"
width = 3
table = "{width x".format(**locals())
"#,
    );
    assert!(unused_names(&index).contains(&"width".to_owned()));
}

#[test]
fn test_dunder_all_marks_exports_used() {
    let index = scan_single(
        r#"
__all__ = ["make_widget", "DEFAULT_SIZE"]

DEFAULT_SIZE = 4

def make_widget():
    pass
"#,
    );
    let unused = unused_names(&index);
    assert!(!unused.contains(&"make_widget".to_owned()));
    assert!(!unused.contains(&"DEFAULT_SIZE".to_owned()));
}

#[test]
fn test_match_class_keywords_are_usages() {
    let index = scan_single(
        r#"
class Point:
    def __init__(self):
        self.x = 0
        self.y = 0

def describe(value):
    match value:
        case Point(x=0, y=0):
            return "origin"
    return "other"
"#,
    );
    let unused = unused_names(&index);
    assert!(!unused.contains(&"x".to_owned()));
    assert!(!unused.contains(&"y".to_owned()));
}

#[test]
fn test_string_annotations_are_walked() {
    let index = scan_single(
        r#"
import typing
from models import Inventory

def load(data: "Inventory") -> "typing.Any":
    return data
"#,
    );
    let unused = unused_names(&index);
    assert!(!unused.contains(&"Inventory".to_owned()));
    assert!(!unused.contains(&"typing".to_owned()));
    assert!(unused.contains(&"load".to_owned()));
}

#[test]
fn test_annotated_assignment_string_annotation() {
    let index = scan_single(
        r#"
from models import Inventory

stock: "Inventory" = load()
"#,
    );
    assert!(!unused_names(&index).contains(&"Inventory".to_owned()));
}
