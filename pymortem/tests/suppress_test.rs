//! Tests for the built-in suppression rules and the user config rule.

use pymortem::engine::Morgue;
use pymortem::index::{Definition, DefinitionKind};
use pymortem::report;
use pymortem::suppress::{SuppressRule, SuppressionEngine, UserRule};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::tempdir;

fn write_file(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn reported_names(files: &[PathBuf]) -> Vec<String> {
    let index = Morgue::default().scan_files(files).unwrap();
    let engine = SuppressionEngine::with_builtin_rules();
    report::apply_suppressions(report::unused_definitions(&index), &engine)
        .iter()
        .map(|definition| definition.name.clone())
        .collect()
}

#[test]
fn test_testcase_methods_are_suppressed() {
    let dir = tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "test_model.py",
        r"
from unittest import TestCase

class ModelTest(TestCase):
    def test_roundtrip(self):
        assert True

    def build_fixture(self):
        return None
",
    );

    let reported = reported_names(&[file]);
    assert!(!reported.contains(&"test_roundtrip".to_owned()));
    // Non-test helpers on the same class still count.
    assert!(reported.contains(&"build_fixture".to_owned()));
}

#[test]
fn test_test_prefix_outside_testcase_is_reported() {
    let dir = tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "helpers.py",
        r"
def test_standalone():
    pass
",
    );

    assert!(reported_names(&[file]).contains(&"test_standalone".to_owned()));
}

#[test]
fn test_mock_side_effect_is_suppressed() {
    let dir = tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "test_client.py",
        r#"
mock_client = Mock()
mock_client.side_effect = RuntimeError("boom")

real_client.side_effect = 1
"#,
    );

    let index = Morgue::default().scan_files(&[file]).unwrap();
    let engine = SuppressionEngine::with_builtin_rules();
    let reported: Vec<_> =
        report::apply_suppressions(report::unused_definitions(&index), &engine)
            .iter()
            .map(|definition| (definition.name.clone(), definition.line))
            .collect();

    // Only the write on the mock_* chain root is hidden.
    assert!(!reported.contains(&("side_effect".to_owned(), 3)));
    assert!(reported.contains(&("side_effect".to_owned(), 5)));
}

#[test]
fn test_package_init_files_are_suppressed() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "pkg/__init__.py", "import os\n");

    assert!(reported_names(&[file]).is_empty());
}

#[test]
fn test_dunder_functions_are_suppressed() {
    let dir = tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "model.py",
        r"
class Model:
    def __repr__(self):
        return 'Model'

def __module_hook__():
    pass
",
    );

    let reported = reported_names(&[file]);
    assert!(!reported.contains(&"__repr__".to_owned()));
    assert!(!reported.contains(&"__module_hook__".to_owned()));
}

#[test]
fn test_migrations_are_suppressed() {
    let dir = tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "app/migrations/0001_initial.py",
        "def forwards():\n    pass\n",
    );

    assert!(reported_names(&[file]).is_empty());
}

#[test]
fn test_receiver_decorated_functions_are_suppressed() {
    let dir = tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "signals.py",
        r"
@receiver(post_save)
def handle_save(sender, **kwargs):
    pass

@cached
def helper():
    pass
",
    );

    let reported = reported_names(&[file]);
    assert!(!reported.contains(&"handle_save".to_owned()));
    assert!(reported.contains(&"helper".to_owned()));
}

#[test]
fn test_schema_accessors_are_suppressed() {
    let dir = tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "schemas.py",
        r"
class UserSchema(Schema):
    def get_full_name(self, obj):
        return obj.first

class Plain:
    def get_other(self):
        return 1
",
    );

    let reported = reported_names(&[file]);
    assert!(!reported.contains(&"get_full_name".to_owned()));
    assert!(reported.contains(&"get_other".to_owned()));
}

#[test]
fn test_user_rule_absent_config() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join(".pymortem.toml");
    assert!(UserRule::load(&missing).unwrap().is_none());
}

#[test]
fn test_user_rule_matches_names_paths_and_kinds() {
    let dir = tempdir().unwrap();
    let config = write_file(
        dir.path(),
        ".pymortem.toml",
        r#"
ignore_names = ["legacy_*"]
ignore_paths = ["*/vendored/*"]
ignore_kinds = ["EMPTY_FILE"]
"#,
    );

    let rule = UserRule::load(&config).unwrap().unwrap();
    let file = Arc::new(PathBuf::from("src/app.py"));

    let by_name = Definition::new(
        Arc::clone(&file),
        "legacy_helper".to_owned(),
        DefinitionKind::UnusedFunction,
    );
    assert!(rule.suppresses(&by_name));

    let by_kind = Definition::empty_file(Arc::clone(&file), "blank.py".to_owned());
    assert!(rule.suppresses(&by_kind));

    let by_path = Definition::new(
        Arc::new(PathBuf::from("third_party/vendored/lib.py")),
        "anything".to_owned(),
        DefinitionKind::UnusedVariable,
    );
    assert!(rule.suppresses(&by_path));

    let kept = Definition::new(file, "fresh".to_owned(), DefinitionKind::UnusedFunction);
    assert!(!rule.suppresses(&kept));
}

#[test]
fn test_user_rule_rejects_malformed_config() {
    let dir = tempdir().unwrap();
    let config = write_file(dir.path(), ".pymortem.toml", "ignore_names = 3\n");
    assert!(UserRule::load(&config).is_err());
}
