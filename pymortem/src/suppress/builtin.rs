//! The built-in rule set.

use super::{compile_matchers, matches_any, SuppressRule};
use crate::index::{Definition, DefinitionKind};
use crate::utils::normalize_display_path;
use globset::GlobMatcher;
use std::sync::LazyLock;

static INIT_FILE_MATCHERS: LazyLock<Vec<GlobMatcher>> =
    LazyLock::new(|| compile_matchers(&["__init__.py", "*/__init__.py"]));

static DUNDER_NAME_MATCHERS: LazyLock<Vec<GlobMatcher>> =
    LazyLock::new(|| compile_matchers(&["__*__"]));

static MIGRATIONS_PATH_MATCHERS: LazyLock<Vec<GlobMatcher>> =
    LazyLock::new(|| compile_matchers(&["*/migrations/*"]));

/// Test scaffolding is driven by runners and mock frameworks, not direct
/// references: `test_*` methods of `TestCase` subclasses, and `side_effect`
/// written on a `mock_*` object.
pub struct TestDoubleRule;

impl SuppressRule for TestDoubleRule {
    fn suppresses(&self, item: &Definition) -> bool {
        (item.name.starts_with("test_")
            && item.container_bases.iter().any(|base| base == "TestCase"))
            || (item.name == "side_effect"
                && item
                    .attr_root
                    .as_deref()
                    .is_some_and(|root| root.starts_with("mock_")))
    }
}

/// Package-init files re-export by convention, and dunder functions are
/// invoked by the runtime.
pub struct DunderPackageRule;

impl SuppressRule for DunderPackageRule {
    fn suppresses(&self, item: &Definition) -> bool {
        matches_any(&INIT_FILE_MATCHERS, &normalize_display_path(&item.file))
            || (item.kind == DefinitionKind::UnusedFunction
                && matches_any(&DUNDER_NAME_MATCHERS, &item.name))
    }
}

/// Framework-managed code: migration modules, and signal handlers wired up
/// through a `receiver(...)` decorator.
pub struct FrameworkHookRule;

impl SuppressRule for FrameworkHookRule {
    fn suppresses(&self, item: &Definition) -> bool {
        matches_any(
            &MIGRATIONS_PATH_MATCHERS,
            &normalize_display_path(&item.file),
        ) || (item.kind == DefinitionKind::UnusedFunction
            && item
                .call_decorators
                .iter()
                .any(|decorator| decorator == "receiver"))
    }
}

/// `get_*` accessors on `Schema` subclasses are resolved by field name at
/// serialization time.
pub struct SchemaAccessorRule;

impl SuppressRule for SchemaAccessorRule {
    fn suppresses(&self, item: &Definition) -> bool {
        item.kind == DefinitionKind::UnusedFunction
            && item.name.starts_with("get_")
            && item.container_bases.iter().any(|base| base == "Schema")
    }
}
