//! Suppression rules.
//!
//! Each rule is an independent, total predicate over a reported
//! [`Definition`]; any rule returning `true` hides the item. The engine
//! holds boxed rules so callers can add their own without any signature
//! change. Built-ins encode the framework conventions that would otherwise
//! flood the report with false positives; an optional user rule is loaded
//! once per run from a fixed conventional config path.

use crate::index::Definition;
use anyhow::Result;
use globset::{Glob, GlobMatcher};
use std::path::Path;

mod builtin;
mod user;

pub use builtin::{DunderPackageRule, FrameworkHookRule, SchemaAccessorRule, TestDoubleRule};
pub use user::UserRule;

/// Fixed conventional path, checked once per run in the working directory.
pub const USER_CONFIG_FILENAME: &str = ".pymortem.toml";

/// A predicate deciding whether a reported item should be hidden.
pub trait SuppressRule {
    /// Whether `item` should be suppressed. Must be total: context absent
    /// for the given definition kind means `false`, never a failure.
    fn suppresses(&self, item: &Definition) -> bool;
}

/// The composed rule set. Order-independent: any true predicate suppresses.
pub struct SuppressionEngine {
    rules: Vec<Box<dyn SuppressRule>>,
}

impl SuppressionEngine {
    /// An engine holding only the built-in rules.
    #[must_use]
    pub fn with_builtin_rules() -> Self {
        Self {
            rules: vec![
                Box::new(TestDoubleRule),
                Box::new(DunderPackageRule),
                Box::new(FrameworkHookRule),
                Box::new(SchemaAccessorRule),
            ],
        }
    }

    /// The built-in rules plus the user rule when `.pymortem.toml` exists
    /// in the working directory. A present-but-malformed config fails here,
    /// at load time, rather than per reported item.
    pub fn from_environment() -> Result<Self> {
        let mut engine = Self::with_builtin_rules();
        if let Some(user_rule) = UserRule::load(Path::new(USER_CONFIG_FILENAME))? {
            engine.push(Box::new(user_rule));
        }
        Ok(engine)
    }

    /// Adds a rule to the set.
    pub fn push(&mut self, rule: Box<dyn SuppressRule>) {
        self.rules.push(rule);
    }

    /// Whether any rule suppresses `item`.
    #[must_use]
    pub fn is_suppressed(&self, item: &Definition) -> bool {
        self.rules.iter().any(|rule| rule.suppresses(item))
    }
}

/// Compiles fnmatch-style patterns, dropping any that fail to parse.
/// Default glob semantics let `*` cross `/`, matching fnmatch.
pub(crate) fn compile_matchers(patterns: &[&str]) -> Vec<GlobMatcher> {
    patterns
        .iter()
        .filter_map(|pattern| Glob::new(pattern).ok())
        .map(|glob| glob.compile_matcher())
        .collect()
}

/// Whether `text` matches any of the compiled patterns.
pub(crate) fn matches_any(matchers: &[GlobMatcher], text: &str) -> bool {
    matchers.iter().any(|matcher| matcher.is_match(text))
}
