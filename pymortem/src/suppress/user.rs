//! The user suppression rule.
//!
//! A statically-typed replacement for an executable ignore script: a TOML
//! file at a fixed conventional path declares name globs, path globs, and
//! finding kinds to hide. Absence means no suppressions; a malformed file
//! or pattern is an error surfaced when the rule is loaded.

use super::SuppressRule;
use crate::index::{Definition, DefinitionKind};
use crate::utils::normalize_display_path;
use anyhow::{anyhow, Context, Result};
use globset::{Glob, GlobMatcher};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct UserRuleConfig {
    #[serde(default)]
    ignore_names: Vec<String>,
    #[serde(default)]
    ignore_paths: Vec<String>,
    #[serde(default)]
    ignore_kinds: Vec<DefinitionKind>,
}

/// Suppressions declared by the analyzed project itself.
pub struct UserRule {
    name_matchers: Vec<GlobMatcher>,
    path_matchers: Vec<GlobMatcher>,
    kinds: Vec<DefinitionKind>,
}

impl UserRule {
    /// Loads the rule from `path`. `Ok(None)` when no config file exists.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: UserRuleConfig = toml::from_str(&content)
            .with_context(|| format!("invalid suppression config {}", path.display()))?;

        Ok(Some(Self {
            name_matchers: compile(&config.ignore_names)?,
            path_matchers: compile(&config.ignore_paths)?,
            kinds: config.ignore_kinds,
        }))
    }
}

impl SuppressRule for UserRule {
    fn suppresses(&self, item: &Definition) -> bool {
        self.kinds.contains(&item.kind)
            || super::matches_any(&self.name_matchers, &item.name)
            || super::matches_any(&self.path_matchers, &normalize_display_path(&item.file))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<GlobMatcher>> {
    patterns
        .iter()
        .map(|pattern| {
            Glob::new(pattern)
                .map(|glob| glob.compile_matcher())
                .map_err(|error| anyhow!("invalid suppression pattern {pattern:?}: {error}"))
        })
        .collect()
}
