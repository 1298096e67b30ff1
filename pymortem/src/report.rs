//! Unused-set computation, deterministic ordering, and rendering.

use crate::index::{Definition, SymbolIndex};
use crate::suppress::SuppressionEngine;
use crate::utils::normalize_display_path;
use anyhow::Result;

/// Every definition whose name was never observed as used, in insertion
/// order. A pure read over the index.
#[must_use]
pub fn unused_definitions(index: &SymbolIndex) -> Vec<&Definition> {
    index
        .definitions
        .iter()
        .filter(|definition| !index.is_used(&definition.name))
        .collect()
}

/// Discards every item some suppression rule hides.
#[must_use]
pub fn apply_suppressions<'a>(
    items: Vec<&'a Definition>,
    engine: &SuppressionEngine,
) -> Vec<&'a Definition> {
    items
        .into_iter()
        .filter(|item| !engine.is_suppressed(item))
        .collect()
}

/// Deterministic report order: file path and line dominate, ties break on
/// the case-insensitive name. Columns never participate.
pub fn sort_definitions(items: &mut [&Definition]) {
    items.sort_by_cached_key(|item| {
        (
            normalize_display_path(&item.file),
            item.line,
            item.name.to_lowercase(),
        )
    });
}

/// Renders one diagnostic line per item:
/// `<file>:<line>:<col>: <KIND> unused <name>`.
#[must_use]
pub fn render_text(items: &[&Definition]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{}:{}:{}: {} unused {}",
                normalize_display_path(&item.file),
                item.line,
                item.col,
                item.kind.as_str(),
                item.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the surviving items as a JSON array.
pub fn render_json(items: &[&Definition]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}
