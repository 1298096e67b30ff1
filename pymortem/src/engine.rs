//! The project driver.
//!
//! One [`SymbolIndex`] per run: each file is read, parsed, and walked, and
//! the per-file results are absorbed into the shared index in input order.
//! Per-file work is independent, so it runs on the rayon pool with a merge
//! barrier at the end; the explicit report sort makes the fan-out
//! invisible in the output.

use crate::index::{Definition, SymbolIndex};
use crate::utils::{collect_python_files, LineIndex};
use crate::visitor::SymbolWalker;
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Drives the scan over a file list or a project directory.
#[derive(Debug, Clone)]
pub struct Morgue {
    respect_gitignore: bool,
}

impl Default for Morgue {
    fn default() -> Self {
        Self {
            respect_gitignore: true,
        }
    }
}

impl Morgue {
    /// Controls whether file discovery honors gitignore rules.
    #[must_use]
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Collects every `*.py` file under `root` and scans it.
    pub fn scan_project(&self, root: &Path) -> Result<SymbolIndex> {
        let files = collect_python_files(root, self.respect_gitignore);
        self.scan_files(&files)
    }

    /// Scans an explicit ordered file list against one shared index.
    ///
    /// The first failing file, in input order, aborts the whole run.
    pub fn scan_files(&self, files: &[PathBuf]) -> Result<SymbolIndex> {
        let per_file: Vec<Result<SymbolIndex>> =
            files.par_iter().map(|path| scan_file(path)).collect();

        let mut index = SymbolIndex::default();
        for result in per_file {
            index.absorb(result?);
        }
        Ok(index)
    }
}

/// Scans a single file into a fresh per-file index.
fn scan_file(path: &Path) -> Result<SymbolIndex> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let mut index = SymbolIndex::default();
    let file = Arc::new(path.to_path_buf());

    // A file with no content is itself the finding.
    if source.trim().is_empty() {
        let basename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        index.define(Definition::empty_file(file, basename));
        return Ok(index);
    }

    let module = ruff_python_parser::parse_module(&source)
        .map_err(|error| anyhow!("invalid syntax in {}: {error}", path.display()))?
        .into_syntax();

    let line_index = LineIndex::new(&source);
    let mut walker = SymbolWalker::new(&mut index, file, &line_index);
    walker.walk_module(&module);
    Ok(index)
}
