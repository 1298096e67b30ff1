//! Embedded annotation text.
//!
//! String-literal annotations are forward references: the identifiers they
//! mention are real usages even though the parser sees only a string. Each
//! one is re-parsed as an expression and the resulting sub-tree is walked
//! against the same index. Text that does not parse contributes nothing.

use super::*;

impl SymbolWalker<'_, '_> {
    /// Re-parses `annotation` when it is a string literal and walks the
    /// embedded expression tree.
    pub(super) fn walk_annotation_expr(&mut self, annotation: &Expr) {
        let Expr::StringLiteral(literal) = annotation else {
            return;
        };
        let text = literal.value.to_string();
        let Ok(parsed) = ruff_python_parser::parse_expression(&text) else {
            return;
        };
        let module = parsed.into_syntax();

        let line_index = LineIndex::new(&text);
        let mut embedded = SymbolWalker::new(&mut *self.index, Arc::clone(&self.file), &line_index);
        embedded.visit_expr(&module.body);
    }
}
