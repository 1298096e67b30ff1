#![allow(missing_docs)]

use super::*;

impl<'ix, 'ast> SymbolWalker<'ix, 'ast> {
    pub(super) fn dispatch_pattern(&mut self, pattern: &'ast ast::Pattern) {
        match pattern {
            ast::Pattern::MatchValue(node) => self.visit_expr(&node.value),
            // Literals (None, True, False): nothing to track.
            ast::Pattern::MatchSingleton(_) => {}
            ast::Pattern::MatchSequence(node) => {
                for inner in &node.patterns {
                    self.visit_pattern(inner);
                }
            }
            ast::Pattern::MatchMapping(node) => {
                for (key, value) in node.keys.iter().zip(&node.patterns) {
                    self.visit_expr(key);
                    self.visit_pattern(value);
                }
            }
            ast::Pattern::MatchClass(node) => self.handle_match_class(node),
            // Capture names are bare identifiers, not name nodes.
            ast::Pattern::MatchStar(_) => {}
            ast::Pattern::MatchAs(node) => {
                if let Some(inner) = &node.pattern {
                    self.visit_pattern(inner);
                }
            }
            ast::Pattern::MatchOr(node) => {
                for inner in &node.patterns {
                    self.visit_pattern(inner);
                }
            }
        }
    }

    /// `case Point(x=px, y=py)` proves that attributes `x` and `y` exist on
    /// the matched class: every keyword attribute counts as usage.
    fn handle_match_class(&mut self, node: &'ast ast::PatternMatchClass) {
        for keyword in &node.arguments.keywords {
            self.mark_used(keyword.attr.to_string());
        }

        self.visit_expr(&node.cls);
        for inner in &node.arguments.patterns {
            self.visit_pattern(inner);
        }
        for keyword in &node.arguments.keywords {
            self.visit_pattern(&keyword.pattern);
        }
    }
}
