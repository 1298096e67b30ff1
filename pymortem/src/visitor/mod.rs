//! The tree walker and node dispatcher.
//!
//! `SymbolWalker` performs a depth-first, pre-order traversal of one file's
//! syntax tree, maintaining the ancestry path from the module root down to
//! the current node. At each node the dispatcher runs at most one handler
//! (matched on the AST variant; everything else is traversal-only), and
//! handlers write definitions and usages into the shared [`SymbolIndex`].

use crate::index::{Definition, DefinitionKind, SymbolIndex};
use crate::navigate::{self, NodeRef};
use crate::templates;
use crate::utils::LineIndex;
use ruff_python_ast::{self as ast, Expr, Stmt};
use ruff_text_size::{Ranged, TextSize};
use smallvec::SmallVec;
use std::path::PathBuf;
use std::sync::Arc;

mod annotations;
mod expr;
mod patterns;
mod stmt;

/// Guard against stack overflow on pathologically nested sources.
pub(crate) const MAX_RECURSION_DEPTH: usize = 400;

/// Walks one file's tree and records definitions and usages.
pub struct SymbolWalker<'ix, 'ast> {
    index: &'ix mut SymbolIndex,
    /// The path of the file being walked.
    /// Uses `Arc` to share with all definitions without cloning.
    file: Arc<PathBuf>,
    line_index: &'ix LineIndex,
    /// Chain of nodes from the module root down to the current node; the
    /// current node is always the last element while its handler runs.
    ancestry: Vec<NodeRef<'ast>>,
    depth: usize,
}

impl<'ix, 'ast> SymbolWalker<'ix, 'ast> {
    /// Creates a walker feeding `index`.
    pub fn new(index: &'ix mut SymbolIndex, file: Arc<PathBuf>, line_index: &'ix LineIndex) -> Self {
        Self {
            index,
            file,
            line_index,
            ancestry: Vec::new(),
            depth: 0,
        }
    }

    /// Walks a parsed module from the root.
    pub fn walk_module(&mut self, module: &'ast ast::ModModule) {
        self.ancestry.push(NodeRef::Module(module));
        for stmt in &module.body {
            self.visit_stmt(stmt);
        }
        self.ancestry.pop();
    }

    /// Visits one statement: push, dispatch (handler plus children), pop.
    pub fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        if self.depth >= MAX_RECURSION_DEPTH {
            return;
        }
        self.depth += 1;
        self.ancestry.push(NodeRef::Stmt(stmt));
        self.dispatch_stmt(stmt);
        self.ancestry.pop();
        self.depth -= 1;
    }

    /// Visits one expression: push, dispatch (handler plus children), pop.
    pub fn visit_expr(&mut self, expr: &'ast Expr) {
        if self.depth >= MAX_RECURSION_DEPTH {
            return;
        }
        self.depth += 1;
        self.ancestry.push(NodeRef::Expr(expr));
        self.dispatch_expr(expr);
        self.ancestry.pop();
        self.depth -= 1;
    }

    /// Visits one match pattern: push, dispatch, pop.
    pub fn visit_pattern(&mut self, pattern: &'ast ast::Pattern) {
        if self.depth >= MAX_RECURSION_DEPTH {
            return;
        }
        self.depth += 1;
        self.ancestry.push(NodeRef::Pattern(pattern));
        self.dispatch_pattern(pattern);
        self.ancestry.pop();
        self.depth -= 1;
    }

    fn mark_used<S: Into<String>>(&mut self, name: S) {
        self.index.mark_used(name);
    }

    /// Registers a definition, capturing the ancestry projections the
    /// suppression rules consume. `at` is the byte offset of the defining
    /// node; `None` pins the position to 1:1.
    fn define_symbol<S: Into<String>>(&mut self, name: S, kind: DefinitionKind, at: Option<TextSize>) {
        let (line, col) = match at {
            Some(offset) => (
                self.line_index.line_index(offset),
                self.line_index.column_index(offset),
            ),
            None => (1, 1),
        };

        let mut container_bases = SmallVec::new();
        if let Some(container) = navigate::enclosing_node(&self.ancestry) {
            for base in navigate::base_classes(container) {
                let identifier = navigate::bare_identifier(base);
                if !identifier.is_empty() {
                    container_bases.push(identifier.to_owned());
                }
            }
        }

        let mut call_decorators = SmallVec::new();
        let mut attr_root = None;
        if let Some(own) = self.ancestry.last().copied() {
            for decorator in navigate::decorators(own) {
                if let Expr::Call(call) = &decorator.expression {
                    let identifier = navigate::bare_identifier(&call.func);
                    if !identifier.is_empty() {
                        call_decorators.push(identifier.to_owned());
                    }
                }
            }
            if let NodeRef::Expr(expr) = own {
                if let Some(root) = navigate::attr_chain_root(expr) {
                    attr_root = Some(navigate::bare_identifier(root).to_owned());
                }
            }
        }

        self.index.define(Definition {
            file: Arc::clone(&self.file),
            name: name.into(),
            kind,
            line,
            col,
            container_bases,
            call_decorators,
            attr_root,
        });
    }

    /// Visits parameter annotations (including embedded string annotations)
    /// and default values. Parameter names themselves are identifiers, not
    /// name nodes, and are not registered as definitions.
    fn visit_parameters(&mut self, parameters: &'ast ast::Parameters) {
        for arg in &parameters.posonlyargs {
            self.visit_parameter_with_default(arg);
        }
        for arg in &parameters.args {
            self.visit_parameter_with_default(arg);
        }
        if let Some(vararg) = &parameters.vararg {
            self.visit_parameter(vararg);
        }
        for arg in &parameters.kwonlyargs {
            self.visit_parameter_with_default(arg);
        }
        if let Some(kwarg) = &parameters.kwarg {
            self.visit_parameter(kwarg);
        }
    }

    fn visit_parameter_with_default(&mut self, arg: &'ast ast::ParameterWithDefault) {
        self.visit_parameter(&arg.parameter);
        if let Some(default) = &arg.default {
            self.visit_expr(default);
        }
    }

    fn visit_parameter(&mut self, parameter: &'ast ast::Parameter) {
        if let Some(annotation) = &parameter.annotation {
            self.visit_expr(annotation);
            self.walk_annotation_expr(annotation);
        }
    }
}

/// Exactly a zero-argument call to the reflective `locals()` builtin.
fn is_locals_call(expr: &Expr) -> bool {
    let Expr::Call(call) = expr else {
        return false;
    };
    let Expr::Name(func) = &*call.func else {
        return false;
    };
    func.id.as_str() == "locals"
        && call.arguments.args.is_empty()
        && call.arguments.keywords.is_empty()
}
