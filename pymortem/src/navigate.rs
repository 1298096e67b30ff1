//! Pure structural questions about a node and its ancestor chain.
//!
//! All functions here are total: a type mismatch yields an empty or `None`
//! result, never an error.

use ruff_python_ast::{self as ast, Expr, Stmt};

/// A borrowed reference to any node the walker keeps on its ancestry path.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    /// The file root.
    Module(&'a ast::ModModule),
    /// A statement node.
    Stmt(&'a Stmt),
    /// An expression node.
    Expr(&'a Expr),
    /// A structural-match pattern node.
    Pattern(&'a ast::Pattern),
}

/// The node containing the last element of `path`: the second-to-last entry,
/// or `None` when the path holds fewer than two nodes.
#[must_use]
pub fn enclosing_node<'a>(path: &[NodeRef<'a>]) -> Option<NodeRef<'a>> {
    if path.len() < 2 {
        return None;
    }
    path.get(path.len() - 2).copied()
}

/// Walks leftward through a chain of attribute accesses (`a.b.c`) to the
/// innermost root expression. `None` when `expr` is not an attribute access.
#[must_use]
pub fn attr_chain_root(expr: &Expr) -> Option<&Expr> {
    if !matches!(expr, Expr::Attribute(_)) {
        return None;
    }
    let mut root = expr;
    while let Expr::Attribute(attribute) = root {
        root = &attribute.value;
    }
    Some(root)
}

/// The declared base-class expressions when `node` is a class definition.
#[must_use]
pub fn base_classes<'a>(node: NodeRef<'a>) -> &'a [Expr] {
    match node {
        NodeRef::Stmt(Stmt::ClassDef(class_def)) => class_def.bases(),
        _ => &[],
    }
}

/// The decorator list when `node` is a function definition (sync or async).
#[must_use]
pub fn decorators<'a>(node: NodeRef<'a>) -> &'a [ast::Decorator] {
    match node {
        NodeRef::Stmt(Stmt::FunctionDef(function_def)) => &function_def.decorator_list,
        _ => &[],
    }
}

/// The identifier text when `expr` is a simple name reference, else `""`.
#[must_use]
pub fn bare_identifier(expr: &Expr) -> &str {
    match expr {
        Expr::Name(name) => name.id.as_str(),
        _ => "",
    }
}
