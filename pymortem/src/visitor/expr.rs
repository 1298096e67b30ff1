#![allow(missing_docs)]

use super::*;

impl<'ix, 'ast> SymbolWalker<'ix, 'ast> {
    pub(super) fn dispatch_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Name(node) => self.handle_name(node),
            Expr::Attribute(node) => self.handle_attribute(node),
            Expr::Call(node) => self.handle_call(node),
            Expr::BinOp(node) => self.handle_bin_op(node),
            Expr::BoolOp(node) => {
                for value in &node.values {
                    self.visit_expr(value);
                }
            }
            Expr::Named(node) => {
                self.visit_expr(&node.target);
                self.visit_expr(&node.value);
            }
            Expr::UnaryOp(node) => self.visit_expr(&node.operand),
            Expr::Lambda(node) => {
                if let Some(parameters) = &node.parameters {
                    self.visit_parameters(parameters);
                }
                self.visit_expr(&node.body);
            }
            Expr::If(node) => {
                self.visit_expr(&node.test);
                self.visit_expr(&node.body);
                self.visit_expr(&node.orelse);
            }
            Expr::Dict(node) => {
                for item in &node.items {
                    if let Some(key) = &item.key {
                        self.visit_expr(key);
                    }
                    self.visit_expr(&item.value);
                }
            }
            Expr::Set(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::ListComp(node) => {
                self.visit_expr(&node.elt);
                self.visit_comprehensions(&node.generators);
            }
            Expr::SetComp(node) => {
                self.visit_expr(&node.elt);
                self.visit_comprehensions(&node.generators);
            }
            Expr::DictComp(node) => {
                self.visit_expr(&node.key);
                self.visit_expr(&node.value);
                self.visit_comprehensions(&node.generators);
            }
            Expr::Generator(node) => {
                self.visit_expr(&node.elt);
                self.visit_comprehensions(&node.generators);
            }
            Expr::Await(node) => self.visit_expr(&node.value),
            Expr::Yield(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Expr::YieldFrom(node) => self.visit_expr(&node.value),
            Expr::Compare(node) => {
                self.visit_expr(&node.left);
                for comparator in &node.comparators {
                    self.visit_expr(comparator);
                }
            }
            Expr::Subscript(node) => {
                self.visit_expr(&node.value);
                self.visit_expr(&node.slice);
            }
            Expr::FString(node) => {
                for part in &node.value {
                    match part {
                        ast::FStringPart::Literal(_) => {}
                        ast::FStringPart::FString(fstring) => {
                            for element in &fstring.elements {
                                if let ast::InterpolatedStringElement::Interpolation(interpolation) =
                                    element
                                {
                                    self.visit_expr(&interpolation.expression);
                                }
                            }
                        }
                    }
                }
            }
            Expr::List(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Tuple(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Slice(node) => {
                if let Some(lower) = &node.lower {
                    self.visit_expr(lower);
                }
                if let Some(upper) = &node.upper {
                    self.visit_expr(upper);
                }
                if let Some(step) = &node.step {
                    self.visit_expr(step);
                }
            }
            Expr::Starred(node) => self.visit_expr(&node.value),
            _ => {}
        }
    }

    /// Reads and deletes count as usage (except the noise names `object`
    /// and `self`); binds register an unused-variable candidate.
    fn handle_name(&mut self, node: &'ast ast::ExprName) {
        if node.ctx.is_load() || matches!(node.ctx, ast::ExprContext::Del) {
            let id = node.id.as_str();
            if id != "object" && id != "self" {
                self.mark_used(id.to_owned());
            }
        } else if matches!(node.ctx, ast::ExprContext::Store) {
            self.define_symbol(
                node.id.to_string(),
                DefinitionKind::UnusedVariable,
                Some(node.range().start()),
            );
        }
    }

    fn handle_attribute(&mut self, node: &'ast ast::ExprAttribute) {
        match node.ctx {
            ast::ExprContext::Store => self.define_symbol(
                node.attr.to_string(),
                DefinitionKind::UnusedAttribute,
                Some(node.range().start()),
            ),
            ast::ExprContext::Load => self.mark_used(node.attr.to_string()),
            _ => {}
        }
        self.visit_expr(&node.value);
    }

    /// Two independent reflection heuristics, then generic traversal.
    fn handle_call(&mut self, node: &'ast ast::ExprCall) {
        // getattr(x, "attr", ...) / hasattr(x, "attr") count as usage of "attr".
        if let Expr::Name(func) = &*node.func {
            let argc = node.arguments.args.len();
            let is_reflective = (func.id.as_str() == "getattr" && (2..=3).contains(&argc))
                || (func.id.as_str() == "hasattr" && argc == 2);
            if is_reflective {
                if let Some(Expr::StringLiteral(literal)) = node.arguments.args.get(1) {
                    self.mark_used(literal.value.to_string());
                }
            }
        }

        // "...{field}...".format(**locals()) pulls its fields from the local
        // namespace; every field identifier counts as usage.
        if let Expr::Attribute(attr) = &*node.func {
            if attr.attr.as_str() == "format" {
                if let Expr::StringLiteral(template) = &*attr.value {
                    let splats_locals = node
                        .arguments
                        .keywords
                        .iter()
                        .any(|keyword| keyword.arg.is_none() && is_locals_call(&keyword.value));
                    if splats_locals {
                        for identifier in templates::format_identifiers(&template.value.to_string())
                        {
                            self.mark_used(identifier);
                        }
                    }
                }
            }
        }

        self.visit_expr(&node.func);
        for arg in &node.arguments.args {
            self.visit_expr(arg);
        }
        for keyword in &node.arguments.keywords {
            self.visit_expr(&keyword.value);
        }
    }

    /// `"...%(key)s..." % locals()` pulls its keys from the local namespace;
    /// every distinct placeholder counts as usage.
    fn handle_bin_op(&mut self, node: &'ast ast::ExprBinOp) {
        if let Expr::StringLiteral(template) = &*node.left {
            if matches!(node.op, ast::Operator::Mod) && is_locals_call(&node.right) {
                for placeholder in templates::percent_placeholders(&template.value.to_string()) {
                    self.mark_used(placeholder);
                }
            }
        }
        self.visit_expr(&node.left);
        self.visit_expr(&node.right);
    }

    fn visit_comprehensions(&mut self, generators: &'ast [ast::Comprehension]) {
        for comprehension in generators {
            self.visit_expr(&comprehension.target);
            self.visit_expr(&comprehension.iter);
            for if_expr in &comprehension.ifs {
                self.visit_expr(if_expr);
            }
        }
    }
}
