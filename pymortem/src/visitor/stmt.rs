#![allow(missing_docs)]

use super::*;

impl<'ix, 'ast> SymbolWalker<'ix, 'ast> {
    pub(super) fn dispatch_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::FunctionDef(node) => self.handle_function_def(node),
            Stmt::ClassDef(node) => self.handle_class_def(node),
            Stmt::Import(node) => self.handle_import(node),
            Stmt::ImportFrom(node) => self.handle_import_from(node),
            Stmt::Assign(node) => self.handle_assign(node),
            Stmt::AugAssign(node) => {
                self.visit_expr(&node.target);
                self.visit_expr(&node.value);
            }
            Stmt::AnnAssign(node) => self.handle_ann_assign(node),
            Stmt::Return(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Stmt::Delete(node) => {
                for target in &node.targets {
                    self.visit_expr(target);
                }
            }
            Stmt::For(node) => self.handle_for(node),
            Stmt::While(node) => self.handle_while(node),
            Stmt::If(node) => self.handle_if(node),
            Stmt::With(node) => self.handle_with(node),
            Stmt::Match(node) => self.handle_match(node),
            Stmt::Raise(node) => {
                if let Some(exc) = &node.exc {
                    self.visit_expr(exc);
                }
                if let Some(cause) = &node.cause {
                    self.visit_expr(cause);
                }
            }
            Stmt::Try(node) => self.handle_try(node),
            Stmt::Assert(node) => {
                self.visit_expr(&node.test);
                if let Some(msg) = &node.msg {
                    self.visit_expr(msg);
                }
            }
            Stmt::Expr(node) => self.visit_expr(&node.value),
            _ => {}
        }
    }

    /// Every function definition (sync or async; one AST kind) is a
    /// candidate unused function.
    fn handle_function_def(&mut self, node: &'ast ast::StmtFunctionDef) {
        self.define_symbol(
            node.name.to_string(),
            DefinitionKind::UnusedFunction,
            Some(node.name.range().start()),
        );

        for decorator in &node.decorator_list {
            self.visit_expr(&decorator.expression);
        }
        self.visit_parameters(&node.parameters);
        if let Some(returns) = &node.returns {
            self.visit_expr(returns);
            self.walk_annotation_expr(returns);
        }
        for stmt in &node.body {
            self.visit_stmt(stmt);
        }
    }

    /// A class is registered once per decorator; undecorated classes are
    /// never flagged as unused classes.
    fn handle_class_def(&mut self, node: &'ast ast::StmtClassDef) {
        for _ in &node.decorator_list {
            self.define_symbol(
                node.name.to_string(),
                DefinitionKind::UnusedClass,
                Some(node.name.range().start()),
            );
        }

        for decorator in &node.decorator_list {
            self.visit_expr(&decorator.expression);
        }
        for base in node.bases() {
            self.visit_expr(base);
        }
        for keyword in node.keywords() {
            self.visit_expr(&keyword.value);
        }
        for stmt in &node.body {
            self.visit_stmt(stmt);
        }
    }

    fn handle_import(&mut self, node: &'ast ast::StmtImport) {
        for alias in &node.names {
            self.register_import_alias(alias);
        }
    }

    fn handle_import_from(&mut self, node: &'ast ast::StmtImportFrom) {
        if let Some(module) = &node.module {
            if module.as_str() == "__future__" {
                return;
            }
        }
        for alias in &node.names {
            self.register_import_alias(alias);
        }
    }

    /// The imported binding is `asname` when present, else the first dotted
    /// segment of the module path. An explicit alias also marks the full
    /// dotted name as used, since the original name is re-exported under
    /// the alias.
    fn register_import_alias(&mut self, alias: &'ast ast::Alias) {
        let position = Some(alias.range().start());
        match &alias.asname {
            Some(asname) => {
                self.define_symbol(asname.to_string(), DefinitionKind::UnusedImport, position);
                self.mark_used(alias.name.to_string());
            }
            None => {
                let base_name = alias.name.as_str().split('.').next().unwrap_or_default();
                self.define_symbol(base_name.to_owned(), DefinitionKind::UnusedImport, position);
            }
        }
    }

    /// `__all__ = [...]` declares the file's public surface: every string
    /// element counts as a usage. Other assignment shapes fall through to
    /// the generic target/value traversal.
    fn handle_assign(&mut self, node: &'ast ast::StmtAssign) {
        let exports_target = node
            .targets
            .iter()
            .any(|target| matches!(target, Expr::Name(name) if name.id.as_str() == "__all__"));
        if exports_target {
            let elements = match &*node.value {
                Expr::List(list) => Some(&list.elts),
                Expr::Tuple(tuple) => Some(&tuple.elts),
                _ => None,
            };
            if let Some(elements) = elements {
                for element in elements {
                    if let Expr::StringLiteral(literal) = element {
                        self.mark_used(literal.value.to_string());
                    }
                }
            }
        }

        for target in &node.targets {
            self.visit_expr(target);
        }
        self.visit_expr(&node.value);
    }

    fn handle_ann_assign(&mut self, node: &'ast ast::StmtAnnAssign) {
        self.visit_expr(&node.target);
        self.visit_expr(&node.annotation);
        self.walk_annotation_expr(&node.annotation);
        if let Some(value) = &node.value {
            self.visit_expr(value);
        }
    }

    fn handle_for(&mut self, node: &'ast ast::StmtFor) {
        self.visit_expr(&node.target);
        self.visit_expr(&node.iter);
        for stmt in &node.body {
            self.visit_stmt(stmt);
        }
        for stmt in &node.orelse {
            self.visit_stmt(stmt);
        }
    }

    fn handle_while(&mut self, node: &'ast ast::StmtWhile) {
        self.visit_expr(&node.test);
        for stmt in &node.body {
            self.visit_stmt(stmt);
        }
        for stmt in &node.orelse {
            self.visit_stmt(stmt);
        }
    }

    fn handle_if(&mut self, node: &'ast ast::StmtIf) {
        self.visit_expr(&node.test);
        for stmt in &node.body {
            self.visit_stmt(stmt);
        }
        for clause in &node.elif_else_clauses {
            if let Some(test) = &clause.test {
                self.visit_expr(test);
            }
            for stmt in &clause.body {
                self.visit_stmt(stmt);
            }
        }
    }

    fn handle_with(&mut self, node: &'ast ast::StmtWith) {
        for item in &node.items {
            self.visit_expr(&item.context_expr);
            if let Some(optional_vars) = &item.optional_vars {
                self.visit_expr(optional_vars);
            }
        }
        for stmt in &node.body {
            self.visit_stmt(stmt);
        }
    }

    fn handle_match(&mut self, node: &'ast ast::StmtMatch) {
        self.visit_expr(&node.subject);
        for case in &node.cases {
            self.visit_pattern(&case.pattern);
            if let Some(guard) = &case.guard {
                self.visit_expr(guard);
            }
            for stmt in &case.body {
                self.visit_stmt(stmt);
            }
        }
    }

    fn handle_try(&mut self, node: &'ast ast::StmtTry) {
        for stmt in &node.body {
            self.visit_stmt(stmt);
        }
        for ast::ExceptHandler::ExceptHandler(handler) in &node.handlers {
            if let Some(exception_type) = &handler.type_ {
                self.visit_expr(exception_type);
            }
            for stmt in &handler.body {
                self.visit_stmt(stmt);
            }
        }
        for stmt in &node.orelse {
            self.visit_stmt(stmt);
        }
        for stmt in &node.finalbody {
            self.visit_stmt(stmt);
        }
    }
}
