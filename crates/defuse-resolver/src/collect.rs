//! Pass 1: declaration collection.
//!
//! One full traversal per file, all files writing into one shared table.
//! The walk records every variable, parameter, field, method, constructor,
//! and enum-constant declaration under its scope-path key. Expressions are
//! traversed too: lambdas open scopes of their own and inline declarations
//! record like locals, so pass 2 can resolve names declared anywhere.

use crate::scope::{ScopeChain, ScopeRole};
use crate::table::SymbolTable;
use defuse_common::Ident;
use defuse_parser::syntax::*;
use tracing::debug;

/// Run pass 1 for one file, appending into the batch-wide table.
pub fn collect_declarations(unit: &CompilationUnit, table: &mut SymbolTable) {
    let mut collector = DeclarationCollector {
        table,
        scopes: ScopeChain::new(unit.package.as_deref().unwrap_or("")),
    };
    for decl in &unit.types {
        collector.collect_type(decl);
    }
    debug!(keys = collector.table.len(), "pass 1 done");
}

struct DeclarationCollector<'a> {
    table: &'a mut SymbolTable,
    scopes: ScopeChain,
}

impl DeclarationCollector<'_> {
    fn collect_type(&mut self, decl: &TypeDecl) {
        self.scopes.push(ScopeRole::Type, decl.name.clone());
        for constant in &decl.constants {
            // An enum constant is a variable of the enum's own type.
            let key = self.scopes.variable_key(&constant.name);
            self.table.record(key, Ident::ty(decl.name.clone()));
            for arg in &constant.args {
                self.collect_expr(arg);
            }
            if let Some(body) = &constant.body {
                self.collect_members(body);
            }
        }
        self.collect_members(&decl.members);
        self.scopes.pop();
    }

    fn collect_members(&mut self, members: &[Member]) {
        for member in members {
            match member {
                Member::Field(field) => self.collect_field(field),
                Member::Method(method) => self.collect_method(method),
                Member::Initializer(init) => {
                    self.scopes.push(ScopeRole::StaticInit, "static");
                    self.collect_block(&init.body);
                    self.scopes.pop();
                }
                Member::Type(decl) => self.collect_type(decl),
            }
        }
    }

    fn collect_field(&mut self, field: &FieldDecl) {
        for fragment in &field.fragments {
            // Keyed by the nearest enclosing type; a field without one is
            // silently skipped.
            if let Some(key) = self.scopes.field_record_key(&fragment.name) {
                self.table
                    .record(key.clone(), Ident::var(fragment.name.clone()));
                if let Some(type_name) = field.ty.name() {
                    self.table.record(key, Ident::ty(type_name));
                }
            }
            if let Some(init) = &fragment.init {
                self.collect_expr(init);
            }
        }
    }

    fn collect_method(&mut self, method: &MethodDecl) {
        self.scopes.push(ScopeRole::Method, method.name.clone());
        for param in &method.params {
            self.record_single_var(param);
        }
        if let Some(body) = &method.body {
            self.collect_block(body);
        }

        // Exit records under the method key: parameters, the function
        // itself, and the declared return type.
        let key = self.scopes.method_record_key();
        for param in &method.params {
            self.table
                .record(key.clone(), Ident::var(param.name.clone()));
            if let Some(type_name) = param.ty.as_ref().and_then(|t| t.name()) {
                self.table.record(key.clone(), Ident::ty(type_name));
            }
        }
        self.table.record(key.clone(), Ident::func(method.name.clone()));
        if let Some(return_name) = method.return_type.as_ref().and_then(|t| t.name()) {
            self.table.record(key, Ident::ty(return_name));
        }
        self.scopes.pop();
    }

    /// A parameter, catch variable, or enhanced-for variable declared in
    /// the current scope.
    fn record_single_var(&mut self, param: &Param) {
        let key = self.scopes.variable_key(&param.name);
        self.table.record(key.clone(), Ident::var(param.name.clone()));
        if let Some(type_name) = param.ty.as_ref().and_then(|t| t.name()) {
            self.table.record(key, Ident::ty(type_name));
        }
    }

    fn collect_block(&mut self, block: &Block) {
        self.scopes
            .push(ScopeRole::Block, block.span.start.to_string());
        for stmt in &block.stmts {
            self.collect_stmt(stmt);
        }
        self.scopes.pop();
    }

    fn collect_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.collect_block(block),
            Stmt::LocalVar(decl) => self.collect_local_var(decl),
            Stmt::LocalType(decl) => self.collect_type(decl),
            Stmt::Expr(expr) => self.collect_expr(expr),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.collect_expr(cond);
                self.collect_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.collect_stmt(else_branch);
                }
            }
            Stmt::While { cond, body } => {
                self.collect_expr(cond);
                self.collect_stmt(body);
            }
            Stmt::Do { body, cond } => {
                self.collect_stmt(body);
                self.collect_expr(cond);
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
            } => {
                for expr in init {
                    self.collect_expr(expr);
                }
                if let Some(cond) = cond {
                    self.collect_expr(cond);
                }
                for expr in update {
                    self.collect_expr(expr);
                }
                self.collect_stmt(body);
            }
            Stmt::ForEach {
                param,
                iterable,
                body,
            } => {
                self.record_single_var(param);
                self.collect_expr(iterable);
                self.collect_stmt(body);
            }
            Stmt::Switch { scrutinee, arms } => {
                self.collect_expr(scrutinee);
                for arm in arms {
                    for label in arm.labels.iter().flatten() {
                        self.collect_expr(label);
                    }
                    for stmt in &arm.stmts {
                        self.collect_stmt(stmt);
                    }
                }
            }
            Stmt::Return(value) => {
                if let Some(value) = value {
                    self.collect_expr(value);
                }
            }
            Stmt::Throw(value) => self.collect_expr(value),
            Stmt::Try {
                resources,
                body,
                catches,
                finally,
            } => {
                // Resource declarators themselves are not recorded, but
                // their initializers may hide lambdas.
                for resource in resources {
                    for fragment in &resource.fragments {
                        if let Some(init) = &fragment.init {
                            self.collect_expr(init);
                        }
                    }
                }
                self.collect_block(body);
                for catch in catches {
                    self.record_single_var(&catch.param);
                    self.collect_block(&catch.body);
                }
                if let Some(finally) = finally {
                    self.collect_block(finally);
                }
            }
            Stmt::Synchronized { lock, body } => {
                self.collect_expr(lock);
                self.collect_block(body);
            }
            Stmt::Labeled { stmt, .. } => self.collect_stmt(stmt),
            Stmt::Assert { cond, message } => {
                self.collect_expr(cond);
                if let Some(message) = message {
                    self.collect_expr(message);
                }
            }
            Stmt::Break | Stmt::Continue | Stmt::Empty => {}
        }
    }

    fn collect_local_var(&mut self, decl: &LocalVarDecl) {
        for fragment in &decl.fragments {
            let key = self.scopes.variable_key(&fragment.name);
            self.table
                .record(key.clone(), Ident::var(fragment.name.clone()));
            if let Some(type_name) = decl.ty.name() {
                self.table.record(key, Ident::ty(type_name));
            }
        }
        for fragment in &decl.fragments {
            if let Some(init) = &fragment.init {
                self.collect_expr(init);
            }
        }
    }

    /// Expressions are walked for the declarations they can contain:
    /// lambdas, anonymous class bodies, and inline declarations.
    fn collect_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Lambda(lambda) => self.collect_lambda(lambda),
            Expr::InlineDecl { ty, fragments } => {
                for fragment in fragments {
                    let key = self.scopes.variable_key(&fragment.name);
                    self.table
                        .record(key.clone(), Ident::var(fragment.name.clone()));
                    if let Some(type_name) = ty.name() {
                        self.table.record(key, Ident::ty(type_name));
                    }
                }
                for fragment in fragments {
                    if let Some(init) = &fragment.init {
                        self.collect_expr(init);
                    }
                }
            }
            Expr::New {
                qualifier,
                args,
                body,
                ..
            } => {
                if let Some(qualifier) = qualifier {
                    self.collect_expr(qualifier);
                }
                for arg in args {
                    self.collect_expr(arg);
                }
                if let Some(members) = body {
                    // Anonymous class: members walked without a type frame.
                    self.collect_members(members);
                }
            }
            Expr::Name(_)
            | Expr::This
            | Expr::Literal(_)
            | Expr::ClassLiteral
            | Expr::SuperField { .. } => {}
            Expr::Unary { operand, .. } => self.collect_expr(operand),
            Expr::Binary { lhs, rhs, .. } => {
                self.collect_expr(lhs);
                self.collect_expr(rhs);
            }
            Expr::Paren(inner) => self.collect_expr(inner),
            Expr::Assign { target, value } => {
                self.collect_expr(target);
                self.collect_expr(value);
            }
            Expr::Call { receiver, args, .. } => {
                if let Some(receiver) = receiver {
                    self.collect_expr(receiver);
                }
                for arg in args {
                    self.collect_expr(arg);
                }
            }
            Expr::SuperCall { args, .. } | Expr::ConstructorCall { args } => {
                for arg in args {
                    self.collect_expr(arg);
                }
            }
            Expr::ArrayNew { dims, init, .. } => {
                for dim in dims {
                    self.collect_expr(dim);
                }
                if let Some(init) = init {
                    self.collect_expr(init);
                }
            }
            Expr::ArrayInit(elements) => {
                for element in elements {
                    self.collect_expr(element);
                }
            }
            Expr::Index { array, index } => {
                self.collect_expr(array);
                self.collect_expr(index);
            }
            Expr::FieldAccess { object, .. } => self.collect_expr(object),
            Expr::Cast { expr, .. } => self.collect_expr(expr),
            Expr::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.collect_expr(cond);
                self.collect_expr(then_expr);
                self.collect_expr(else_expr);
            }
            Expr::InstanceOf { expr, .. } => self.collect_expr(expr),
            Expr::MethodRef { target, .. } => self.collect_expr(target),
        }
    }

    fn collect_lambda(&mut self, lambda: &LambdaExpr) {
        self.scopes
            .push(ScopeRole::Lambda, lambda.span.start.to_string());
        for param in &lambda.params {
            self.record_single_var(param);
        }
        match &lambda.body {
            LambdaBody::Expr(expr) => self.collect_expr(expr),
            LambdaBody::Block(block) => self.collect_block(block),
        }

        // Lambda exit records parameters under its own method key, the
        // same way a method does; there is no name or return type.
        let key = self.scopes.method_record_key();
        for param in &lambda.params {
            self.table
                .record(key.clone(), Ident::var(param.name.clone()));
            if let Some(type_name) = param.ty.as_ref().and_then(|t| t.name()) {
                self.table.record(key.clone(), Ident::ty(type_name));
            }
        }
        self.scopes.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use defuse_common::IdentKind;
    use defuse_parser::parse;

    fn collect(src: &str) -> SymbolTable {
        let unit = parse(src).expect("fixture must parse");
        let mut table = SymbolTable::new();
        collect_declarations(&unit, &mut table);
        table
    }

    #[test]
    fn local_declaration_records_variable_then_type() {
        let table = collect("package p;\nclass Foo { void m() { Bar x = null; } }");
        // The body block's label is the `{` offset.
        let key = table_key_for(&table, "x");
        let list = table.lookup(&key).unwrap();
        assert_eq!(list[0], Ident::var("x"));
        assert_eq!(list[1], Ident::ty("Bar"));
    }

    /// Find the unique variable key ending in `.name`; block labels carry
    /// source offsets, so tests locate keys by suffix.
    fn table_key_for(table: &SymbolTable, name: &str) -> String {
        let suffix = format!(".{name}");
        table
            .keys()
            .find(|key| key.starts_with('v') && key.ends_with(&suffix))
            .expect("key not found")
            .to_string()
    }

    #[test]
    fn field_records_under_enclosing_type() {
        let table = collect("package p;\nclass Foo { Bar f; }");
        let list = table.lookup("fTFoo.f").unwrap();
        assert_eq!(list, &[Ident::var("f"), Ident::ty("Bar")]);
    }

    #[test]
    fn method_key_lists_params_function_then_return() {
        let table = collect("package p;\nclass Foo { Bar run(Baz b, int n) { return null; } }");
        let list = table.lookup("mTFoo.Mrun").unwrap();
        let kinds: Vec<_> = list.iter().map(|i| (i.kind, i.name.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (IdentKind::Variable, "b"),
                (IdentKind::Type, "Baz"),
                (IdentKind::Variable, "n"),
                (IdentKind::Function, "run"),
                (IdentKind::Type, "Bar"),
            ]
        );
    }

    #[test]
    fn constructor_recorded_as_same_named_method() {
        let table = collect("package p;\nclass Foo { Foo(int x) {} }");
        let list = table.lookup("mTFoo.MFoo").unwrap();
        assert_eq!(list.last().unwrap(), &Ident::func("Foo"));
    }

    #[test]
    fn enum_constant_records_enum_type_under_variable_key() {
        let table = collect("package p;\nenum Color { RED, GREEN }");
        assert_eq!(
            table.lookup("vp.TColor.RED").unwrap(),
            &[Ident::ty("Color")]
        );
        assert_eq!(
            table.lookup("vp.TColor.GREEN").unwrap(),
            &[Ident::ty("Color")]
        );
    }

    #[test]
    fn field_without_enclosing_type_is_impossible_but_params_scope_to_method() {
        let table = collect("package p;\nclass Foo { void m(Bar b) {} }");
        assert_eq!(
            table.lookup("vp.TFoo.Mm.b").unwrap(),
            &[Ident::var("b"), Ident::ty("Bar")]
        );
    }

    #[test]
    fn generic_and_array_types_reduce_to_outer_name() {
        let table = collect(
            "package p;\nclass Foo { void m() { List<String> l = null; int[] a = null; Bar[] bs = null; } }",
        );
        let l_key = table_key_for(&table, "l");
        let list = table.lookup(&l_key).unwrap();
        assert_eq!(list[1], Ident::ty("List"));

        let a_key = table_key_for(&table, "a");
        // Primitive element type yields no type record.
        assert_eq!(table.lookup(&a_key).unwrap(), &[Ident::var("a")]);

        let bs_key = table_key_for(&table, "bs");
        assert_eq!(table.lookup(&bs_key).unwrap()[1], Ident::ty("Bar"));
    }

    #[test]
    fn lambda_params_record_in_lambda_scope() {
        let table = collect("package p;\nclass Foo { void m() { run(x -> x); } }");
        let key = table_key_for(&table, "x");
        assert!(key.contains("M:lambda"), "lambda scope missing: {key}");
        assert_eq!(table.lookup(&key).unwrap(), &[Ident::var("x")]);
    }
}
