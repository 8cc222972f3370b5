//! The simplified output variant: one record per declaration-name
//! occurrence, in traversal order, with no def/use distinction and no
//! scope tracking.

use defuse_common::Ident;
use defuse_parser::syntax::*;

/// Collect every declared identifier occurrence in one file.
pub fn collect_occurrences(unit: &CompilationUnit) -> Vec<Ident> {
    let mut out = Vec::new();
    for decl in &unit.types {
        walk_type(decl, &mut out);
    }
    out
}

fn walk_type(decl: &TypeDecl, out: &mut Vec<Ident>) {
    out.push(Ident::ty(decl.name.clone()));
    for constant in &decl.constants {
        out.push(Ident::var(constant.name.clone()));
        for arg in &constant.args {
            walk_expr(arg, out);
        }
        if let Some(body) = &constant.body {
            walk_members(body, out);
        }
    }
    walk_members(&decl.members, out);
}

fn walk_members(members: &[Member], out: &mut Vec<Ident>) {
    for member in members {
        match member {
            Member::Field(field) => {
                for fragment in &field.fragments {
                    out.push(Ident::var(fragment.name.clone()));
                    if let Some(init) = &fragment.init {
                        walk_expr(init, out);
                    }
                }
            }
            Member::Method(method) => {
                out.push(Ident::func(method.name.clone()));
                for param in &method.params {
                    out.push(Ident::var(param.name.clone()));
                }
                if let Some(body) = &method.body {
                    walk_block(body, out);
                }
            }
            Member::Initializer(init) => walk_block(&init.body, out),
            Member::Type(decl) => walk_type(decl, out),
        }
    }
}

fn walk_block(block: &Block, out: &mut Vec<Ident>) {
    for stmt in &block.stmts {
        walk_stmt(stmt, out);
    }
}

fn walk_stmt(stmt: &Stmt, out: &mut Vec<Ident>) {
    match stmt {
        Stmt::Block(block) => walk_block(block, out),
        Stmt::LocalVar(decl) => walk_local(decl, out),
        Stmt::LocalType(decl) => walk_type(decl, out),
        Stmt::Expr(expr) => walk_expr(expr, out),
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => {
            walk_expr(cond, out);
            walk_stmt(then_branch, out);
            if let Some(else_branch) = else_branch {
                walk_stmt(else_branch, out);
            }
        }
        Stmt::While { cond, body } => {
            walk_expr(cond, out);
            walk_stmt(body, out);
        }
        Stmt::Do { body, cond } => {
            walk_stmt(body, out);
            walk_expr(cond, out);
        }
        Stmt::For {
            init,
            cond,
            update,
            body,
        } => {
            for expr in init {
                walk_expr(expr, out);
            }
            if let Some(cond) = cond {
                walk_expr(cond, out);
            }
            for expr in update {
                walk_expr(expr, out);
            }
            walk_stmt(body, out);
        }
        Stmt::ForEach {
            param,
            iterable,
            body,
        } => {
            out.push(Ident::var(param.name.clone()));
            walk_expr(iterable, out);
            walk_stmt(body, out);
        }
        Stmt::Switch { scrutinee, arms } => {
            walk_expr(scrutinee, out);
            for arm in arms {
                for label in arm.labels.iter().flatten() {
                    walk_expr(label, out);
                }
                for stmt in &arm.stmts {
                    walk_stmt(stmt, out);
                }
            }
        }
        Stmt::Return(value) => {
            if let Some(value) = value {
                walk_expr(value, out);
            }
        }
        Stmt::Throw(value) => walk_expr(value, out),
        Stmt::Try {
            resources,
            body,
            catches,
            finally,
        } => {
            for resource in resources {
                walk_local(resource, out);
            }
            walk_block(body, out);
            for catch in catches {
                out.push(Ident::var(catch.param.name.clone()));
                walk_block(&catch.body, out);
            }
            if let Some(finally) = finally {
                walk_block(finally, out);
            }
        }
        Stmt::Synchronized { lock, body } => {
            walk_expr(lock, out);
            walk_block(body, out);
        }
        Stmt::Labeled { stmt, .. } => walk_stmt(stmt, out),
        Stmt::Assert { cond, message } => {
            walk_expr(cond, out);
            if let Some(message) = message {
                walk_expr(message, out);
            }
        }
        Stmt::Break | Stmt::Continue | Stmt::Empty => {}
    }
}

fn walk_local(decl: &LocalVarDecl, out: &mut Vec<Ident>) {
    for fragment in &decl.fragments {
        out.push(Ident::var(fragment.name.clone()));
        if let Some(init) = &fragment.init {
            walk_expr(init, out);
        }
    }
}

fn walk_expr(expr: &Expr, out: &mut Vec<Ident>) {
    match expr {
        Expr::Lambda(lambda) => {
            for param in &lambda.params {
                out.push(Ident::var(param.name.clone()));
            }
            match &lambda.body {
                LambdaBody::Expr(expr) => walk_expr(expr, out),
                LambdaBody::Block(block) => walk_block(block, out),
            }
        }
        Expr::InlineDecl { fragments, .. } => {
            for fragment in fragments {
                out.push(Ident::var(fragment.name.clone()));
                if let Some(init) = &fragment.init {
                    walk_expr(init, out);
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
                walk_expr(qualifier, out);
            }
            for arg in args {
                walk_expr(arg, out);
            }
            if let Some(members) = body {
                walk_members(members, out);
            }
        }
        Expr::Name(_)
        | Expr::This
        | Expr::Literal(_)
        | Expr::ClassLiteral
        | Expr::SuperField { .. } => {}
        Expr::Unary { operand, .. } => walk_expr(operand, out),
        Expr::Binary { lhs, rhs, .. } => {
            walk_expr(lhs, out);
            walk_expr(rhs, out);
        }
        Expr::Paren(inner) => walk_expr(inner, out),
        Expr::Assign { target, value } => {
            walk_expr(target, out);
            walk_expr(value, out);
        }
        Expr::Call { receiver, args, .. } => {
            if let Some(receiver) = receiver {
                walk_expr(receiver, out);
            }
            for arg in args {
                walk_expr(arg, out);
            }
        }
        Expr::SuperCall { args, .. } | Expr::ConstructorCall { args } => {
            for arg in args {
                walk_expr(arg, out);
            }
        }
        Expr::ArrayNew { dims, init, .. } => {
            for dim in dims {
                walk_expr(dim, out);
            }
            if let Some(init) = init {
                walk_expr(init, out);
            }
        }
        Expr::ArrayInit(elements) => {
            for element in elements {
                walk_expr(element, out);
            }
        }
        Expr::Index { array, index } => {
            walk_expr(array, out);
            walk_expr(index, out);
        }
        Expr::FieldAccess { object, .. } => walk_expr(object, out),
        Expr::Cast { expr, .. } => walk_expr(expr, out),
        Expr::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            walk_expr(cond, out);
            walk_expr(then_expr, out);
            walk_expr(else_expr, out);
        }
        Expr::InstanceOf { expr, .. } => walk_expr(expr, out),
        Expr::MethodRef { target, .. } => walk_expr(target, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use defuse_parser::parse;

    fn names(src: &str) -> Vec<String> {
        let unit = parse(src).expect("fixture must parse");
        collect_occurrences(&unit)
            .iter()
            .map(|i| i.to_string())
            .collect()
    }

    #[test]
    fn declarations_in_traversal_order() {
        let got = names(
            "package p;\nclass Foo { int f; Foo(int x) {} void run(String s) { int y = 0; } }",
        );
        assert_eq!(got, vec!["tFoo", "vf", "fFoo", "vx", "frun", "vs", "vy"]);
    }

    #[test]
    fn enums_and_nested_types() {
        let got = names("package p;\nenum Color { RED, GREEN;\n class Inner { void m() {} } }");
        assert_eq!(got, vec!["tColor", "vRED", "vGREEN", "tInner", "fm"]);
    }

    #[test]
    fn lambda_and_catch_variables_count() {
        let got = names(
            "package p;\nclass A { void m() { try { run(x -> x); } catch (Error e) {} } }",
        );
        assert_eq!(got, vec!["tA", "fm", "vx", "ve"]);
    }
}
