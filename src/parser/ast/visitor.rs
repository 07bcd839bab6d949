use super::*;

/// Depth-first traversal over the syntax tree.
///
/// Every `visit_*` hook defaults to the matching `walk_*` function, so an
/// implementation overrides only the nodes it cares about and calls the
/// walker to keep descending (or skips it to prune the subtree).
pub trait Visitor<'ast> {
    fn visit_statements(&mut self, statements: &'ast [Stmt]) {
        walk_statements(self, statements);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_arg(&mut self, arg: &'ast Arg) {
        walk_arg(self, arg);
    }

    fn visit_array_item(&mut self, item: &'ast ArrayItem) {
        walk_array_item(self, item);
    }

    fn visit_param(&mut self, param: &'ast Param) {
        walk_param(self, param);
    }

    fn visit_static_var(&mut self, var: &'ast StaticVar) {
        walk_static_var(self, var);
    }

    fn visit_match_arm(&mut self, arm: &'ast MatchArm) {
        walk_match_arm(self, arm);
    }

    fn visit_name(&mut self, name: &'ast Name) {
        let _ = name;
    }

    fn visit_case(&mut self, case: &'ast Case) {
        walk_case(self, case);
    }

    fn visit_catch(&mut self, catch: &'ast Catch) {
        walk_catch(self, catch);
    }

    fn visit_function(&mut self, function: &'ast FunctionDecl) {
        walk_function(self, function);
    }

    fn visit_class_like(&mut self, class: &'ast ClassLike) {
        walk_class_like(self, class);
    }

    fn visit_class_member(&mut self, member: &'ast ClassMember) {
        walk_class_member(self, member);
    }

    fn visit_const_item(&mut self, item: &'ast ConstItem) {
        walk_const_item(self, item);
    }

    fn visit_trait_adaptation(&mut self, adaptation: &'ast TraitAdaptation) {
        walk_trait_adaptation(self, adaptation);
    }

    fn visit_property_entry(&mut self, entry: &'ast PropertyEntry) {
        walk_property_entry(self, entry);
    }
}

pub fn walk_statements<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, statements: &'ast [Stmt]) {
    for stmt in statements {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Echo { exprs, .. } => walk_exprs(visitor, exprs),
        Stmt::Return { expr, .. } => {
            if let Some(expr) = expr {
                visitor.visit_expr(expr);
            }
        }
        Stmt::If {
            condition,
            then_block,
            else_block,
            ..
        } => {
            visitor.visit_expr(condition);
            visitor.visit_statements(then_block);
            if let Some(else_block) = else_block {
                visitor.visit_statements(else_block);
            }
        }
        Stmt::While {
            condition, body, ..
        } => {
            visitor.visit_expr(condition);
            visitor.visit_statements(body);
        }
        Stmt::DoWhile {
            body, condition, ..
        } => {
            visitor.visit_statements(body);
            visitor.visit_expr(condition);
        }
        Stmt::For {
            init,
            condition,
            loop_expr,
            body,
            ..
        } => {
            walk_exprs(visitor, init);
            walk_exprs(visitor, condition);
            walk_exprs(visitor, loop_expr);
            visitor.visit_statements(body);
        }
        Stmt::Foreach {
            expr,
            key_var,
            value_var,
            body,
            ..
        } => {
            visitor.visit_expr(expr);
            if let Some(key_var) = key_var {
                visitor.visit_expr(key_var);
            }
            visitor.visit_expr(value_var);
            visitor.visit_statements(body);
        }
        Stmt::Block { statements, .. } => visitor.visit_statements(statements),
        Stmt::Function(function) => visitor.visit_function(function),
        Stmt::ClassLike(class) => visitor.visit_class_like(class),
        Stmt::Namespace { name, body, .. } => {
            if let Some(name) = name {
                visitor.visit_name(name);
            }
            visitor.visit_statements(body);
        }
        Stmt::Use { uses, .. } => {
            for use_item in uses {
                visitor.visit_name(&use_item.name);
            }
        }
        Stmt::Switch {
            condition, cases, ..
        } => {
            visitor.visit_expr(condition);
            for case in cases {
                visitor.visit_case(case);
            }
        }
        Stmt::Try {
            body,
            catches,
            finally,
            ..
        } => {
            visitor.visit_statements(body);
            for catch in catches {
                visitor.visit_catch(catch);
            }
            if let Some(finally) = finally {
                visitor.visit_statements(finally);
            }
        }
        Stmt::Throw { expr, .. } | Stmt::Expression { expr, .. } => visitor.visit_expr(expr),
        Stmt::Const { consts, .. } => {
            for item in consts {
                visitor.visit_const_item(item);
            }
        }
        Stmt::Break { level, .. } | Stmt::Continue { level, .. } => {
            if let Some(level) = level {
                visitor.visit_expr(level);
            }
        }
        Stmt::Global { vars, .. } | Stmt::Unset { vars, .. } => walk_exprs(visitor, vars),
        Stmt::Static { vars, .. } => {
            for var in vars {
                visitor.visit_static_var(var);
            }
        }
        Stmt::InlineHtml { .. } | Stmt::Nop { .. } => {}
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    match expr {
        Expr::Assign { var, expr, .. } | Expr::AssignOp { var, expr, .. } => {
            visitor.visit_expr(var);
            visitor.visit_expr(expr);
        }
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Unary { expr, .. }
        | Expr::PostInc { var: expr, .. }
        | Expr::PostDec { var: expr, .. }
        | Expr::Print { expr, .. }
        | Expr::Cast { expr, .. }
        | Expr::Empty { expr, .. }
        | Expr::Include { expr, .. } => visitor.visit_expr(expr),
        Expr::Call { func, args, .. }
        | Expr::MethodCall {
            target: func, args, ..
        } => {
            visitor.visit_expr(func);
            walk_args(visitor, args);
        }
        Expr::StaticCall {
            class,
            method,
            args,
            ..
        } => {
            walk_class_name(visitor, class);
            visitor.visit_expr(method);
            walk_args(visitor, args);
        }
        Expr::Array { items, .. } => {
            for item in items {
                visitor.visit_array_item(item);
            }
        }
        Expr::ArrayDimFetch { array, dim, .. } => {
            visitor.visit_expr(array);
            if let Some(dim) = dim {
                visitor.visit_expr(dim);
            }
        }
        Expr::PropertyFetch {
            target, property, ..
        } => {
            visitor.visit_expr(target);
            visitor.visit_expr(property);
        }
        Expr::ClassConstFetch { class, .. } => walk_class_name(visitor, class),
        Expr::ConstFetch { name, .. } => visitor.visit_name(name),
        Expr::New { class, args, .. } => {
            walk_class_name(visitor, class);
            walk_args(visitor, args);
        }
        Expr::InterpolatedString { parts, .. } => walk_exprs(visitor, parts),
        Expr::Ternary {
            condition,
            if_true,
            if_false,
            ..
        } => {
            visitor.visit_expr(condition);
            if let Some(if_true) = if_true {
                visitor.visit_expr(if_true);
            }
            visitor.visit_expr(if_false);
        }
        Expr::Match {
            condition, arms, ..
        } => {
            visitor.visit_expr(condition);
            for arm in arms {
                visitor.visit_match_arm(arm);
            }
        }
        Expr::AnonymousClass { args, class, .. } => {
            walk_args(visitor, args);
            visitor.visit_class_like(class);
        }
        Expr::Isset { vars, .. } => walk_exprs(visitor, vars),
        Expr::Closure { params, body, .. } => {
            walk_params(visitor, params);
            visitor.visit_statements(body);
        }
        Expr::ArrowFunction { params, expr, .. } => {
            walk_params(visitor, params);
            visitor.visit_expr(expr);
        }
        Expr::Variable { .. }
        | Expr::Integer { .. }
        | Expr::Float { .. }
        | Expr::String { .. }
        | Expr::MagicConst { .. }
        | Expr::Error { .. } => {}
    }
}

pub fn walk_arg<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, arg: &'ast Arg) {
    visitor.visit_expr(&arg.value);
}

pub fn walk_array_item<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, item: &'ast ArrayItem) {
    if let Some(key) = &item.key {
        visitor.visit_expr(key);
    }
    visitor.visit_expr(&item.value);
}

pub fn walk_param<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, param: &'ast Param) {
    if let Some(default) = &param.default {
        visitor.visit_expr(default);
    }
}

pub fn walk_static_var<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, var: &'ast StaticVar) {
    if let Some(default) = &var.default {
        visitor.visit_expr(default);
    }
}

pub fn walk_match_arm<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, arm: &'ast MatchArm) {
    if let Some(conditions) = &arm.conditions {
        walk_exprs(visitor, conditions);
    }
    visitor.visit_expr(&arm.body);
}

pub fn walk_case<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, case: &'ast Case) {
    if let Some(condition) = &case.condition {
        visitor.visit_expr(condition);
    }
    visitor.visit_statements(&case.body);
}

pub fn walk_catch<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, catch: &'ast Catch) {
    walk_names(visitor, &catch.types);
    visitor.visit_statements(&catch.body);
}

pub fn walk_function<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    function: &'ast FunctionDecl,
) {
    walk_params(visitor, &function.params);
    visitor.visit_statements(&function.body);
}

pub fn walk_class_like<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, class: &'ast ClassLike) {
    walk_names(visitor, &class.extends);
    walk_names(visitor, &class.implements);
    for member in &class.members {
        visitor.visit_class_member(member);
    }
}

pub fn walk_class_member<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    member: &'ast ClassMember,
) {
    match member {
        ClassMember::Property { entries, .. } => {
            for entry in entries {
                visitor.visit_property_entry(entry);
            }
        }
        ClassMember::Method { function, .. } => visitor.visit_function(function),
        ClassMember::Const { consts, .. } => {
            for item in consts {
                visitor.visit_const_item(item);
            }
        }
        ClassMember::TraitUse {
            traits,
            adaptations,
            ..
        } => {
            walk_names(visitor, traits);
            for adaptation in adaptations {
                visitor.visit_trait_adaptation(adaptation);
            }
        }
        ClassMember::Case { value, .. } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
    }
}

pub fn walk_const_item<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, item: &'ast ConstItem) {
    visitor.visit_expr(&item.value);
}

pub fn walk_trait_adaptation<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    adaptation: &'ast TraitAdaptation,
) {
    match adaptation {
        TraitAdaptation::Precedence {
            method, insteadof, ..
        } => {
            if let Some(trait_name) = &method.trait_name {
                visitor.visit_name(trait_name);
            }
            walk_names(visitor, insteadof);
        }
        TraitAdaptation::Alias { method, .. } => {
            if let Some(trait_name) = &method.trait_name {
                visitor.visit_name(trait_name);
            }
        }
    }
}

pub fn walk_property_entry<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    entry: &'ast PropertyEntry,
) {
    if let Some(default) = &entry.default {
        visitor.visit_expr(default);
    }
}

fn walk_class_name<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, class: &'ast ClassName) {
    match class {
        ClassName::Name(name) => visitor.visit_name(name),
        ClassName::Expr(expr) => visitor.visit_expr(expr),
    }
}

fn walk_exprs<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, exprs: &'ast [Expr]) {
    for expr in exprs {
        visitor.visit_expr(expr);
    }
}

fn walk_args<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, args: &'ast [Arg]) {
    for arg in args {
        visitor.visit_arg(arg);
    }
}

fn walk_params<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, params: &'ast [Param]) {
    for param in params {
        visitor.visit_param(param);
    }
}

fn walk_names<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, names: &'ast [Name]) {
    for name in names {
        visitor.visit_name(name);
    }
}
