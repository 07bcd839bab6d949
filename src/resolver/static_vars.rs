use crate::core::value::Val;
use crate::error::{ReflectionError, Result};
use crate::parser::ast::visitor::{Visitor, walk_expr, walk_stmt};
use crate::parser::ast::{Expr, StaticVar, Stmt};
use crate::reflection::Subject;
use crate::resolver::ExpressionResolver;
use crate::runtime::context::ReflectionContext;
use indexmap::IndexMap;

/// Collects `static $name = ...;` declarations of one function body.
///
/// Closures, arrow functions, anonymous classes and nested declarations own
/// their static variables and are not entered.
pub struct StaticVariablesCollector<'a> {
    resolver: ExpressionResolver<'a>,
    variables: IndexMap<String, Val>,
    error: Option<ReflectionError>,
}

impl<'a> StaticVariablesCollector<'a> {
    pub fn new(subject: Subject<'a>, context: &'a dyn ReflectionContext) -> Self {
        Self {
            resolver: ExpressionResolver::new(subject, context),
            variables: IndexMap::new(),
            error: None,
        }
    }

    /// Variables in declaration order; a redeclared name keeps its first
    /// position and takes the last value
    pub fn collect(mut self, body: &[Stmt]) -> Result<IndexMap<String, Val>> {
        self.visit_statements(body);
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.variables),
        }
    }
}

impl<'ast> Visitor<'ast> for StaticVariablesCollector<'_> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::Function(_) | Stmt::ClassLike(_) => {}
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Closure { .. } | Expr::ArrowFunction { .. } | Expr::AnonymousClass { .. } => {}
            _ => walk_expr(self, expr),
        }
    }

    fn visit_static_var(&mut self, var: &'ast StaticVar) {
        if self.error.is_some() {
            return;
        }

        let value = match &var.default {
            Some(default) => match self.resolver.process(default) {
                Ok(resolution) => resolution.value,
                Err(err) => {
                    self.error = Some(err);
                    return;
                }
            },
            None => Val::Null,
        };

        self.variables
            .insert(var.name.trim_start_matches('$').to_owned(), value);
    }
}

pub fn collect_static_variables<'a>(
    body: &[Stmt],
    subject: Subject<'a>,
    context: &'a dyn ReflectionContext,
) -> Result<IndexMap<String, Val>> {
    StaticVariablesCollector::new(subject, context).collect(body)
}
