use crate::core::value::Val;
use crate::error::Result;
use crate::parser::ast::{FunctionDecl, Param};
use crate::reflection::Subject;
use crate::reflection::class::ReflectionClass;
use crate::resolver::static_vars::collect_static_variables;
use crate::resolver::{ExpressionResolver, Resolution};
use crate::runtime::context::ReflectionContext;
use indexmap::IndexMap;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct ReflectionFunction {
    name: String,
    node: Rc<FunctionDecl>,
    file_name: Option<String>,
}

impl ReflectionFunction {
    pub fn new(name: &str, node: Rc<FunctionDecl>, file_name: Option<&str>) -> Self {
        Self {
            name: name.trim_start_matches('\\').to_owned(),
            node,
            file_name: file_name.map(str::to_owned),
        }
    }

    /// Fully qualified name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        self.name
            .rsplit_once('\\')
            .map_or(self.name.as_str(), |(_, short)| short)
    }

    pub fn namespace_name(&self) -> &str {
        self.name
            .rsplit_once('\\')
            .map_or("", |(namespace, _)| namespace)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn node(&self) -> &FunctionDecl {
        &self.node
    }

    pub fn static_variables(&self, ctx: &dyn ReflectionContext) -> Result<IndexMap<String, Val>> {
        collect_static_variables(&self.node.body, Subject::Function(self), ctx)
    }

    pub fn parameter_default(
        &self,
        name: &str,
        ctx: &dyn ReflectionContext,
    ) -> Result<Option<Resolution>> {
        parameter_default(&self.node.params, name, Subject::Function(self), ctx)
    }
}

#[derive(Debug, Clone)]
pub struct ReflectionMethod {
    class: Rc<ReflectionClass>,
    name: String,
}

impl ReflectionMethod {
    pub fn new(class: Rc<ReflectionClass>, name: &str) -> Self {
        Self {
            class,
            name: name.to_owned(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declaring class
    pub fn class(&self) -> &Rc<ReflectionClass> {
        &self.class
    }

    pub fn file_name(&self) -> Option<&str> {
        self.class.file_name()
    }

    pub fn node(&self) -> Option<&FunctionDecl> {
        self.class.node()?.method(&self.name)
    }

    pub fn static_variables(&self, ctx: &dyn ReflectionContext) -> Result<IndexMap<String, Val>> {
        match self.node() {
            Some(node) => collect_static_variables(&node.body, Subject::Method(self), ctx),
            None => Ok(IndexMap::new()),
        }
    }

    pub fn parameter_default(
        &self,
        name: &str,
        ctx: &dyn ReflectionContext,
    ) -> Result<Option<Resolution>> {
        match self.node() {
            Some(node) => parameter_default(&node.params, name, Subject::Method(self), ctx),
            None => Ok(None),
        }
    }
}

/// Resolved default of a parameter, `None` when the parameter is missing or
/// has no default
fn parameter_default(
    params: &[Param],
    name: &str,
    subject: Subject<'_>,
    ctx: &dyn ReflectionContext,
) -> Result<Option<Resolution>> {
    let name = name.trim_start_matches('$');
    let Some(default) = params
        .iter()
        .find(|param| param.name == name)
        .and_then(|param| param.default.as_ref())
    else {
        return Ok(None);
    };

    ExpressionResolver::new(subject, ctx).process(default).map(Some)
}
