//! Class references inside expressions: `self`, `parent`, `static` and names.
//!
//! Reference: $PHP_SRC_PATH/Zend/zend_compile.c - zend_resolve_class_name

use crate::error::{ReflectionError, Result};
use crate::parser::ast::{Name, SpecialClass};
use crate::reflection::Subject;
use crate::reflection::class::ReflectionClass;
use crate::runtime::context::{ReflectionContext, qualify};
use std::rc::Rc;
use tracing::trace;

/// Look up a fully qualified class, preferring internal classes the runtime
/// already provides over parsing source
pub fn lookup_class(name: &str, ctx: &dyn ReflectionContext) -> Result<Rc<ReflectionClass>> {
    if let Some(class) = ctx.loaded_class(name) {
        if !class.is_user_defined() {
            trace!(class = name, "using loaded internal class");
            return Ok(class);
        }
    }
    ctx.get_class_reflection(name)
}

/// Resolve a class name as written in an expression bound to `subject`.
///
/// `static` is treated like `self`: without a calling scope the late static
/// binding is the lexical class.
pub fn resolve_class_name(
    name: &Name,
    subject: &Subject<'_>,
    ctx: &dyn ReflectionContext,
) -> Result<Rc<ReflectionClass>> {
    if name.is_fully_qualified() {
        return lookup_class(&name.to_string(), ctx);
    }

    match name.special_class() {
        Some(SpecialClass::SelfClass | SpecialClass::Static) => {
            subject.class().cloned().ok_or_else(|| {
                ReflectionError::unresolvable(name.to_string(), "no class scope is active")
            })
        }
        Some(SpecialClass::Parent) => {
            let class = subject.class().ok_or_else(|| {
                ReflectionError::unresolvable("parent", "no class scope is active")
            })?;
            class.parent_class(ctx)?.ok_or_else(|| {
                ReflectionError::unresolvable(
                    "parent",
                    format!("class {} has no parent", class.name()),
                )
            })
        }
        None => {
            let class_name = qualify(subject.namespace_name(), &name.to_string());
            ctx.get_class_reflection(&class_name)
        }
    }
}
