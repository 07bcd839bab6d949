//! Static expression evaluation.
//!
//! [`ExpressionResolver`] interprets the subset of PHP expressions that can
//! appear in constant initializers, parameter defaults and `static` variable
//! initializers: literals, operators, array literals, constants, class
//! constants and magic constants. Anything else resolves to `null`.
//!
//! Besides the value, a resolution records whether the expression as a whole
//! is a reference to a named constant, which reflection exposes as
//! `getDefaultValueConstantName()`.

pub mod class_ref;
pub mod magic;
pub mod ops;
pub mod static_vars;

use crate::core::value::{ArrayData, ArrayKey, Val};
use crate::error::Result;
use crate::parser::ast::{ArrayItem, BinaryOp, ClassName, Expr, Name};
use crate::reflection::Subject;
use crate::runtime::builtins;
use crate::runtime::context::{ReflectionContext, qualify};
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Name of the constant an expression refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantName {
    /// A constant that was found, namespace-qualified when it was found in
    /// the subject's namespace
    Resolved(String),
    /// An undefined constant whose name was used as its value
    UnresolvedAsLiteral(String),
}

impl ConstantName {
    pub fn as_str(&self) -> &str {
        match self {
            ConstantName::Resolved(name) | ConstantName::UnresolvedAsLiteral(name) => name,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ConstantName::Resolved(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub value: Val,
    /// Set only when the whole expression is a constant reference
    pub constant: Option<ConstantName>,
}

impl Resolution {
    pub fn is_constant(&self) -> bool {
        self.constant.is_some()
    }

    pub fn constant_name(&self) -> Option<&str> {
        self.constant.as_ref().map(ConstantName::as_str)
    }
}

/// Per-call recursion state
#[derive(Debug, Default)]
struct ResolveState {
    /// 1 for the node passed to `process`
    level: usize,
    constant: Option<ConstantName>,
}

impl ResolveState {
    fn is_top_level(&self) -> bool {
        self.level == 1
    }
}

pub struct ExpressionResolver<'a> {
    subject: Subject<'a>,
    context: &'a dyn ReflectionContext,
}

impl<'a> ExpressionResolver<'a> {
    pub fn new(subject: Subject<'a>, context: &'a dyn ReflectionContext) -> Self {
        Self { subject, context }
    }

    pub fn subject(&self) -> Subject<'a> {
        self.subject
    }

    pub fn process(&self, expr: &Expr) -> Result<Resolution> {
        let mut state = ResolveState::default();
        let value = self.resolve(expr, &mut state)?;
        Ok(Resolution {
            value,
            constant: state.constant,
        })
    }

    fn resolve(&self, expr: &Expr, state: &mut ResolveState) -> Result<Val> {
        state.level += 1;
        let result = self.resolve_node(expr, state);
        state.level -= 1;
        result
    }

    fn resolve_node(&self, expr: &Expr, state: &mut ResolveState) -> Result<Val> {
        match expr {
            Expr::Integer { value, .. } => Ok(Val::Int(*value)),
            Expr::Float { value, .. } => Ok(Val::Float(*value)),
            Expr::String { value, .. } => Ok(Val::string(value.clone())),
            Expr::MagicConst { kind, span } => {
                Ok(magic::magic_constant(*kind, *span, &self.subject))
            }
            Expr::ConstFetch { name, .. } => self.resolve_const_fetch(name, state),
            Expr::ClassConstFetch {
                class, constant, ..
            } => self.resolve_class_const_fetch(class, constant, state),
            Expr::Array { items, .. } => self.resolve_array(items, state),
            Expr::ArrayDimFetch {
                array,
                dim: Some(dim),
                ..
            } => {
                let array = self.resolve(array, state)?;
                let dim = self.resolve(dim, state)?;
                Ok(fetch_dimension(&array, &dim))
            }
            Expr::Binary {
                left, op, right, ..
            } => self.resolve_binary(left, *op, right, state),
            Expr::Unary { op, expr, .. } => {
                let value = self.resolve(expr, state)?;
                Ok(ops::unary(*op, &value))
            }
            Expr::Cast { kind, expr, .. } => {
                let value = self.resolve(expr, state)?;
                Ok(ops::cast::cast(*kind, &value))
            }
            Expr::Ternary {
                condition,
                if_true,
                if_false,
                ..
            } => {
                let condition = self.resolve(condition, state)?;
                if condition.to_bool() {
                    match if_true {
                        Some(if_true) => self.resolve(if_true, state),
                        None => Ok(condition),
                    }
                } else {
                    self.resolve(if_false, state)
                }
            }
            other => {
                trace!(span = ?other.span(), "expression has no compile-time value");
                Ok(Val::Null)
            }
        }
    }

    /// Reference: $PHP_SRC_PATH/Zend/zend_compile.c - zend_compile_const
    fn resolve_const_fetch(&self, name: &Name, state: &mut ResolveState) -> Result<Val> {
        let mut constant_name = name.to_string();

        if let Some(value) = builtins::keyword_constant(&constant_name) {
            return Ok(value);
        }

        let mut value = None;
        if !name.is_fully_qualified() {
            if let Some(file_name) = self.subject.file_name() {
                let namespace = self.subject.namespace_name();
                if let Some(found) =
                    self.context
                        .namespace_constant(file_name, namespace, &constant_name)?
                {
                    value = Some(found);
                    constant_name = qualify(namespace, &constant_name);
                }
            }
        }
        if value.is_none() {
            value = self.context.global_constant(&constant_name);
        }

        let (value, recorded) = match value {
            Some(value) => (value, ConstantName::Resolved(constant_name)),
            None => {
                debug!(constant = %constant_name, "undefined constant, using its name as value");
                (
                    Val::from(constant_name.as_str()),
                    ConstantName::UnresolvedAsLiteral(constant_name),
                )
            }
        };

        if state.is_top_level() {
            state.constant = Some(recorded);
        }
        Ok(value)
    }

    fn resolve_class_const_fetch(
        &self,
        class: &ClassName,
        constant: &str,
        state: &mut ResolveState,
    ) -> Result<Val> {
        let ClassName::Name(class_name) = class else {
            trace!("dynamic class reference has no compile-time value");
            return Ok(Val::Null);
        };

        let is_class_name = constant.eq_ignore_ascii_case("class");
        // `\Foo::class` is expanded at compile time without loading the class
        if is_class_name && class_name.is_fully_qualified() {
            return Ok(Val::from(class_name.to_string()));
        }

        let reflection = class_ref::resolve_class_name(class_name, &self.subject, self.context)?;
        if is_class_name {
            return Ok(Val::from(reflection.name()));
        }

        if state.is_top_level() {
            state.constant = Some(ConstantName::Resolved(format!(
                "{class_name}::{constant}"
            )));
        }

        match reflection.constant(constant, self.context)? {
            Some(value) => Ok(value),
            None => {
                warn!(
                    "Undefined constant {}::{}",
                    reflection.name(),
                    constant
                );
                Ok(Val::Null)
            }
        }
    }

    /// Reference: $PHP_SRC_PATH/Zend/zend_compile.c - zend_try_ct_eval_array
    fn resolve_array(&self, items: &[ArrayItem], state: &mut ResolveState) -> Result<Val> {
        let mut array = ArrayData::new();

        for item in items {
            if item.unpack {
                let value = self.resolve(&item.value, state)?;
                match value.as_array() {
                    Some(source) => unpack_into(&mut array, source),
                    None => warn!("Only arrays can be unpacked"),
                }
                continue;
            }

            match &item.key {
                Some(key) => {
                    let key = self.resolve(key, state)?;
                    let value = self.resolve(&item.value, state)?;
                    match ArrayKey::from_val(&key) {
                        Some(key) => {
                            array.insert(key, value);
                        }
                        None => warn!("Illegal offset type"),
                    }
                }
                None => {
                    let value = self.resolve(&item.value, state)?;
                    if !array.push(value) {
                        warn!(
                            "Cannot add element to the array as the next element is already occupied"
                        );
                    }
                }
            }
        }

        Ok(Val::Array(Rc::new(array)))
    }

    fn resolve_binary(
        &self,
        left: &Expr,
        op: BinaryOp,
        right: &Expr,
        state: &mut ResolveState,
    ) -> Result<Val> {
        let left = self.resolve(left, state)?;
        match op {
            BinaryOp::And | BinaryOp::LogicalAnd if !left.to_bool() => Ok(Val::Bool(false)),
            BinaryOp::Or | BinaryOp::LogicalOr if left.to_bool() => Ok(Val::Bool(true)),
            BinaryOp::Coalesce if !left.is_null() => Ok(left),
            _ => {
                let right = self.resolve(right, state)?;
                Ok(ops::binary(op, &left, &right))
            }
        }
    }
}

/// Integer keys are renumbered, string keys overwrite
fn unpack_into(array: &mut ArrayData, source: &ArrayData) {
    for (key, value) in source.iter() {
        match key {
            ArrayKey::Int(_) => {
                if !array.push(value.clone()) {
                    warn!(
                        "Cannot add element to the array as the next element is already occupied"
                    );
                }
            }
            ArrayKey::Str(_) => {
                array.insert(key.clone(), value.clone());
            }
        }
    }
}

/// `CONST[dim]` on arrays and strings
fn fetch_dimension(container: &Val, dim: &Val) -> Val {
    match container {
        Val::Array(array) => {
            let value = ArrayKey::from_val(dim).and_then(|key| array.get(&key).cloned());
            value.unwrap_or_else(|| {
                warn!("Undefined array key {}", dim.to_display_string());
                Val::Null
            })
        }
        Val::String(bytes) => {
            let len = bytes.len() as i64;
            let offset = dim.to_int();
            let index = if offset < 0 { len + offset } else { offset };
            match usize::try_from(index).ok().and_then(|i| bytes.get(i)) {
                Some(byte) => Val::string(vec![*byte]),
                None => {
                    warn!("Uninitialized string offset {offset}");
                    Val::from("")
                }
            }
        }
        other => {
            warn!("Trying to access array offset on {}", other.type_name());
            Val::Null
        }
    }
}

/// Evaluate one expression with `subject` as its lexical scope
pub fn evaluate<'a>(
    expr: &Expr,
    subject: Subject<'a>,
    context: &'a dyn ReflectionContext,
) -> Result<Resolution> {
    ExpressionResolver::new(subject, context).process(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{MagicConstKind, UnaryOp};
    use crate::parser::span::Span;
    use crate::reflection::namespace::ReflectionFile;
    use crate::runtime::context::SourceRegistry;

    fn eval(expr: &Expr) -> Resolution {
        let registry = SourceRegistry::default();
        let file = ReflectionFile::new("/app/src/bootstrap.php", vec![String::new()]);
        evaluate(expr, Subject::File(&file), &registry).expect("resolves")
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval(&Expr::int(42)).value, Val::Int(42));
        assert_eq!(eval(&Expr::float(1.5)).value, Val::Float(1.5));
        assert_eq!(eval(&Expr::string("abc")).value, Val::from("abc"));
        assert!(!eval(&Expr::int(42)).is_constant());
    }

    #[test]
    fn test_keyword_constants_are_not_named_constants() {
        let resolution = eval(&Expr::constant("TRUE"));
        assert_eq!(resolution.value, Val::Bool(true));
        assert!(!resolution.is_constant());
        assert_eq!(eval(&Expr::constant("null")).value, Val::Null);
    }

    #[test]
    fn test_short_circuit_skips_right_operand() {
        let unresolvable = Expr::class_const("parent", "X");
        let expr = Expr::binary(Expr::constant("false"), BinaryOp::And, unresolvable.clone());
        assert_eq!(eval(&expr).value, Val::Bool(false));

        let expr = Expr::binary(Expr::int(1), BinaryOp::LogicalOr, unresolvable.clone());
        assert_eq!(eval(&expr).value, Val::Bool(true));

        let expr = Expr::binary(Expr::int(0), BinaryOp::Coalesce, unresolvable);
        assert_eq!(eval(&expr).value, Val::Int(0));
    }

    #[test]
    fn test_elvis_returns_condition() {
        let expr = Expr::ternary(Expr::string("set"), None, Expr::string("fallback"));
        assert_eq!(eval(&expr).value, Val::from("set"));
        let expr = Expr::ternary(Expr::string(""), None, Expr::string("fallback"));
        assert_eq!(eval(&expr).value, Val::from("fallback"));
    }

    #[test]
    fn test_unary_and_line() {
        let expr = Expr::unary(UnaryOp::Minus, Expr::constant("PHP_INT_MAX"));
        assert_eq!(eval(&expr).value, Val::Int(-i64::MAX));

        let line = Expr::MagicConst {
            kind: MagicConstKind::Line,
            span: Span::at_line(12),
        };
        assert_eq!(eval(&line).value, Val::Int(12));
        assert_eq!(eval(&Expr::magic(MagicConstKind::Line)).value, Val::Int(0));
    }

    #[test]
    fn test_dimension_fetch() {
        let array = Expr::array(vec![
            ArrayItem::keyed(Expr::string("a"), Expr::int(1)),
            ArrayItem::value(Expr::int(2)),
        ]);
        let expr = Expr::ArrayDimFetch {
            array: Box::new(array),
            dim: Some(Box::new(Expr::string("a"))),
            span: Span::default(),
        };
        assert_eq!(eval(&expr).value, Val::Int(1));

        let expr = Expr::ArrayDimFetch {
            array: Box::new(Expr::string("abc")),
            dim: Some(Box::new(Expr::int(-1))),
            span: Span::default(),
        };
        assert_eq!(eval(&expr).value, Val::from("c"));
    }

    #[test]
    fn test_append_after_max_key_is_skipped() {
        let expr = Expr::array(vec![
            ArrayItem::keyed(Expr::constant("PHP_INT_MAX"), Expr::int(1)),
            ArrayItem::value(Expr::int(2)),
        ]);
        let value = eval(&expr).value;
        let array = value.as_array().expect("array");
        assert_eq!(array.len(), 1);
        assert_eq!(array.get(&ArrayKey::Int(i64::MAX)), Some(&Val::Int(1)));
    }

    #[test]
    fn test_non_numeric_string_operand_is_null() {
        let expr = Expr::binary(Expr::string("abc"), BinaryOp::Plus, Expr::int(1));
        assert_eq!(eval(&expr).value, Val::Null);

        let expr = Expr::binary(Expr::string("12abc"), BinaryOp::Plus, Expr::int(1));
        assert_eq!(eval(&expr).value, Val::Int(13));
    }

    #[test]
    fn test_unsupported_expressions_resolve_to_null() {
        assert_eq!(eval(&Expr::variable("x")).value, Val::Null);
        assert_eq!(eval(&Expr::call("time", vec![])).value, Val::Null);
    }
}
