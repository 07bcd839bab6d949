use crate::core::value::{ArrayData, Val};
use crate::parser::ast::CastKind;
use std::rc::Rc;
use tracing::{debug, warn};

/// Explicit `(type)` casts
/// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - convert_to_long, convert_to_double,
/// zval_get_string, convert_to_array
pub fn cast(kind: CastKind, value: &Val) -> Val {
    match kind {
        CastKind::Int => Val::Int(value.to_int()),
        CastKind::Float => Val::Float(value.to_float()),
        CastKind::Bool => Val::Bool(value.to_bool()),
        CastKind::String => {
            if matches!(value, Val::Array(_)) {
                warn!("Array to string conversion");
            }
            Val::string(value.to_php_string_bytes())
        }
        CastKind::Array => match value {
            Val::Array(_) => value.clone(),
            Val::Null => Val::Array(Rc::new(ArrayData::new())),
            scalar => Val::Array(Rc::new(std::iter::once(scalar.clone()).collect())),
        },
        CastKind::Object | CastKind::Unset => {
            debug!(?kind, "cast has no compile-time value");
            Val::Null
        }
    }
}
