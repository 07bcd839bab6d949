//! Arithmetic operators
//!
//! PHP arithmetic juggles operand types before computing:
//! - Numeric strings are converted to integers/floats
//! - Booleans: true=1, false=0
//! - null converts to 0
//! - `array + array` is a key union; any other array operand is a type error
//!
//! Integer results that overflow are promoted to float, as the engine does.
//! Errors PHP would throw at runtime (division by zero, unsupported operand
//! types) produce `null` with a warning, since a static initializer has no
//! runtime to throw into.
//!
//! ## References
//!
//! - Zend: `$PHP_SRC_PATH/Zend/zend_operators.c` - arithmetic functions
//! - PHP Manual: https://www.php.net/manual/en/language.operators.arithmetic.php

use crate::core::value::{ArrayData, Numeric, Val};
use std::rc::Rc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
            ArithOp::Pow => "**",
        }
    }

    /// `None` on overflow or when the result is not an integer
    fn apply_int(self, a: i64, b: i64) -> Option<i64> {
        match self {
            ArithOp::Add => a.checked_add(b),
            ArithOp::Sub => a.checked_sub(b),
            ArithOp::Mul => a.checked_mul(b),
            ArithOp::Div => match a.checked_rem(b) {
                Some(0) => a.checked_div(b),
                _ => None,
            },
            ArithOp::Mod => a.checked_rem(b),
            ArithOp::Pow => u32::try_from(b).ok().and_then(|exp| a.checked_pow(exp)),
        }
    }

    fn apply_float(self, a: f64, b: f64) -> f64 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
            ArithOp::Mod => a % b,
            ArithOp::Pow => a.powf(b),
        }
    }
}

/// Apply a binary arithmetic operator
/// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - add_function_slow et al.
pub fn arithmetic(op: ArithOp, left: &Val, right: &Val) -> Val {
    if op == ArithOp::Add {
        if let (Val::Array(a), Val::Array(b)) = (left, right) {
            return Val::Array(Rc::new(array_union(a, b)));
        }
    }

    if op == ArithOp::Mod {
        return modulo(left, right);
    }

    let (Some(a), Some(b)) = (left.to_numeric(), right.to_numeric()) else {
        warn!(
            "Unsupported operand types: {} {} {}",
            left.type_name(),
            op.symbol(),
            right.type_name()
        );
        return Val::Null;
    };

    if op == ArithOp::Div && b.to_float() == 0.0 {
        warn!("Division by zero");
        return Val::Null;
    }

    match (a, b) {
        (Numeric::Int(x), Numeric::Int(y)) => match op.apply_int(x, y) {
            Some(result) => Val::Int(result),
            None => Val::Float(op.apply_float(x as f64, y as f64)),
        },
        (a, b) => Val::Float(op.apply_float(a.to_float(), b.to_float())),
    }
}

/// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - mod_function
fn modulo(left: &Val, right: &Val) -> Val {
    if left.to_numeric().is_none() || right.to_numeric().is_none() {
        warn!(
            "Unsupported operand types: {} % {}",
            left.type_name(),
            right.type_name()
        );
        return Val::Null;
    }

    let divisor = right.to_int();
    if divisor == 0 {
        warn!("Modulo by zero");
        return Val::Null;
    }
    // i64::MIN % -1 overflows in Rust; PHP yields 0
    if divisor == -1 {
        return Val::Int(0);
    }
    Val::Int(left.to_int() % divisor)
}

/// Keys of the left operand win
fn array_union(left: &ArrayData, right: &ArrayData) -> ArrayData {
    let mut result = left.clone();
    for (key, value) in right.iter() {
        if result.get(key).is_none() {
            result.insert(key.clone(), value.clone());
        }
    }
    result
}

/// Unary minus, computed as `expr * -1` like the compiler does
pub fn negate(value: &Val) -> Val {
    match value {
        Val::Int(i) => i
            .checked_neg()
            .map(Val::Int)
            .unwrap_or(Val::Float(-(*i as f64))),
        Val::Float(f) => Val::Float(-f),
        other => arithmetic(ArithOp::Mul, other, &Val::Int(-1)),
    }
}

/// Unary plus, computed as `expr * 1`
pub fn identity(value: &Val) -> Val {
    match value {
        Val::Int(_) | Val::Float(_) => value.clone(),
        other => arithmetic(ArithOp::Mul, other, &Val::Int(1)),
    }
}
