//! PHP operator semantics over compile-time values.
//!
//! Every operator is total: combinations PHP rejects at runtime produce
//! `null` and a warning instead of an error.

pub mod arithmetic;
pub mod bitwise;
pub mod cast;
pub mod comparison;

use crate::core::value::Val;
use crate::parser::ast::{BinaryOp, UnaryOp};
use arithmetic::{ArithOp, arithmetic};
use bitwise::{BitOp, bitwise};
use comparison::{compare, loose_equals, strict_equals};
use std::cmp::Ordering;
use std::rc::Rc;
use tracing::debug;

/// Apply a binary operator to two already evaluated operands.
///
/// The logical operators are evaluated eagerly here; callers that need
/// short-circuiting handle them before resolving the right operand.
pub fn binary(op: BinaryOp, left: &Val, right: &Val) -> Val {
    match op {
        BinaryOp::Plus => arithmetic(ArithOp::Add, left, right),
        BinaryOp::Minus => arithmetic(ArithOp::Sub, left, right),
        BinaryOp::Mul => arithmetic(ArithOp::Mul, left, right),
        BinaryOp::Div => arithmetic(ArithOp::Div, left, right),
        BinaryOp::Mod => arithmetic(ArithOp::Mod, left, right),
        BinaryOp::Pow => arithmetic(ArithOp::Pow, left, right),

        BinaryOp::BitAnd => bitwise(BitOp::And, left, right),
        BinaryOp::BitOr => bitwise(BitOp::Or, left, right),
        BinaryOp::BitXor => bitwise(BitOp::Xor, left, right),
        BinaryOp::ShiftLeft => bitwise(BitOp::ShiftLeft, left, right),
        BinaryOp::ShiftRight => bitwise(BitOp::ShiftRight, left, right),

        BinaryOp::Concat => concat(left, right),

        BinaryOp::EqEq => Val::Bool(loose_equals(left, right)),
        BinaryOp::NotEq => Val::Bool(!loose_equals(left, right)),
        BinaryOp::EqEqEq => Val::Bool(strict_equals(left, right)),
        BinaryOp::NotEqEq => Val::Bool(!strict_equals(left, right)),
        BinaryOp::Lt => Val::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::LtEq => Val::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Val::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::GtEq => Val::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::Spaceship => Val::Int(comparison::spaceship(left, right)),

        BinaryOp::And | BinaryOp::LogicalAnd => Val::Bool(left.to_bool() && right.to_bool()),
        BinaryOp::Or | BinaryOp::LogicalOr => Val::Bool(left.to_bool() || right.to_bool()),
        BinaryOp::LogicalXor => Val::Bool(left.to_bool() ^ right.to_bool()),
        BinaryOp::Coalesce => {
            if left.is_null() {
                right.clone()
            } else {
                left.clone()
            }
        }

        BinaryOp::Instanceof => {
            debug!("instanceof has no compile-time value");
            Val::Null
        }
    }
}

pub fn unary(op: UnaryOp, value: &Val) -> Val {
    match op {
        UnaryOp::Plus => arithmetic::identity(value),
        UnaryOp::Minus => arithmetic::negate(value),
        UnaryOp::Not => Val::Bool(!value.to_bool()),
        UnaryOp::BitNot => bitwise::bitwise_not(value),
        UnaryOp::ErrorSuppress => value.clone(),
        UnaryOp::PreInc | UnaryOp::PreDec => {
            debug!(?op, "increment has no compile-time value");
            Val::Null
        }
    }
}

/// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - concat_function
pub fn concat(left: &Val, right: &Val) -> Val {
    let mut bytes = left.to_php_string_bytes();
    bytes.extend_from_slice(&right.to_php_string_bytes());
    Val::String(Rc::new(bytes))
}
