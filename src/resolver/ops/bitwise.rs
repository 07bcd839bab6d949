//! Bitwise operators
//!
//! Two string operands are combined byte by byte; every other combination
//! converts both sides to integers first. Arrays are rejected.
//!
//! Reference: $PHP_SRC_PATH/Zend/zend_operators.c - bitwise_or_function,
//! bitwise_and_function, bitwise_xor_function, shift_left_function,
//! shift_right_function, bitwise_not_function

use crate::core::value::Val;
use std::rc::Rc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    And,
    Or,
    Xor,
    ShiftLeft,
    ShiftRight,
}

impl BitOp {
    fn symbol(self) -> &'static str {
        match self {
            BitOp::And => "&",
            BitOp::Or => "|",
            BitOp::Xor => "^",
            BitOp::ShiftLeft => "<<",
            BitOp::ShiftRight => ">>",
        }
    }
}

pub fn bitwise(op: BitOp, left: &Val, right: &Val) -> Val {
    if matches!(left, Val::Array(_)) || matches!(right, Val::Array(_)) {
        warn!(
            "Unsupported operand types: {} {} {}",
            left.type_name(),
            op.symbol(),
            right.type_name()
        );
        return Val::Null;
    }

    match (op, left, right) {
        (BitOp::And | BitOp::Or | BitOp::Xor, Val::String(a), Val::String(b)) => {
            Val::String(Rc::new(string_bitwise(op, a, b)))
        }
        (BitOp::And, _, _) => Val::Int(left.to_int() & right.to_int()),
        (BitOp::Or, _, _) => Val::Int(left.to_int() | right.to_int()),
        (BitOp::Xor, _, _) => Val::Int(left.to_int() ^ right.to_int()),
        (BitOp::ShiftLeft, _, _) => shift_left(left.to_int(), right.to_int()),
        (BitOp::ShiftRight, _, _) => shift_right(left.to_int(), right.to_int()),
    }
}

/// `|` keeps the longer operand's tail, `&` and `^` truncate to the shorter
fn string_bitwise(op: BitOp, a: &[u8], b: &[u8]) -> Vec<u8> {
    let (longer, shorter) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    match op {
        BitOp::Or => longer
            .iter()
            .enumerate()
            .map(|(i, x)| x | shorter.get(i).copied().unwrap_or(0))
            .collect(),
        BitOp::And => a.iter().zip(b).map(|(x, y)| x & y).collect(),
        _ => a.iter().zip(b).map(|(x, y)| x ^ y).collect(),
    }
}

fn shift_left(value: i64, by: i64) -> Val {
    match by {
        by if by < 0 => {
            warn!("Bit shift by negative number");
            Val::Null
        }
        by if by >= i64::from(i64::BITS) => Val::Int(0),
        by => Val::Int(value.wrapping_shl(by as u32)),
    }
}

fn shift_right(value: i64, by: i64) -> Val {
    match by {
        by if by < 0 => {
            warn!("Bit shift by negative number");
            Val::Null
        }
        by if by >= i64::from(i64::BITS) => Val::Int(if value < 0 { -1 } else { 0 }),
        by => Val::Int(value >> by),
    }
}

pub fn bitwise_not(value: &Val) -> Val {
    match value {
        Val::Int(i) => Val::Int(!i),
        Val::Float(_) => Val::Int(!value.to_int()),
        Val::String(s) => Val::String(Rc::new(s.iter().map(|b| !b).collect())),
        other => {
            warn!("Cannot perform bitwise not on {}", other.type_name());
            Val::Null
        }
    }
}
