//! Comparison operators
//!
//! PHP 8 comparison rules:
//! - Numeric strings compare as numbers; other strings compare bytewise
//! - A number against a non-numeric string compares as strings
//! - Boolean and null comparisons convert both sides to bool
//!   (except null against a string, which compares with `""`)
//! - Arrays compare by size, then key by key; arrays with different keys
//!   are uncomparable
//! - An array is greater than any non-array that is not null or bool
//!
//! `compare` returns `None` for uncomparable pairs (NAN, mismatched array
//! keys), for which every ordering operator is false.
//!
//! ## References
//!
//! - Zend: `$PHP_SRC_PATH/Zend/zend_operators.c` - zend_compare
//! - PHP Manual: https://www.php.net/manual/en/language.operators.comparison.php

use crate::core::value::{ArrayData, Numeric, Val};
use std::cmp::Ordering;

/// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - zend_compare
pub fn compare(a: &Val, b: &Val) -> Option<Ordering> {
    match (a, b) {
        (Val::Int(x), Val::Int(y)) => Some(x.cmp(y)),
        (Val::Int(x), Val::Float(y)) => (*x as f64).partial_cmp(y),
        (Val::Float(x), Val::Int(y)) => x.partial_cmp(&(*y as f64)),
        (Val::Float(x), Val::Float(y)) => x.partial_cmp(y),

        (Val::String(x), Val::String(y)) => {
            match (a.numeric_string_value(), b.numeric_string_value()) {
                (Some(n), Some(m)) => compare_numeric(n, m),
                _ => Some(x.as_slice().cmp(y.as_slice())),
            }
        }

        (Val::Array(x), Val::Array(y)) => compare_arrays(x, y),

        (Val::Null, Val::Null) => Some(Ordering::Equal),
        (Val::Null, Val::String(s)) => Some(if s.is_empty() {
            Ordering::Equal
        } else {
            Ordering::Less
        }),
        (Val::String(s), Val::Null) => Some(if s.is_empty() {
            Ordering::Equal
        } else {
            Ordering::Greater
        }),
        (Val::Null | Val::Bool(_), _) | (_, Val::Null | Val::Bool(_)) => {
            Some(a.to_bool().cmp(&b.to_bool()))
        }

        (Val::String(_), Val::Int(_) | Val::Float(_)) => {
            compare_string_with_number(a, b)
        }
        (Val::Int(_) | Val::Float(_), Val::String(_)) => {
            compare_string_with_number(b, a).map(Ordering::reverse)
        }

        (Val::Array(_), _) => Some(Ordering::Greater),
        (_, Val::Array(_)) => Some(Ordering::Less),
    }
}

fn compare_numeric(a: Numeric, b: Numeric) -> Option<Ordering> {
    match (a, b) {
        (Numeric::Int(x), Numeric::Int(y)) => Some(x.cmp(&y)),
        (a, b) => a.to_float().partial_cmp(&b.to_float()),
    }
}

/// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - compare_longs_to_string
fn compare_string_with_number(string: &Val, number: &Val) -> Option<Ordering> {
    let number_value = number.to_numeric()?;
    match string.numeric_string_value() {
        Some(n) => compare_numeric(n, number_value),
        None => {
            let lhs = string.to_php_string_bytes();
            let rhs = number.to_php_string_bytes();
            Some(lhs.cmp(&rhs))
        }
    }
}

/// Reference: $PHP_SRC_PATH/Zend/zend_hash.c - zend_hash_compare
fn compare_arrays(a: &ArrayData, b: &ArrayData) -> Option<Ordering> {
    match a.len().cmp(&b.len()) {
        Ordering::Equal => {}
        unequal => return Some(unequal),
    }
    for (key, left) in a.iter() {
        let right = b.get(key)?;
        match compare(left, right)? {
            Ordering::Equal => continue,
            unequal => return Some(unequal),
        }
    }
    Some(Ordering::Equal)
}

/// `==`
pub fn loose_equals(a: &Val, b: &Val) -> bool {
    compare(a, b) == Some(Ordering::Equal)
}

/// `===`: same type and value; arrays must also agree on key order
/// Reference: $PHP_SRC_PATH/Zend/zend_operators.c - zend_is_identical
pub fn strict_equals(a: &Val, b: &Val) -> bool {
    match (a, b) {
        (Val::Null, Val::Null) => true,
        (Val::Bool(x), Val::Bool(y)) => x == y,
        (Val::Int(x), Val::Int(y)) => x == y,
        (Val::Float(x), Val::Float(y)) => x == y,
        (Val::String(x), Val::String(y)) => x == y,
        (Val::Array(x), Val::Array(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .zip(y.iter())
                    .all(|((k1, v1), (k2, v2))| k1 == k2 && strict_equals(v1, v2))
        }
        _ => false,
    }
}

/// `<=>`; uncomparable operands yield 1 as in the engine
pub fn spaceship(a: &Val, b: &Val) -> i64 {
    match compare(a, b) {
        Some(Ordering::Less) => -1,
        Some(Ordering::Equal) => 0,
        Some(Ordering::Greater) | None => 1,
    }
}
