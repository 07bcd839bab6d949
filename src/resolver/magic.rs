//! Compile-time magic constants, derived from the subject's position.
//!
//! Reference: $PHP_SRC_PATH/Zend/zend_compile.c - zend_try_ct_eval_magic_const

use crate::core::value::Val;
use crate::parser::ast::MagicConstKind;
use crate::parser::span::Span;
use crate::reflection::Subject;

pub fn magic_constant(kind: MagicConstKind, span: Span, subject: &Subject<'_>) -> Val {
    match kind {
        MagicConstKind::Line => Val::Int(i64::from(span.start_line())),
        MagicConstKind::File => Val::from(subject.file_name().unwrap_or("")),
        MagicConstKind::Dir => Val::from(subject.file_name().map(dirname).unwrap_or_default()),
        MagicConstKind::Namespace => Val::from(subject.namespace_name()),
        MagicConstKind::Class => Val::from(subject.class().map(|c| c.name()).unwrap_or("")),
        MagicConstKind::Trait => match subject {
            Subject::Class(class) if class.is_trait() => Val::from(class.name()),
            _ => Val::from(""),
        },
        MagicConstKind::Function => match subject {
            Subject::Function(function) => Val::from(function.name()),
            Subject::Method(method) => Val::from(method.name()),
            _ => Val::from(""),
        },
        MagicConstKind::Method => match subject {
            Subject::Method(method) => {
                Val::from(format!("{}::{}", method.class().name(), method.name()))
            }
            _ => Val::from(""),
        },
        MagicConstKind::Property => Val::from(""),
    }
}

/// Parent directory with PHP `dirname()` rules
/// Reference: $PHP_SRC_PATH/main/php_string.h - zend_dirname
pub fn dirname(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_owned();
    }
    match trimmed.rfind('/') {
        None => ".".to_owned(),
        Some(idx) => {
            let parent = trimmed[..idx].trim_end_matches('/');
            if parent.is_empty() {
                "/".to_owned()
            } else {
                parent.to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirname() {
        assert_eq!(dirname("/var/www/index.php"), "/var/www");
        assert_eq!(dirname("/index.php"), "/");
        assert_eq!(dirname("index.php"), ".");
        assert_eq!(dirname("/var/www/"), "/var");
        assert_eq!(dirname("a//b"), "a");
        assert_eq!(dirname("/"), "/");
        assert_eq!(dirname(""), "");
    }
}
