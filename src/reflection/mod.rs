//! Reflection entities built from syntax nodes instead of loaded code.

pub mod class;
pub mod function;
pub mod namespace;

use class::ReflectionClass;
use function::{ReflectionFunction, ReflectionMethod};
use namespace::{ReflectionFile, ReflectionFileNamespace};
use std::rc::Rc;

/// The reflected entity an expression belongs to.
///
/// It supplies the lexical context of the expression: the enclosing class for
/// `self`/`parent`, the namespace for unqualified names, and the values of
/// magic constants.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Class(&'a Rc<ReflectionClass>),
    Function(&'a ReflectionFunction),
    Method(&'a ReflectionMethod),
    Namespace(&'a ReflectionFileNamespace),
    File(&'a ReflectionFile),
}

impl<'a> Subject<'a> {
    /// The class itself, or the declaring class of a method
    pub fn class(&self) -> Option<&'a Rc<ReflectionClass>> {
        match *self {
            Subject::Class(class) => Some(class),
            Subject::Method(method) => Some(method.class()),
            _ => None,
        }
    }

    pub fn file_name(&self) -> Option<&'a str> {
        match *self {
            Subject::Class(class) => class.file_name(),
            Subject::Function(function) => function.file_name(),
            Subject::Method(method) => method.file_name(),
            Subject::Namespace(namespace) => Some(namespace.file_name()),
            Subject::File(file) => Some(file.file_name()),
        }
    }

    pub fn namespace_name(&self) -> &'a str {
        match *self {
            Subject::Class(class) => class.namespace_name(),
            Subject::Function(function) => function.namespace_name(),
            Subject::Method(method) => method.class().namespace_name(),
            Subject::Namespace(namespace) => namespace.name(),
            Subject::File(_) => "",
        }
    }
}
