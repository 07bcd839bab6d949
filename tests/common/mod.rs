//! Common fixtures for reflection tests
//!
//! Trees are built by hand, the way a parser with name resolution would
//! produce them: class references in `extends`, `implements` and trait uses
//! are fully qualified.

#![allow(dead_code)]

use php_reflection::core::value::{ArrayKey, Val};
use php_reflection::parser::ast::{
    ClassKind, ClassLike, ClassMember, ConstItem, Expr, FunctionDecl, Modifier, Name, Param,
    PropertyEntry, Stmt, TraitAdaptation,
};
use php_reflection::parser::span::Span;
use php_reflection::runtime::context::SourceRegistry;
use std::rc::Rc;

pub struct ClassFixture {
    class: ClassLike,
}

impl ClassFixture {
    pub fn new(kind: ClassKind, name: &str) -> Self {
        Self {
            class: ClassLike::new(kind, name),
        }
    }

    pub fn class(name: &str) -> Self {
        Self::new(ClassKind::Class, name)
    }

    pub fn interface(name: &str) -> Self {
        Self::new(ClassKind::Interface, name)
    }

    pub fn trait_(name: &str) -> Self {
        Self::new(ClassKind::Trait, name)
    }

    /// Name as written; a leading `\` makes it fully qualified
    pub fn extends(mut self, name: &str) -> Self {
        self.class.extends.push(Name::parse(name));
        self
    }

    pub fn implements(mut self, name: &str) -> Self {
        self.class.implements.push(Name::parse(name));
        self
    }

    pub fn constant(mut self, name: &str, value: Expr) -> Self {
        self.class.members.push(ClassMember::Const {
            modifiers: vec![Modifier::Public],
            consts: vec![ConstItem {
                name: name.to_owned(),
                value,
                span: Span::default(),
            }],
            span: Span::default(),
        });
        self
    }

    pub fn property(mut self, name: &str, default: Option<Expr>) -> Self {
        self.class.members.push(ClassMember::Property {
            modifiers: vec![Modifier::Public],
            entries: vec![PropertyEntry {
                name: name.to_owned(),
                default,
                span: Span::default(),
            }],
            span: Span::default(),
        });
        self
    }

    pub fn method(mut self, name: &str, params: Vec<Param>, body: Vec<Stmt>) -> Self {
        self.class.members.push(ClassMember::Method {
            modifiers: vec![Modifier::Public],
            function: function_decl(name, params, body),
            span: Span::default(),
        });
        self
    }

    pub fn uses(mut self, traits: &[&str], adaptations: Vec<TraitAdaptation>) -> Self {
        self.class.members.push(ClassMember::TraitUse {
            traits: traits.iter().map(|name| Name::parse(name)).collect(),
            adaptations,
            span: Span::default(),
        });
        self
    }

    pub fn node(self) -> ClassLike {
        self.class
    }

    pub fn build(self) -> Stmt {
        Stmt::ClassLike(Rc::new(self.class))
    }
}

pub fn function_decl(name: &str, params: Vec<Param>, body: Vec<Stmt>) -> FunctionDecl {
    FunctionDecl {
        name: name.to_owned(),
        by_ref: false,
        params,
        body,
        span: Span::default(),
    }
}

pub fn function(name: &str, params: Vec<Param>, body: Vec<Stmt>) -> Stmt {
    Stmt::Function(Rc::new(function_decl(name, params, body)))
}

pub fn param(name: &str, default: Option<Expr>) -> Param {
    Param {
        name: name.to_owned(),
        default,
        by_ref: false,
        variadic: false,
        span: Span::default(),
    }
}

pub fn namespace(name: &str, body: Vec<Stmt>) -> Stmt {
    Stmt::Namespace {
        name: Some(Name::parse(name)),
        body,
        span: Span::default(),
    }
}

pub fn const_decl(name: &str, value: Expr) -> Stmt {
    Stmt::Const {
        consts: vec![ConstItem {
            name: name.to_owned(),
            value,
            span: Span::default(),
        }],
        span: Span::default(),
    }
}

/// Registry with core constants and internal classes plus the given file
pub fn registry_with(file_name: &str, statements: Vec<Stmt>) -> SourceRegistry {
    SourceRegistry::builder()
        .with_core_constants()
        .with_internal_classes()
        .with_file(file_name, statements)
        .build()
}

/// Array entries as `(key, value)` pairs for order-sensitive comparison
pub fn entries(value: &Val) -> Vec<(ArrayKey, Val)> {
    value
        .as_array()
        .expect("value is an array")
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
