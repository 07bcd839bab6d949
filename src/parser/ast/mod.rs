//! Syntax tree consumed by the resolver.
//!
//! The tree is produced by an external PHP parser after name resolution, so
//! class and interface references are normally fully qualified. Nodes are
//! immutable once built; nothing in this crate mutates them.
//!
//! `true`, `false` and `null` are represented as [`Expr::ConstFetch`], the way
//! PHP-Parser represents them.

use crate::parser::span::Span;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;

pub mod visitor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NameKind {
    /// `Foo`
    Unqualified,
    /// `Foo\Bar`
    Qualified,
    /// `\Foo\Bar`
    FullyQualified,
    /// `namespace\Foo`
    Relative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Name {
    pub parts: SmallVec<[String; 4]>,
    pub kind: NameKind,
    pub span: Span,
}

impl Name {
    /// Parse a name as written in source: a leading `\` makes it fully
    /// qualified, a leading `namespace\` makes it relative.
    pub fn parse(text: &str) -> Self {
        let (kind, rest) = if let Some(rest) = text.strip_prefix('\\') {
            (NameKind::FullyQualified, rest)
        } else if let Some(rest) = strip_prefix_ignore_case(text, "namespace\\") {
            (NameKind::Relative, rest)
        } else if text.contains('\\') {
            (NameKind::Qualified, text)
        } else {
            (NameKind::Unqualified, text)
        };

        Self {
            parts: rest
                .split('\\')
                .filter(|p| !p.is_empty())
                .map(str::to_owned)
                .collect(),
            kind,
            span: Span::default(),
        }
    }

    pub fn fully_qualified(text: &str) -> Self {
        let mut name = Self::parse(text.trim_start_matches('\\'));
        name.kind = NameKind::FullyQualified;
        name
    }

    pub fn is_fully_qualified(&self) -> bool {
        self.kind == NameKind::FullyQualified
    }

    pub fn is_unqualified(&self) -> bool {
        self.kind == NameKind::Unqualified
    }

    /// Last segment of the name
    pub fn last(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or("")
    }

    /// `self`, `parent` or `static` written as a class reference
    pub fn special_class(&self) -> Option<SpecialClass> {
        if !self.is_unqualified() {
            return None;
        }
        match self.last().to_ascii_lowercase().as_str() {
            "self" => Some(SpecialClass::SelfClass),
            "parent" => Some(SpecialClass::Parent),
            "static" => Some(SpecialClass::Static),
            _ => None,
        }
    }
}

/// Joined without the leading separator, like PHP-Parser's `Name::toString()`
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("\\"))
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpecialClass {
    SelfClass,
    Parent,
    Static,
}

/// Class position of `::` and `new`: a name or a dynamic expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ClassName {
    Name(Name),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Echo {
        exprs: Vec<Expr>,
        span: Span,
    },
    Return {
        expr: Option<Expr>,
        span: Span,
    },
    If {
        condition: Expr,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>, // elseif chains nest as a single If inside else
        span: Span,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        span: Span,
    },
    DoWhile {
        body: Vec<Stmt>,
        condition: Expr,
        span: Span,
    },
    For {
        init: Vec<Expr>,
        condition: Vec<Expr>,
        loop_expr: Vec<Expr>,
        body: Vec<Stmt>,
        span: Span,
    },
    Foreach {
        expr: Expr,
        key_var: Option<Expr>,
        value_var: Expr,
        body: Vec<Stmt>,
        span: Span,
    },
    Block {
        statements: Vec<Stmt>,
        span: Span,
    },
    Function(Rc<FunctionDecl>),
    ClassLike(Rc<ClassLike>),
    Namespace {
        name: Option<Name>,
        body: Vec<Stmt>,
        span: Span,
    },
    Use {
        uses: Vec<UseItem>,
        kind: UseKind,
        span: Span,
    },
    Switch {
        condition: Expr,
        cases: Vec<Case>,
        span: Span,
    },
    Try {
        body: Vec<Stmt>,
        catches: Vec<Catch>,
        finally: Option<Vec<Stmt>>,
        span: Span,
    },
    Throw {
        expr: Expr,
        span: Span,
    },
    Const {
        consts: Vec<ConstItem>,
        span: Span,
    },
    Break {
        level: Option<Expr>,
        span: Span,
    },
    Continue {
        level: Option<Expr>,
        span: Span,
    },
    Global {
        vars: Vec<Expr>,
        span: Span,
    },
    Static {
        vars: Vec<StaticVar>,
        span: Span,
    },
    Unset {
        vars: Vec<Expr>,
        span: Span,
    },
    Expression {
        expr: Expr,
        span: Span,
    },
    InlineHtml {
        value: Vec<u8>,
        span: Span,
    },
    Nop {
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticVar {
    pub name: String,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub default: Option<Expr>,
    pub by_ref: bool,
    pub variadic: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub name: String,
    pub by_ref: bool,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
    Enum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
    Readonly,
}

/// Class, interface, trait or enum declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassLike {
    pub kind: ClassKind,
    /// Short name, without namespace
    pub name: String,
    pub modifiers: Vec<Modifier>,
    /// Parent class for classes, parent interfaces for interfaces
    pub extends: Vec<Name>,
    pub implements: Vec<Name>,
    pub members: Vec<ClassMember>,
    pub span: Span,
}

impl ClassLike {
    pub fn new(kind: ClassKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_owned(),
            modifiers: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
            members: Vec::new(),
            span: Span::default(),
        }
    }

    /// Initializer of a declared constant, searching every const group
    pub fn constant(&self, name: &str) -> Option<&ConstItem> {
        self.members.iter().find_map(|member| match member {
            ClassMember::Const { consts, .. } => consts.iter().find(|c| c.name == name),
            _ => None,
        })
    }

    pub fn constants(&self) -> impl Iterator<Item = &ConstItem> {
        self.members.iter().flat_map(|member| match member {
            ClassMember::Const { consts, .. } => consts.as_slice(),
            _ => &[],
        })
    }

    /// Method declaration, matched case-insensitively like PHP method names
    pub fn method(&self, name: &str) -> Option<&FunctionDecl> {
        self.methods().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn methods(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.members.iter().filter_map(|member| match member {
            ClassMember::Method { function, .. } => Some(function),
            _ => None,
        })
    }

    pub fn property(&self, name: &str) -> Option<&PropertyEntry> {
        self.members.iter().find_map(|member| match member {
            ClassMember::Property { entries, .. } => entries.iter().find(|e| e.name == name),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ClassMember {
    Property {
        modifiers: Vec<Modifier>,
        entries: Vec<PropertyEntry>,
        span: Span,
    },
    Method {
        modifiers: Vec<Modifier>,
        function: FunctionDecl,
        span: Span,
    },
    Const {
        modifiers: Vec<Modifier>,
        consts: Vec<ConstItem>,
        span: Span,
    },
    TraitUse {
        traits: Vec<Name>,
        adaptations: Vec<TraitAdaptation>,
        span: Span,
    },
    Case {
        name: String,
        value: Option<Expr>,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyEntry {
    pub name: String,
    pub default: Option<Expr>,
    pub span: Span,
}

/// `NAME = expr` inside a class constant group or a namespace-level `const`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstItem {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitMethodRef {
    pub trait_name: Option<Name>,
    pub method: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TraitAdaptation {
    /// `A::foo insteadof B;`
    Precedence {
        method: TraitMethodRef,
        insteadof: Vec<Name>,
        span: Span,
    },
    /// `foo as protected bar;`
    Alias {
        method: TraitMethodRef,
        alias: Option<String>,
        visibility: Option<Modifier>,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Case {
    pub condition: Option<Expr>, // None for default
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catch {
    pub types: Vec<Name>,
    pub var: Option<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UseItem {
    pub name: Name,
    pub alias: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UseKind {
    Normal,
    Function,
    Const,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Assign {
        var: Box<Expr>,
        expr: Box<Expr>,
        span: Span,
    },
    AssignOp {
        var: Box<Expr>,
        op: BinaryOp,
        expr: Box<Expr>,
        span: Span,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
        span: Span,
    },
    PostInc {
        var: Box<Expr>,
        span: Span,
    },
    PostDec {
        var: Box<Expr>,
        span: Span,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Arg>,
        span: Span,
    },
    Array {
        items: Vec<ArrayItem>,
        span: Span,
    },
    ArrayDimFetch {
        array: Box<Expr>,
        dim: Option<Box<Expr>>, // None for $a[]
        span: Span,
    },
    PropertyFetch {
        target: Box<Expr>,
        property: Box<Expr>,
        span: Span,
    },
    MethodCall {
        target: Box<Expr>,
        method: Box<Expr>,
        args: Vec<Arg>,
        span: Span,
    },
    StaticCall {
        class: ClassName,
        method: Box<Expr>,
        args: Vec<Arg>,
        span: Span,
    },
    ClassConstFetch {
        class: ClassName,
        constant: String,
        span: Span,
    },
    ConstFetch {
        name: Name,
        span: Span,
    },
    New {
        class: ClassName,
        args: Vec<Arg>,
        span: Span,
    },
    Variable {
        name: String,
        span: Span,
    },
    Integer {
        value: i64,
        span: Span,
    },
    Float {
        value: f64,
        span: Span,
    },
    String {
        value: Vec<u8>,
        span: Span,
    },
    InterpolatedString {
        parts: Vec<Expr>,
        span: Span,
    },
    MagicConst {
        kind: MagicConstKind,
        span: Span,
    },
    Ternary {
        condition: Box<Expr>,
        if_true: Option<Box<Expr>>,
        if_false: Box<Expr>,
        span: Span,
    },
    Match {
        condition: Box<Expr>,
        arms: Vec<MatchArm>,
        span: Span,
    },
    Cast {
        kind: CastKind,
        expr: Box<Expr>,
        span: Span,
    },
    Isset {
        vars: Vec<Expr>,
        span: Span,
    },
    Empty {
        expr: Box<Expr>,
        span: Span,
    },
    Closure {
        is_static: bool,
        by_ref: bool,
        params: Vec<Param>,
        uses: Vec<ClosureUse>,
        body: Vec<Stmt>,
        span: Span,
    },
    ArrowFunction {
        is_static: bool,
        by_ref: bool,
        params: Vec<Param>,
        expr: Box<Expr>,
        span: Span,
    },
    AnonymousClass {
        args: Vec<Arg>,
        class: Rc<ClassLike>,
        span: Span,
    },
    Print {
        expr: Box<Expr>,
        span: Span,
    },
    Include {
        kind: IncludeKind,
        expr: Box<Expr>,
        span: Span,
    },
    Error {
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arg {
    pub name: Option<String>,
    pub value: Expr,
    pub unpack: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayItem {
    pub key: Option<Expr>,
    pub value: Expr,
    pub by_ref: bool,
    pub unpack: bool,
    pub span: Span,
}

impl ArrayItem {
    pub fn value(value: Expr) -> Self {
        Self {
            key: None,
            span: value.span(),
            value,
            by_ref: false,
            unpack: false,
        }
    }

    pub fn keyed(key: Expr, value: Expr) -> Self {
        Self {
            span: key.span().to(value.span()),
            key: Some(key),
            value,
            by_ref: false,
            unpack: false,
        }
    }

    /// `...$value`
    pub fn spread(value: Expr) -> Self {
        Self {
            unpack: true,
            ..Self::value(value)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchArm {
    pub conditions: Option<Vec<Expr>>, // None for default
    pub body: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosureUse {
    pub var: String,
    pub by_ref: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CastKind {
    Int,
    Bool,
    Float,
    String,
    Array,
    Object,
    Unset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    PreInc,
    PreDec,
    ErrorSuppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Pow,
    Concat, // .
    EqEq,
    EqEqEq,
    NotEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Spaceship,
    And, // &&
    Or,  // ||
    LogicalAnd,
    LogicalOr,
    LogicalXor,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    Coalesce,
    Instanceof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncludeKind {
    Include,
    IncludeOnce,
    Require,
    RequireOnce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MagicConstKind {
    Dir,
    File,
    Line,
    Function,
    Class,
    Trait,
    Method,
    Namespace,
    Property,
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Assign { span, .. } => *span,
            Expr::AssignOp { span, .. } => *span,
            Expr::Binary { span, .. } => *span,
            Expr::Unary { span, .. } => *span,
            Expr::PostInc { span, .. } => *span,
            Expr::PostDec { span, .. } => *span,
            Expr::Call { span, .. } => *span,
            Expr::Array { span, .. } => *span,
            Expr::ArrayDimFetch { span, .. } => *span,
            Expr::PropertyFetch { span, .. } => *span,
            Expr::MethodCall { span, .. } => *span,
            Expr::StaticCall { span, .. } => *span,
            Expr::ClassConstFetch { span, .. } => *span,
            Expr::ConstFetch { span, .. } => *span,
            Expr::New { span, .. } => *span,
            Expr::Variable { span, .. } => *span,
            Expr::Integer { span, .. } => *span,
            Expr::Float { span, .. } => *span,
            Expr::String { span, .. } => *span,
            Expr::InterpolatedString { span, .. } => *span,
            Expr::MagicConst { span, .. } => *span,
            Expr::Ternary { span, .. } => *span,
            Expr::Match { span, .. } => *span,
            Expr::Cast { span, .. } => *span,
            Expr::Isset { span, .. } => *span,
            Expr::Empty { span, .. } => *span,
            Expr::Closure { span, .. } => *span,
            Expr::ArrowFunction { span, .. } => *span,
            Expr::AnonymousClass { span, .. } => *span,
            Expr::Print { span, .. } => *span,
            Expr::Include { span, .. } => *span,
            Expr::Error { span } => *span,
        }
    }

    pub fn int(value: i64) -> Self {
        Expr::Integer {
            value,
            span: Span::default(),
        }
    }

    pub fn float(value: f64) -> Self {
        Expr::Float {
            value,
            span: Span::default(),
        }
    }

    pub fn string(value: impl Into<Vec<u8>>) -> Self {
        Expr::String {
            value: value.into(),
            span: Span::default(),
        }
    }

    /// Constant fetch; `\` marks a fully qualified name
    pub fn constant(name: &str) -> Self {
        Expr::ConstFetch {
            name: Name::parse(name),
            span: Span::default(),
        }
    }

    /// `Class::CONSTANT`; the class is parsed like [`Name::parse`]
    pub fn class_const(class: &str, constant: &str) -> Self {
        Expr::ClassConstFetch {
            class: ClassName::Name(Name::parse(class)),
            constant: constant.to_owned(),
            span: Span::default(),
        }
    }

    pub fn magic(kind: MagicConstKind) -> Self {
        Expr::MagicConst {
            kind,
            span: Span::default(),
        }
    }

    pub fn variable(name: &str) -> Self {
        Expr::Variable {
            name: name.to_owned(),
            span: Span::default(),
        }
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            span: left.span().to(right.span()),
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, expr: Expr) -> Self {
        Expr::Unary {
            span: expr.span(),
            op,
            expr: Box::new(expr),
        }
    }

    pub fn ternary(condition: Expr, if_true: Option<Expr>, if_false: Expr) -> Self {
        Expr::Ternary {
            span: condition.span().to(if_false.span()),
            condition: Box::new(condition),
            if_true: if_true.map(Box::new),
            if_false: Box::new(if_false),
        }
    }

    pub fn cast(kind: CastKind, expr: Expr) -> Self {
        Expr::Cast {
            span: expr.span(),
            kind,
            expr: Box::new(expr),
        }
    }

    pub fn array(items: Vec<ArrayItem>) -> Self {
        Expr::Array {
            items,
            span: Span::default(),
        }
    }

    pub fn call(func: &str, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(Expr::constant(func)),
            args: args
                .into_iter()
                .map(|value| Arg {
                    name: None,
                    span: value.span(),
                    value,
                    unpack: false,
                })
                .collect(),
            span: Span::default(),
        }
    }

    pub fn closure(body: Vec<Stmt>) -> Self {
        Expr::Closure {
            is_static: false,
            by_ref: false,
            params: Vec::new(),
            uses: Vec::new(),
            body,
            span: Span::default(),
        }
    }
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Echo { span, .. } => *span,
            Stmt::Return { span, .. } => *span,
            Stmt::If { span, .. } => *span,
            Stmt::While { span, .. } => *span,
            Stmt::DoWhile { span, .. } => *span,
            Stmt::For { span, .. } => *span,
            Stmt::Foreach { span, .. } => *span,
            Stmt::Block { span, .. } => *span,
            Stmt::Function(decl) => decl.span,
            Stmt::ClassLike(class) => class.span,
            Stmt::Namespace { span, .. } => *span,
            Stmt::Use { span, .. } => *span,
            Stmt::Switch { span, .. } => *span,
            Stmt::Try { span, .. } => *span,
            Stmt::Throw { span, .. } => *span,
            Stmt::Const { span, .. } => *span,
            Stmt::Break { span, .. } => *span,
            Stmt::Continue { span, .. } => *span,
            Stmt::Global { span, .. } => *span,
            Stmt::Static { span, .. } => *span,
            Stmt::Unset { span, .. } => *span,
            Stmt::Expression { span, .. } => *span,
            Stmt::InlineHtml { span, .. } => *span,
            Stmt::Nop { span } => *span,
        }
    }

    pub fn expression(expr: Expr) -> Self {
        Stmt::Expression {
            span: expr.span(),
            expr,
        }
    }

    /// `static $a = 1, $b;`
    pub fn static_vars(vars: Vec<(&str, Option<Expr>)>) -> Self {
        Stmt::Static {
            vars: vars
                .into_iter()
                .map(|(name, default)| StaticVar {
                    name: name.trim_start_matches('$').to_owned(),
                    default,
                    span: Span::default(),
                })
                .collect(),
            span: Span::default(),
        }
    }

    pub fn block(statements: Vec<Stmt>) -> Self {
        Stmt::Block {
            statements,
            span: Span::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_kinds() {
        assert_eq!(Name::parse("Foo").kind, NameKind::Unqualified);
        assert_eq!(Name::parse("Foo\\Bar").kind, NameKind::Qualified);
        assert_eq!(Name::parse("\\Foo\\Bar").kind, NameKind::FullyQualified);
        assert_eq!(Name::parse("namespace\\Foo").kind, NameKind::Relative);
        assert_eq!(Name::parse("\\Foo\\Bar").to_string(), "Foo\\Bar");
        assert_eq!(Name::parse("namespace\\Foo").to_string(), "Foo");
        assert_eq!(Name::fully_qualified("App\\Model").to_string(), "App\\Model");
    }

    #[test]
    fn test_special_class_names() {
        assert_eq!(Name::parse("self").special_class(), Some(SpecialClass::SelfClass));
        assert_eq!(Name::parse("PARENT").special_class(), Some(SpecialClass::Parent));
        assert_eq!(Name::parse("static").special_class(), Some(SpecialClass::Static));
        assert_eq!(Name::parse("\\self").special_class(), None);
        assert_eq!(Name::parse("Selfish").special_class(), None);
    }

    #[test]
    fn test_class_like_lookups() {
        let mut class = ClassLike::new(ClassKind::Class, "Config");
        class.members.push(ClassMember::Const {
            modifiers: vec![Modifier::Public],
            consts: vec![
                ConstItem {
                    name: "A".into(),
                    value: Expr::int(1),
                    span: Span::default(),
                },
                ConstItem {
                    name: "B".into(),
                    value: Expr::int(2),
                    span: Span::default(),
                },
            ],
            span: Span::default(),
        });

        assert_eq!(class.constant("B").map(|c| &c.value), Some(&Expr::int(2)));
        assert!(class.constant("C").is_none());
        assert_eq!(class.constants().count(), 2);
    }
}
