use thiserror::Error;

/// Errors raised while reflecting over parsed source.
///
/// Expressions that have no compile-time value are not errors: they resolve
/// to `null`. Only failures to locate the classes an expression depends on
/// surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReflectionError {
    /// `self`, `parent` or a named class cannot be located from the subject
    #[error("Can not resolve class {name}: {reason}")]
    UnresolvableClass { name: String, reason: String },

    /// The context has no declaration for the class
    #[error("Class \"{0}\" not found")]
    ClassNotFound(String),

    /// The context has no declaration for the function
    #[error("Function {0}() does not exist")]
    FunctionNotFound(String),

    /// A class that is its own ancestor
    #[error("Class {0} cannot extend one of its own descendants")]
    CircularInheritance(String),

    /// A constant initializer that depends on itself
    #[error("Cannot declare self-referencing constant {0}")]
    SelfReferencingConstant(String),
}

impl ReflectionError {
    pub fn unresolvable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ReflectionError::UnresolvableClass {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = ReflectionError> = std::result::Result<T, E>;
