//! Static evaluation of PHP expressions over a parsed syntax tree.
//!
//! Nothing here executes PHP. Constant initializers, parameter defaults and
//! `static` variable initializers are interpreted from their syntax alone,
//! with PHP's operator semantics and scope rules for `self`, `parent` and
//! namespace-relative constants.

pub mod core;
pub mod error;
pub mod parser;
pub mod reflection;
pub mod resolver;
pub mod runtime;

pub use error::ReflectionError;
pub use reflection::class::{collect_interfaces, collect_traits};
pub use resolver::static_vars::collect_static_variables;
pub use resolver::{ConstantName, ExpressionResolver, Resolution, evaluate};
