pub mod builtins;
pub mod context;

pub use context::{ReflectionContext, RegistryBuilder, SourceRegistry};
