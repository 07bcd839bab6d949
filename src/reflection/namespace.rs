use crate::core::value::Val;
use crate::error::Result;
use crate::runtime::context::ReflectionContext;

/// One namespace as declared in one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionFileNamespace {
    file_name: String,
    name: String,
}

impl ReflectionFileNamespace {
    pub fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.trim_matches('\\').to_owned(),
        }
    }

    /// Namespace name, empty for the global namespace
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn constant(&self, name: &str, ctx: &dyn ReflectionContext) -> Result<Option<Val>> {
        ctx.namespace_constant(&self.file_name, &self.name, name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionFile {
    file_name: String,
    namespaces: Vec<String>,
}

impl ReflectionFile {
    pub fn new(file_name: &str, namespaces: Vec<String>) -> Self {
        Self {
            file_name: file_name.to_owned(),
            namespaces,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Namespaces in declaration order
    pub fn namespaces(&self) -> Vec<ReflectionFileNamespace> {
        self.namespaces
            .iter()
            .map(|name| ReflectionFileNamespace::new(&self.file_name, name))
            .collect()
    }
}
