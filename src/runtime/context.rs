use crate::core::value::Val;
use crate::error::{ReflectionError, Result};
use crate::parser::ast::{ClassLike, Expr, FunctionDecl, Stmt};
use crate::reflection::Subject;
use crate::reflection::class::ReflectionClass;
use crate::reflection::function::ReflectionFunction;
use crate::reflection::namespace::{ReflectionFile, ReflectionFileNamespace};
use crate::resolver::evaluate;
use crate::runtime::builtins;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing::{debug, trace};

/// Source of syntax nodes and reflections for the resolver.
///
/// Class names are passed fully qualified, with or without a leading `\`.
pub trait ReflectionContext {
    /// Class-like declaration for a class name
    fn parse_class(&self, name: &str) -> Result<Rc<ClassLike>>;

    /// Reflection for a user-defined or internal class
    fn get_class_reflection(&self, name: &str) -> Result<Rc<ReflectionClass>>;

    /// A class the runtime already knows without parsing source
    fn loaded_class(&self, name: &str) -> Option<Rc<ReflectionClass>>;

    /// Value of `const NAME` declared in `namespace` of `file`
    fn namespace_constant(&self, file: &str, namespace: &str, name: &str) -> Result<Option<Val>>;

    /// A constant defined outside any source file being reflected
    fn global_constant(&self, name: &str) -> Option<Val>;
}

/// Lowercased lookup key for class and function names
fn symbol_key(name: &str) -> String {
    name.trim_start_matches('\\').to_ascii_lowercase()
}

/// Join a namespace and a short name the way PHP prints qualified names
pub(crate) fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_owned()
    } else {
        format!("{namespace}\\{name}")
    }
}

struct ClassEntry {
    name: String,
    node: Rc<ClassLike>,
    file_name: String,
}

struct FunctionEntry {
    name: String,
    node: Rc<FunctionDecl>,
    file_name: String,
}

/// Namespace names are case-insensitive, constant names are not
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ConstantKey {
    file: String,
    namespace: String,
    name: String,
}

impl ConstantKey {
    fn new(file: &str, namespace: &str, name: &str) -> Self {
        Self {
            file: file.to_owned(),
            namespace: namespace.trim_matches('\\').to_ascii_lowercase(),
            name: name.to_owned(),
        }
    }
}

struct ConstantEntry {
    namespace: String,
    value: Expr,
}

/// In-memory context over already parsed files.
///
/// Declarations are indexed when the registry is built. Class reflections and
/// namespace constant values are computed on first use and cached.
pub struct SourceRegistry {
    constants: IndexMap<String, Val>,
    internal_classes: HashMap<String, Rc<ReflectionClass>>,
    classes: HashMap<String, ClassEntry>,
    functions: HashMap<String, FunctionEntry>,
    files: IndexMap<String, Vec<String>>,
    namespace_constants: IndexMap<ConstantKey, ConstantEntry>,
    reflections: RefCell<HashMap<String, Rc<ReflectionClass>>>,
    constant_values: RefCell<HashMap<ConstantKey, Val>>,
    evaluating: RefCell<HashSet<ConstantKey>>,
}

impl SourceRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    fn empty() -> Self {
        Self {
            constants: IndexMap::new(),
            internal_classes: HashMap::new(),
            classes: HashMap::new(),
            functions: HashMap::new(),
            files: IndexMap::new(),
            namespace_constants: IndexMap::new(),
            reflections: RefCell::new(HashMap::new()),
            constant_values: RefCell::new(HashMap::new()),
            evaluating: RefCell::new(HashSet::new()),
        }
    }

    pub fn class(&self, name: &str) -> Result<Rc<ReflectionClass>> {
        self.get_class_reflection(name)
    }

    pub fn function(&self, name: &str) -> Result<ReflectionFunction> {
        let entry = self
            .functions
            .get(&symbol_key(name))
            .ok_or_else(|| ReflectionError::FunctionNotFound(name.to_owned()))?;
        Ok(ReflectionFunction::new(
            &entry.name,
            entry.node.clone(),
            Some(&entry.file_name),
        ))
    }

    pub fn file(&self, file_name: &str) -> Option<ReflectionFile> {
        let namespaces = self.files.get(file_name)?;
        Some(ReflectionFile::new(file_name, namespaces.clone()))
    }

    pub fn namespace(&self, file_name: &str, name: &str) -> ReflectionFileNamespace {
        ReflectionFileNamespace::new(file_name, name)
    }

    fn index_file(&mut self, file_name: &str, statements: Vec<Stmt>) {
        self.files.entry(file_name.to_owned()).or_default();

        let mut global = Vec::new();
        for stmt in statements {
            match stmt {
                Stmt::Namespace { name, body, .. } => {
                    let namespace = name.map(|n| n.to_string()).unwrap_or_default();
                    self.index_namespace(file_name, &namespace, &body);
                }
                other => global.push(other),
            }
        }
        if !global.is_empty() {
            self.index_namespace(file_name, "", &global);
        }
    }

    fn index_namespace(&mut self, file_name: &str, namespace: &str, statements: &[Stmt]) {
        let namespaces = self.files.entry(file_name.to_owned()).or_default();
        if !namespaces.iter().any(|n| n.eq_ignore_ascii_case(namespace)) {
            namespaces.push(namespace.to_owned());
        }

        for stmt in statements {
            match stmt {
                Stmt::ClassLike(class) => {
                    let name = qualify(namespace, &class.name);
                    trace!(class = %name, file = file_name, "indexing class");
                    self.classes.insert(
                        symbol_key(&name),
                        ClassEntry {
                            name,
                            node: class.clone(),
                            file_name: file_name.to_owned(),
                        },
                    );
                }
                Stmt::Function(function) => {
                    let name = qualify(namespace, &function.name);
                    self.functions.insert(
                        symbol_key(&name),
                        FunctionEntry {
                            name,
                            node: function.clone(),
                            file_name: file_name.to_owned(),
                        },
                    );
                }
                Stmt::Const { consts, .. } => {
                    for item in consts {
                        self.namespace_constants.insert(
                            ConstantKey::new(file_name, namespace, &item.name),
                            ConstantEntry {
                                namespace: namespace.to_owned(),
                                value: item.value.clone(),
                            },
                        );
                    }
                }
                // Conditional declarations such as `if (!class_exists(...)) { class ... }`
                Stmt::Block { statements, .. } => {
                    self.index_namespace(file_name, namespace, statements)
                }
                Stmt::If {
                    then_block,
                    else_block,
                    ..
                } => {
                    self.index_namespace(file_name, namespace, then_block);
                    if let Some(else_block) = else_block {
                        self.index_namespace(file_name, namespace, else_block);
                    }
                }
                _ => {}
            }
        }
    }

    fn evaluate_namespace_constant(&self, key: &ConstantKey) -> Result<Option<Val>> {
        if let Some(value) = self.constant_values.borrow().get(key) {
            return Ok(Some(value.clone()));
        }
        let Some(entry) = self.namespace_constants.get(key) else {
            return Ok(None);
        };

        if !self.evaluating.borrow_mut().insert(key.clone()) {
            return Err(ReflectionError::SelfReferencingConstant(qualify(
                &entry.namespace,
                &key.name,
            )));
        }

        let namespace = ReflectionFileNamespace::new(&key.file, &entry.namespace);
        let result = evaluate(&entry.value, Subject::Namespace(&namespace), self);
        self.evaluating.borrow_mut().remove(key);

        let value = result?.value;
        self.constant_values
            .borrow_mut()
            .insert(key.clone(), value.clone());
        Ok(Some(value))
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        RegistryBuilder::new()
            .with_core_constants()
            .with_internal_classes()
            .build()
    }
}

impl ReflectionContext for SourceRegistry {
    fn parse_class(&self, name: &str) -> Result<Rc<ClassLike>> {
        self.classes
            .get(&symbol_key(name))
            .map(|entry| entry.node.clone())
            .ok_or_else(|| ReflectionError::ClassNotFound(name.trim_start_matches('\\').to_owned()))
    }

    fn get_class_reflection(&self, name: &str) -> Result<Rc<ReflectionClass>> {
        let key = symbol_key(name);
        if let Some(class) = self.reflections.borrow().get(&key) {
            return Ok(class.clone());
        }

        if let Some(entry) = self.classes.get(&key) {
            trace!(class = %entry.name, "creating class reflection");
            let class = Rc::new(ReflectionClass::user(
                &entry.name,
                entry.node.clone(),
                Some(&entry.file_name),
            ));
            self.reflections.borrow_mut().insert(key, class.clone());
            return Ok(class);
        }

        self.loaded_class(name)
            .ok_or_else(|| ReflectionError::ClassNotFound(name.trim_start_matches('\\').to_owned()))
    }

    fn loaded_class(&self, name: &str) -> Option<Rc<ReflectionClass>> {
        self.internal_classes.get(&symbol_key(name)).cloned()
    }

    fn namespace_constant(&self, file: &str, namespace: &str, name: &str) -> Result<Option<Val>> {
        self.evaluate_namespace_constant(&ConstantKey::new(file, namespace, name))
    }

    fn global_constant(&self, name: &str) -> Option<Val> {
        let name = name.trim_start_matches('\\');
        if let Some(value) = builtins::keyword_constant(name) {
            return Some(value);
        }
        if let Some(value) = self.constants.get(name) {
            return Some(value.clone());
        }

        // `const` declarations from any indexed file are visible by their full name
        let (namespace, short_name) = match name.rsplit_once('\\') {
            Some((namespace, short_name)) => (namespace, short_name),
            None => ("", name),
        };
        let namespace = namespace.to_ascii_lowercase();
        let key = self
            .namespace_constants
            .keys()
            .find(|key| key.namespace == namespace && key.name == short_name)?
            .clone();

        match self.evaluate_namespace_constant(&key) {
            Ok(value) => value,
            Err(err) => {
                debug!(constant = name, error = %err, "constant initializer failed");
                None
            }
        }
    }
}

/// Builder for [`SourceRegistry`]
///
/// # Example
/// ```ignore
/// let registry = RegistryBuilder::new()
///     .with_core_constants()
///     .with_internal_classes()
///     .with_file("src/Config.php", statements)
///     .build();
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    core_constants: bool,
    internal_classes: bool,
    constants: Vec<(String, Val)>,
    files: Vec<(String, Vec<Stmt>)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// PHP's predefined constants (`PHP_EOL`, `PHP_INT_MAX`, `E_*`, ...)
    pub fn with_core_constants(mut self) -> Self {
        self.core_constants = true;
        self
    }

    /// Built-in classes such as `DateTimeInterface` and `ArrayObject`
    pub fn with_internal_classes(mut self) -> Self {
        self.internal_classes = true;
        self
    }

    /// A constant defined at runtime, e.g. with `define()`
    pub fn with_constant(mut self, name: &str, value: impl Into<Val>) -> Self {
        self.constants.push((name.to_owned(), value.into()));
        self
    }

    pub fn with_file(mut self, file_name: &str, statements: Vec<Stmt>) -> Self {
        self.files.push((file_name.to_owned(), statements));
        self
    }

    pub fn build(self) -> SourceRegistry {
        let mut registry = SourceRegistry::empty();

        if self.core_constants {
            registry.constants.extend(builtins::core_constants());
        }
        if self.internal_classes {
            for class in builtins::internal_classes() {
                registry
                    .internal_classes
                    .insert(symbol_key(class.name()), Rc::new(class));
            }
        }
        registry.constants.extend(self.constants);

        for (file_name, statements) in self.files {
            registry.index_file(&file_name, statements);
        }

        registry
    }
}
