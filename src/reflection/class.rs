//! Class reflection over class-like declarations.
//!
//! A [`ReflectionClass`] is either backed by a parsed declaration (user
//! classes) or by a static table (internal classes). Constant initializers of
//! user classes are evaluated on first access, with the class as subject, and
//! cached for the lifetime of the reflection.

use crate::core::value::Val;
use crate::error::{ReflectionError, Result};
use crate::parser::ast::{ClassKind, ClassLike, ClassMember, Name, TraitAdaptation};
use crate::reflection::Subject;
use crate::reflection::function::ReflectionMethod;
use crate::resolver::class_ref::lookup_class;
use crate::resolver::evaluate;
use crate::runtime::context::ReflectionContext;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing::debug;

#[derive(Debug)]
enum ClassSource {
    Internal {
        parent: Option<String>,
        interfaces: Vec<String>,
        constants: IndexMap<String, Val>,
    },
    User {
        node: Rc<ClassLike>,
        file_name: Option<String>,
    },
}

#[derive(Debug)]
pub struct ReflectionClass {
    /// Fully qualified, without the leading separator
    name: String,
    kind: ClassKind,
    source: ClassSource,
    constant_values: RefCell<HashMap<String, Val>>,
    evaluating: RefCell<HashSet<String>>,
}

impl ReflectionClass {
    pub fn internal(
        name: &str,
        kind: ClassKind,
        parent: Option<&str>,
        interfaces: &[&str],
        constants: IndexMap<String, Val>,
    ) -> Self {
        Self::with_source(
            name,
            kind,
            ClassSource::Internal {
                parent: parent.map(str::to_owned),
                interfaces: interfaces.iter().map(|i| (*i).to_owned()).collect(),
                constants,
            },
        )
    }

    pub fn user(name: &str, node: Rc<ClassLike>, file_name: Option<&str>) -> Self {
        let kind = node.kind;
        Self::with_source(
            name,
            kind,
            ClassSource::User {
                node,
                file_name: file_name.map(str::to_owned),
            },
        )
    }

    fn with_source(name: &str, kind: ClassKind, source: ClassSource) -> Self {
        Self {
            name: name.trim_start_matches('\\').to_owned(),
            kind,
            source,
            constant_values: RefCell::new(HashMap::new()),
            evaluating: RefCell::new(HashSet::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        self.name
            .rsplit_once('\\')
            .map_or(self.name.as_str(), |(_, short)| short)
    }

    pub fn namespace_name(&self) -> &str {
        self.name
            .rsplit_once('\\')
            .map_or("", |(namespace, _)| namespace)
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn is_trait(&self) -> bool {
        self.kind == ClassKind::Trait
    }

    pub fn is_user_defined(&self) -> bool {
        matches!(self.source, ClassSource::User { .. })
    }

    pub fn file_name(&self) -> Option<&str> {
        match &self.source {
            ClassSource::User { file_name, .. } => file_name.as_deref(),
            ClassSource::Internal { .. } => None,
        }
    }

    /// Declaration node, absent for internal classes
    pub fn node(&self) -> Option<&Rc<ClassLike>> {
        match &self.source {
            ClassSource::User { node, .. } => Some(node),
            ClassSource::Internal { .. } => None,
        }
    }

    pub fn parent_class_name(&self) -> Option<String> {
        match &self.source {
            ClassSource::Internal { parent, .. } => parent.clone(),
            ClassSource::User { node, .. } if node.kind == ClassKind::Class => {
                node.extends.first().map(Name::to_string)
            }
            ClassSource::User { .. } => None,
        }
    }

    pub fn parent_class(&self, ctx: &dyn ReflectionContext) -> Result<Option<Rc<ReflectionClass>>> {
        self.parent_class_name()
            .map(|parent| lookup_class(&parent, ctx))
            .transpose()
    }

    pub fn interfaces(
        &self,
        ctx: &dyn ReflectionContext,
    ) -> Result<IndexMap<String, Rc<ReflectionClass>>> {
        match &self.source {
            ClassSource::User { node, .. } => collect_interfaces(node, ctx),
            ClassSource::Internal { interfaces, .. } => interfaces
                .iter()
                .map(|name| Ok::<_, ReflectionError>((name.clone(), lookup_class(name, ctx)?)))
                .collect(),
        }
    }

    pub fn traits(&self, ctx: &dyn ReflectionContext) -> Result<IndexMap<String, Rc<ReflectionClass>>> {
        match &self.source {
            ClassSource::User { node, .. } => Ok(collect_traits(node, ctx)?.0),
            ClassSource::Internal { .. } => Ok(IndexMap::new()),
        }
    }

    pub fn trait_adaptations(&self) -> Vec<TraitAdaptation> {
        self.node()
            .and_then(|node| trait_uses(node).last())
            .map(|(_, adaptations)| adaptations.to_vec())
            .unwrap_or_default()
    }

    /// Constant value, searching this class, then its parents, then its
    /// interfaces
    pub fn constant(self: &Rc<Self>, name: &str, ctx: &dyn ReflectionContext) -> Result<Option<Val>> {
        self.find_constant(name, ctx, &mut HashSet::new())
    }

    fn find_constant(
        self: &Rc<Self>,
        name: &str,
        ctx: &dyn ReflectionContext,
        ancestors: &mut HashSet<String>,
    ) -> Result<Option<Val>> {
        self.walk_hierarchy(ancestors, |ancestors| {
            if let Some(value) = self.own_constant(name, ctx)? {
                return Ok(Some(value));
            }
            if let Some(parent) = self.parent_class(ctx)? {
                if let Some(value) = parent.find_constant(name, ctx, ancestors)? {
                    return Ok(Some(value));
                }
            }
            for interface in self.interfaces(ctx)?.values() {
                if let Some(value) = interface.find_constant(name, ctx, ancestors)? {
                    return Ok(Some(value));
                }
            }
            Ok(None)
        })
    }

    /// All visible constants, own declarations first
    pub fn constants(self: &Rc<Self>, ctx: &dyn ReflectionContext) -> Result<IndexMap<String, Val>> {
        self.collect_constants(ctx, &mut HashSet::new())
    }

    fn collect_constants(
        self: &Rc<Self>,
        ctx: &dyn ReflectionContext,
        ancestors: &mut HashSet<String>,
    ) -> Result<IndexMap<String, Val>> {
        self.walk_hierarchy(ancestors, |ancestors| {
            let mut constants = IndexMap::new();
            for name in self.own_constant_names() {
                if let Some(value) = self.own_constant(&name, ctx)? {
                    constants.insert(name, value);
                }
            }

            let mut inherited: Vec<Rc<ReflectionClass>> = Vec::new();
            inherited.extend(self.parent_class(ctx)?);
            inherited.extend(self.interfaces(ctx)?.into_values());
            for class in inherited {
                for (name, value) in class.collect_constants(ctx, ancestors)? {
                    constants.entry(name).or_insert(value);
                }
            }

            Ok(constants)
        })
    }

    /// Run `walk` with this class on the ancestor path. Diamond-shaped
    /// interface graphs visit a class twice, but never while it is still on
    /// the path.
    fn walk_hierarchy<T>(
        &self,
        ancestors: &mut HashSet<String>,
        walk: impl FnOnce(&mut HashSet<String>) -> Result<T>,
    ) -> Result<T> {
        let key = self.name.to_ascii_lowercase();
        if !ancestors.insert(key.clone()) {
            return Err(ReflectionError::CircularInheritance(self.name.clone()));
        }
        let result = walk(ancestors);
        ancestors.remove(&key);
        result
    }

    fn own_constant_names(&self) -> Vec<String> {
        match &self.source {
            ClassSource::Internal { constants, .. } => constants.keys().cloned().collect(),
            ClassSource::User { node, .. } => node.constants().map(|c| c.name.clone()).collect(),
        }
    }

    fn own_constant(self: &Rc<Self>, name: &str, ctx: &dyn ReflectionContext) -> Result<Option<Val>> {
        let node = match &self.source {
            ClassSource::Internal { constants, .. } => return Ok(constants.get(name).cloned()),
            ClassSource::User { node, .. } => node,
        };

        if let Some(value) = self.constant_values.borrow().get(name) {
            return Ok(Some(value.clone()));
        }
        let Some(item) = node.constant(name) else {
            return Ok(None);
        };

        if !self.evaluating.borrow_mut().insert(name.to_owned()) {
            return Err(ReflectionError::SelfReferencingConstant(format!(
                "{}::{}",
                self.name, name
            )));
        }
        let result = evaluate(&item.value, Subject::Class(self), ctx);
        self.evaluating.borrow_mut().remove(name);

        let value = result?.value;
        self.constant_values
            .borrow_mut()
            .insert(name.to_owned(), value.clone());
        Ok(Some(value))
    }

    /// Default value of a declared property, looking through parent classes.
    /// `Some(Val::Null)` when the property exists without a default.
    pub fn property_default(
        self: &Rc<Self>,
        name: &str,
        ctx: &dyn ReflectionContext,
    ) -> Result<Option<Val>> {
        self.find_property_default(name.trim_start_matches('$'), ctx, &mut HashSet::new())
    }

    fn find_property_default(
        self: &Rc<Self>,
        name: &str,
        ctx: &dyn ReflectionContext,
        ancestors: &mut HashSet<String>,
    ) -> Result<Option<Val>> {
        self.walk_hierarchy(ancestors, |ancestors| {
            if let Some(entry) = self.node().and_then(|node| node.property(name)) {
                return match &entry.default {
                    Some(default) => Ok(Some(evaluate(default, Subject::Class(self), ctx)?.value)),
                    None => Ok(Some(Val::Null)),
                };
            }
            match self.parent_class(ctx)? {
                Some(parent) => parent.find_property_default(name, ctx, ancestors),
                None => Ok(None),
            }
        })
    }

    /// Method declared directly in this class
    pub fn method(self: &Rc<Self>, name: &str) -> Option<ReflectionMethod> {
        let decl = self.node()?.method(name)?;
        Some(ReflectionMethod::new(self.clone(), &decl.name))
    }

    pub fn methods(self: &Rc<Self>) -> Vec<ReflectionMethod> {
        self.node()
            .map(|node| {
                node.methods()
                    .map(|decl| ReflectionMethod::new(self.clone(), &decl.name))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn interface_list(node: &ClassLike) -> &[Name] {
    match node.kind {
        ClassKind::Interface => &node.extends,
        _ => &node.implements,
    }
}

fn trait_uses(node: &ClassLike) -> impl Iterator<Item = (&[Name], &[TraitAdaptation])> {
    node.members.iter().filter_map(|member| match member {
        ClassMember::TraitUse {
            traits,
            adaptations,
            ..
        } => Some((traits.as_slice(), adaptations.as_slice())),
        _ => None,
    })
}

/// Reflections of the interfaces a class-like node declares: `extends` for
/// interfaces, `implements` for everything else. Only fully qualified names
/// are resolved.
pub fn collect_interfaces(
    node: &ClassLike,
    ctx: &dyn ReflectionContext,
) -> Result<IndexMap<String, Rc<ReflectionClass>>> {
    let mut interfaces = IndexMap::new();
    for name in interface_list(node) {
        if !name.is_fully_qualified() {
            debug!(class = %node.name, interface = %name, "skipping unresolved interface name");
            continue;
        }
        let interface_name = name.to_string();
        let interface = ctx.get_class_reflection(&interface_name)?;
        interfaces.insert(interface_name, interface);
    }
    Ok(interfaces)
}

/// Reflections of the traits used by a class-like node, with the adaptation
/// rules of its last `use` block.
pub fn collect_traits(
    node: &ClassLike,
    ctx: &dyn ReflectionContext,
) -> Result<(IndexMap<String, Rc<ReflectionClass>>, Vec<TraitAdaptation>)> {
    let mut traits = IndexMap::new();
    let mut trait_adaptations = Vec::new();

    for (names, adaptations) in trait_uses(node) {
        for name in names {
            if !name.is_fully_qualified() {
                debug!(class = %node.name, r#trait = %name, "skipping unresolved trait name");
                continue;
            }
            let trait_name = name.to_string();
            let reflection = ctx.get_class_reflection(&trait_name)?;
            traits.insert(trait_name, reflection);
        }
        // Each block replaces the adaptations of the previous one
        trait_adaptations = adaptations.to_vec();
    }

    Ok((traits, trait_adaptations))
}
