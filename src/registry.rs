//! Allow-list of what queries may reach.
//!
//! A [`Registry`] is declared once through a [`RegistryBuilder`] and never
//! changes afterwards. It maps entry point names to factories and, for every
//! declared type, member names to accessors. Anything not declared is denied,
//! even when the backend value has it.
//!
//! # Inheritance
//!
//! Types may extend other declared types. A type receives the members of its
//! supertypes unless it opts out with [`TypeSpec::inherit_members`], and a
//! supertype hands its members down unless it opts out with
//! [`TypeSpec::propagate_members`]. The most specific declaration of a member
//! wins. Member tables are flattened when the registry is built, so lookups
//! never walk the hierarchy.
//!
//! # Examples
//!
//! ```
//! use dataql::{Registry, TypeSpec, Value};
//!
//! let registry = Registry::builder()
//!     .register(TypeSpec::new("Person").allow("name"))
//!     .register(TypeSpec::new("User").extends("Person").allow("email"))
//!     .register_entry_point("Me", |_args| Ok(Value::Null))
//!     .build()
//!     .unwrap();
//!
//! assert!(registry.is_allowed("User", "name").is_some());
//! assert!(registry.is_allowed("Person", "email").is_none());
//! assert!(registry.entry_point("Me").is_some());
//! ```

use std::{
    collections::{HashMap, HashSet, VecDeque},
    fmt,
    sync::Arc,
};

use thiserror::Error;
use tracing::debug;

use crate::{
    builtins,
    value::{Args, CallError, Value},
};

/// Operator-substituted member: receives the current value and the call arguments.
pub type FilterFn = Arc<dyn Fn(&Value, &Args) -> Result<Value, CallError> + Send + Sync>;

/// Builds the root value of an entry point from the call arguments.
pub type FactoryFn = Arc<dyn Fn(&Args) -> Result<Value, CallError> + Send + Sync>;

/// How an allowed member is resolved.
#[derive(Clone)]
pub enum Accessor {
    /// Native attribute or method of the value
    Native,
    /// Function standing in for the member
    Filter(FilterFn),
}

impl Accessor {
    pub fn is_native(&self) -> bool {
        matches!(self, Accessor::Native)
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Native => write!(f, "Native"),
            Accessor::Filter(_) => write!(f, "Filter(..)"),
        }
    }
}

/// A named root a query can start from.
#[derive(Clone)]
pub struct EntryPoint {
    name: String,
    factory: FactoryFn,
}

impl EntryPoint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, args: &Args) -> Result<Value, CallError> {
        (self.factory)(args)
    }
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint").field("name", &self.name).finish()
    }
}

/// Errors found while declaring or building a registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("type '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("entry point '{0}' is already registered")]
    DuplicateEntryPoint(String),

    #[error("member '{member}' is declared twice on '{type_name}'")]
    DuplicateMember { type_name: String, member: String },

    #[error("type '{type_name}' extends undeclared type '{supertype}'")]
    UnknownSupertype {
        type_name: String,
        supertype: String,
    },

    #[error("type '{type_name}' inherits from itself")]
    InheritanceCycle { type_name: String },

    #[error(
        "member '{member}' of '{type_name}' is inherited ambiguously from {}",
        .candidates.join(", ")
    )]
    AmbiguousMember {
        type_name: String,
        member: String,
        candidates: Vec<String>,
    },

    #[error("no builtin filters exist for type '{0}'")]
    NoBuiltins(String),
}

/// Declaration of one type: supertypes, members and inheritance switches.
#[derive(Debug, Clone)]
pub struct TypeSpec {
    name: String,
    supertypes: Vec<String>,
    members: Vec<(String, Accessor)>,
    inherit_members: bool,
    propagate_members: bool,
}

impl TypeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        TypeSpec {
            name: name.into(),
            supertypes: vec![],
            members: vec![],
            inherit_members: true,
            propagate_members: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    /// Allows native access to a member.
    pub fn allow(mut self, member: impl Into<String>) -> Self {
        self.members.push((member.into(), Accessor::Native));
        self
    }

    /// Makes `member` resolve to `filter` instead of native access.
    pub fn allow_filter<F>(mut self, member: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&Value, &Args) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        self.members
            .push((member.into(), Accessor::Filter(Arc::new(filter))));
        self
    }

    /// Whether members of supertypes are received (default `true`).
    pub fn inherit_members(mut self, inherit: bool) -> Self {
        self.inherit_members = inherit;
        self
    }

    /// Whether own members are handed down to subtypes (default `true`).
    pub fn propagate_members(mut self, propagate: bool) -> Self {
        self.propagate_members = propagate;
        self
    }

    fn merge_members(&mut self, members: Vec<(String, Accessor)>) -> Result<(), RegistryError> {
        for (member, accessor) in members {
            if self.members.iter().any(|(m, _)| *m == member) {
                return Err(RegistryError::DuplicateMember {
                    type_name: self.name.clone(),
                    member,
                });
            }
            self.members.push((member, accessor));
        }
        Ok(())
    }
}

/// Collects declarations; errors are reported by [`RegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entry_points: Vec<EntryPoint>,
    types: Vec<TypeSpec>,
    explicit: HashSet<String>,
    errors: Vec<RegistryError>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn type_mut(&mut self, name: &str) -> &mut TypeSpec {
        let index = match self.types.iter().position(|spec| spec.name == name) {
            Some(index) => index,
            None => {
                self.types.push(TypeSpec::new(name));
                self.types.len() - 1
            }
        };
        &mut self.types[index]
    }

    fn add_member(mut self, type_name: &str, member: String, accessor: Accessor) -> Self {
        if let Err(e) = self.type_mut(type_name).merge_members(vec![(member, accessor)]) {
            self.errors.push(e);
        }
        self
    }

    /// Declares a type at once. Declaring the same type twice is an error;
    /// members added earlier through [`RegistryBuilder::allow`] are kept.
    pub fn register(mut self, spec: TypeSpec) -> Self {
        if !self.explicit.insert(spec.name.clone()) {
            self.errors
                .push(RegistryError::AlreadyRegistered(spec.name.clone()));
            return self;
        }

        let TypeSpec {
            name,
            supertypes,
            members,
            inherit_members,
            propagate_members,
        } = spec;

        let existing = self.type_mut(&name);
        existing.supertypes.extend(supertypes);
        existing.inherit_members = inherit_members;
        existing.propagate_members = propagate_members;
        if let Err(e) = existing.merge_members(members) {
            self.errors.push(e);
        }
        self
    }

    /// Allows native access to `member` on `type_name` and its subtypes.
    pub fn allow(self, type_name: &str, member: &str) -> Self {
        self.add_member(type_name, member.to_string(), Accessor::Native)
    }

    /// Makes `member` of `type_name` resolve to `filter` instead of native access.
    pub fn allow_filter<F>(self, type_name: &str, member: &str, filter: F) -> Self
    where
        F: Fn(&Value, &Args) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        self.add_member(
            type_name,
            member.to_string(),
            Accessor::Filter(Arc::new(filter)),
        )
    }

    /// Allows every builtin filter of a builtin value type.
    pub fn allow_builtins(mut self, type_name: &str) -> Self {
        let filters = builtins::for_type(type_name);
        if filters.is_empty() {
            self.errors
                .push(RegistryError::NoBuiltins(type_name.to_string()));
            return self;
        }
        for (name, filter) in filters {
            self = self.add_member(type_name, name.to_string(), Accessor::Filter(Arc::new(*filter)));
        }
        self
    }

    pub fn register_entry_point<F>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn(&Args) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        if self.entry_points.iter().any(|entry| entry.name == name) {
            self.errors
                .push(RegistryError::DuplicateEntryPoint(name.to_string()));
            return self;
        }
        self.entry_points.push(EntryPoint {
            name: name.to_string(),
            factory: Arc::new(factory),
        });
        self
    }

    /// Validates the declarations and flattens member tables.
    pub fn build(self) -> Result<Registry, RegistryError> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        let specs: HashMap<&str, &TypeSpec> = self
            .types
            .iter()
            .map(|spec| (spec.name.as_str(), spec))
            .collect();

        for spec in &self.types {
            for supertype in &spec.supertypes {
                if !specs.contains_key(supertype.as_str()) {
                    return Err(RegistryError::UnknownSupertype {
                        type_name: spec.name.clone(),
                        supertype: supertype.clone(),
                    });
                }
            }
        }

        let mut ancestry = HashMap::new();
        for spec in &self.types {
            ancestry.insert(spec.name.as_str(), ancestors(spec, &specs)?);
        }

        let mut members = HashMap::new();
        for spec in &self.types {
            let table = flatten(spec, &specs, &ancestry)?;
            members.insert(spec.name.clone(), table);
        }

        let entry_points: HashMap<String, EntryPoint> = self
            .entry_points
            .into_iter()
            .map(|entry| (entry.name.clone(), entry))
            .collect();

        debug!(
            entry_points = entry_points.len(),
            types = members.len(),
            "registry built"
        );

        Ok(Registry {
            entry_points,
            members,
        })
    }
}

/// All ancestors of a type with their shortest distance, nearest first.
fn ancestors<'a>(
    spec: &'a TypeSpec,
    specs: &HashMap<&'a str, &'a TypeSpec>,
) -> Result<Vec<(&'a str, usize)>, RegistryError> {
    let mut found: Vec<(&str, usize)> = vec![];
    let mut queue: VecDeque<(&str, usize)> = spec
        .supertypes
        .iter()
        .map(|s| (s.as_str(), 1))
        .collect();

    while let Some((name, depth)) = queue.pop_front() {
        if name == spec.name {
            return Err(RegistryError::InheritanceCycle {
                type_name: spec.name.clone(),
            });
        }
        if found.iter().any(|(n, _)| *n == name) {
            continue;
        }
        found.push((name, depth));
        if let Some(parent) = specs.get(name) {
            queue.extend(parent.supertypes.iter().map(|s| (s.as_str(), depth + 1)));
        }
    }

    Ok(found)
}

fn flatten(
    spec: &TypeSpec,
    specs: &HashMap<&str, &TypeSpec>,
    ancestry: &HashMap<&str, Vec<(&str, usize)>>,
) -> Result<HashMap<String, Accessor>, RegistryError> {
    let mut table: HashMap<String, Accessor> = spec.members.iter().cloned().collect();
    if !spec.inherit_members {
        return Ok(table);
    }

    let lineage = ancestry.get(spec.name.as_str()).cloned().unwrap_or_default();
    let is_ancestor_of = |ancestor: &str, of: &str| {
        ancestry
            .get(of)
            .is_some_and(|list| list.iter().any(|(n, _)| *n == ancestor))
    };

    let mut candidates: HashMap<&str, Vec<(&str, usize, &Accessor)>> = HashMap::new();
    for (ancestor, depth) in &lineage {
        let Some(parent) = specs.get(ancestor) else {
            continue;
        };
        if !parent.propagate_members {
            continue;
        }
        for (member, accessor) in &parent.members {
            if table.contains_key(member) {
                continue;
            }
            candidates
                .entry(member.as_str())
                .or_default()
                .push((*ancestor, *depth, accessor));
        }
    }

    for (member, found) in candidates {
        // Keep the most specific declarations: drop any that a candidate overrides.
        let specific: Vec<_> = found
            .iter()
            .filter(|(owner, _, _)| {
                !found
                    .iter()
                    .any(|(other, _, _)| other != owner && is_ancestor_of(owner, other))
            })
            .collect();

        let Some(nearest) = specific.iter().map(|(_, depth, _)| *depth).min() else {
            continue;
        };
        let tied: Vec<_> = specific
            .iter()
            .filter(|(_, depth, _)| *depth == nearest)
            .collect();

        if tied.len() > 1 && tied.iter().any(|(_, _, accessor)| !accessor.is_native()) {
            let mut names: Vec<String> = tied.iter().map(|(owner, _, _)| owner.to_string()).collect();
            names.sort();
            return Err(RegistryError::AmbiguousMember {
                type_name: spec.name.clone(),
                member: member.to_string(),
                candidates: names,
            });
        }

        if let Some((_, _, accessor)) = tied.first() {
            table.insert(member.to_string(), (*accessor).clone());
        }
    }

    Ok(table)
}

/// Immutable allow-list shared by every solve.
#[derive(Debug)]
pub struct Registry {
    entry_points: HashMap<String, EntryPoint>,
    members: HashMap<String, HashMap<String, Accessor>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn entry_point(&self, name: &str) -> Option<&EntryPoint> {
        self.entry_points.get(name)
    }

    /// How `member` resolves on values of `type_name`; `None` means denied.
    pub fn is_allowed(&self, type_name: &str, member: &str) -> Option<&Accessor> {
        self.members.get(type_name)?.get(member)
    }

    /// Entry point names, sorted.
    pub fn entry_points(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entry_points.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Declared type names, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.members.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Members reachable on a type, own and inherited, sorted.
    pub fn members(&self, type_name: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .members
            .get(type_name)
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }
}
