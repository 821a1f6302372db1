use std::fmt;

use crate::{
    ast::{Filter, filters::write_chain},
    lexer::Position,
};

/// Leaf resource: the end value of its filter chain.
///
/// # Example
/// ```text
/// birthday.strftime('%x')
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub alias: Option<String>,
    pub filters: Vec<Filter>,
    pub position: Position,
}

/// Resource whose value is iterated, every element resolved through the body.
///
/// With no filters the list iterates the value it is resolved against,
/// as in the inner list of `matrix[[value]]`.
///
/// # Example
/// ```text
/// companies[{ name, year: created_year }]
/// companies[name, created_year]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub alias: Option<String>,
    pub filters: Vec<Filter>,
    pub body: Vec<Resource>,
    pub position: Position,
}

/// Resource producing a mapping from each child's key to its result.
///
/// With no filters the children are resolved against the value itself,
/// as in the anonymous body of `companies[{ name }]`.
///
/// # Example
/// ```text
/// User.get('Elon Musk') { name, company_names: companies[name] }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub alias: Option<String>,
    pub filters: Vec<Filter>,
    pub children: Vec<Resource>,
    pub position: Position,
}

/// Node of the resource tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Field(Field),
    List(List),
    Object(Object),
}

fn resource_key<'a>(alias: &'a Option<String>, filters: &'a [Filter]) -> Option<&'a str> {
    alias
        .as_deref()
        .or_else(|| filters.first().and_then(Filter::name))
}

impl Field {
    pub fn key(&self) -> Option<&str> {
        resource_key(&self.alias, &self.filters)
    }
}

impl List {
    pub fn key(&self) -> Option<&str> {
        resource_key(&self.alias, &self.filters)
    }
}

impl Object {
    pub fn key(&self) -> Option<&str> {
        resource_key(&self.alias, &self.filters)
    }
}

impl Resource {
    /// Output key: the alias if any, else the name of the first step.
    ///
    /// Anonymous list items (`{...}`, `[...]`) have no key.
    pub fn key(&self) -> Option<&str> {
        match self {
            Resource::Field(field) => field.key(),
            Resource::List(list) => list.key(),
            Resource::Object(object) => object.key(),
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            Resource::Field(Field { alias, .. })
            | Resource::List(List { alias, .. })
            | Resource::Object(Object { alias, .. }) => alias.as_deref(),
        }
    }

    pub fn filters(&self) -> &[Filter] {
        match self {
            Resource::Field(Field { filters, .. })
            | Resource::List(List { filters, .. })
            | Resource::Object(Object { filters, .. }) => filters,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Resource::Field(Field { position, .. })
            | Resource::List(List { position, .. })
            | Resource::Object(Object { position, .. }) => *position,
        }
    }
}

fn write_head(f: &mut fmt::Formatter<'_>, alias: &Option<String>, filters: &[Filter]) -> fmt::Result {
    if let Some(alias) = alias {
        write!(f, "{}: ", alias)?;
    }
    write_chain(f, filters)
}

fn write_separated(f: &mut fmt::Formatter<'_>, resources: &[Resource]) -> fmt::Result {
    for (i, resource) in resources.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", resource)?;
    }
    Ok(())
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_head(f, &self.alias, &self.filters)
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_head(f, &self.alias, &self.filters)?;
        f.write_str("[")?;
        write_separated(f, &self.body)?;
        f.write_str("]")
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_head(f, &self.alias, &self.filters)?;
        if !self.filters.is_empty() {
            f.write_str(" ")?;
        }
        if self.children.is_empty() {
            return f.write_str("{}");
        }
        f.write_str("{ ")?;
        write_separated(f, &self.children)?;
        f.write_str(" }")
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Field(field) => field.fmt(f),
            Resource::List(list) => list.fmt(f),
            Resource::Object(object) => object.fmt(f),
        }
    }
}
