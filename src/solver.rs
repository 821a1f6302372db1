use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    ast::{Field, Filter, List, Object, Query, Resource},
    lexer::Position,
    registry::{Accessor, Registry},
    value::{Args, CallError, Value},
};

/// Errors that can occur while resolving a query.
///
/// Every variant carries the position of the step that failed.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("unknown entry point '{name}' at {position}")]
    UnknownEntryPoint { name: String, position: Position },

    /// The registry does not allow the member on the value's type
    #[error("'{name}' is not allowed on {type_name} at {position}")]
    NotAllowed {
        name: String,
        type_name: String,
        position: Position,
    },

    /// The member is allowed but the value does not have it
    #[error("'{name}' not found on {type_name} at {position}")]
    AttributeNotFound {
        name: String,
        type_name: String,
        position: Position,
    },

    #[error("index {index} not found on {type_name} at {position}")]
    IndexNotFound {
        index: i64,
        type_name: String,
        position: Position,
    },

    #[error("{type_name} cannot be indexed or sliced at {position}")]
    NotSubscriptable { type_name: String, position: Position },

    #[error("{type_name} is not iterable at {position}")]
    NotIterable { type_name: String, position: Position },

    /// An entry point, method or filter function failed
    #[error("'{name}' failed at {position}: {source}")]
    FilterExecution {
        name: String,
        position: Position,
        #[source]
        source: CallError,
    },
}

impl SolveError {
    pub fn position(&self) -> Position {
        match self {
            SolveError::UnknownEntryPoint { position, .. }
            | SolveError::NotAllowed { position, .. }
            | SolveError::AttributeNotFound { position, .. }
            | SolveError::IndexNotFound { position, .. }
            | SolveError::NotSubscriptable { position, .. }
            | SolveError::NotIterable { position, .. }
            | SolveError::FilterExecution { position, .. } => *position,
        }
    }
}

/// Resolves resource trees against live values.
///
/// The solver holds nothing but a reference to the registry, so one registry
/// can serve any number of solvers on any number of threads.
///
/// # Examples
///
/// ```
/// use dataql::{parse, Registry, Solver, Value};
///
/// let registry = Registry::builder()
///     .allow("map", "name")
///     .register_entry_point("Me", |_args| Ok(Value::map([("name", Value::from("Ada"))])))
///     .build()
///     .unwrap();
///
/// let query = parse("Me { name }").unwrap();
/// let result = Solver::new(&registry).solve(&query).unwrap();
///
/// assert_eq!(result, Value::map([("name", Value::from("Ada"))]));
/// ```
pub struct Solver<'r> {
    registry: &'r Registry,
}

impl<'r> Solver<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Solver { registry }
    }

    /// Resolves a query from its entry point.
    pub fn solve(&self, query: &Query) -> Result<Value, SolveError> {
        let root = &query.root;
        let Some(first) = root.filters.first() else {
            return self.solve_object(root, Value::Null);
        };
        let name = first.name().unwrap_or_default();
        let position = first.position();

        let entry_point =
            self.registry
                .entry_point(name)
                .ok_or_else(|| SolveError::UnknownEntryPoint {
                    name: name.to_string(),
                    position,
                })?;
        debug!(entry_point = name, "resolving entry point");

        let value = entry_point
            .invoke(&Args::from_arguments(first.args()))
            .map_err(|source| SolveError::FilterExecution {
                name: name.to_string(),
                position,
                source,
            })?;

        let value = self.apply_filters(&root.filters[1..], value)?;
        self.solve_object(root, value)
    }

    /// Resolves one resource against a value.
    pub fn solve_resource(&self, resource: &Resource, value: &Value) -> Result<Value, SolveError> {
        match resource {
            Resource::Field(field) => self.solve_field(field, value),
            Resource::List(list) => self.solve_list(list, value),
            Resource::Object(object) => {
                let value = self.apply_filters(&object.filters, value.clone())?;
                self.solve_object(object, value)
            }
        }
    }

    fn solve_field(&self, field: &Field, value: &Value) -> Result<Value, SolveError> {
        let value = self.apply_filters(&field.filters, value.clone())?;
        Ok(cast(value))
    }

    /// Builds the mapping of an object whose chain is already applied.
    ///
    /// Over null, children still resolve, each to its own null form.
    fn solve_object(&self, object: &Object, value: Value) -> Result<Value, SolveError> {
        let mut entries = Vec::with_capacity(object.children.len());
        for child in &object.children {
            let key = child.key().unwrap_or_default().to_string();
            let result = self.solve_resource(child, &value)?;
            entries.push((key, result));
        }
        Ok(Value::Map(entries))
    }

    fn solve_list(&self, list: &List, value: &Value) -> Result<Value, SolveError> {
        let value = self.apply_filters(&list.filters, value.clone())?;

        let elements = match value {
            Value::Null => return Ok(Value::List(vec![])),
            Value::List(items) => items,
            Value::Map(pairs) => pairs.into_iter().map(|(_, v)| v).collect(),
            Value::String(s) => s.chars().map(|c| Value::String(c.to_string())).collect(),
            Value::Object(object) => {
                object.elements().ok_or_else(|| SolveError::NotIterable {
                    type_name: object.type_name().to_string(),
                    position: list.position,
                })?
            }
            other => {
                return Err(SolveError::NotIterable {
                    type_name: other.type_name().to_string(),
                    position: list.position,
                });
            }
        };

        let mut results = Vec::with_capacity(elements.len());
        for element in &elements {
            let result = match list.body.as_slice() {
                [single] => self.solve_resource(single, element)?,
                body => Value::List(
                    body.iter()
                        .map(|resource| self.solve_resource(resource, element))
                        .collect::<Result<_, _>>()?,
                ),
            };
            results.push(result);
        }
        Ok(Value::List(results))
    }

    /// Applies steps in order, stopping at the first null.
    fn apply_filters(&self, filters: &[Filter], mut value: Value) -> Result<Value, SolveError> {
        for (i, filter) in filters.iter().enumerate() {
            if value.is_null() {
                trace!(skipped = filters.len() - i, "null short-circuit");
                return Ok(Value::Null);
            }
            value = self.apply_filter(filter, &value)?;
        }
        Ok(value)
    }

    fn apply_filter(&self, filter: &Filter, value: &Value) -> Result<Value, SolveError> {
        trace!(step = %filter, on = value.type_name(), "applying step");
        match filter {
            Filter::Attribute { name, position } => {
                match self.allowed(value, name, *position)? {
                    Accessor::Native => read_member(value, name, *position),
                    Accessor::Filter(function) => {
                        run(name, *position, || function(value, &Args::new()))
                    }
                }
            }
            Filter::Method {
                name,
                args,
                position,
            } => {
                let accessor = self.allowed(value, name, *position)?;
                let args = Args::from_arguments(args);
                match accessor {
                    Accessor::Native => call_member(value, name, &args, *position),
                    Accessor::Filter(function) => run(name, *position, || function(value, &args)),
                }
            }
            Filter::Index { index, position } => index_value(value, *index, *position),
            Filter::Slice {
                start,
                stop,
                step,
                position,
            } => slice_value(value, *start, *stop, step.unwrap_or(1), *position),
        }
    }

    fn allowed(&self, value: &Value, name: &str, position: Position) -> Result<&'r Accessor, SolveError> {
        let type_name = value.type_name();
        self.registry.is_allowed(type_name, name).ok_or_else(|| {
            debug!(member = name, type_name, "access denied");
            SolveError::NotAllowed {
                name: name.to_string(),
                type_name: type_name.to_string(),
                position,
            }
        })
    }
}

fn run<F>(name: &str, position: Position, call: F) -> Result<Value, SolveError>
where
    F: FnOnce() -> Result<Value, CallError>,
{
    call().map_err(|source| SolveError::FilterExecution {
        name: name.to_string(),
        position,
        source,
    })
}

fn not_found(name: &str, value: &Value, position: Position) -> SolveError {
    SolveError::AttributeNotFound {
        name: name.to_string(),
        type_name: value.type_name().to_string(),
        position,
    }
}

/// Native attribute read. A method referenced without parentheses is called
/// with no arguments.
fn read_member(value: &Value, name: &str, position: Position) -> Result<Value, SolveError> {
    match value {
        Value::Map(_) => value
            .get(name)
            .cloned()
            .ok_or_else(|| not_found(name, value, position)),
        Value::Object(object) => {
            if let Some(attribute) = object.attribute(name) {
                return Ok(attribute);
            }
            match object.call(name, &Args::new()) {
                Some(result) => run(name, position, || result),
                None => Err(not_found(name, value, position)),
            }
        }
        _ => Err(not_found(name, value, position)),
    }
}

fn call_member(value: &Value, name: &str, args: &Args, position: Position) -> Result<Value, SolveError> {
    let exists = match value {
        Value::Object(object) => {
            if let Some(result) = object.call(name, args) {
                return run(name, position, || result);
            }
            object.attribute(name).is_some()
        }
        Value::Map(_) => value.get(name).is_some(),
        _ => false,
    };

    if exists {
        Err(SolveError::FilterExecution {
            name: name.to_string(),
            position,
            source: CallError::NotCallable(name.to_string()),
        })
    } else {
        Err(not_found(name, value, position))
    }
}

/// Field results never hold backend objects: they are rendered to strings.
fn cast(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::String(object.render()),
        Value::List(items) => Value::List(items.into_iter().map(cast).collect()),
        Value::Map(pairs) => Value::Map(pairs.into_iter().map(|(k, v)| (k, cast(v))).collect()),
        scalar => scalar,
    }
}

fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { index + len } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

fn index_value(value: &Value, index: i64, position: Position) -> Result<Value, SolveError> {
    let missing = || SolveError::IndexNotFound {
        index,
        type_name: value.type_name().to_string(),
        position,
    };

    match value {
        Value::List(items) => resolve_index(index, items.len())
            .map(|i| items[i].clone())
            .ok_or_else(missing),
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            resolve_index(index, chars.len())
                .map(|i| Value::String(chars[i].to_string()))
                .ok_or_else(missing)
        }
        // Numeric keys on maps are looked up as strings
        Value::Map(_) => value.get(&index.to_string()).cloned().ok_or_else(missing),
        Value::Object(object) => match object.elements() {
            Some(items) => resolve_index(index, items.len())
                .map(|i| items[i].clone())
                .ok_or_else(missing),
            None => Err(SolveError::NotSubscriptable {
                type_name: value.type_name().to_string(),
                position,
            }),
        },
        _ => Err(SolveError::NotSubscriptable {
            type_name: value.type_name().to_string(),
            position,
        }),
    }
}

/// Positions selected by `[start:stop:step]` over a sequence of `len` items.
///
/// Bounds are clamped to the sequence, negative bounds count from the end,
/// and a negative step walks backwards from the last item.
pub fn slice_indices(len: usize, start: Option<i64>, stop: Option<i64>, step: i64) -> Vec<usize> {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };

    let clamp = |bound: i64| {
        if bound < 0 {
            (bound + len).max(lower)
        } else {
            bound.min(upper)
        }
    };

    let start = start.map_or(if step < 0 { upper } else { lower }, clamp);
    let stop = stop.map_or(if step < 0 { lower } else { upper }, clamp);

    let mut indices = vec![];
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        indices.push(i as usize);
        match i.checked_add(step) {
            Some(next) => i = next,
            None => break,
        }
    }
    indices
}

fn slice_value(
    value: &Value,
    start: Option<i64>,
    stop: Option<i64>,
    step: i64,
    position: Position,
) -> Result<Value, SolveError> {
    match value {
        Value::List(items) => Ok(Value::List(
            slice_indices(items.len(), start, stop, step)
                .into_iter()
                .map(|i| items[i].clone())
                .collect(),
        )),
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            Ok(Value::String(
                slice_indices(chars.len(), start, stop, step)
                    .into_iter()
                    .map(|i| chars[i])
                    .collect(),
            ))
        }
        Value::Object(object) => match object.elements() {
            Some(items) => Ok(Value::List(
                slice_indices(items.len(), start, stop, step)
                    .into_iter()
                    .map(|i| items[i].clone())
                    .collect(),
            )),
            None => Err(SolveError::NotSubscriptable {
                type_name: value.type_name().to_string(),
                position,
            }),
        },
        _ => Err(SolveError::NotSubscriptable {
            type_name: value.type_name().to_string(),
            position,
        }),
    }
}
