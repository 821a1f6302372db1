use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::ast::{Arg, Literal};

/// A value flowing through the solver.
///
/// Builtin variants carry plain data. [`Value::Object`] wraps a live backend
/// value; the solver only reaches into it through the members the registry
/// allows, and never returns it as is.
///
/// # Examples
///
/// ```
/// use dataql::Value;
///
/// let name = Value::from("Elon Musk");
/// let year = Value::Integer(2002);
/// let company = Value::map([("name", Value::from("SpaceX")), ("year", year)]);
///
/// assert_eq!(name.type_name(), "string");
/// assert_eq!(company.type_name(), "map");
/// assert_eq!(company.get("year"), Some(&Value::Integer(2002)));
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    Null,

    Boolean(bool),

    Integer(i64),

    Float(f64),

    /// UTF-8 string, indexed and sliced by character
    String(String),

    List(Vec<Value>),

    /// Mapping with keys in insertion order
    Map(Vec<(String, Value)>),

    /// Live backend value, shared between threads
    Object(Arc<dyn Object>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (String(a), String(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Object(a), Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    pub fn object<T: Object + 'static>(object: T) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn map<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Runtime type name the registry is consulted with.
    ///
    /// Builtin values report `null`, `boolean`, `integer`, `float`, `string`,
    /// `list` or `map`; backend objects report their own name.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(object) => object.type_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Key lookup on a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Null => Value::Null,
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Integer(n) => Value::Integer(*n),
            Literal::Float(n) => Value::Float(*n),
            Literal::String(s) => Value::String(s.clone()),
        }
    }
}

/// A live backend value exposed to queries.
///
/// Implementors describe what the value natively has; whether a query may
/// reach it is decided by the registry, by [`Object::type_name`].
///
/// # Examples
///
/// ```
/// use dataql::{Args, CallError, Object, Value};
///
/// #[derive(Debug)]
/// struct Company {
///     name: String,
///     created_year: i64,
/// }
///
/// impl Object for Company {
///     fn type_name(&self) -> &str {
///         "Company"
///     }
///
///     fn attribute(&self, name: &str) -> Option<Value> {
///         match name {
///             "name" => Some(Value::from(self.name.as_str())),
///             "created_year" => Some(Value::Integer(self.created_year)),
///             _ => None,
///         }
///     }
///
///     fn call(&self, name: &str, args: &Args) -> Option<Result<Value, CallError>> {
///         match name {
///             "age" => Some(args.integer(0, "year").map(|year| Value::Integer(year - self.created_year))),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Object: fmt::Debug + Send + Sync {
    /// Name the registry knows this value's type by.
    fn type_name(&self) -> &str;

    /// Reads a plain attribute, `None` when there is no such attribute.
    fn attribute(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Calls a method, `None` when there is no such method.
    fn call(&self, _name: &str, _args: &Args) -> Option<Result<Value, CallError>> {
        None
    }

    /// Elements in natural order, `None` when the value is not iterable.
    fn elements(&self) -> Option<Vec<Value>> {
        None
    }

    /// String form used when the value ends up in a field result.
    fn render(&self) -> String {
        format!("<{}>", self.type_name())
    }
}

/// Arguments handed to methods, filter functions and entry points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub positional: Vec<Value>,
    pub named: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Args {
            positional: values.into_iter().map(Into::into).collect(),
            named: vec![],
        }
    }

    pub fn with_named(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.named.push((name.to_string(), value.into()));
        self
    }

    pub fn from_arguments(args: &[Arg]) -> Self {
        let mut result = Args::new();
        for arg in args {
            match arg {
                Arg::Positional(value) => result.positional.push(value.into()),
                Arg::Named { name, value } => result.named.push((name.clone(), value.into())),
            }
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    /// Looks a parameter up by position, then by name.
    pub fn get(&self, index: usize, name: &str) -> Option<&Value> {
        self.positional.get(index).or_else(|| {
            self.named
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, value)| value)
        })
    }

    pub fn required(&self, index: usize, name: &str) -> Result<&Value, CallError> {
        self.get(index, name)
            .ok_or_else(|| CallError::MissingArgument(name.to_string()))
    }

    pub fn string(&self, index: usize, name: &str) -> Result<&str, CallError> {
        let value = self.required(index, name)?;
        value.as_str().ok_or_else(|| invalid(name, "a string", value))
    }

    pub fn integer(&self, index: usize, name: &str) -> Result<i64, CallError> {
        let value = self.required(index, name)?;
        value.as_int().ok_or_else(|| invalid(name, "an integer", value))
    }

    /// A missing or null parameter is `None`.
    pub fn optional_string(&self, index: usize, name: &str) -> Result<Option<&str>, CallError> {
        match self.get(index, name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| invalid(name, "a string", value)),
        }
    }

    /// A missing or null parameter is `None`.
    pub fn optional_integer(&self, index: usize, name: &str) -> Result<Option<i64>, CallError> {
        match self.get(index, name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_int()
                .map(Some)
                .ok_or_else(|| invalid(name, "an integer", value)),
        }
    }

    /// Rejects arguments beyond the given parameter list.
    pub fn check_params(&self, params: &[&str]) -> Result<(), CallError> {
        if self.positional.len() > params.len() {
            return Err(CallError::UnexpectedArgument(format!(
                "#{}",
                params.len() + 1
            )));
        }
        for (index, (name, _)) in self.named.iter().enumerate() {
            match params.iter().position(|p| p == name) {
                None => return Err(CallError::UnexpectedArgument(name.clone())),
                Some(i) if i < self.positional.len() => {
                    return Err(CallError::UnexpectedArgument(name.clone()));
                }
                Some(_) if self.named[..index].iter().any(|(n, _)| n == name) => {
                    return Err(CallError::UnexpectedArgument(name.clone()));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

fn invalid(name: &str, expected: &'static str, found: &Value) -> CallError {
    CallError::InvalidArgument {
        name: name.to_string(),
        expected,
        found: found.type_name().to_string(),
    }
}

/// Failure reported by an entry point, a method or a filter function.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("missing argument '{0}'")]
    MissingArgument(String),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("argument '{name}' must be {expected}, found {found}")]
    InvalidArgument {
        name: String,
        expected: &'static str,
        found: String,
    },

    #[error("expected {expected}, found {found}")]
    InvalidReceiver {
        expected: &'static str,
        found: String,
    },

    #[error("'{0}' is not callable")]
    NotCallable(String),

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl CallError {
    pub fn message(message: impl Into<String>) -> Self {
        CallError::Message(message.into())
    }

    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CallError::Other(Box::new(error))
    }

    pub fn invalid_receiver(expected: &'static str, found: &Value) -> Self {
        CallError::InvalidReceiver {
            expected,
            found: found.type_name().to_string(),
        }
    }
}
