//! Filter functions for builtin value types.
//!
//! None of these are reachable until the operator allows them, one by one
//! with [`RegistryBuilder::allow_filter`] or per type with
//! [`RegistryBuilder::allow_builtins`].
//!
//! | Type | Filters |
//! |------|---------|
//! | `string` | `upper`, `lower`, `strip`, `length`, `startswith`, `endswith`, `contains`, `split`, `matches`, `replace` |
//! | `list` | `length`, `first`, `last`, `reverse`, `join` |
//! | `map` | `keys`, `values`, `get`, `length` |
//! | `integer`, `float` | `abs`, `round` |
//!
//! [`RegistryBuilder::allow_filter`]: crate::RegistryBuilder::allow_filter
//! [`RegistryBuilder::allow_builtins`]: crate::RegistryBuilder::allow_builtins

use regex::Regex;

use crate::value::{Args, CallError, Value};

pub type BuiltinFn = fn(&Value, &Args) -> Result<Value, CallError>;

const STRING_FILTERS: &[(&str, BuiltinFn)] = &[
    ("upper", upper),
    ("lower", lower),
    ("strip", strip),
    ("length", length),
    ("startswith", startswith),
    ("endswith", endswith),
    ("contains", contains),
    ("split", split),
    ("matches", matches),
    ("replace", replace),
];

const LIST_FILTERS: &[(&str, BuiltinFn)] = &[
    ("length", length),
    ("first", first),
    ("last", last),
    ("reverse", reverse),
    ("join", join),
];

const MAP_FILTERS: &[(&str, BuiltinFn)] = &[
    ("keys", keys),
    ("values", values),
    ("get", get),
    ("length", length),
];

const NUMBER_FILTERS: &[(&str, BuiltinFn)] = &[("abs", abs), ("round", round)];

/// Builtin filters of a builtin value type, empty for any other type.
pub fn for_type(type_name: &str) -> &'static [(&'static str, BuiltinFn)] {
    match type_name {
        "string" => STRING_FILTERS,
        "list" => LIST_FILTERS,
        "map" => MAP_FILTERS,
        "integer" | "float" => NUMBER_FILTERS,
        _ => &[],
    }
}

pub fn lookup(type_name: &str, name: &str) -> Option<BuiltinFn> {
    for_type(type_name)
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, f)| *f)
}

fn receiver_str<'a>(value: &'a Value) -> Result<&'a str, CallError> {
    value
        .as_str()
        .ok_or_else(|| CallError::invalid_receiver("a string", value))
}

fn receiver_list(value: &Value) -> Result<&[Value], CallError> {
    match value {
        Value::List(items) => Ok(items),
        _ => Err(CallError::invalid_receiver("a list", value)),
    }
}

fn receiver_map(value: &Value) -> Result<&[(String, Value)], CallError> {
    match value {
        Value::Map(pairs) => Ok(pairs),
        _ => Err(CallError::invalid_receiver("a map", value)),
    }
}

fn compile(pattern: &str) -> Result<Regex, CallError> {
    Regex::new(pattern).map_err(CallError::other)
}

fn upper(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&[])?;
    Ok(Value::String(receiver_str(value)?.to_uppercase()))
}

fn lower(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&[])?;
    Ok(Value::String(receiver_str(value)?.to_lowercase()))
}

fn strip(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&[])?;
    Ok(Value::from(receiver_str(value)?.trim()))
}

fn length(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&[])?;
    let len = match value {
        Value::String(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Map(pairs) => pairs.len(),
        _ => return Err(CallError::invalid_receiver("a string, list or map", value)),
    };
    Ok(Value::Integer(len as i64))
}

fn startswith(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&["prefix"])?;
    let prefix = args.string(0, "prefix")?;
    Ok(Value::Boolean(receiver_str(value)?.starts_with(prefix)))
}

fn endswith(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&["suffix"])?;
    let suffix = args.string(0, "suffix")?;
    Ok(Value::Boolean(receiver_str(value)?.ends_with(suffix)))
}

fn contains(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&["needle"])?;
    let needle = args.string(0, "needle")?;
    Ok(Value::Boolean(receiver_str(value)?.contains(needle)))
}

fn split(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&["sep"])?;
    let s = receiver_str(value)?;
    let parts: Vec<Value> = match args.optional_string(0, "sep")? {
        None => s.split_whitespace().map(Value::from).collect(),
        Some("") => return Err(CallError::message("empty separator")),
        Some(sep) => s.split(sep).map(Value::from).collect(),
    };
    Ok(Value::List(parts))
}

fn matches(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&["pattern"])?;
    let regex = compile(args.string(0, "pattern")?)?;
    Ok(Value::Boolean(regex.is_match(receiver_str(value)?)))
}

fn replace(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&["pattern", "replacement"])?;
    let regex = compile(args.string(0, "pattern")?)?;
    let replacement = args.string(1, "replacement")?;
    let s = receiver_str(value)?;
    Ok(Value::String(regex.replace_all(s, replacement).into_owned()))
}

fn first(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&[])?;
    Ok(receiver_list(value)?.first().cloned().unwrap_or(Value::Null))
}

fn last(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&[])?;
    Ok(receiver_list(value)?.last().cloned().unwrap_or(Value::Null))
}

fn reverse(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&[])?;
    Ok(Value::List(receiver_list(value)?.iter().rev().cloned().collect()))
}

fn join(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&["sep"])?;
    let sep = args.optional_string(0, "sep")?.unwrap_or("");
    let parts = receiver_list(value)?
        .iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| CallError::message(format!("cannot join {}", item.type_name())))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::String(parts.join(sep)))
}

fn keys(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&[])?;
    Ok(Value::List(
        receiver_map(value)?
            .iter()
            .map(|(k, _)| Value::from(k.as_str()))
            .collect(),
    ))
}

fn values(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&[])?;
    Ok(Value::List(
        receiver_map(value)?.iter().map(|(_, v)| v.clone()).collect(),
    ))
}

fn get(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&["key", "default"])?;
    let key = args.string(0, "key")?;
    let found = receiver_map(value)?
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone());
    Ok(found.unwrap_or_else(|| args.get(1, "default").cloned().unwrap_or(Value::Null)))
}

fn abs(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&[])?;
    match value {
        Value::Integer(n) => n
            .checked_abs()
            .map(Value::Integer)
            .ok_or_else(|| CallError::message("integer overflow")),
        Value::Float(n) => Ok(Value::Float(n.abs())),
        _ => Err(CallError::invalid_receiver("a number", value)),
    }
}

/// Rounds half to even. Without `ndigits` a float becomes an integer.
fn round(value: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&["ndigits"])?;
    let ndigits = args.optional_integer(0, "ndigits")?;

    match (value, ndigits) {
        (Value::Integer(n), None) => Ok(Value::Integer(*n)),
        (Value::Integer(n), Some(digits)) if digits >= 0 => Ok(Value::Integer(*n)),
        (Value::Integer(n), Some(digits)) => {
            let Some(factor) = u32::try_from(digits.unsigned_abs())
                .ok()
                .and_then(|exp| 10i64.checked_pow(exp))
            else {
                return Ok(Value::Integer(0));
            };
            let rounded = (*n as f64 / factor as f64).round_ties_even() as i64;
            Ok(Value::Integer(rounded.saturating_mul(factor)))
        }
        (Value::Float(n), None) => {
            let rounded = n.round_ties_even();
            if rounded.is_finite() && rounded.abs() < i64::MAX as f64 {
                Ok(Value::Integer(rounded as i64))
            } else {
                Err(CallError::message("cannot round a non-finite number"))
            }
        }
        (Value::Float(n), Some(digits)) => {
            // Beyond 15 digits an f64 has nothing left to round.
            let digits = digits.clamp(-308, 15) as i32;
            let factor = 10f64.powi(digits);
            let scaled = n * factor;
            // No fractional part left to round at this precision, or out of range.
            if !scaled.is_finite() || scaled.abs() >= 2f64.powi(52) {
                return Ok(Value::Float(*n));
            }
            Ok(Value::Float(scaled.round_ties_even() / factor))
        }
        _ => Err(CallError::invalid_receiver("a number", value)),
    }
}
