//! Serialization boundary for query results.
//!
//! [`Value`] implements [`serde::Serialize`], so a result can be handed to any
//! serde format. Maps are written in declaration order, which is the order the
//! query named its children in.
//!
//! # Features
//!
//! - **Compact output** via [`to_json()`]
//! - **Pretty output** via [`to_json_pretty()`], 2-space indentation
//! - **Order preserving** - keys come out in the order the query declared them
//! - **No backend leaks** - an object reaching the encoder is written as its rendered string
//!
//! # Examples
//!
//! ```
//! use dataql::Value;
//! use dataql::output::{to_json, to_json_pretty};
//!
//! let value = Value::map([("name", Value::from("SpaceX")), ("year", Value::Integer(2002))]);
//!
//! assert_eq!(to_json(&value).unwrap(), r#"{"name":"SpaceX","year":2002}"#);
//! assert_eq!(to_json_pretty(&Value::Integer(42)).unwrap(), "42");
//! ```

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::value::Value;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Object(object) => serializer.serialize_str(&object.render()),
        }
    }
}

/// Compact JSON text.
pub fn to_json(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

/// Indented JSON text.
pub fn to_json_pretty(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
