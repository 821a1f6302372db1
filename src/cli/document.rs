//! JSON data documents as query roots.
//!
//! Top-level keys become entry points. A JSON object carrying a `"__type__"`
//! key becomes a [`Record`] of that type, so the registry can govern it like
//! any backend value; every other JSON value maps to a builtin value.

use crate::{Args, CallError, Object, Value};

/// Key naming the type of a record.
pub const TYPE_KEY: &str = "__type__";

/// A typed JSON object.
///
/// Fields are attributes. A field holding an object or a record can also be
/// called with one key, `directory.get('Elon Musk')`, to look an entry up;
/// a missing entry resolves to null.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(type_name: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Record {
            type_name: type_name.into(),
            fields,
        }
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

impl Object for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.field(name).cloned()
    }

    fn call(&self, name: &str, args: &Args) -> Option<Result<Value, CallError>> {
        let table = self.field(name)?;
        if args.is_empty() || !matches!(table, Value::Map(_) | Value::Object(_)) {
            return None;
        }
        Some(lookup(table, args))
    }

    fn render(&self) -> String {
        format!("<{}>", self.type_name)
    }
}

fn lookup(table: &Value, args: &Args) -> Result<Value, CallError> {
    args.check_params(&["key"])?;
    let key = args.string(0, "key")?;
    Ok(match table {
        Value::Object(object) => object.attribute(key),
        _ => table.get(key).cloned(),
    }
    .unwrap_or(Value::Null))
}

/// Converts a JSON value, turning typed objects into records.
pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else {
                n.as_f64().map_or(Value::Null, Value::Float)
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::List(arr.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(map) => {
            let type_name = match map.get(TYPE_KEY) {
                Some(serde_json::Value::String(name)) => Some(name.clone()),
                _ => None,
            };
            match type_name {
                Some(type_name) => {
                    // Filtered rather than removed so fields keep document order.
                    let fields = map
                        .into_iter()
                        .filter(|(k, _)| k != TYPE_KEY)
                        .map(|(k, v)| (k, json_to_value(v)))
                        .collect();
                    Value::object(Record::new(type_name, fields))
                }
                None => Value::Map(map.into_iter().map(|(k, v)| (k, json_to_value(v))).collect()),
            }
        }
    }
}
