//! Typed accessors over generic JSON objects.
//!
//! The view objects in [`crate::models`] keep their state in a
//! `serde_json::Map` and read it through these helpers. A property that is
//! absent, `null`, or of a different type reads as `None`.

use serde_json::{Map, Value};

pub fn get_str<'a>(json: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
  json.get(key).and_then(Value::as_str)
}

pub fn get_object<'a>(json: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
  json.get(key).and_then(Value::as_object)
}

pub fn get_bool(json: &Map<String, Value>, key: &str) -> Option<bool> {
  json.get(key).and_then(Value::as_bool)
}

pub fn set_str(json: &mut Map<String, Value>, key: &str, value: &str) {
  json.insert(key.to_string(), Value::String(value.to_string()));
}

/// Human readable name of a JSON value's type, used in parse errors
pub fn type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
