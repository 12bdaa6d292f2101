//! Query-string encoding for params sent with GET and DELETE.
//!
//! Nested values use bracket notation so that a mapping such as
//! `{"user": {"name": "a"}, "tags": ["x", "y"]}` encodes as
//! `tags[]=x&tags[]=y&user[name]=a` (percent-encoded).

use serde_json::Value;
use url::form_urlencoded;

use crate::error::{DriverError, DriverResult};

/// Encodes a params mapping as an `application/x-www-form-urlencoded` query.
///
/// `null` and `{}` encode to an empty string. Any other non-object value is
/// rejected because it has no key to attach to.
pub fn encode_query(params: &Value) -> DriverResult<String> {
    let map = match params {
        Value::Null => return Ok(String::new()),
        Value::Object(map) => map,
        other => {
            return Err(DriverError::invalid_request(format!(
                "query params must be a JSON object, got {}",
                kind(other)
            )))
        }
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        flatten(key.clone(), value, &mut pairs);
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        serializer.append_pair(key, value);
    }
    Ok(serializer.finish())
}

fn flatten(key: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (child, nested) in map {
                flatten(format!("{key}[{child}]"), nested, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                flatten(format!("{key}[]"), item, out);
            }
        }
        Value::String(s) => out.push((key, s.clone())),
        Value::Null => out.push((key, String::new())),
        Value::Bool(_) | Value::Number(_) => out.push((key, value.to_string())),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
