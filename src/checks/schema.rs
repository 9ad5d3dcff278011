//! Field-level validation of beer records.
//!
//! Records arrive as raw JSON so a broken payload can be reported against the
//! exact field that violates its constraint instead of as a generic decode
//! error. Fields are checked in the order `name`, `price`, `id`.

use serde_json::Value;

use crate::errors::AssertionFailure;
use crate::model::Beer;

pub fn validate_item(index: usize, item: &Value) -> Result<Beer, AssertionFailure> {
    let violation = |field: &str, reason: String| AssertionFailure::Schema {
        index,
        field: field.to_string(),
        reason,
    };

    let obj = item
        .as_object()
        .ok_or_else(|| violation("<item>", format!("expected an object, got {}", kind(item))))?;

    let name = match obj.get("name") {
        None | Some(Value::Null) => return Err(violation("name", "missing".into())),
        Some(Value::String(s)) if s.is_empty() => {
            return Err(violation("name", "must be non-empty".into()));
        }
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Err(violation("name", format!("expected a string, got {}", kind(other)))),
    };

    let price = match obj.get("price") {
        None | Some(Value::Null) => return Err(violation("price", "missing".into())),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(p) if p >= 0.0 => p,
            Some(p) => return Err(violation("price", format!("must be >= 0.0, got {p}"))),
            None => return Err(violation("price", format!("not representable as f64: {n}"))),
        },
        Some(other) => {
            return Err(violation("price", format!("expected a number, got {}", kind(other))));
        }
    };

    let id = match obj.get("id") {
        None | Some(Value::Null) => return Err(violation("id", "missing".into())),
        Some(Value::Number(n)) => {
            if let Some(id) = n.as_u64() {
                if id == 0 {
                    return Err(violation("id", "must be > 0, got 0".into()));
                }
                id
            } else if let Some(neg) = n.as_i64() {
                return Err(violation("id", format!("must be > 0, got {neg}")));
            } else {
                return Err(violation("id", format!("expected an integer, got {n}")));
            }
        }
        Some(other) => {
            return Err(violation("id", format!("expected an integer, got {}", kind(other))));
        }
    };

    Ok(Beer { id, name, price })
}

pub fn validate_all(items: &[Value]) -> Result<Vec<Beer>, AssertionFailure> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| validate_item(i, item))
        .collect()
}

pub(crate) fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
