//! Coercion helpers turning loosely typed JSON request values into feature values.
//!
//! Browser forms send numbers as strings, booleans, or real JSON numbers
//! depending on the client, so every numeric field accepts all three.

use serde_json::Value;

use super::error::{SalaryError, SalaryResult};

/// Human readable name of a JSON value's type, for error messages.
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

/// Truthiness of a JSON value: `null`, `false`, zero, empty strings and empty
/// containers are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Coerce to a floating point number.
pub fn to_float(field: &str, value: &Value) -> SalaryResult<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| SalaryError::invalid(field, format!("{n} is out of range"))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            SalaryError::invalid(field, format!("could not convert string to float: '{s}'"))
        }),
        other => Err(SalaryError::invalid(
            field,
            format!("expected a number, found {}", type_name(other)),
        )),
    }
}

/// Coerce to an integer. Fractional numbers truncate toward zero; strings must
/// be plain integer literals.
pub fn to_int(field: &str, value: &Value) -> SalaryResult<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            let f = n
                .as_f64()
                .ok_or_else(|| SalaryError::invalid(field, format!("{n} is out of range")))?;
            truncate(field, f)
        }
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
            SalaryError::invalid(
                field,
                format!("invalid literal for int() with base 10: '{s}'"),
            )
        }),
        other => Err(SalaryError::invalid(
            field,
            format!("expected an integer, found {}", type_name(other)),
        )),
    }
}

fn truncate(field: &str, f: f64) -> SalaryResult<i64> {
    if !f.is_finite() {
        return Err(SalaryError::invalid(
            field,
            format!("cannot convert {f} to integer"),
        ));
    }
    let t = f.trunc();
    // i64::MAX is not representable as f64; compare against 2^63.
    if t < -9_223_372_036_854_775_808.0 || t >= 9_223_372_036_854_775_808.0 {
        return Err(SalaryError::invalid(field, format!("{f} is out of range")));
    }
    Ok(t as i64)
}

/// Coerce to a categorical label. Strings pass through untouched; numbers and
/// booleans use their JSON text.
pub fn to_category(field: &str, value: &Value) -> SalaryResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(SalaryError::invalid(
            field,
            format!("expected a category label, found {}", type_name(other)),
        )),
    }
}
