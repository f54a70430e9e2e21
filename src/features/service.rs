//! Maps a JSON request payload onto the fixed feature record.

use serde_json::{Map, Value};

use crate::common::error::{SalaryError, SalaryResult};
use crate::common::json;

use super::domain::{FeatureRecord, FeatureValue, FieldKind, FIELDS};

/// Decode a request body into a JSON object.
///
/// Anything other than an object (arrays, scalars, `null`, invalid JSON) is rejected.
pub fn parse_payload(body: &[u8]) -> SalaryResult<Map<String, Value>> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| SalaryError::invalid("body", format!("malformed JSON: {err}")))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(SalaryError::invalid(
            "body",
            format!("expected a JSON object, found {}", json::type_name(&other)),
        )),
    }
}

/// Build the feature record for one request.
///
/// Absent keys take their schema default; keys outside the schema are ignored.
pub fn build_record(payload: &Map<String, Value>) -> SalaryResult<FeatureRecord> {
    let mut record = FeatureRecord::defaults();
    for spec in FIELDS.iter() {
        let Some(raw) = payload.get(spec.name) else {
            continue;
        };
        let value = match spec.kind {
            FieldKind::Numeric => FeatureValue::Number(json::to_float(spec.name, raw)?),
            FieldKind::Integer => FeatureValue::Integer(json::to_int(spec.name, raw)?),
            FieldKind::Categorical => FeatureValue::Category(json::to_category(spec.name, raw)?),
            FieldKind::OptionalYear => optional_year(spec.name, raw)?,
        };
        record.set(spec.name, value);
    }
    Ok(record)
}

/// Falsy input means "not applicable". A year that resolves to zero is
/// treated the same way, so an explicit `0` cannot be told apart from absence.
fn optional_year(field: &str, raw: &Value) -> SalaryResult<FeatureValue> {
    if !json::is_truthy(raw) {
        return Ok(FeatureValue::Missing);
    }
    let year = json::to_float(field, raw)?;
    if year == 0.0 {
        Ok(FeatureValue::Missing)
    } else {
        Ok(FeatureValue::Number(year))
    }
}
