//! Untyped upstream records with typed, field-reporting accessors

use crate::errors::{AppError, Result};
use serde_json::{Map, Value};

/// JSON object exactly as returned by the upstream API.
///
/// Accessors take one or more camelCase keys separated by `|`
/// (first match wins). Each key also matches its snake_case spelling, and
/// JSON `null` counts as absent. Errors name the field in snake_case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap a JSON value; only objects are records
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// First present value among `keys`
    pub fn get(&self, keys: &str) -> Option<&Value> {
        keys.split('|').find_map(|key| {
            self.fields
                .get(key)
                .or_else(|| self.fields.get(&snake_case(key)))
                .filter(|v| !v.is_null())
        })
    }

    pub fn required_str(&self, keys: &str) -> Result<String> {
        match self.optional_str(keys)? {
            Some(s) if !s.trim().is_empty() => Ok(s),
            Some(_) => Err(AppError::validation(field_name(keys), "must not be empty")),
            None => Err(missing(keys)),
        }
    }

    pub fn optional_str(&self, keys: &str) -> Result<Option<String>> {
        match self.get(keys) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(AppError::validation(
                field_name(keys),
                format!("expected a string, got {}", type_name(other)),
            )),
        }
    }

    pub fn required_f64(&self, keys: &str) -> Result<f64> {
        self.optional_f64(keys)?.ok_or_else(|| missing(keys))
    }

    /// Numbers and numeric strings; anything else is a validation error
    pub fn optional_f64(&self, keys: &str) -> Result<Option<f64>> {
        let Some(value) = self.get(keys) else {
            return Ok(None);
        };
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match number {
            Some(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(AppError::validation(
                field_name(keys),
                format!("expected a number, got {}", describe(value)),
            )),
        }
    }

    pub fn required_i32(&self, keys: &str) -> Result<i32> {
        self.optional_i32(keys)?.ok_or_else(|| missing(keys))
    }

    /// Integers, integral floats and integer strings within i32 range
    pub fn optional_i32(&self, keys: &str) -> Result<Option<i32>> {
        let Some(value) = self.get(keys) else {
            return Ok(None);
        };
        let number = match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match number.and_then(|n| i32::try_from(n).ok()) {
            Some(n) => Ok(Some(n)),
            None => Err(AppError::validation(
                field_name(keys),
                format!("expected an integer, got {}", describe(value)),
            )),
        }
    }

    pub fn optional_bool(&self, keys: &str) -> Result<Option<bool>> {
        match self.get(keys) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(AppError::validation(
                field_name(keys),
                format!("expected a boolean, got {}", describe(other)),
            )),
        }
    }

    /// Raw JSON passthrough (polarity lists and such)
    pub fn optional_json(&self, keys: &str) -> Option<Value> {
        self.get(keys).cloned()
    }

    /// Nested object, if present
    pub fn nested(&self, keys: &str) -> Option<RawRecord> {
        self.get(keys).cloned().and_then(RawRecord::from_value)
    }

    /// Objects of an array field; non-object elements are dropped
    pub fn records(&self, keys: &str) -> Vec<RawRecord> {
        match self.get(keys) {
            Some(Value::Array(items)) => items
                .iter()
                .cloned()
                .filter_map(RawRecord::from_value)
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// `fusionLimit` -> `fusion_limit`
pub fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Field name reported in errors for `keys`
pub fn field_name(keys: &str) -> String {
    snake_case(keys.split('|').next().unwrap_or(keys))
}

fn missing(keys: &str) -> AppError {
    AppError::validation(field_name(keys), "required field is missing")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => n.to_string(),
        other => type_name(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        RawRecord::from_value(value).unwrap()
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("uniqueName"), "unique_name");
        assert_eq!(snake_case("heavySlamRadialDamage"), "heavy_slam_radial_damage");
        assert_eq!(snake_case("name"), "name");
    }

    #[test]
    fn test_aliases_and_snake_fallback() {
        let r = raw(json!({"sprint": 1.2, "ability_index": 3}));
        assert_eq!(r.required_f64("sprintSpeed|sprint").unwrap(), 1.2);
        assert_eq!(r.required_i32("abilityIndex").unwrap(), 3);
    }

    #[test]
    fn test_numeric_coercion() {
        let r = raw(json!({"a": "4", "b": 10.0, "c": " 0.25 ", "d": 2.5}));
        assert_eq!(r.required_i32("a").unwrap(), 4);
        assert_eq!(r.required_i32("b").unwrap(), 10);
        assert_eq!(r.required_f64("c").unwrap(), 0.25);

        let err = r.required_i32("d").unwrap_err();
        assert!(err.to_string().contains("expected an integer"));
    }

    #[test]
    fn test_null_is_absent() {
        let r = raw(json!({"description": null, "uniqueName": ""}));
        assert_eq!(r.optional_str("description").unwrap(), None);

        match r.required_str("uniqueName").unwrap_err() {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "unique_name");
                assert_eq!(reason, "must not be empty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_type_is_reported() {
        let r = raw(json!({"name": 12, "health": [1]}));
        assert!(r.required_str("name").is_err());
        match r.required_f64("health").unwrap_err() {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "health");
                assert!(reason.contains("an array"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_records_skip_non_objects() {
        let r = raw(json!({"abilities": [{"name": "Slash Dash"}, "junk", {"name": "Radial Blind"}]}));
        assert_eq!(r.records("abilities").len(), 2);
        assert!(r.records("missing").is_empty());
    }
}
