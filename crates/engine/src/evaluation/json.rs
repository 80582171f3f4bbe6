//! Reading JSON objects embedded in free-form model output.

use serde_json::{Map, Value};

/// Parse the text between the first `{` and the last `}` as a JSON object.
pub fn extract_object(raw: &str) -> Result<Map<String, Value>, String> {
    let start = raw
        .find('{')
        .ok_or_else(|| "no JSON object in response".to_string())?;
    let end = raw
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| "no JSON object in response".to_string())?;

    match serde_json::from_str::<Value>(&raw[start..=end]) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("embedded JSON is not an object".to_string()),
        Err(e) => Err(format!("invalid JSON: {}", e)),
    }
}

/// Read a score-like field, accepting numbers or numeric strings in [0, 1].
///
/// Out-of-range values are clamped; missing or non-numeric values are errors.
pub fn unit_number(object: &Map<String, Value>, key: &str) -> Result<f64, String> {
    let value = object
        .get(key)
        .ok_or_else(|| format!("missing '{}'", key))?;

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| format!("'{}' is not a number", key))?;

    Ok(number.clamp(0.0, 1.0))
}

/// Read a string field.
pub fn text(object: &Map<String, Value>, key: &str) -> Result<String, String> {
    match object.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(format!("'{}' is not a string", key)),
        None => Err(format!("missing '{}'", key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_object_from_prose() {
        let raw = "Here you go:\n```json\n{\"score\": 0.9, \"justification\": \"ok\"}\n```\nThanks";
        let obj = extract_object(raw).unwrap();
        assert_eq!(unit_number(&obj, "score").unwrap(), 0.9);
        assert_eq!(text(&obj, "justification").unwrap(), "ok");
    }

    #[test]
    fn test_nested_braces_inside_object() {
        let obj = extract_object(r#"{"a": {"b": 1}, "score": "0.4"}"#).unwrap();
        assert_eq!(unit_number(&obj, "score").unwrap(), 0.4);
    }

    #[test]
    fn test_missing_or_reversed_braces() {
        assert!(extract_object("no json here").is_err());
        assert!(extract_object("} backwards {").is_err());
        assert!(extract_object("{ not: valid }").is_err());
        assert!(extract_object("first {\"a\":1} then {\"b\":2}").is_err());
    }

    #[test]
    fn test_unit_number_rules() {
        let obj = extract_object(r#"{"high": 3, "low": -1, "word": "high", "flag": true}"#).unwrap();
        assert_eq!(unit_number(&obj, "high").unwrap(), 1.0);
        assert_eq!(unit_number(&obj, "low").unwrap(), 0.0);
        assert!(unit_number(&obj, "word").is_err());
        assert!(unit_number(&obj, "flag").is_err());
        assert!(unit_number(&obj, "absent").is_err());
    }
}
