//! Per-field parsers for raw string values.
//!
//! A parser returns `None` when the raw value is unusable; the resolver then
//! moves on to the next tier instead of failing.

use serde_json::{Map, Value};

use crate::schema::AgentRole;

/// Accepts `true/1/yes/on` and `false/0/no/off`, case-insensitive, surrounding whitespace ignored.
pub fn parse_boolean(raw: &str) -> Option<Value> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(Value::Bool(true)),
        "false" | "0" | "no" | "off" => Some(Value::Bool(false)),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Decodes a JSON object into a flag map, coercing each value by truthiness.
///
/// Only objects count as a flag mapping. Arrays are rejected rather than keyed by
/// index, so `[true]` falls through to the next tier instead of becoming `{"0": true}`.
pub fn parse_json_flags(raw: &str) -> Option<Value> {
    let Value::Object(entries) = serde_json::from_str::<Value>(raw).ok()? else {
        return None;
    };
    let flags: Map<String, Value> = entries
        .iter()
        .map(|(name, value)| (name.clone(), Value::Bool(truthy(value))))
        .collect();
    Some(Value::Object(flags))
}

pub fn parse_agent_role(raw: &str) -> Option<Value> {
    let normalized = raw.trim().to_ascii_lowercase();
    normalized
        .parse::<AgentRole>()
        .ok()
        .map(|role| Value::String(role.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_boolean() {
        for raw in ["true", "TRUE", " yes ", "1", "On"] {
            assert_eq!(parse_boolean(raw), Some(json!(true)), "{raw}");
        }
        for raw in ["false", "0", "No", "OFF"] {
            assert_eq!(parse_boolean(raw), Some(json!(false)), "{raw}");
        }
        assert_eq!(parse_boolean("maybe"), None);
        assert_eq!(parse_boolean(""), None);
    }

    #[test]
    fn test_parse_json_flags_coerces_values() {
        let parsed = parse_json_flags(r#"{"a":true,"b":0,"c":"x","d":null,"e":[]}"#).unwrap();
        assert_eq!(
            parsed,
            json!({"a": true, "b": false, "c": true, "d": false, "e": true})
        );
    }

    #[test]
    fn test_parse_json_flags_rejects_non_objects() {
        assert_eq!(parse_json_flags("not json"), None);
        assert_eq!(parse_json_flags("null"), None);
        assert_eq!(parse_json_flags("true"), None);
        assert_eq!(parse_json_flags("[true]"), None);
    }

    #[test]
    fn test_parse_agent_role() {
        assert_eq!(parse_agent_role(" Critic "), Some(json!("critic")));
        assert_eq!(parse_agent_role("SCRIBE"), Some(json!("scribe")));
        assert_eq!(parse_agent_role("manager"), None);
    }
}
