//! Typed configuration values

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The primitive kinds a configuration value can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Int,
    Bool,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::String => "string",
            Self::Int => "integer",
            Self::Bool => "boolean",
        };
        f.write_str(label)
    }
}

/// A single configuration value.
///
/// Each key maps to exactly one of these, so the same key can never hold
/// a string and an integer at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl ConfigValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Int(_) => ValueKind::Int,
            Self::Bool(_) => ValueKind::Bool,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Classify a document value by its native kind.
    ///
    /// Strings, integers and booleans are accepted. Floats, integers that do
    /// not fit in an `i64`, nulls, arrays and objects yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n.as_i64().map(Self::Int),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Int(i) => Value::from(*i),
            Self::Bool(b) => Value::Bool(*b),
        }
    }

    /// Interpret command-line text as a typed value.
    ///
    /// `true`/`false` become booleans, anything `i64` parses becomes an
    /// integer, everything else stays a string.
    pub fn parse_literal(text: &str) -> Self {
        match text {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => text
                .parse::<i64>()
                .map(Self::Int)
                .unwrap_or_else(|_| Self::String(text.to_string())),
        }
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{:?}", s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("true", ConfigValue::Bool(true))]
    #[case("false", ConfigValue::Bool(false))]
    #[case("1080", ConfigValue::Int(1080))]
    #[case("-3", ConfigValue::Int(-3))]
    #[case("1.5", ConfigValue::String("1.5".into()))]
    #[case("True", ConfigValue::String("True".into()))]
    #[case("", ConfigValue::String(String::new()))]
    fn parse_literal_classifies_text(#[case] text: &str, #[case] expected: ConfigValue) {
        assert_eq!(ConfigValue::parse_literal(text), expected);
    }

    #[test]
    fn from_json_skips_unsupported_kinds() {
        assert_eq!(ConfigValue::from_json(&json!(2.5)), None);
        assert_eq!(ConfigValue::from_json(&json!(null)), None);
        assert_eq!(ConfigValue::from_json(&json!([1, 2])), None);
        assert_eq!(ConfigValue::from_json(&json!({"a": 1})), None);
        assert_eq!(ConfigValue::from_json(&json!(u64::MAX)), None);
    }

    #[test]
    fn from_json_accepts_primitives() {
        assert_eq!(ConfigValue::from_json(&json!("x")), Some("x".into()));
        assert_eq!(ConfigValue::from_json(&json!(7)), Some(7i64.into()));
        assert_eq!(ConfigValue::from_json(&json!(false)), Some(false.into()));
    }

    #[test]
    fn serializes_untagged() {
        let encoded = serde_json::to_value(ConfigValue::Int(10)).unwrap();
        assert_eq!(encoded, json!(10));
        let decoded: ConfigValue = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(decoded, ConfigValue::Bool(true));
    }
}
