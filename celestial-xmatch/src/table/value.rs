//! Cell values and column types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a table column. Every type also admits [`Value::Null`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Int,
    Float,
    Text,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float)
    }

    /// Check a value against this type, widening `Int` into a `Float` column.
    ///
    /// Returns the value back as `Err` if it does not conform.
    pub fn conform(self, value: Value) -> Result<Value, Value> {
        match (self, value) {
            (_, Value::Null) => Ok(Value::Null),
            (ColumnType::Int, v @ Value::Int(_)) => Ok(v),
            (ColumnType::Float, v @ Value::Float(_)) => Ok(v),
            (ColumnType::Float, Value::Int(i)) => Ok(Value::Float(i as f64)),
            (ColumnType::Text, v @ Value::Text(_)) => Ok(v),
            (_, other) => Err(other),
        }
    }

    /// Parse a delimited-text cell as this type.
    ///
    /// An empty unquoted cell is `Null`; numbers tolerate surrounding
    /// whitespace. Returns `None` when the text is not a valid value.
    pub fn parse_cell(self, text: &str, quoted: bool) -> Option<Value> {
        if text.is_empty() && !quoted {
            return Some(Value::Null);
        }
        match self {
            ColumnType::Int => text.trim().parse::<i64>().ok().map(Value::Int),
            ColumnType::Float => text.trim().parse::<f64>().ok().map(Value::Float),
            ColumnType::Text => Some(Value::Text(text.to_string())),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
        };
        f.write_str(name)
    }
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell; `None` for `Null` and text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            Value::Null | Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }
}

/// Renders the raw cell text. `Null` renders empty; floats use the shortest
/// representation that parses back to the same `f64`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conform_widens_int_into_float() {
        assert_eq!(ColumnType::Float.conform(Value::Int(3)), Ok(Value::Float(3.0)));
        assert_eq!(ColumnType::Int.conform(Value::Float(3.0)), Err(Value::Float(3.0)));
    }

    #[test]
    fn test_conform_accepts_null_everywhere() {
        for ty in [ColumnType::Int, ColumnType::Float, ColumnType::Text] {
            assert_eq!(ty.conform(Value::Null), Ok(Value::Null));
        }
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(ColumnType::Int.parse_cell(" 42 ", false), Some(Value::Int(42)));
        assert_eq!(ColumnType::Int.parse_cell("4.2", false), None);
        assert_eq!(ColumnType::Float.parse_cell("1e-3", false), Some(Value::Float(1e-3)));
        assert_eq!(ColumnType::Float.parse_cell("", false), Some(Value::Null));
        assert_eq!(
            ColumnType::Text.parse_cell("", true),
            Some(Value::Text(String::new()))
        );
    }

    #[test]
    fn test_display_float_round_trips() {
        let x = 1.0758904128930355_f64;
        let text = Value::Float(x).to_string();
        assert_eq!(text.parse::<f64>().unwrap(), x);
        assert_eq!(Value::Float(10.0).to_string(), "10");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_serialize_untagged() {
        let row = vec![Value::Int(1), Value::Null, Value::from("x"), Value::Float(0.5)];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[1,null,"x",0.5]"#);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<f64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::Text("a".into()));
    }
}
