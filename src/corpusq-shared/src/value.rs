//! Value types for corpusq cells
//!
//! Every raw cell handed to the resolver, every canonical field read back
//! from a record and every cell of a query result table is a [`Value`].

use chrono::NaiveDate;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A single scalar cell
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (i64)
    Int(i64),
    /// Float value (f64)
    Float(f64),
    /// String value
    String(String),
    /// Calendar date
    Date(NaiveDate),
}

impl Value {
    /// Create a new string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Check if value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the type name of this value
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Date(_) => "date",
        }
    }

    /// Borrow the string payload, if any
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload; integral floats are accepted
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            #[allow(clippy::cast_possible_truncation)]
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    /// Boolean payload
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Render the cell as plain text, `None` for null.
    ///
    /// Integral floats print without a fractional part so a volume read as
    /// `3.0` by the CSV reader becomes `"3"`.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(match self.as_i64() {
                Some(i) => i.to_string(),
                None => f.to_string(),
            }),
            Value::String(s) => Some(s.clone()),
            Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Convert from a JSON value. Arrays and objects have no cell form and
    /// are kept as their JSON text.
    #[must_use]
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Null
                }
            }
            JsonValue::String(s) => Value::String(s),
            other => Value::String(other.to_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::String(_) => 4,
            Value::Date(_) => 5,
        }
    }
}

// Equality, hashing and ordering are structural so values can key groups.
// Nulls sort first; floats use the IEEE total order.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_text() {
            Some(text) => write!(f, "{text}"),
            None => write!(f, "null"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::Deserialize;
        JsonValue::deserialize(deserializer).map(Value::from_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Bool(true).type_name(), "boolean");
        assert_eq!(Value::Int(1).type_name(), "integer");
        assert_eq!(Value::Float(1.5).type_name(), "float");
        assert_eq!(Value::string("x").type_name(), "string");
    }

    #[test]
    fn test_to_text() {
        assert_eq!(Value::Null.to_text(), None);
        assert_eq!(Value::Float(3.0).to_text(), Some("3".to_string()));
        assert_eq!(Value::Float(2.5).to_text(), Some("2.5".to_string()));
        let date = NaiveDate::from_ymd_opt(1990, 5, 1).unwrap();
        assert_eq!(Value::Date(date).to_text(), Some("1990-05-01".to_string()));
    }

    #[test]
    fn test_ordering_puts_null_first() {
        let mut values = vec![
            Value::string("b"),
            Value::Null,
            Value::Int(3),
            Value::string("a"),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Int(3),
                Value::string("a"),
                Value::string("b")
            ]
        );
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        let mut set = HashSet::new();
        set.insert(Value::string("x"));
        set.insert(Value::string("x"));
        set.insert(Value::Float(f64::NAN));
        set.insert(Value::Float(f64::NAN));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_json_round_trip() {
        let json = serde_json::json!({"a": 1, "b": "two", "c": null, "d": 1.5});
        let obj = json.as_object().unwrap();
        assert_eq!(Value::from_json(obj["a"].clone()), Value::Int(1));
        assert_eq!(Value::from_json(obj["b"].clone()), Value::string("two"));
        assert_eq!(Value::from_json(obj["c"].clone()), Value::Null);
        assert_eq!(Value::from_json(obj["d"].clone()), Value::Float(1.5));

        let date = NaiveDate::from_ymd_opt(2001, 1, 2).unwrap();
        let out = serde_json::to_string(&vec![Value::Date(date), Value::Null]).unwrap();
        assert_eq!(out, r#"["2001-01-02",null]"#);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::string("x"));
    }
}
