//! Declared query parameters

use indexmap::IndexMap;
use serde::Serialize;

use corpusq_core::{Error, Result, Value};

/// Compile-time default of a declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    /// Integer parameter
    Int(i64),
    /// Text parameter
    Text(&'static str),
}

impl From<ParamDefault> for Value {
    fn from(default: ParamDefault) -> Self {
        match default {
            ParamDefault::Int(i) => Value::Int(i),
            ParamDefault::Text(s) => Value::from(s),
        }
    }
}

/// Current parameter values of one query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    query: String,
    values: IndexMap<String, Value>,
}

impl QueryParams {
    /// Parameters of a query, initialized from its declared defaults
    pub fn declared(query: impl Into<String>, defaults: &[(&str, ParamDefault)]) -> Self {
        Self {
            query: query.into(),
            values: defaults
                .iter()
                .map(|(name, default)| ((*name).to_string(), Value::from(*default)))
                .collect(),
        }
    }

    /// Whether the query declares a parameter
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Parameter names and current values, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Override a declared parameter.
    ///
    /// The new value must have the kind of the declared default; text that
    /// spells an integer is accepted for integer parameters.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let expects_int = match self.values.get(name) {
            Some(Value::Int(_)) => true,
            Some(_) => false,
            None => return Err(self.invalid(name, "not declared by this query")),
        };
        let value = if expects_int {
            match value {
                Value::String(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
                    self.invalid(name, &format!("expected an integer, got '{s}'"))
                })?,
                other => other.as_i64().map(Value::Int).ok_or_else(|| {
                    self.invalid(
                        name,
                        &format!("expected an integer, got {}", other.type_name()),
                    )
                })?,
            }
        } else {
            match value.to_text() {
                Some(text) => Value::String(text),
                None => return Err(self.invalid(name, "expected text, got null")),
            }
        };
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// An integer parameter
    pub fn int(&self, name: &str) -> Result<i64> {
        match self.values.get(name) {
            Some(Value::Int(i)) => Ok(*i),
            Some(_) => Err(self.invalid(name, "not an integer parameter")),
            None => Err(self.invalid(name, "not declared by this query")),
        }
    }

    /// An integer parameter narrowed to a year
    pub fn year(&self, name: &str) -> Result<i32> {
        let value = self.int(name)?;
        i32::try_from(value).map_err(|_| self.invalid(name, "out of range for a year"))
    }

    /// An integer parameter used as a count threshold
    pub fn count(&self, name: &str) -> Result<usize> {
        let value = self.int(name)?;
        usize::try_from(value).map_err(|_| self.invalid(name, "must not be negative"))
    }

    /// A text parameter
    pub fn text(&self, name: &str) -> Result<&str> {
        match self.values.get(name) {
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(self.invalid(name, "not a text parameter")),
            None => Err(self.invalid(name, "not declared by this query")),
        }
    }

    fn invalid(&self, name: &str, reason: &str) -> Error {
        Error::InvalidParameter {
            query: self.query.clone(),
            param: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
