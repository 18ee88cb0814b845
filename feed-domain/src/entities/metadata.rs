// Event metadata
// One level of nesting: a scalar, a flat list of scalars, or a flat map of scalars

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub type Metadata = BTreeMap<String, MetadataValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Scalar {
    /// Integer coercion applied when reading tags back from the index.
    pub fn coerce(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(value) => Scalar::Int(value),
            Err(_) => Scalar::Text(raw.to_string()),
        }
    }

    /// Anything that is not a JSON scalar becomes opaque text.
    fn from_json(value: Value) -> Self {
        match value {
            Value::Bool(flag) => Scalar::Bool(flag),
            Value::Number(number) => match number.as_i64() {
                Some(int) => Scalar::Int(int),
                None => Scalar::Float(number.as_f64().unwrap_or_default()),
            },
            Value::String(text) => Scalar::Text(text),
            other => Scalar::Text(other.to_string()),
        }
    }

    fn into_json(self) -> Value {
        match self {
            Scalar::Int(value) => Value::from(value),
            Scalar::Float(value) => Number::from_f64(value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Scalar::Bool(value) => Value::Bool(value),
            Scalar::Text(value) => Value::String(value),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value}"),
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum MetadataValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Map(BTreeMap<String, Scalar>),
}

impl From<Value> for MetadataValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                MetadataValue::List(items.into_iter().map(Scalar::from_json).collect())
            }
            Value::Object(entries) => MetadataValue::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Scalar::from_json(value)))
                    .collect(),
            ),
            other => MetadataValue::Scalar(Scalar::from_json(other)),
        }
    }
}

impl From<MetadataValue> for Value {
    fn from(value: MetadataValue) -> Self {
        match value {
            MetadataValue::Scalar(scalar) => scalar.into_json(),
            MetadataValue::List(items) => {
                Value::Array(items.into_iter().map(Scalar::into_json).collect())
            }
            MetadataValue::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into_json()))
                    .collect(),
            ),
        }
    }
}

impl From<Scalar> for MetadataValue {
    fn from(value: Scalar) -> Self {
        MetadataValue::Scalar(value)
    }
}
