use serde::ser::{Error as _, Serialize, Serializer};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::Arc;

/// A single field value attached to a [`LogEvent`](crate::event::LogEvent).
///
/// Error-like values are kept as errors until encoding, where they are
/// rendered through their `Display` implementation.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    Error(Arc<dyn Error + Send + Sync>),
}

impl FieldValue {
    /// Wrap an error so that it is encoded as its message.
    pub fn error<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        FieldValue::Error(Arc::new(err))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FieldValue::Error(_))
    }

    /// Copy of this value with a top-level error replaced by its message.
    pub fn stringify_error(&self) -> FieldValue {
        match self {
            FieldValue::Error(err) => FieldValue::String(err.to_string()),
            other => other.clone(),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::UInt(u) => serializer.serialize_u64(*u),
            FieldValue::Float(f) if !f.is_finite() => {
                Err(S::Error::custom(format!("unsupported float value: {}", f)))
            }
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Array(items) => serializer.collect_seq(items),
            FieldValue::Map(map) => serializer.collect_map(map),
            FieldValue::Error(err) => serializer.collect_str(err),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::UInt(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::UInt(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::Array(value)
    }
}

impl From<BTreeMap<String, FieldValue>> for FieldValue {
    fn from(value: BTreeMap<String, FieldValue>) -> Self {
        FieldValue::Map(value)
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    FieldValue::UInt(u)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => FieldValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                FieldValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// Error whose message was rendered eagerly.
///
/// Used where an error is only available by reference, e.g. inside a
/// `tracing` field visitor.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CapturedError {
    message: String,
}

impl CapturedError {
    pub fn new(message: impl Into<String>) -> Self {
        CapturedError { message: message.into() }
    }

    pub fn from_error(err: &dyn Error) -> Self {
        CapturedError::new(err.to_string())
    }
}
