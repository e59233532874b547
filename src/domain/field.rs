use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error value carried by an error-typed field.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Plain key/value mapping handed to the reporting client.
pub type FieldMap = Map<String, Value>;

/// Failure raised by an [`ObjectMarshaler`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct MarshalError(pub String);

impl MarshalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A value that knows how to write itself into an [`ObjectEncoder`].
///
/// Marshaling is deferred until the field is encoded, so a marshaler bound to
/// a sink may still fail when an entry is written.
pub trait ObjectMarshaler: Send + Sync {
    fn marshal_object(&self, enc: &mut ObjectEncoder) -> Result<(), MarshalError>;
}

/// Collects the keys written by an [`ObjectMarshaler`].
#[derive(Debug, Default)]
pub struct ObjectEncoder {
    fields: FieldMap,
}

impl ObjectEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_str(&mut self, key: &str, value: impl Into<String>) {
        self.fields.insert(key.to_string(), Value::String(value.into()));
    }

    pub fn add_i64(&mut self, key: &str, value: i64) {
        self.fields.insert(key.to_string(), Value::from(value));
    }

    pub fn add_u64(&mut self, key: &str, value: u64) {
        self.fields.insert(key.to_string(), Value::from(value));
    }

    pub fn add_f64(&mut self, key: &str, value: f64) {
        self.fields.insert(key.to_string(), float_value(value));
    }

    pub fn add_bool(&mut self, key: &str, value: bool) {
        self.fields.insert(key.to_string(), Value::Bool(value));
    }

    pub fn add_value(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn add_object(
        &mut self,
        key: &str,
        marshaler: &dyn ObjectMarshaler,
    ) -> Result<(), MarshalError> {
        let nested = marshal(marshaler)?;
        self.fields.insert(key.to_string(), Value::Object(nested));
        Ok(())
    }

    pub fn into_map(self) -> FieldMap {
        self.fields
    }
}

fn marshal(marshaler: &dyn ObjectMarshaler) -> Result<FieldMap, MarshalError> {
    let mut enc = ObjectEncoder::new();
    marshaler.marshal_object(&mut enc)?;
    Ok(enc.into_map())
}

fn float_value(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// Typed payload of a [`Field`].
#[derive(Clone)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Error(SharedError),
    Json(Value),
    Object(Arc<dyn ObjectMarshaler>),
}

impl FieldValue {
    pub fn is_error(&self) -> bool {
        matches!(self, FieldValue::Error(_))
    }

    /// Eagerly converts to JSON; marshaler failures are returned to the caller.
    pub fn to_json(&self) -> Result<Value, MarshalError> {
        Ok(match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Uint(u) => Value::from(*u),
            FieldValue::Float(f) => float_value(*f),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Error(err) => Value::String(err.to_string()),
            FieldValue::Json(value) => value.clone(),
            FieldValue::Object(marshaler) => Value::Object(marshal(marshaler.as_ref())?),
        })
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => f.debug_tuple("String").field(s).finish(),
            FieldValue::Int(i) => f.debug_tuple("Int").field(i).finish(),
            FieldValue::Uint(u) => f.debug_tuple("Uint").field(u).finish(),
            FieldValue::Float(v) => f.debug_tuple("Float").field(v).finish(),
            FieldValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            FieldValue::Error(err) => f.debug_tuple("Error").field(&err.to_string()).finish(),
            FieldValue::Json(value) => f.debug_tuple("Json").field(value).finish(),
            FieldValue::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::Uint(u) => serializer.serialize_u64(*u),
            FieldValue::Float(v) => float_value(*v).serialize(serializer),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Error(err) => serializer.collect_str(err),
            FieldValue::Json(value) => value.serialize(serializer),
            FieldValue::Object(marshaler) => marshal(marshaler.as_ref())
                .map_err(S::Error::custom)?
                .serialize(serializer),
        }
    }
}

/// A typed key/value pair attached to an entry or bound to a sink.
#[derive(Debug, Clone)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::String(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, FieldValue::Uint(value))
    }

    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, FieldValue::Float(value))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    /// Error field under the conventional `"error"` key.
    pub fn error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::named_error("error", err)
    }

    pub fn named_error<E>(key: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::new(key, FieldValue::Error(Arc::new(err)))
    }

    pub fn shared_error(key: impl Into<String>, err: SharedError) -> Self {
        Self::new(key, FieldValue::Error(err))
    }

    pub fn json(key: impl Into<String>, value: Value) -> Self {
        Self::new(key, FieldValue::Json(value))
    }

    pub fn object<M>(key: impl Into<String>, marshaler: M) -> Self
    where
        M: ObjectMarshaler + 'static,
    {
        Self::new(key, FieldValue::Object(Arc::new(marshaler)))
    }
}
