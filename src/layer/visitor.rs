use crate::domain::Field;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field as TracingField, Visit};

const MESSAGE_FIELD: &str = "message";

/// Owned copy of an error seen during field recording.
///
/// `tracing` only lends errors to visitors, so the display text and the
/// `source()` chain are captured eagerly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedError {
    message: String,
    source: Option<Box<CapturedError>>,
}

impl CapturedError {
    pub fn capture(err: &(dyn std::error::Error + 'static)) -> Self {
        Self {
            message: err.to_string(),
            source: err.source().map(|source| Box::new(Self::capture(source))),
        }
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CapturedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

/// Converts recorded `tracing` values into typed [`Field`]s.
#[derive(Debug, Default)]
pub struct FieldVisitor {
    pub message: Option<String>,
    pub fields: Vec<Field>,
}

impl FieldVisitor {
    fn push(&mut self, field: &TracingField, make: impl FnOnce(&'static str) -> Field) {
        // Bridged `log` records carry their metadata as `log.*` fields.
        if field.name().starts_with("log.") {
            return;
        }
        self.fields.push(make(field.name()));
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(format!("{value:?}"));
            return;
        }
        self.push(field, |name| Field::string(name, format!("{value:?}")));
    }

    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(value.to_string());
            return;
        }
        self.push(field, |name| Field::string(name, value));
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.push(field, |name| Field::int(name, value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.push(field, |name| Field::uint(name, value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.push(field, |name| Field::float(name, value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.push(field, |name| Field::bool(name, value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        let captured = CapturedError::capture(value);
        self.push(field, |name| Field::shared_error(name, Arc::new(captured)));
    }
}
