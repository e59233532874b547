//! Domain layer for rollbar-log-sink.
//!
//! Contains the types shared between the logging side and the Rollbar side:
//! - `Level`: severity, ordered Trace..Fatal
//! - `Entry` / `Caller`: one log event and its call site
//! - `Field` / `FieldValue`: typed key/value pairs
//! - `SinkError`: the only error a sink write can return

pub mod entry;
pub mod error;
pub mod field;
pub mod level;

pub use entry::{Caller, Entry};
pub use error::SinkError;
pub use field::{
    Field, FieldMap, FieldValue, MarshalError, ObjectEncoder, ObjectMarshaler, SharedError,
};
pub use level::{Level, ParseLevelError};
