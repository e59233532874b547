pub mod dispatch;
pub mod fields;

use crate::client::{RemoteSeverity, ReportingClient};
use crate::config::SinkConfig;
use crate::domain::{Entry, Field, FieldValue, Level, SinkError};
use serde_json::Value;
use std::collections::BTreeMap;

pub use dispatch::dispatch;
pub use fields::{extract_error, fields_to_map};

/// Reserved key carrying the JSON-encoded bound fields.
pub const CORE_FIELDS_KEY: &str = "coreFields";
pub const LOGGER_KEY: &str = "logger";
pub const FILE_KEY: &str = "file";

/// Backend contract a logging front end drives.
///
/// Implementations are not synchronized; callers sharing one across threads
/// must serialize access (see [`RollbarLayer`](crate::layer::RollbarLayer)).
pub trait Core: Send {
    /// Binds fields to every later entry written through this core.
    fn with(&mut self, fields: Vec<Field>) -> &mut Self
    where
        Self: Sized;

    fn enabled(&self, level: Level) -> bool;

    fn write(&mut self, entry: &Entry, fields: &[Field]) -> Result<(), SinkError>;

    fn sync(&mut self) -> Result<(), SinkError>;

    /// Non-chaining form of [`Core::with`], usable through `dyn Core`.
    fn bind(&mut self, fields: Vec<Field>);
}

/// Core that forwards entries to a [`ReportingClient`].
pub struct RollbarSink<C> {
    client: C,
    config: SinkConfig,
    bound: BTreeMap<String, FieldValue>,
}

impl<C> RollbarSink<C>
where
    C: ReportingClient,
{
    /// Sink accepting `min_level` and above, waiting for delivery on each write.
    pub fn new(client: C, min_level: Level) -> Self {
        Self::with_config(client, SinkConfig::new(min_level))
    }

    pub fn with_config(client: C, config: SinkConfig) -> Self {
        Self {
            client,
            config,
            bound: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    pub fn min_level(&self) -> Level {
        self.config.min_level
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn bound_fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.bound
    }

    fn encode_bound_fields(&self) -> Result<Option<String>, SinkError> {
        if self.bound.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::to_string(&self.bound)?))
    }
}

impl<C> Core for RollbarSink<C>
where
    C: ReportingClient,
{
    fn with(&mut self, fields: Vec<Field>) -> &mut Self {
        self.bind(fields);
        self
    }

    fn bind(&mut self, fields: Vec<Field>) {
        for field in fields {
            self.bound.insert(field.key, field.value);
        }
    }

    fn enabled(&self, level: Level) -> bool {
        level.is_at_least(self.config.min_level)
    }

    /// Forwards `entry` regardless of the minimum level; gating is the
    /// caller's job via [`Core::enabled`].
    fn write(&mut self, entry: &Entry, fields: &[Field]) -> Result<(), SinkError> {
        let mut map = fields_to_map(fields);

        if let Some(encoded) = self.encode_bound_fields()? {
            map.insert(CORE_FIELDS_KEY.to_string(), Value::String(encoded));
        }

        if !entry.logger_name.is_empty() {
            map.insert(LOGGER_KEY.to_string(), Value::String(entry.logger_name.clone()));
        }

        let file = entry.caller_path();
        if !file.is_empty() {
            map.insert(FILE_KEY.to_string(), Value::String(file));
        }

        if let Some(severity) = RemoteSeverity::for_level(entry.level) {
            let error = match severity {
                RemoteSeverity::Error => extract_error(fields),
                _ => None,
            };
            dispatch(&self.client, severity, &entry.message, &map, error);
        }

        if self.config.sync_on_write {
            self.client.wait();
        }
        Ok(())
    }

    fn sync(&mut self) -> Result<(), SinkError> {
        self.client.wait();
        Ok(())
    }
}
