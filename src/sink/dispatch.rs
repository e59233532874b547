use crate::client::{RemoteSeverity, ReportingClient, SharedError};
use crate::domain::{FieldMap, Level};

impl RemoteSeverity {
    /// Which Rollbar call an entry at `level` turns into.
    ///
    /// `None` means the level has no Rollbar counterpart and the entry is
    /// dropped.
    pub fn for_level(level: Level) -> Option<Self> {
        match level {
            Level::Trace => None,
            Level::Debug => Some(RemoteSeverity::Debug),
            Level::Info => Some(RemoteSeverity::Info),
            Level::Warn => Some(RemoteSeverity::Warning),
            Level::Error => Some(RemoteSeverity::Error),
            Level::DPanic | Level::Panic | Level::Fatal => Some(RemoteSeverity::Critical),
        }
    }
}

/// Invokes the client call for `severity`. Only error calls carry `error`.
pub fn dispatch<C>(
    client: &C,
    severity: RemoteSeverity,
    message: &str,
    fields: &FieldMap,
    error: Option<SharedError>,
) where
    C: ReportingClient + ?Sized,
{
    match severity {
        RemoteSeverity::Debug => client.debug(message, fields),
        RemoteSeverity::Info => client.info(message, fields),
        RemoteSeverity::Warning => client.warning(message, fields),
        RemoteSeverity::Error => client.error(message, fields, error),
        RemoteSeverity::Critical => client.critical(message, fields),
    }
}
