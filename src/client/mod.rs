pub mod payload;
pub mod rollbar;

use crate::domain::FieldMap;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

pub use crate::domain::SharedError;
pub use rollbar::{ClientError, RollbarClient};

/// Rollbar's own severity taxonomy, coarser than [`Level`](crate::domain::Level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteSeverity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl RemoteSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteSeverity::Debug => "debug",
            RemoteSeverity::Info => "info",
            RemoteSeverity::Warning => "warning",
            RemoteSeverity::Error => "error",
            RemoteSeverity::Critical => "critical",
        }
    }
}

/// Submission side of an error-reporting service.
///
/// Calls are fire-and-forget: delivery problems stay inside the client.
/// `wait` blocks until everything submitted so far has been handled.
#[cfg_attr(test, automock)]
pub trait ReportingClient: Send + Sync {
    fn debug(&self, message: &str, fields: &FieldMap);
    fn info(&self, message: &str, fields: &FieldMap);
    fn warning(&self, message: &str, fields: &FieldMap);
    fn error(&self, message: &str, fields: &FieldMap, error: Option<SharedError>);
    fn critical(&self, message: &str, fields: &FieldMap);
    fn wait(&self);
}

impl<C> ReportingClient for Arc<C>
where
    C: ReportingClient + ?Sized,
{
    fn debug(&self, message: &str, fields: &FieldMap) {
        (**self).debug(message, fields);
    }

    fn info(&self, message: &str, fields: &FieldMap) {
        (**self).info(message, fields);
    }

    fn warning(&self, message: &str, fields: &FieldMap) {
        (**self).warning(message, fields);
    }

    fn error(&self, message: &str, fields: &FieldMap, error: Option<SharedError>) {
        (**self).error(message, fields, error);
    }

    fn critical(&self, message: &str, fields: &FieldMap) {
        (**self).critical(message, fields);
    }

    fn wait(&self) {
        (**self).wait();
    }
}
