#![allow(dead_code)]

use parking_lot::Mutex;
use rollbar_log_sink::client::RemoteSeverity;
use rollbar_log_sink::{FieldMap, ReportingClient, SharedError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// One call observed by [`RecordingClient`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub severity: RemoteSeverity,
    pub message: String,
    pub fields: FieldMap,
    pub error: Option<String>,
}

/// In-memory client that remembers every submission.
#[derive(Debug, Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Recorded>>,
    waits: AtomicUsize,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().clone()
    }

    pub fn waits(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }

    fn record(
        &self,
        severity: RemoteSeverity,
        message: &str,
        fields: &FieldMap,
        error: Option<SharedError>,
    ) {
        self.calls.lock().push(Recorded {
            severity,
            message: message.to_string(),
            fields: fields.clone(),
            error: error.map(|e| e.to_string()),
        });
    }
}

impl ReportingClient for RecordingClient {
    fn debug(&self, message: &str, fields: &FieldMap) {
        self.record(RemoteSeverity::Debug, message, fields, None);
    }

    fn info(&self, message: &str, fields: &FieldMap) {
        self.record(RemoteSeverity::Info, message, fields, None);
    }

    fn warning(&self, message: &str, fields: &FieldMap) {
        self.record(RemoteSeverity::Warning, message, fields, None);
    }

    fn error(&self, message: &str, fields: &FieldMap, error: Option<SharedError>) {
        self.record(RemoteSeverity::Error, message, fields, error);
    }

    fn critical(&self, message: &str, fields: &FieldMap) {
        self.record(RemoteSeverity::Critical, message, fields, None);
    }

    fn wait(&self) {
        self.waits.fetch_add(1, Ordering::SeqCst);
    }
}
