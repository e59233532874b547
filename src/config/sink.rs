use crate::domain::Level;
use serde::{Deserialize, Serialize};

/// Settings for a [`RollbarSink`](crate::sink::RollbarSink), fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Entries below this level are not accepted.
    pub min_level: Level,
    /// Block on the client's queue draining after every write.
    pub sync_on_write: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            min_level: Level::Error,
            sync_on_write: true,
        }
    }
}

impl SinkConfig {
    pub fn new(min_level: Level) -> Self {
        Self {
            min_level,
            ..Self::default()
        }
    }

    /// Return from `write` without waiting for the client to drain.
    ///
    /// `sync` still waits.
    pub fn without_sync_on_write(mut self) -> Self {
        self.sync_on_write = false;
        self
    }
}
