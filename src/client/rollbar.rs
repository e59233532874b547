use super::payload::Item;
use super::{RemoteSeverity, ReportingClient, SharedError};
use crate::config::{ConfigError, RollbarConfig};
use crate::domain::FieldMap;
use parking_lot::{Condvar, Mutex};
use reqwest::{Client, ClientBuilder};
use std::cell::Cell;
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("Failed to start sender: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

thread_local! {
    static SENDER_THREAD: Cell<bool> = const { Cell::new(false) };
}

/// True on the worker thread, whose own HTTP stack may emit events that must
/// not be reported back through the sink.
pub fn on_sender_thread() -> bool {
    SENDER_THREAD.with(Cell::get)
}

/// Count of items submitted but not yet handled by the worker.
#[derive(Debug, Default)]
struct Pending {
    count: Mutex<usize>,
    drained: Condvar,
}

impl Pending {
    fn increment(&self) {
        *self.count.lock() += 1;
    }

    fn decrement(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    fn get(&self) -> usize {
        *self.count.lock()
    }

    fn wait_until_drained(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.drained.wait(&mut count);
        }
    }
}

#[derive(Debug)]
struct Inner {
    config: RollbarConfig,
    sender: mpsc::UnboundedSender<Item>,
    pending: Arc<Pending>,
}

/// HTTP binding for the Rollbar item API.
///
/// Submissions are queued and posted one at a time, in order, by a dedicated
/// worker thread. Nothing is retried; failures are logged and dropped. The
/// worker stops once every clone of the client has been dropped.
#[derive(Debug, Clone)]
pub struct RollbarClient {
    inner: Arc<Inner>,
}

impl RollbarClient {
    pub fn new(config: RollbarConfig) -> Result<Self, ClientError> {
        config.validate()?;

        if config.access_token.is_empty() {
            warn!("Rollbar access token is empty; items will be rejected by the API");
        }

        let http = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(format!("{}/{}", super::payload::NOTIFIER_NAME, crate::VERSION))
            .build()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(Pending::default());

        let worker = Worker {
            http,
            config: config.clone(),
            pending: Arc::clone(&pending),
        };
        thread::Builder::new()
            .name("rollbar-sender".to_string())
            .spawn(move || {
                SENDER_THREAD.with(|flag| flag.set(true));
                runtime.block_on(worker.run(receiver));
            })?;

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                sender,
                pending,
            }),
        })
    }

    pub fn config(&self) -> &RollbarConfig {
        &self.inner.config
    }

    /// Items queued or in flight.
    pub fn pending(&self) -> usize {
        self.inner.pending.get()
    }

    fn submit(
        &self,
        severity: RemoteSeverity,
        message: &str,
        fields: &FieldMap,
        error: Option<SharedError>,
    ) {
        let item = Item::new(severity, message, fields, error);
        self.inner.pending.increment();
        if self.inner.sender.send(item).is_err() {
            self.inner.pending.decrement();
            warn!("Rollbar sender has stopped; dropping item");
        }
    }
}

impl ReportingClient for RollbarClient {
    fn debug(&self, message: &str, fields: &FieldMap) {
        self.submit(RemoteSeverity::Debug, message, fields, None);
    }

    fn info(&self, message: &str, fields: &FieldMap) {
        self.submit(RemoteSeverity::Info, message, fields, None);
    }

    fn warning(&self, message: &str, fields: &FieldMap) {
        self.submit(RemoteSeverity::Warning, message, fields, None);
    }

    fn error(&self, message: &str, fields: &FieldMap, error: Option<SharedError>) {
        self.submit(RemoteSeverity::Error, message, fields, error);
    }

    fn critical(&self, message: &str, fields: &FieldMap) {
        self.submit(RemoteSeverity::Critical, message, fields, None);
    }

    fn wait(&self) {
        self.inner.pending.wait_until_drained();
    }
}

struct Worker {
    http: Client,
    config: RollbarConfig,
    pending: Arc<Pending>,
}

impl Worker {
    async fn run(self, mut receiver: mpsc::UnboundedReceiver<Item>) {
        while let Some(item) = receiver.recv().await {
            self.post(&item).await;
            self.pending.decrement();
        }
        debug!("Rollbar sender stopped");
    }

    async fn post(&self, item: &Item) {
        let payload = item.to_json(&self.config);
        let result = self
            .http
            .post(self.config.endpoint.as_str())
            .json(&payload)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!(uuid = %item.uuid, level = item.severity.as_str(), "Sent item to Rollbar");
            }
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                warn!(uuid = %item.uuid, status, body = %body, "Rollbar rejected item");
            }
            Err(e) => {
                warn!(uuid = %item.uuid, error = %e, "Failed to send item to Rollbar");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_wait_returns_immediately_when_empty() {
        let pending = Pending::default();
        pending.wait_until_drained();
        assert_eq!(pending.get(), 0);
    }

    #[test]
    fn test_pending_wait_blocks_until_decremented() {
        let pending = Arc::new(Pending::default());
        pending.increment();
        pending.increment();

        let worker = Arc::clone(&pending);
        let handle = thread::spawn(move || {
            worker.decrement();
            thread::sleep(std::time::Duration::from_millis(20));
            worker.decrement();
        });

        pending.wait_until_drained();
        assert_eq!(pending.get(), 0);
        handle.join().unwrap();
    }

    #[test]
    fn test_sender_thread_flag_is_thread_local() {
        assert!(!on_sender_thread());
        let flagged = thread::spawn(|| {
            SENDER_THREAD.with(|flag| flag.set(true));
            on_sender_thread()
        })
        .join()
        .unwrap();
        assert!(flagged);
        assert!(!on_sender_thread());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = RollbarConfig {
            endpoint: "::not-a-url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            RollbarClient::new(config),
            Err(ClientError::InvalidConfiguration(_))
        ));
    }
}
