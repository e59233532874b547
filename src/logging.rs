//! Global subscriber setup: console output teed with Rollbar.

use crate::layer::RollbarLayer;
use crate::sink::Core;
use thiserror::Error;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug)]
pub enum InitError {
    #[error("Invalid filter directive '{directive}': {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("Failed to set global tracing subscriber: {0}")]
    SubscriberInit(#[from] TryInitError),
}

/// HTTP internals that are too chatty to report.
const DEFAULT_DIRECTIVES: &[&str] = &["hyper=warn", "reqwest=warn", "h2=warn", "rustls=warn"];

/// Builds the filter string: `RUST_LOG` if set, otherwise `default_directive`
/// plus the quiet defaults for the HTTP stack.
pub fn filter_string(default_directive: &str) -> String {
    if let Ok(from_env) = std::env::var(EnvFilter::DEFAULT_ENV)
        && !from_env.trim().is_empty()
    {
        return from_env;
    }

    let mut parts = Vec::with_capacity(DEFAULT_DIRECTIVES.len() + 1);
    parts.push(default_directive);
    parts.extend_from_slice(DEFAULT_DIRECTIVES);
    parts.join(",")
}

/// Installs a registry with an env filter, a compact console layer and
/// `rollbar` as the global default.
///
/// `rollbar` gets its own level filter, so events below its threshold still
/// reach the console.
///
/// Returns an error instead of panicking when a global subscriber is already
/// set.
pub fn init_tracing<K>(rollbar: RollbarLayer<K>, default_directive: &str) -> Result<(), InitError>
where
    K: Core + 'static,
{
    let rollbar_filter = rollbar.level_filter();
    let directive = filter_string(default_directive);
    let env_filter = EnvFilter::try_new(&directive).map_err(|source| InitError::InvalidFilter {
        directive: directive.clone(),
        source,
    })?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .with(rollbar.with_filter(rollbar_filter))
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockReportingClient;
    use crate::domain::Level;
    use crate::sink::RollbarSink;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_filter_string_defaults() {
        unsafe {
            std::env::remove_var("RUST_LOG");
        }
        let filter = filter_string("info");
        assert!(filter.starts_with("info,"));
        assert!(filter.contains("hyper=warn"));
        assert!(filter.contains("reqwest=warn"));
    }

    #[test]
    #[serial]
    fn test_filter_string_prefers_rust_log() {
        unsafe {
            std::env::set_var("RUST_LOG", "debug,my_app=trace");
        }
        assert_eq!(filter_string("info"), "debug,my_app=trace");
        unsafe {
            std::env::remove_var("RUST_LOG");
        }
    }

    #[test]
    #[serial]
    fn test_init_tracing_twice_returns_error() {
        unsafe {
            std::env::remove_var("RUST_LOG");
        }
        let layer = || {
            let mut client = MockReportingClient::new();
            client.expect_wait().return_const(());
            RollbarLayer::new(RollbarSink::new(client, Level::Fatal))
        };

        // Another test may already own the global subscriber; the second call
        // must fail either way.
        let _ = init_tracing(layer(), "info");
        assert!(matches!(
            init_tracing(layer(), "info"),
            Err(InitError::SubscriberInit(_))
        ));
    }
}
