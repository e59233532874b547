#![warn(rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::cast_possible_truncation, // Millisecond timeouts fit in u64
    clippy::missing_errors_doc,       // Error enums are documented at their definition
    clippy::module_name_repetitions,  // e.g. SinkError in sink-facing modules
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown
)]

//! Routes `tracing` events to Rollbar.
//!
//! The pieces, bottom-up:
//! - [`domain`]: levels, entries and typed fields
//! - [`sink`]: the [`Core`] backend contract and [`RollbarSink`]
//! - [`client`]: the [`ReportingClient`] seam and the HTTP [`RollbarClient`]
//! - [`layer`]: [`RollbarLayer`], the `tracing_subscriber` plug-in
//! - [`config`] / [`logging`]: settings loading and subscriber setup
//!
//! ```no_run
//! use rollbar_log_sink::{Level, RollbarClient, RollbarConfig, RollbarLayer, RollbarSink};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RollbarClient::new(RollbarConfig::from_env()?)?;
//! let layer = RollbarLayer::new(RollbarSink::new(client, Level::Error));
//! let _guard = layer.flush_guard();
//! rollbar_log_sink::logging::init_tracing(layer, "info")?;
//!
//! let err = std::io::Error::other("disk gone");
//! tracing::error!(error = &err as &(dyn std::error::Error + 'static), "ran into an error");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod domain;
pub mod layer;
pub mod logging;
pub mod sink;

pub use client::{ReportingClient, RollbarClient, SharedError};
pub use config::{RollbarConfig, SinkConfig};
pub use domain::{Caller, Entry, Field, FieldMap, FieldValue, Level, SinkError};
pub use layer::RollbarLayer;
pub use sink::{Core, RollbarSink};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
