//! `tracing_subscriber` plug-in for a [`Core`].
//!
//! Stack it next to the usual `fmt` layer so events reach the console and
//! Rollbar at once:
//!
//! ```no_run
//! use rollbar_log_sink::{Level, RollbarClient, RollbarConfig, RollbarLayer, RollbarSink};
//! use tracing_subscriber::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RollbarClient::new(RollbarConfig::new("MY_ROLL_BAR_TOKEN", "production"))?;
//! let rollbar = RollbarLayer::new(RollbarSink::new(client, Level::Error));
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(rollbar.clone().with_filter(rollbar.level_filter()))
//!     .init();
//!
//! tracing::info!(foo = "bar", "only goes to the console");
//! tracing::error!(foo = "bar", "goes to both");
//! rollbar.sync()?;
//! # Ok(())
//! # }
//! ```

mod visitor;

pub use visitor::{CapturedError, FieldVisitor};

use crate::client::rollbar::on_sender_thread;
use crate::domain::{Caller, Entry, Field, Level, SinkError};
use crate::sink::Core;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Fields recorded on a span, stored in its extensions.
#[derive(Debug, Default)]
struct SpanFields(Vec<Field>);

/// Forwards `tracing` events at or above the core's minimum level.
///
/// Clones share one core, so fields bound through any clone are seen by all.
/// The threshold is read from the core once, at construction; events below it
/// never take the core lock.
pub struct RollbarLayer<K> {
    core: Arc<Mutex<K>>,
    min_level: Option<Level>,
}

impl<K> Clone for RollbarLayer<K> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            min_level: self.min_level,
        }
    }
}

impl<K> RollbarLayer<K>
where
    K: Core,
{
    pub fn new(core: K) -> Self {
        let min_level = Level::ALL.into_iter().find(|level| core.enabled(*level));
        Self {
            core: Arc::new(Mutex::new(core)),
            min_level,
        }
    }

    /// Lock-free copy of the core's `enabled` check.
    pub fn accepts(&self, level: Level) -> bool {
        self.min_level.is_some_and(|minimum| level.is_at_least(minimum))
    }

    /// Per-layer filter matching the core's threshold.
    ///
    /// Attaching it with `Layer::with_filter` lets `tracing` skip building
    /// events that no layer wants, without muting other layers.
    pub fn level_filter(&self) -> LevelFilter {
        self.min_level.map_or(LevelFilter::OFF, Level::level_filter)
    }

    /// Binds fields to every entry written after this call.
    pub fn with_fields(&self, fields: Vec<Field>) -> &Self {
        self.core.lock().bind(fields);
        self
    }

    pub fn sync(&self) -> Result<(), SinkError> {
        self.core.lock().sync()
    }

    /// Runs `f` with exclusive access to the core.
    pub fn with_core<R>(&self, f: impl FnOnce(&mut K) -> R) -> R {
        f(&mut self.core.lock())
    }

    /// Guard that syncs the core when dropped, e.g. at the end of `main`.
    pub fn flush_guard(&self) -> FlushGuard<K> {
        FlushGuard {
            core: Arc::clone(&self.core),
        }
    }

    fn build_entry<S>(event: &Event<'_>, ctx: &Context<'_, S>, level: Level) -> (Entry, Vec<Field>)
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let metadata = event.metadata();

        let mut fields = Vec::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(span_fields) = span.extensions().get::<SpanFields>() {
                    fields.extend(span_fields.0.iter().cloned());
                }
            }
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        fields.extend(visitor.fields);

        let mut entry = Entry::new(level, visitor.message.unwrap_or_default())
            .with_logger_name(metadata.target());
        if let Some(file) = metadata.file() {
            entry = entry.with_caller(Caller::new(file, metadata.line()));
        }

        (entry, fields)
    }
}

fn is_own_target(target: &str) -> bool {
    target == OWN_TARGET
        || target
            .strip_prefix(OWN_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

impl<K, S> Layer<S> for RollbarLayer<K>
where
    K: Core + 'static,
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        span.extensions_mut().insert(SpanFields(visitor.fields));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = FieldVisitor::default();
        values.record(&mut visitor);

        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<SpanFields>() {
            Some(existing) => existing.0.extend(visitor.fields),
            None => extensions.insert(SpanFields(visitor.fields)),
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // The client's own diagnostics would otherwise loop back into the sink.
        if is_own_target(metadata.target()) || on_sender_thread() {
            return;
        }

        let level = Level::from(*metadata.level());
        if !self.accepts(level) {
            return;
        }

        let (entry, fields) = Self::build_entry(event, &ctx, level);
        if let Err(e) = self.core.lock().write(&entry, &fields) {
            eprintln!("rollbar-log-sink: dropping entry: {e}");
        }
    }
}

/// Syncs the shared core on drop.
#[must_use = "dropping the guard immediately syncs the core"]
pub struct FlushGuard<K>
where
    K: Core,
{
    core: Arc<Mutex<K>>,
}

impl<K> Drop for FlushGuard<K>
where
    K: Core,
{
    fn drop(&mut self) {
        if let Err(e) = self.core.lock().sync() {
            eprintln!("rollbar-log-sink: sync on drop failed: {e}");
        }
    }
}
