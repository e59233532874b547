use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

/// Severity of an [`Entry`](super::Entry), ordered from least to most severe.
///
/// The three levels above `Error` are distinct on the logging side but collapse
/// into a single critical call on the Rollbar side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    #[serde(rename = "dpanic")]
    DPanic,
    Panic,
    Fatal,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid log level '{input}'. Valid levels: {valid_levels:?}")]
pub struct ParseLevelError {
    pub input: String,
    pub valid_levels: &'static [&'static str],
}

impl Level {
    pub const ALL: [Level; 8] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::DPanic,
        Level::Panic,
        Level::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::DPanic => "dpanic",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }

    /// The `tracing` filter admitting events at `self` and above.
    ///
    /// `tracing` has nothing above `ERROR`, so the panic and fatal
    /// thresholds turn every event off.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Level::Trace => LevelFilter::TRACE,
            Level::Debug => LevelFilter::DEBUG,
            Level::Info => LevelFilter::INFO,
            Level::Warn => LevelFilter::WARN,
            Level::Error => LevelFilter::ERROR,
            Level::DPanic | Level::Panic | Level::Fatal => LevelFilter::OFF,
        }
    }

    /// Whether an entry at `self` passes a `minimum` threshold.
    pub fn is_at_least(self, minimum: Level) -> bool {
        self >= minimum
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "dpanic" => Ok(Level::DPanic),
            "panic" => Ok(Level::Panic),
            "fatal" | "critical" => Ok(Level::Fatal),
            _ => Err(ParseLevelError {
                input: s.to_string(),
                valid_levels: &[
                    "trace", "debug", "info", "warn", "error", "dpanic", "panic", "fatal",
                ],
            }),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG => Level::Debug,
            _ => Level::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_total_and_ascending() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort below {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_is_at_least_matches_ordering_for_every_threshold() {
        for minimum in Level::ALL {
            for level in Level::ALL {
                assert_eq!(level.is_at_least(minimum), level >= minimum);
            }
        }
    }

    #[test]
    fn test_parse_round_trips_display() {
        for level in Level::ALL {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("critical".parse::<Level>().unwrap(), Level::Fatal);
    }

    #[test]
    fn test_parse_rejects_unknown_level() {
        let err = "verbose".parse::<Level>().unwrap_err();
        assert_eq!(err.input, "verbose");
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_from_tracing_level() {
        assert_eq!(Level::from(tracing::Level::TRACE), Level::Trace);
        assert_eq!(Level::from(tracing::Level::WARN), Level::Warn);
        assert_eq!(Level::from(tracing::Level::ERROR), Level::Error);
    }

    #[test]
    fn test_level_filter_admits_same_events_as_threshold() {
        let events = [
            tracing::Level::TRACE,
            tracing::Level::DEBUG,
            tracing::Level::INFO,
            tracing::Level::WARN,
            tracing::Level::ERROR,
        ];
        for minimum in Level::ALL {
            let filter = minimum.level_filter();
            for event in events {
                assert_eq!(
                    event <= filter,
                    Level::from(event).is_at_least(minimum),
                    "{minimum} vs {event}"
                );
            }
        }
    }
}
