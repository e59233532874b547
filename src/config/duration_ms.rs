//! `Duration` stored as whole milliseconds, for `#[serde(with = "...")]`.

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(millis)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Timeouts {
        #[serde(with = "super")]
        connect: Duration,
    }

    #[test]
    fn test_writes_and_reads_milliseconds() {
        let timeouts = Timeouts {
            connect: Duration::from_millis(1500),
        };
        let encoded = toml::to_string(&timeouts).unwrap();
        assert_eq!(encoded.trim(), "connect = 1500");
        assert_eq!(toml::from_str::<Timeouts>(&encoded).unwrap(), timeouts);
    }

    #[test]
    fn test_rejects_negative_millis() {
        assert!(toml::from_str::<Timeouts>("connect = -5").is_err());
    }
}
