//! Rollbar item payloads (`POST /api/1/item/`).

use super::RemoteSeverity;
use crate::config::RollbarConfig;
use crate::domain::{FieldMap, SharedError};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

pub const NOTIFIER_NAME: &str = "rollbar-log-sink";

/// One item as submitted by the sink, before it is rendered for the wire.
#[derive(Debug, Clone)]
pub struct Item {
    pub severity: RemoteSeverity,
    pub message: String,
    pub fields: FieldMap,
    pub error: Option<SharedError>,
    pub timestamp: i64,
    pub uuid: Uuid,
}

impl Item {
    pub fn new(
        severity: RemoteSeverity,
        message: &str,
        fields: &FieldMap,
        error: Option<SharedError>,
    ) -> Self {
        Self {
            severity,
            message: message.to_string(),
            fields: fields.clone(),
            error,
            timestamp: Utc::now().timestamp(),
            uuid: Uuid::new_v4(),
        }
    }

    pub fn to_json(&self, config: &RollbarConfig) -> Value {
        let mut data = json!({
            "environment": config.environment,
            "level": self.severity.as_str(),
            "timestamp": self.timestamp,
            "uuid": self.uuid.to_string(),
            "platform": std::env::consts::OS,
            "language": "rust",
            "notifier": {
                "name": NOTIFIER_NAME,
                "version": crate::VERSION,
            },
            "body": self.body(),
            "custom": Value::Object(self.fields.clone()),
        });

        if let (Some(code_version), Some(obj)) = (&config.code_version, data.as_object_mut()) {
            obj.insert("code_version".to_string(), json!(code_version));
        }

        json!({
            "access_token": config.access_token,
            "data": data,
        })
    }

    fn body(&self) -> Value {
        match &self.error {
            Some(err) => json!({
                "trace": {
                    "frames": [],
                    "exception": {
                        "class": "Error",
                        "message": error_message(err),
                        "description": self.message,
                    },
                },
            }),
            None => json!({
                "message": { "body": self.message },
            }),
        }
    }
}

/// Display text of the error followed by its `source()` chain.
fn error_message(err: &SharedError) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        message.push_str(": ");
        message.push_str(&source.to_string());
        current = source.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn config() -> RollbarConfig {
        RollbarConfig::new("token-1", "production")
    }

    #[test]
    fn test_message_item_shape() {
        let mut fields = FieldMap::new();
        fields.insert("foo".to_string(), json!("bar"));

        let item = Item::new(RemoteSeverity::Warning, "disk almost full", &fields, None);
        let payload = item.to_json(&config());

        assert_eq!(payload["access_token"], "token-1");
        assert_eq!(payload["data"]["environment"], "production");
        assert_eq!(payload["data"]["level"], "warning");
        assert_eq!(payload["data"]["language"], "rust");
        assert_eq!(payload["data"]["body"]["message"]["body"], "disk almost full");
        assert_eq!(payload["data"]["custom"]["foo"], "bar");
        assert_eq!(payload["data"]["notifier"]["name"], NOTIFIER_NAME);
        assert!(payload["data"].get("code_version").is_none());
    }

    #[test]
    fn test_timestamp_is_submission_time_in_seconds() {
        let before = Utc::now().timestamp();
        let item = Item::new(RemoteSeverity::Info, "tick", &FieldMap::new(), None);
        let after = Utc::now().timestamp();

        let timestamp = item.to_json(&config())["data"]["timestamp"].as_i64().unwrap();
        assert!((before..=after).contains(&timestamp));
    }

    #[test]
    fn test_error_item_carries_trace() {
        let err: SharedError = Arc::new(std::io::Error::other("im a test error"));
        let item = Item::new(
            RemoteSeverity::Error,
            "ran into an error",
            &FieldMap::new(),
            Some(err),
        );
        let payload = item.to_json(&config());
        let exception = &payload["data"]["body"]["trace"]["exception"];

        assert_eq!(exception["class"], "Error");
        assert_eq!(exception["message"], "im a test error");
        assert_eq!(exception["description"], "ran into an error");
        assert_eq!(payload["data"]["body"]["trace"]["frames"], json!([]));
        assert!(payload["data"]["body"].get("message").is_none());
    }

    #[test]
    fn test_error_message_includes_source_chain() {
        #[derive(Debug)]
        struct Wrapped(std::io::Error);

        impl std::fmt::Display for Wrapped {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("flush failed")
            }
        }

        impl std::error::Error for Wrapped {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.0)
            }
        }

        let err: SharedError = Arc::new(Wrapped(std::io::Error::other("disk gone")));
        assert_eq!(error_message(&err), "flush failed: disk gone");
    }

    #[test]
    fn test_code_version_included_when_set() {
        let config = RollbarConfig {
            code_version: Some("3f2a9c1".to_string()),
            ..config()
        };
        let item = Item::new(RemoteSeverity::Critical, "boom", &FieldMap::new(), None);
        let payload = item.to_json(&config);

        assert_eq!(payload["data"]["code_version"], "3f2a9c1");
        assert_eq!(payload["data"]["level"], "critical");
    }
}
