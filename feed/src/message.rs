use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;

/// One notification as delivered on Gotify's `/stream` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NotificationEvent {
    /// Assigned by the Gotify server, increasing.
    pub id: u64,
    pub message: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub priority: i64,
    pub date: DateTime<FixedOffset>,
    #[serde(default)]
    pub appid: Option<u64>,
    #[serde(default)]
    pub extras: Option<Value>,
}

/// What a connection reports about its socket, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    /// A text frame, not yet parsed.
    Message(String),
    /// A transport failure, by category (e.g. `io`, `protocol`, `http`).
    Error(String),
    Closed { code: u16, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_gotify_stream_message() {
        let payload = r#"{
            "id": 25,
            "appid": 5,
            "message": "Backup finished",
            "title": "Nightly backup",
            "priority": 5,
            "extras": {"client::display": {"contentType": "text/plain"}},
            "date": "2018-02-27T19:36:10.5045044+01:00"
        }"#;

        let event: NotificationEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.id, 25);
        assert_eq!(event.appid, Some(5));
        assert_eq!(event.title, "Nightly backup");
        assert_eq!(event.message, "Backup finished");
        assert_eq!(event.priority, 5);
        assert_eq!(event.date.offset().local_minus_utc(), 3600);
        assert!(event.extras.is_some());
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let payload = r#"{"id":1,"message":"M","date":"2024-01-01T00:00:00Z"}"#;

        let event: NotificationEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.title, "");
        assert_eq!(event.priority, 0);
        assert_eq!(event.appid, None);
    }

    #[test]
    fn test_deserialize_rejects_missing_id() {
        let payload = r#"{"message":"M","date":"2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<NotificationEvent>(payload).is_err());
    }
}
