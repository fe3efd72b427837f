use crate::error::Error;
use crate::gateway::gotify::{CreateMessageRequest, GotifyClient};
use log::*;
use serde_json::Value;
use service::config::Config;

/// Priority every relayed notification is created with.
pub const NOTIFICATION_PRIORITY: i64 = 5;

/// A notification as entered by a user. Either field may be absent, and a
/// present field is forwarded as-is whatever its JSON type; Gotify decides
/// what it accepts.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NotificationRequest {
    pub title: Option<Value>,
    pub message: Option<Value>,
}

/// Relay one notification to Gotify.
///
/// Makes exactly one outbound call when both Gotify settings are configured
/// and none otherwise. No retries.
pub async fn send(config: &Config, request: NotificationRequest) -> Result<(), Error> {
    let client = GotifyClient::new(config)?;

    let message = CreateMessageRequest {
        message: request.message,
        title: request.title,
        priority: NOTIFICATION_PRIORITY,
    };

    client.create_message(&message).await.map_err(|err| {
        error!("Error sending notification: {err:?}");
        err
    })
}
