use anyhow::{Context, Result};
use log::*;
use reqwest::Client;
use serde_json::{json, Value};

/// Talks to the relay the way the demo page's form does.
pub struct RelayClient {
    client: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub async fn send_notification(&self, title: &str, message: &str) -> Result<()> {
        let url = format!(
            "{}/api/send-notification",
            self.base_url.trim_end_matches('/')
        );
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "message": message,
                "title": title,
            }))
            .send()
            .await
            .context("Failed to reach the relay")?;

        if !response.status().is_success() {
            let status = response.status();
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let error = body["error"].as_str().unwrap_or("no error message");
            anyhow::bail!("Relay returned {status}: {error}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_send_notification_posts_form_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/send-notification")
            .match_body(Matcher::Json(json!({"message": "M", "title": "T"})))
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .expect(1)
            .create_async()
            .await;

        let relay = RelayClient::new(Client::new(), format!("{}/", server.url()));
        relay.send_notification("T", "M").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_notification_surfaces_relay_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/send-notification")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Gotify configuration missing"}"#)
            .create_async()
            .await;

        let relay = RelayClient::new(Client::new(), server.url());
        let err = relay.send_notification("T", "M").await.unwrap_err();

        assert!(err.to_string().contains("Gotify configuration missing"));
        assert!(err.to_string().contains("500"));
    }
}
