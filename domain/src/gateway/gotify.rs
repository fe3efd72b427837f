use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use log::*;
use serde::Serialize;
use serde_json::Value;
use service::config::Config;

/// Header Gotify reads the application token from (`X-Gotify-Key`).
pub const GOTIFY_KEY_HEADER: &str = "x-gotify-key";

/// Gotify REST API client for creating messages as one application.
pub struct GotifyClient {
    client: reqwest::Client,
    base_url: String,
}

/// Request payload for Gotify's `POST /message`.
/// Absent fields are left out of the JSON body entirely.
#[derive(Debug, PartialEq, Serialize)]
pub struct CreateMessageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    pub priority: i64,
}

impl GotifyClient {
    /// Create a new Gotify client authenticated with the configured app token.
    /// Fails with a config error, before any network activity, if the server
    /// URL or the app token is missing.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let base_url = config.gotify_url().ok_or_else(|| {
            warn!("Failed to get Gotify URL from config");
            Error::config()
        })?;
        let client = build_client(config)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Submit one message. Any non-2xx status is an error; the response body
    /// is logged and dropped.
    pub async fn create_message(&self, request: &CreateMessageRequest) -> Result<(), Error> {
        let url = format!("{}/message", self.base_url);
        debug!("Creating Gotify message: {url}");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Gotify: {e:?}");
                Error::from(e)
            })?;

        let status = response.status();
        if status.is_success() {
            info!("Gotify accepted message with priority {}", request.priority);
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Gotify rejected message: {status} - {error_text}");
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(format!(
                    "Gotify responded with {status}"
                ))),
            })
        }
    }
}

fn build_client(config: &Config) -> Result<reqwest::Client, Error> {
    let headers = build_auth_headers(config)?;

    Ok(reqwest::Client::builder()
        .use_rustls_tls()
        .default_headers(headers)
        .build()?)
}

fn build_auth_headers(config: &Config) -> Result<reqwest::header::HeaderMap, Error> {
    let app_token = config.gotify_app_token().ok_or_else(|| {
        warn!("Failed to get Gotify app token from config");
        Error::config()
    })?;

    let mut headers = reqwest::header::HeaderMap::new();
    let mut token_value = reqwest::header::HeaderValue::from_str(&app_token).map_err(|err| {
        warn!("Failed to create Gotify key header value: {err:?}");
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "Invalid Gotify app token".to_string(),
            )),
        }
    })?;
    token_value.set_sensitive(true);
    headers.insert(
        reqwest::header::HeaderName::from_static(GOTIFY_KEY_HEADER),
        token_value,
    );
    Ok(headers)
}
