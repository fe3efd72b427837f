use clap::Args;

/// Public Gotify settings the feed connects with. Both are safe to ship to a
/// client: the client token can only read messages.
#[derive(Clone, Debug, Default, Args)]
pub struct FeedConfig {
    /// The base URL of the Gotify server to stream notifications from
    #[arg(long = "gotify-url", env = "NEXT_PUBLIC_GOTIFY_URL")]
    pub gotify_url: Option<String>,

    /// The Gotify client token used to open the stream
    #[arg(
        long = "client-token",
        env = "NEXT_PUBLIC_GOTIFY_CLIENT_TOKEN",
        hide_env_values = true
    )]
    pub client_token: Option<String>,
}

impl FeedConfig {
    pub fn new(gotify_url: impl Into<String>, client_token: impl Into<String>) -> Self {
        Self {
            gotify_url: Some(gotify_url.into()),
            client_token: Some(client_token.into()),
        }
    }

    /// The stream URL to connect to, or `None` if either setting is missing
    /// or empty.
    pub fn stream_url(&self) -> Option<String> {
        let gotify_url = self.gotify_url.as_deref().filter(|v| !v.is_empty())?;
        let client_token = self.client_token.as_deref().filter(|v| !v.is_empty())?;

        Some(stream_url(gotify_url, client_token))
    }
}

/// Swaps a leading `http` for `ws` (so `https` becomes `wss`) and appends the
/// stream path. Other schemes are left as they are.
pub fn stream_url(gotify_url: &str, client_token: &str) -> String {
    let base = match gotify_url.strip_prefix("http") {
        Some(rest) => format!("ws{rest}"),
        None => gotify_url.to_string(),
    };

    format!(
        "{}/stream?token={}",
        base.trim_end_matches('/'),
        urlencoding::encode(client_token)
    )
}
