use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The base URL of the Gotify server that notifications are relayed to
    /// (e.g. https://push.example.com).
    #[arg(long, env)]
    gotify_url: Option<String>,

    /// The Gotify application token sent in the `X-Gotify-Key` header.
    #[arg(long, env, hide_env_values = true)]
    gotify_app_token: Option<String>,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: String,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn set_gotify_url(mut self, gotify_url: Option<String>) -> Self {
        self.gotify_url = gotify_url;
        self
    }

    pub fn set_gotify_app_token(mut self, gotify_app_token: Option<String>) -> Self {
        self.gotify_app_token = gotify_app_token;
        self
    }

    /// Returns the Gotify server base URL, if configured and non-empty.
    pub fn gotify_url(&self) -> Option<String> {
        non_empty(&self.gotify_url)
    }

    /// Returns the Gotify application token, if configured and non-empty.
    pub fn gotify_app_token(&self) -> Option<String> {
        non_empty(&self.gotify_app_token)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
