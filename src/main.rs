use log::{error, info};
use service::{config::Config, logging::Logger, AppState};

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
    }

    info!("Starting up Gotify relay...");
    match (config.gotify_url(), config.gotify_app_token()) {
        (Some(url), Some(_)) => info!("Relaying notifications to Gotify at {url}"),
        _ => error!(
            "GOTIFY_URL or GOTIFY_APP_TOKEN is not set; every notification will fail until both are configured"
        ),
    }

    let app_state = AppState::new(config);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server exited with error: {e}");
        std::process::exit(1);
    }
}
