use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use feed::{ConnectionStatus, Feed, FeedConfig, FeedUpdate, WebSocketConnector};

mod api_client;
mod output;

use api_client::RelayClient;
use output::{print_notification, print_status};

#[derive(Parser)]
#[command(name = "demo-client")]
#[command(about = "Send notifications through the relay and watch them arrive from Gotify")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Send one notification through the relay
    Send {
        /// Base URL of the relay (e.g., http://localhost:4000)
        #[arg(long, env, default_value = "http://localhost:4000")]
        relay_url: String,

        /// Notification title
        #[arg(long, default_value = "")]
        title: String,

        /// Notification message
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Stream notifications from Gotify until interrupted
    Listen {
        #[command(flatten)]
        config: FeedConfig,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    match cli.command {
        Command::Send {
            relay_url,
            title,
            message,
        } => send(relay_url, &title, &message).await,
        Command::Listen { config } => listen(config).await,
    }
}

async fn send(relay_url: String, title: &str, message: &str) -> Result<()> {
    println!("{} Sending notification...", "→".blue());

    let relay = RelayClient::new(reqwest::Client::new(), relay_url);
    relay.send_notification(title, message).await?;

    println!("{} Notification sent", "✓".green());
    Ok(())
}

async fn listen(config: FeedConfig) -> Result<()> {
    let mut feed = Feed::new(WebSocketConnector);
    feed.mount(&config);
    print_status(feed.status());

    if *feed.status() == ConnectionStatus::ConfigurationError {
        anyhow::bail!(
            "NEXT_PUBLIC_GOTIFY_URL and NEXT_PUBLIC_GOTIFY_CLIENT_TOKEN must both be set"
        );
    }

    println!("\n{}", "=== RECEIVED NOTIFICATIONS ===".bright_white().bold());

    loop {
        tokio::select! {
            update = feed.next_update() => match update {
                Some(FeedUpdate::Status(status)) => print_status(&status),
                Some(FeedUpdate::Notification(notification)) => print_notification(&notification),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!("\n{} Interrupted", "→".blue());
                break;
            }
        }
    }

    feed.unmount();

    println!(
        "\n{} {} notification(s) received",
        "✓".green(),
        feed.notifications().len()
    );
    Ok(())
}
