use colored::*;
use feed::{ConnectionStatus, NotificationEvent};

pub fn print_status(status: &ConnectionStatus) {
    let text = status.to_string();
    let colored_text = match status {
        ConnectionStatus::Connected => text.green(),
        ConnectionStatus::Disconnected => text.yellow(),
        ConnectionStatus::Error(_) | ConnectionStatus::ConfigurationError => text.red(),
    };

    println!("{} {}", "Connection Status:".bold(), colored_text.bold());
}

pub fn print_notification(notification: &NotificationEvent) {
    println!(
        "\n[{}] {} {}",
        notification.id.to_string().bright_blue(),
        notification.title.bold(),
        format!("(priority {})", notification.priority).dimmed()
    );
    println!("   {}", notification.message);
    println!("   {}", notification.date.to_rfc3339().dimmed());
}
