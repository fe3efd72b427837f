use std::fmt;

/// Where a feed's stream connection currently stands. Only drives what the
/// status line says; nothing else branches on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected,
    /// The transport reported an error of the given category.
    Error(String),
    /// The Gotify URL or client token is missing. Terminal for a mount.
    ConfigurationError,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
            ConnectionStatus::Connected => write!(f, "Connected"),
            ConnectionStatus::Error(reason) => write!(f, "Error: {reason}"),
            ConnectionStatus::ConfigurationError => write!(f, "Configuration Error"),
        }
    }
}
