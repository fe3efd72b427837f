//! Live notification feed over Gotify's WebSocket stream.
//!
//! A [`Feed`] opens one connection to `<gotify>/stream?token=<client token>`,
//! turns each inbound frame into a [`NotificationEvent`] and appends it to an
//! in-memory list, and tracks the connection lifecycle as a
//! [`ConnectionStatus`].
//!
//! # Lifecycle
//!
//! 1. `Feed::mount` reads the public Gotify settings. If either is missing the
//!    feed moves to `ConfigurationError` and never connects.
//! 2. Otherwise one connection is opened through a [`Connector`]. The
//!    connector's task reports what happens on the socket as
//!    [`TransportEvent`]s over a channel.
//! 3. `Feed::next_update` applies those events in arrival order:
//!    - `Opened` -> `Connected`
//!    - `Message` -> appended to the list (a payload that is not a
//!      notification moves the status to `Error: malformed payload` and is
//!      dropped)
//!    - `Error` -> `Error: <category>`, the socket is left to close itself
//!    - `Closed` -> `Disconnected`
//! 4. `Feed::unmount` (or dropping the feed) closes the connection. The handle
//!    is consumed on close so a feed can never close the same socket twice.
//!
//! There is no reconnection, backoff or heartbeat, and the feed never sends.
//!
//! # Modules
//!
//! - `config`: public Gotify settings and stream URL derivation
//! - `connection`: `Connector`/`Connection` seam and the WebSocket implementation
//! - `feed`: the `Feed` state machine
//! - `message`: inbound notification and transport event types
//! - `status`: `ConnectionStatus`

pub mod config;
pub mod connection;
pub mod feed;
pub mod message;
pub mod status;

pub use config::FeedConfig;
pub use connection::{Connection, Connector, WebSocketConnector};
pub use feed::{Feed, FeedUpdate};
pub use message::{NotificationEvent, TransportEvent};
pub use status::ConnectionStatus;
