use crate::config::FeedConfig;
use crate::connection::{Connection, Connector};
use crate::message::{NotificationEvent, TransportEvent};
use crate::status::ConnectionStatus;
use log::*;
use tokio::sync::mpsc;

/// Status reason for a stream payload that is not a notification.
pub const MALFORMED_PAYLOAD: &str = "malformed payload";

/// What changed after applying one transport event.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedUpdate {
    Status(ConnectionStatus),
    Notification(NotificationEvent),
}

/// One client's view of the Gotify stream: a status line and the
/// notifications received so far, oldest first.
pub struct Feed<C: Connector> {
    connector: C,
    status: ConnectionStatus,
    notifications: Vec<NotificationEvent>,
    connection: Option<Box<dyn Connection>>,
    events: Option<mpsc::UnboundedReceiver<TransportEvent>>,
}

impl<C: Connector> Feed<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            status: ConnectionStatus::default(),
            notifications: Vec::new(),
            connection: None,
            events: None,
        }
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    pub fn notifications(&self) -> &[NotificationEvent] {
        &self.notifications
    }

    /// Opens the stream described by `config`.
    ///
    /// Without a Gotify URL and client token the feed moves to
    /// `ConfigurationError` and no connection is attempted. A feed that is
    /// mounted with a live connection keeps it; once the server has closed the
    /// stream, mounting again opens a new one.
    pub fn mount(&mut self, config: &FeedConfig) {
        if self.connection.is_some() {
            warn!("Feed is already mounted; keeping the open connection");
            return;
        }

        let Some(url) = config.stream_url() else {
            error!("Gotify configuration missing");
            self.status = ConnectionStatus::ConfigurationError;
            return;
        };

        debug!("Opening Gotify stream connection");
        let (tx, rx) = mpsc::unbounded_channel();
        self.connection = Some(self.connector.open(&url, tx));
        self.events = Some(rx);
    }

    /// Waits for the next transport event and applies it. Returns `None` once
    /// the connection has nothing more to report, or if the feed was never
    /// mounted.
    pub async fn next_update(&mut self) -> Option<FeedUpdate> {
        let event = self.events.as_mut()?.recv().await?;
        Some(self.handle_event(event))
    }

    pub fn handle_event(&mut self, event: TransportEvent) -> FeedUpdate {
        match event {
            TransportEvent::Opened => {
                info!("Gotify stream connection opened");
                self.set_status(ConnectionStatus::Connected)
            }
            TransportEvent::Message(payload) => {
                debug!("Received message: {payload}");
                match serde_json::from_str::<NotificationEvent>(&payload) {
                    Ok(notification) => {
                        self.notifications.push(notification.clone());
                        FeedUpdate::Notification(notification)
                    }
                    Err(e) => {
                        warn!("Dropping stream payload that is not a notification: {e}");
                        self.set_status(ConnectionStatus::Error(MALFORMED_PAYLOAD.to_string()))
                    }
                }
            }
            TransportEvent::Error(reason) => {
                error!("Gotify stream error: {reason}");
                self.set_status(ConnectionStatus::Error(reason))
            }
            TransportEvent::Closed { code, reason } => {
                info!("Gotify stream connection closed: {code} {reason}");
                // The socket is already gone; release the handle without closing it again.
                self.connection = None;
                self.set_status(ConnectionStatus::Disconnected)
            }
        }
    }

    /// Closes the connection if one is open. Safe to call any number of times.
    pub fn unmount(&mut self) {
        if let Some(connection) = self.connection.take() {
            info!("Closing Gotify stream connection");
            connection.close();
        }
    }

    fn set_status(&mut self, status: ConnectionStatus) -> FeedUpdate {
        self.status = status.clone();
        FeedUpdate::Status(status)
    }
}

impl<C: Connector> Drop for Feed<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::EventSender;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Records what the feed opens and closes, and lets tests play the
    /// server side of the connection.
    #[derive(Clone, Default)]
    struct MockConnector {
        opened: Arc<Mutex<Vec<String>>>,
        closes: Arc<AtomicUsize>,
        sender: Arc<Mutex<Option<EventSender>>>,
    }

    struct MockConnection {
        closes: Arc<AtomicUsize>,
    }

    impl Connection for MockConnection {
        fn close(self: Box<Self>) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Connector for MockConnector {
        fn open(&self, url: &str, events: EventSender) -> Box<dyn Connection> {
            self.opened.lock().unwrap().push(url.to_string());
            *self.sender.lock().unwrap() = Some(events);
            Box::new(MockConnection {
                closes: Arc::clone(&self.closes),
            })
        }
    }

    impl MockConnector {
        fn emit(&self, event: TransportEvent) {
            self.sender
                .lock()
                .unwrap()
                .as_ref()
                .expect("feed was not mounted")
                .send(event)
                .unwrap();
        }

        fn hang_up(&self) {
            self.sender.lock().unwrap().take();
        }

        fn opened(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }

        fn closes(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }
    }

    fn mounted_feed() -> (Feed<MockConnector>, MockConnector) {
        let connector = MockConnector::default();
        let mut feed = Feed::new(connector.clone());
        feed.mount(&FeedConfig::new("https://push.example.com", "Ctoken"));
        (feed, connector)
    }

    fn notification(id: u64) -> String {
        format!(
            r#"{{"id":{id},"appid":1,"message":"message {id}","title":"title {id}","priority":5,"date":"2024-05-01T12:00:00Z"}}"#
        )
    }

    #[test]
    fn test_mount_without_config_is_configuration_error() {
        let configs = [
            FeedConfig::default(),
            FeedConfig {
                gotify_url: Some("https://push.example.com".to_string()),
                client_token: None,
            },
            FeedConfig {
                gotify_url: None,
                client_token: Some("Ctoken".to_string()),
            },
        ];

        for config in configs {
            let connector = MockConnector::default();
            let mut feed = Feed::new(connector.clone());
            feed.mount(&config);

            assert_eq!(feed.status(), &ConnectionStatus::ConfigurationError);
            assert!(connector.opened().is_empty());
        }
    }

    #[test]
    fn test_mount_opens_derived_stream_url() {
        let (_feed, connector) = mounted_feed();
        assert_eq!(
            connector.opened(),
            vec!["wss://push.example.com/stream?token=Ctoken".to_string()]
        );
    }

    #[test]
    fn test_status_is_disconnected_until_open() {
        let (feed, _connector) = mounted_feed();
        assert_eq!(feed.status(), &ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_second_mount_keeps_single_connection() {
        let (mut feed, connector) = mounted_feed();
        feed.mount(&FeedConfig::new("https://other.example.com", "Cother"));

        assert_eq!(connector.opened().len(), 1);
    }

    #[tokio::test]
    async fn test_open_transitions_to_connected() {
        let (mut feed, connector) = mounted_feed();
        connector.emit(TransportEvent::Opened);

        assert_eq!(
            feed.next_update().await,
            Some(FeedUpdate::Status(ConnectionStatus::Connected))
        );
        assert_eq!(feed.status().to_string(), "Connected");
    }

    #[tokio::test]
    async fn test_messages_are_appended_in_arrival_order() {
        let (mut feed, connector) = mounted_feed();
        connector.emit(TransportEvent::Opened);
        let ids = [7, 3, 12, 4, 9];
        for id in ids {
            connector.emit(TransportEvent::Message(notification(id)));
        }
        connector.hang_up();

        while feed.next_update().await.is_some() {}

        let received: Vec<u64> = feed.notifications().iter().map(|n| n.id).collect();
        assert_eq!(received, ids);
        assert_eq!(feed.notifications()[2].message, "message 12");
        assert_eq!(feed.status(), &ConnectionStatus::Connected);
    }

    #[tokio::test]
    async fn test_error_event_sets_error_status_without_closing() {
        let (mut feed, connector) = mounted_feed();
        connector.emit(TransportEvent::Opened);
        connector.emit(TransportEvent::Error("io".to_string()));

        feed.next_update().await;
        feed.next_update().await;

        assert_eq!(feed.status().to_string(), "Error: io");
        assert_eq!(connector.closes(), 0);
    }

    #[tokio::test]
    async fn test_close_event_transitions_to_disconnected() {
        let (mut feed, connector) = mounted_feed();
        connector.emit(TransportEvent::Opened);
        connector.emit(TransportEvent::Message(notification(1)));
        connector.emit(TransportEvent::Closed {
            code: 1001,
            reason: "going away".to_string(),
        });
        connector.hang_up();

        while feed.next_update().await.is_some() {}

        assert_eq!(feed.status(), &ConnectionStatus::Disconnected);
        assert_eq!(feed.notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_mount_after_server_close_opens_new_connection() {
        let (mut feed, connector) = mounted_feed();
        connector.emit(TransportEvent::Opened);
        connector.emit(TransportEvent::Closed {
            code: 1001,
            reason: "going away".to_string(),
        });
        feed.next_update().await;
        feed.next_update().await;
        assert_eq!(feed.status(), &ConnectionStatus::Disconnected);

        feed.mount(&FeedConfig::new("https://push.example.com", "Ctoken"));
        connector.emit(TransportEvent::Opened);

        assert_eq!(connector.opened().len(), 2);
        assert_eq!(
            feed.next_update().await,
            Some(FeedUpdate::Status(ConnectionStatus::Connected))
        );

        feed.unmount();
        drop(feed);
        assert_eq!(connector.closes(), 1);
    }

    #[test]
    fn test_close_event_releases_connection_without_closing_it() {
        let (mut feed, connector) = mounted_feed();
        feed.handle_event(TransportEvent::Opened);
        feed.handle_event(TransportEvent::Closed {
            code: 1006,
            reason: String::new(),
        });
        feed.unmount();
        drop(feed);

        assert_eq!(connector.closes(), 0);
    }

    #[test]
    fn test_malformed_payload_is_dropped_with_error_status() {
        let (mut feed, _connector) = mounted_feed();
        feed.handle_event(TransportEvent::Opened);
        feed.handle_event(TransportEvent::Message(notification(1)));

        for payload in ["not json", r#"{"title":"no id"}"#, "[]"] {
            let update = feed.handle_event(TransportEvent::Message(payload.to_string()));
            assert_eq!(
                update,
                FeedUpdate::Status(ConnectionStatus::Error(MALFORMED_PAYLOAD.to_string()))
            );
        }

        assert_eq!(feed.notifications().len(), 1);
        assert_eq!(feed.status().to_string(), "Error: malformed payload");
    }

    #[test]
    fn test_unmount_immediately_after_mount_closes_once() {
        let (mut feed, connector) = mounted_feed();
        feed.unmount();
        feed.unmount();
        drop(feed);

        assert_eq!(connector.closes(), 1);
    }

    #[test]
    fn test_drop_closes_open_connection_once() {
        let (mut feed, connector) = mounted_feed();
        feed.handle_event(TransportEvent::Opened);
        drop(feed);

        assert_eq!(connector.closes(), 1);
    }

    #[test]
    fn test_unmount_without_connection_closes_nothing() {
        let connector = MockConnector::default();
        let mut feed = Feed::new(connector.clone());
        feed.mount(&FeedConfig::default());
        feed.unmount();

        assert_eq!(connector.closes(), 0);
    }

    #[tokio::test]
    async fn test_next_update_before_mount_is_none() {
        let mut feed = Feed::new(MockConnector::default());
        assert_eq!(feed.next_update().await, None);
    }
}
