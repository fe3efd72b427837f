use crate::message::TransportEvent;
use futures_util::StreamExt;
use log::*;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

pub type EventSender = mpsc::UnboundedSender<TransportEvent>;

/// Close code reported when the socket went away without a close frame.
pub const CLOSE_ABNORMAL: u16 = 1006;
/// Close code reported when the peer's close frame carried no status.
pub const CLOSE_NO_STATUS: u16 = 1005;
/// Close code reported when we closed the socket ourselves.
pub const CLOSE_NORMAL: u16 = 1000;

/// A live stream connection owned by one feed.
pub trait Connection: Send {
    /// Close the connection. Takes the handle by value so it can only happen once.
    fn close(self: Box<Self>);
}

/// Opens stream connections.
///
/// Opening never fails up front. A connection that cannot be established
/// reports an `Error` event followed by `Closed`, the same as one that fails
/// later.
pub trait Connector {
    fn open(&self, url: &str, events: EventSender) -> Box<dyn Connection>;
}

/// Connects with `tokio-tungstenite`; one spawned task per connection.
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl Connector for WebSocketConnector {
    fn open(&self, url: &str, events: EventSender) -> Box<dyn Connection> {
        let (close_tx, close_rx) = oneshot::channel();
        let handle = tokio::spawn(run(url.to_string(), events, close_rx));

        Box::new(WebSocketConnection {
            close_tx,
            _handle: handle,
        })
    }
}

struct WebSocketConnection {
    close_tx: oneshot::Sender<()>,
    _handle: JoinHandle<()>,
}

impl Connection for WebSocketConnection {
    fn close(self: Box<Self>) {
        // The task may already be gone if the server closed first.
        if self.close_tx.send(()).is_err() {
            debug!("Stream task already finished");
        }
    }
}

async fn run(url: String, events: EventSender, mut close_rx: oneshot::Receiver<()>) {
    let connected = tokio::select! {
        result = tokio_tungstenite::connect_async(url.as_str()) => result,
        _ = &mut close_rx => {
            debug!("Stream closed before it opened");
            emit(&events, closed(CLOSE_ABNORMAL, ""));
            return;
        }
    };

    let mut ws = match connected {
        Ok((ws, _response)) => ws,
        Err(e) => {
            warn!("Failed to open Gotify stream: {e}");
            emit(&events, TransportEvent::Error(error_category(&e).to_string()));
            emit(&events, closed(CLOSE_ABNORMAL, ""));
            return;
        }
    };
    emit(&events, TransportEvent::Opened);

    loop {
        tokio::select! {
            _ = &mut close_rx => {
                if let Err(e) = ws.close(None).await {
                    debug!("Error while closing Gotify stream: {e}");
                }
                emit(&events, closed(CLOSE_NORMAL, ""));
                return;
            }
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    emit(&events, TransportEvent::Message(text.as_str().to_owned()));
                }
                Some(Ok(Message::Binary(bytes))) => {
                    emit(
                        &events,
                        TransportEvent::Message(String::from_utf8_lossy(&bytes).into_owned()),
                    );
                }
                Some(Ok(Message::Close(frame))) => {
                    let event = match frame {
                        Some(frame) => closed(u16::from(frame.code), &frame.reason),
                        None => closed(CLOSE_NO_STATUS, ""),
                    };
                    emit(&events, event);
                    return;
                }
                // Ping/pong are answered by tungstenite itself
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Gotify stream failed: {e}");
                    emit(&events, TransportEvent::Error(error_category(&e).to_string()));
                    emit(&events, closed(CLOSE_ABNORMAL, ""));
                    return;
                }
                None => {
                    emit(&events, closed(CLOSE_ABNORMAL, ""));
                    return;
                }
            }
        }
    }
}

fn emit(events: &EventSender, event: TransportEvent) {
    if events.send(event).is_err() {
        trace!("Feed dropped; discarding stream event");
    }
}

fn closed(code: u16, reason: &str) -> TransportEvent {
    TransportEvent::Closed {
        code,
        reason: reason.to_string(),
    }
}

/// Short category name for a transport failure, shown as `Error: <category>`.
pub(crate) fn error_category(err: &WsError) -> &'static str {
    match err {
        WsError::ConnectionClosed | WsError::AlreadyClosed => "closed",
        WsError::Io(_) => "io",
        WsError::Protocol(_) => "protocol",
        WsError::Url(_) => "url",
        WsError::Http(_) => "http",
        _ => "error",
    }
}
