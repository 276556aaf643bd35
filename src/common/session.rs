use super::messages::ServerMessage;

use std::net::SocketAddr;
use tokio::sync::mpsc;
use tracing::trace;

/// Stable per-connection identity: the peer's socket address.
pub type SessionId = SocketAddr;

/// Items queued for a session's writer task.
#[derive(Debug)]
pub enum SessionMessage {
    Deliver(ServerMessage),
    /// Flush what is queued, then shut the connection down.
    Close,
}

/// Fire-and-forget send capability for one connected session.
///
/// Sending only enqueues onto the session's outbound queue, so callers never wait on
/// the remote peer. If the writer task is already gone the line is dropped.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    outbound_tx: mpsc::UnboundedSender<SessionMessage>,
}

impl SessionHandle {
    pub fn new(id: SessionId) -> (Self, mpsc::UnboundedReceiver<SessionMessage>) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        (Self { id, outbound_tx }, outbound_rx)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn send(&self, message: ServerMessage) {
        self.enqueue(SessionMessage::Deliver(message));
    }

    /// Sends `"> " + text`.
    pub fn msg(&self, text: impl Into<String>) {
        self.send(ServerMessage::message(text));
    }

    /// Sends `"[ERROR]: " + text`.
    pub fn err(&self, text: impl Into<String>) {
        self.send(ServerMessage::error(text));
    }

    pub fn close(&self) {
        self.enqueue(SessionMessage::Close);
    }

    fn enqueue(&self, message: SessionMessage) {
        if let Err(e) = self.outbound_tx.send(message) {
            trace!("Writer for {} is gone, dropping {:?}", self.id, e.0);
        }
    }
}
