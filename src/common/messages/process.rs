use crate::common::{ClientCommand, SessionHandle, SessionId};

/// Items on the coordinator's command queue.
#[derive(Debug)]
pub enum ProcessMessage {
    /// A session was accepted; registers its send handle.
    Connect(SessionHandle),
    Client {
        from: SessionId,
        command: ClientCommand,
    },
    /// The session's read loop ended without `/quit`.
    Disconnect(SessionId),
    /// Close every session and stop processing.
    Shutdown,
}
