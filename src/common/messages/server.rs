use crate::connection::LineFrame;

use std::fmt::{self, Display, Formatter};

pub const MESSAGE_PREFIX: &str = "> ";
pub const ERROR_PREFIX: &str = "[ERROR]: ";

/// A line sent from the server to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    Message(String),
    Error(String),
}

// Builder methods
impl ServerMessage {
    pub fn message(content: impl Into<String>) -> Self {
        Self::Message(content.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Recognise a line written by the server. Used by the client to pick colours.
    pub fn from_line(line: &str) -> Option<Self> {
        if let Some(content) = line.strip_prefix(ERROR_PREFIX) {
            Some(Self::error(content))
        } else {
            line.strip_prefix(MESSAGE_PREFIX).map(Self::message)
        }
    }
}

impl LineFrame for ServerMessage {}

impl Display for ServerMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Message(content) => write!(f, "{}{}", MESSAGE_PREFIX, content),
            ServerMessage::Error(message) => write!(f, "{}{}", ERROR_PREFIX, message),
        }
    }
}
