use super::messages::ServerMessage;
use super::{SessionHandle, SessionId};

use std::collections::HashMap;
use std::fmt::Display;
use tracing::trace;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RoomName {
    room_name: String,
}

impl RoomName {
    pub fn new(room_name: impl Into<String>) -> Self {
        Self {
            room_name: room_name.into(),
        }
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }
}

impl Display for RoomName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.room_name)
    }
}

impl PartialEq<&str> for RoomName {
    fn eq(&self, other: &&str) -> bool {
        self.room_name == *other
    }
}

impl PartialEq<String> for RoomName {
    fn eq(&self, other: &String) -> bool {
        self.room_name == *other
    }
}

impl From<String> for RoomName {
    fn from(name: String) -> Self {
        Self { room_name: name }
    }
}

impl From<&str> for RoomName {
    fn from(name: &str) -> Self {
        Self {
            room_name: name.to_string(),
        }
    }
}

/// A named set of sessions. Rooms are created on first join and are never removed,
/// even once empty.
#[derive(Debug)]
pub struct Room {
    room_name: RoomName,
    members: HashMap<SessionId, SessionHandle>,
}

impl Room {
    pub fn new(room_name: impl Into<RoomName>) -> Self {
        Self {
            room_name: room_name.into(),
            members: HashMap::new(),
        }
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.members.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns `false` if the session was already a member.
    pub fn add_member(&mut self, member: SessionHandle) -> bool {
        self.members.insert(member.id(), member).is_none()
    }

    pub fn remove_member(&mut self, id: &SessionId) -> Option<SessionHandle> {
        self.members.remove(id)
    }

    /// Queue `text` for every member except `sender`. Returns how many members it was
    /// queued for.
    pub fn broadcast(&self, sender: SessionId, text: &str) -> usize {
        let message = ServerMessage::message(text);
        let mut delivered = 0;
        for (id, member) in &self.members {
            if *id == sender {
                continue;
            }
            member.send(message.clone());
            delivered += 1;
        }
        trace!(
            "Broadcast to {} member(s) of {}: {}",
            delivered,
            self.room_name,
            text
        );
        delivered
    }
}
