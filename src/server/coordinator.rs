use crate::common::{
    ClientCommand, ProcessMessage, Room, RoomName, SessionHandle, SessionId, UserName,
};

use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

const FAREWELL: &str = "leaving so soon? have a great one, and see you back here soon!";
const SHUTDOWN_NOTICE: &str = "server shutting down";

/// What the coordinator knows about one connected session. Only the coordinator
/// reads or writes it.
#[derive(Debug)]
struct SessionState {
    handle: SessionHandle,
    nickname: UserName,
    /// Key into the room registry, never an owned room.
    room: Option<RoomName>,
}

/// Serialised command processor. Owns the room registry and every session's
/// nickname and room, and applies one [`ProcessMessage`] at a time, so nothing it
/// owns needs a lock.
pub struct Coordinator {
    command_rx: mpsc::UnboundedReceiver<ProcessMessage>,
    rooms: HashMap<RoomName, Room>,
    sessions: HashMap<SessionId, SessionState>,
}

impl Coordinator {
    pub fn new() -> (Self, mpsc::UnboundedSender<ProcessMessage>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        (
            Self {
                command_rx,
                rooms: HashMap::new(),
                sessions: HashMap::new(),
            },
            command_tx,
        )
    }

    #[instrument(skip_all, level = "debug")]
    pub async fn run(mut self) {
        while let Some(message) = self.command_rx.recv().await {
            if !self.process(message) {
                break;
            }
        }
        info!("Coordinator stopped");
    }

    /// Apply a single message. Returns `false` once the coordinator should stop.
    pub fn process(&mut self, message: ProcessMessage) -> bool {
        match message {
            ProcessMessage::Connect(handle) => self.connect(handle),
            ProcessMessage::Client { from, command } => match command {
                ClientCommand::SetNick(nickname) => self.set_nick(from, nickname),
                ClientCommand::Join(room_name) => self.join(from, room_name),
                ClientCommand::ListRooms => self.list_rooms(from),
                ClientCommand::Message(content) => self.message(from, content),
                ClientCommand::Quit => self.quit(from),
            },
            ProcessMessage::Disconnect(from) => self.disconnect(from),
            ProcessMessage::Shutdown => {
                self.shutdown();
                return false;
            }
        }
        true
    }

    fn connect(&mut self, handle: SessionHandle) {
        let id = handle.id();
        let state = SessionState {
            handle,
            nickname: UserName::default(),
            room: None,
        };
        info!("{}:{} connected", state.nickname, id);
        if self.sessions.insert(id, state).is_some() {
            warn!("Session {} connected twice, replacing the old state", id);
        }
    }

    fn set_nick(&mut self, id: SessionId, nickname: UserName) {
        let Some(state) = self.sessions.get_mut(&id) else {
            debug!("Ignoring /nick from unknown session {}", id);
            return;
        };
        info!("{}:{} is now known as {}", state.nickname, id, nickname);
        state.nickname = nickname;
        state
            .handle
            .msg(format!("all right, I'm going to call you {}", state.nickname));
    }

    fn join(&mut self, id: SessionId, room_name: RoomName) {
        let Some(state) = self.sessions.get_mut(&id) else {
            debug!("Ignoring /join from unknown session {}", id);
            return;
        };

        if state.room.as_ref() == Some(&room_name) {
            debug!("{}:{} is already in {}", state.nickname, id, room_name);
            state.handle.msg(format!("welcome to {}", room_name));
            return;
        }

        if let Some(previous) = state.room.take() {
            Self::leave_room(&mut self.rooms, id, &state.nickname, &previous);
        }

        let room = self.rooms.entry(room_name.clone()).or_insert_with(|| {
            info!("Room {} created", room_name);
            Room::new(room_name.clone())
        });
        room.add_member(state.handle.clone());
        room.broadcast(id, &format!("{} has joined the room", state.nickname));
        info!("{}:{} has joined {}", state.nickname, id, room_name);

        state.handle.msg(format!("welcome to {}", room_name));
        state.room = Some(room_name);
    }

    fn list_rooms(&mut self, id: SessionId) {
        let Some(state) = self.sessions.get(&id) else {
            debug!("Ignoring /rooms from unknown session {}", id);
            return;
        };
        let rooms = self
            .rooms
            .keys()
            .map(RoomName::room_name)
            .collect::<Vec<_>>()
            .join(", ");
        state
            .handle
            .msg(format!("available rooms are: [{}]", rooms));
    }

    fn message(&mut self, id: SessionId, content: String) {
        let Some(state) = self.sessions.get(&id) else {
            debug!("Ignoring /msg from unknown session {}", id);
            return;
        };
        let Some(room_name) = &state.room else {
            debug!("{}:{} sent a message outside of any room", state.nickname, id);
            return;
        };
        match self.rooms.get(room_name) {
            Some(room) => {
                room.broadcast(id, &format!("{}: {}", state.nickname, content));
            }
            None => warn!("Session {} points at missing room {}", id, room_name),
        }
    }

    fn quit(&mut self, id: SessionId) {
        let Some(state) = self.remove_session(id) else {
            debug!("Ignoring /quit from unknown session {}", id);
            return;
        };
        info!(
            "Client {} has disconnected from the server, closing connection",
            id
        );
        state.handle.msg(FAREWELL);
        state.handle.close();
    }

    fn disconnect(&mut self, id: SessionId) {
        // Already gone after an explicit /quit.
        let Some(state) = self.remove_session(id) else {
            return;
        };
        info!("Client {} dropped its connection", id);
        state.handle.close();
    }

    fn shutdown(&mut self) {
        info!("Closing {} session(s)", self.sessions.len());
        for (_, state) in self.sessions.drain() {
            state.handle.err(SHUTDOWN_NOTICE);
            state.handle.close();
        }
        self.command_rx.close();
    }

    /// Drop a session's state, running the room-leave sequence first.
    fn remove_session(&mut self, id: SessionId) -> Option<SessionState> {
        let mut state = self.sessions.remove(&id)?;
        if let Some(room_name) = state.room.take() {
            Self::leave_room(&mut self.rooms, id, &state.nickname, &room_name);
        }
        Some(state)
    }

    fn leave_room(
        rooms: &mut HashMap<RoomName, Room>,
        id: SessionId,
        nickname: &UserName,
        room_name: &RoomName,
    ) {
        let Some(room) = rooms.get_mut(room_name) else {
            warn!("Session {} points at missing room {}", id, room_name);
            return;
        };
        room.remove_member(&id);
        room.broadcast(id, &format!("{} has left the room", nickname));
        info!("{}:{} has left {}", nickname, id, room_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ServerMessage, SessionMessage};

    use std::collections::HashSet;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct Peer {
        id: SessionId,
        rx: UnboundedReceiver<SessionMessage>,
    }

    impl Peer {
        fn connect(coordinator: &mut Coordinator, port: u16) -> Self {
            let (handle, rx) = SessionHandle::new(SessionId::from(([127, 0, 0, 1], port)));
            let id = handle.id();
            coordinator.process(ProcessMessage::Connect(handle));
            Self { id, rx }
        }

        fn send(&self, coordinator: &mut Coordinator, command: ClientCommand) {
            coordinator.process(ProcessMessage::Client {
                from: self.id,
                command,
            });
        }

        /// Everything queued so far, `Close` rendered as `<close>`.
        fn drain(&mut self) -> Vec<String> {
            let mut lines = Vec::new();
            while let Ok(message) = self.rx.try_recv() {
                lines.push(match message {
                    SessionMessage::Deliver(message) => message.to_string(),
                    SessionMessage::Close => "<close>".to_string(),
                });
            }
            lines
        }
    }

    fn memberships(coordinator: &Coordinator, id: SessionId) -> usize {
        coordinator
            .rooms
            .values()
            .filter(|room| room.contains(&id))
            .count()
    }

    fn listed_rooms(line: &str) -> HashSet<String> {
        let inner = line
            .strip_prefix("> available rooms are: [")
            .and_then(|rest| rest.strip_suffix(']'))
            .expect("room listing");
        inner
            .split(", ")
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn new_sessions_are_anonymous_and_roomless() {
        let (mut coordinator, _tx) = Coordinator::new();
        let alice = Peer::connect(&mut coordinator, 5001);

        let state = &coordinator.sessions[&alice.id];
        assert_eq!(state.nickname, "anonymous");
        assert!(state.room.is_none());
    }

    #[test]
    fn nick_is_confirmed() {
        let (mut coordinator, _tx) = Coordinator::new();
        let mut alice = Peer::connect(&mut coordinator, 5001);

        alice.send(&mut coordinator, ClientCommand::SetNick("alice".into()));

        assert_eq!(coordinator.sessions[&alice.id].nickname, "alice");
        assert_eq!(
            alice.drain(),
            vec!["> all right, I'm going to call you alice"]
        );
    }

    #[test]
    fn joins_never_leave_two_memberships() {
        let (mut coordinator, _tx) = Coordinator::new();
        let alice = Peer::connect(&mut coordinator, 5001);

        for room in ["lobby", "games", "lobby", "music", "music", "games"] {
            alice.send(&mut coordinator, ClientCommand::Join(room.into()));
            assert_eq!(memberships(&coordinator, alice.id), 1);
            assert_eq!(
                coordinator.sessions[&alice.id].room.as_ref(),
                Some(&RoomName::from(room))
            );
        }
        // Rooms persist once empty.
        assert_eq!(coordinator.rooms.len(), 3);
    }

    #[test]
    fn join_announces_arrival_and_departure() {
        let (mut coordinator, _tx) = Coordinator::new();
        let mut alice = Peer::connect(&mut coordinator, 5001);
        let mut bob = Peer::connect(&mut coordinator, 5002);
        let mut carol = Peer::connect(&mut coordinator, 5003);

        alice.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        carol.send(&mut coordinator, ClientCommand::Join("games".into()));
        bob.send(&mut coordinator, ClientCommand::SetNick("bob".into()));
        bob.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        alice.drain();
        bob.drain();
        carol.drain();

        bob.send(&mut coordinator, ClientCommand::Join("games".into()));

        assert_eq!(alice.drain(), vec!["> bob has left the room"]);
        assert_eq!(carol.drain(), vec!["> bob has joined the room"]);
        assert_eq!(bob.drain(), vec!["> welcome to games"]);
    }

    #[test]
    fn messages_reach_everyone_but_the_sender() {
        let (mut coordinator, _tx) = Coordinator::new();
        let mut alice = Peer::connect(&mut coordinator, 5001);
        let mut bob = Peer::connect(&mut coordinator, 5002);
        let mut carol = Peer::connect(&mut coordinator, 5003);

        alice.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        bob.send(&mut coordinator, ClientCommand::SetNick("B".into()));
        bob.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        carol.send(&mut coordinator, ClientCommand::Join("elsewhere".into()));
        alice.drain();
        bob.drain();
        carol.drain();

        bob.send(&mut coordinator, ClientCommand::Message("hi".into()));

        assert_eq!(alice.drain(), vec!["> B: hi"]);
        assert!(bob.drain().is_empty());
        assert!(carol.drain().is_empty());
    }

    #[test]
    fn message_without_room_is_ignored() {
        let (mut coordinator, _tx) = Coordinator::new();
        let mut alice = Peer::connect(&mut coordinator, 5001);
        let mut bob = Peer::connect(&mut coordinator, 5002);
        bob.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        bob.drain();

        alice.send(&mut coordinator, ClientCommand::Message("anyone?".into()));

        assert!(alice.drain().is_empty());
        assert!(bob.drain().is_empty());
    }

    #[test]
    fn room_listing_tracks_distinct_joins() {
        let (mut coordinator, _tx) = Coordinator::new();
        let mut alice = Peer::connect(&mut coordinator, 5001);

        alice.send(&mut coordinator, ClientCommand::ListRooms);
        assert_eq!(alice.drain(), vec!["> available rooms are: []"]);

        for room in ["a", "b", "c"] {
            alice.send(&mut coordinator, ClientCommand::Join(room.into()));
        }
        alice.drain();
        alice.send(&mut coordinator, ClientCommand::ListRooms);

        let lines = alice.drain();
        assert_eq!(lines.len(), 1);
        let expected: HashSet<String> = ["a", "b", "c"].into_iter().map(String::from).collect();
        assert_eq!(listed_rooms(&lines[0]), expected);
    }

    #[test]
    fn rejoining_the_same_room_is_quiet() {
        let (mut coordinator, _tx) = Coordinator::new();
        let mut alice = Peer::connect(&mut coordinator, 5001);
        let mut bob = Peer::connect(&mut coordinator, 5002);
        alice.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        bob.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        alice.drain();
        bob.drain();

        bob.send(&mut coordinator, ClientCommand::Join("lobby".into()));

        assert!(alice.drain().is_empty());
        assert_eq!(bob.drain(), vec!["> welcome to lobby"]);
        assert_eq!(coordinator.rooms[&RoomName::from("lobby")].len(), 2);
    }

    #[test]
    fn duplicate_nicknames_share_a_room() {
        let (mut coordinator, _tx) = Coordinator::new();
        let mut first = Peer::connect(&mut coordinator, 5001);
        let mut second = Peer::connect(&mut coordinator, 5002);

        first.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        second.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        second.send(&mut coordinator, ClientCommand::Message("hey".into()));

        assert_eq!(coordinator.rooms[&RoomName::from("lobby")].len(), 2);
        assert_eq!(
            first.drain(),
            vec![
                "> welcome to lobby",
                "> anonymous has joined the room",
                "> anonymous: hey"
            ]
        );
        assert_eq!(second.drain(), vec!["> welcome to lobby"]);
    }

    #[test]
    fn quit_leaves_room_then_closes() {
        let (mut coordinator, _tx) = Coordinator::new();
        let mut alice = Peer::connect(&mut coordinator, 5001);
        let mut bob = Peer::connect(&mut coordinator, 5002);
        alice.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        bob.send(&mut coordinator, ClientCommand::SetNick("bob".into()));
        bob.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        alice.drain();
        bob.drain();

        bob.send(&mut coordinator, ClientCommand::Quit);

        assert_eq!(memberships(&coordinator, bob.id), 0);
        assert!(!coordinator.sessions.contains_key(&bob.id));
        assert_eq!(alice.drain(), vec!["> bob has left the room"]);
        assert_eq!(bob.drain(), vec![format!("> {}", FAREWELL), "<close>".to_string()]);
    }

    #[test]
    fn disconnect_cleans_up_without_farewell() {
        let (mut coordinator, _tx) = Coordinator::new();
        let mut alice = Peer::connect(&mut coordinator, 5001);
        let mut bob = Peer::connect(&mut coordinator, 5002);
        alice.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        bob.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        alice.drain();
        bob.drain();

        coordinator.process(ProcessMessage::Disconnect(bob.id));

        assert_eq!(memberships(&coordinator, bob.id), 0);
        assert_eq!(alice.drain(), vec!["> anonymous has left the room"]);
        assert_eq!(bob.drain(), vec!["<close>"]);
    }

    #[test]
    fn commands_after_quit_are_ignored() {
        let (mut coordinator, _tx) = Coordinator::new();
        let mut alice = Peer::connect(&mut coordinator, 5001);
        alice.send(&mut coordinator, ClientCommand::Quit);
        alice.drain();

        alice.send(&mut coordinator, ClientCommand::Join("lobby".into()));
        coordinator.process(ProcessMessage::Disconnect(alice.id));

        assert!(coordinator.rooms.is_empty());
        assert!(alice.drain().is_empty());
    }

    #[test]
    fn shutdown_notifies_and_stops() {
        let (mut coordinator, _tx) = Coordinator::new();
        let mut alice = Peer::connect(&mut coordinator, 5001);

        assert!(!coordinator.process(ProcessMessage::Shutdown));

        assert_eq!(
            alice.drain(),
            vec![
                ServerMessage::error(SHUTDOWN_NOTICE).to_string(),
                "<close>".to_string()
            ]
        );
        assert!(coordinator.sessions.is_empty());
    }

    #[tokio::test]
    async fn run_stops_when_all_senders_are_gone() {
        let (coordinator, command_tx) = Coordinator::new();
        let task = tokio::spawn(coordinator.run());
        drop(command_tx);
        task.await.unwrap();
    }
}
