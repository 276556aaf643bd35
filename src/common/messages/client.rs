use crate::common::{CommandError, RoomName, UserName};

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Commands a client can issue, one per input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    SetNick(UserName),
    Join(RoomName),
    ListRooms,
    Message(String),
    Quit,
}

impl FromStr for ClientCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_matches(|c| c == '\r' || c == '\n');
        let mut args = line.split(' ');
        let verb = args.next().unwrap_or_default().trim();

        match verb {
            "/nick" => required(args.next(), "/nick <name>").map(|name| Self::SetNick(name.into())),
            "/join" => required(args.next(), "/join <room>").map(|room| Self::Join(room.into())),
            "/rooms" => Ok(Self::ListRooms),
            "/msg" => Ok(Self::Message(args.collect::<Vec<_>>().join(" "))),
            "/quit" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(verb.to_string())),
        }
    }
}

fn required<'a>(arg: Option<&'a str>, usage: &'static str) -> Result<&'a str, CommandError> {
    match arg {
        Some(arg) if !arg.is_empty() => Ok(arg),
        _ => Err(CommandError::MissingArgument { usage }),
    }
}

impl Display for ClientCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ClientCommand::SetNick(name) => write!(f, "/nick {}", name),
            ClientCommand::Join(room) => write!(f, "/join {}", room),
            ClientCommand::ListRooms => write!(f, "/rooms"),
            ClientCommand::Message(content) => write!(f, "/msg {}", content),
            ClientCommand::Quit => write!(f, "/quit"),
        }
    }
}
