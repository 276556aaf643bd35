mod error;
pub mod messages;
mod room;
mod session;
mod user;

pub use error::CommandError;
pub use messages::{ClientCommand, ProcessMessage, ServerMessage};
pub use room::{Room, RoomName};
pub use session::{SessionHandle, SessionId, SessionMessage};
pub use user::{UserName, DEFAULT_NICKNAME};
