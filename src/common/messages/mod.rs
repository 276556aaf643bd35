mod client;
mod process;
mod server;

pub use client::ClientCommand;
pub use process::ProcessMessage;
pub use server::{ServerMessage, ERROR_PREFIX, MESSAGE_PREFIX};
