mod client;
mod common;
mod config;
mod connection;
mod error;

mod server;

pub use client::{Client, ClientError};
pub use common::{
    ClientCommand, CommandError, ProcessMessage, Room, RoomName, ServerMessage, SessionHandle,
    SessionId, SessionMessage, UserName, DEFAULT_NICKNAME,
};
pub use config::{Config, ConfigError, Protocol};
pub use connection::{read_line_from, Connection, ConnectionError, LineFrame, MAX_LINE_BYTES};
pub use error::{Error, Result};
pub use server::{Coordinator, Server, ServerError, Session};
use tracing::{level_filters::LevelFilter, warn};

/// Initialize the logger and read the bind parameters from the environment.
pub fn init(log_level: impl TryInto<LevelFilter>) -> Result<Config> {
    setup_tracing(log_level);
    Ok(Config::from_env()?)
}

fn setup_tracing(log_level: impl TryInto<LevelFilter>) {
    let log_level = log_level.try_into().unwrap_or_else(|_| {
        warn!("Invalid log level, using default: WARN");
        LevelFilter::WARN
    });
    tracing_subscriber::fmt()
        //.with_span_events(FmtSpan::CLOSE)
        .with_max_level(log_level)
        .init();
}
