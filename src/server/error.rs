use crate::common::ProcessMessage;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, derive_more::From)]
pub enum ServerError {
    #[from]
    Connection(crate::connection::ConnectionError),
    #[from]
    Io(std::io::Error),
    #[from]
    Config(crate::config::ConfigError),
    #[from]
    CommandQueueClosed(tokio::sync::mpsc::error::SendError<ProcessMessage>),
    #[from]
    CoordinatorFailed(tokio::task::JoinError),
}

//Error boilerplate
impl core::fmt::Display for ServerError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ServerError {}
