use crate::client::ClientError;
use crate::config::ConfigError;
use crate::server::ServerError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, derive_more::From)]
pub enum Error {
    #[from]
    Server(ServerError),
    #[from]
    Client(ClientError),
    #[from]
    Config(ConfigError),
    #[from]
    Io(std::io::Error),
}

//Error boilerplate
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for Error {}
