pub type Result<T> = std::result::Result<T, ConnectionError>;

#[derive(Debug, derive_more::From)]
pub enum ConnectionError {
    #[from]
    Io(std::io::Error),

    UnableToConnectToServer(std::io::Error),
    ConnectionDropped,
    LineTooLong,
}

impl ConnectionError {
    /// Maps io errors that mean "the peer went away" onto [`ConnectionError::ConnectionDropped`].
    pub(crate) fn from_read(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe => {
                ConnectionError::ConnectionDropped
            }
            _ => ConnectionError::Io(err),
        }
    }
}

//Error boilerplate
impl core::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ConnectionError {}
