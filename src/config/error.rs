pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, derive_more::From)]
pub enum ConfigError {
    #[from]
    Io(std::io::Error),
    MissingPort,
    InvalidPort(String),
    UnsupportedProtocol(String),
    NoAddress(String),
}

//Error boilerplate
impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ConfigError {}
