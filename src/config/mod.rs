//! Bind parameters read from the environment (and a `.env` file when present).
mod error;

pub use error::ConfigError;
use error::Result;

use std::fmt::{self, Display, Formatter};
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::{info, warn};

pub const HOST_VAR: &str = "CHAT_HOST";
pub const PORT_VAR: &str = "CHAT_PORT";
pub const PROTOCOL_VAR: &str = "CHAT_PROTOCOL";

const DEFAULT_HOST: &str = "localhost";

/// Stream protocol to listen on. `Tcp4`/`Tcp6` restrict which resolved address
/// family is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Protocol {
    #[default]
    Tcp,
    Tcp4,
    Tcp6,
}

impl Protocol {
    fn accepts(&self, addr: &SocketAddr) -> bool {
        match self {
            Protocol::Tcp => true,
            Protocol::Tcp4 => addr.is_ipv4(),
            Protocol::Tcp6 => addr.is_ipv6(),
        }
    }
}

impl FromStr for Protocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            "tcp4" => Ok(Protocol::Tcp4),
            "tcp6" => Ok(Protocol::Tcp6),
            _ => Err(ConfigError::UnsupportedProtocol(s.to_string())),
        }
    }
}

impl Display for Protocol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Tcp4 => write!(f, "tcp4"),
            Protocol::Tcp6 => write!(f, "tcp6"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    host: String,
    port: u16,
    protocol: Protocol,
}

impl Config {
    pub fn new(host: impl Into<String>, port: u16, protocol: Protocol) -> Self {
        Self {
            host: host.into(),
            port,
            protocol,
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = lookup(PORT_VAR).ok_or(ConfigError::MissingPort)?;
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;

        let protocol = match lookup(PROTOCOL_VAR) {
            Some(protocol) => protocol.trim().parse()?,
            None => {
                info!("{} not set, defaulting to tcp", PROTOCOL_VAR);
                Protocol::default()
            }
        };

        let host = lookup(HOST_VAR).unwrap_or_else(|| {
            warn!("{} env var not set!! Using default: {}", HOST_VAR, DEFAULT_HOST);
            DEFAULT_HOST.to_string()
        });

        Ok(Self::new(host, port, protocol))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// `host:port`, suitable for connecting.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the bind address, honouring the protocol's address family.
    pub async fn resolve(&self) -> Result<SocketAddr> {
        tokio::net::lookup_host(self.address())
            .await?
            .find(|addr| self.protocol.accepts(addr))
            .ok_or_else(|| ConfigError::NoAddress(format!("{} ({})", self.address(), self.protocol)))
    }
}
