mod error;
mod frame;

pub use error::ConnectionError;
use error::Result;
pub use frame::{read_line_from, LineFrame, MAX_LINE_BYTES};

use tokio::io::{BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::info;

pub type OwnedReader = BufReader<OwnedReadHalf>;
pub type OwnedWriter = BufWriter<OwnedWriteHalf>;

#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
}

impl Connection {
    pub async fn init(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(ConnectionError::UnableToConnectToServer)?;
        info!("Connected to server {}", stream.peer_addr()?);

        Ok(Self { stream })
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        Self { stream }
    }

    pub fn split_into(self) -> (OwnedReader, OwnedWriter) {
        let (reader, writer) = self.stream.into_split();

        (BufReader::new(reader), BufWriter::new(writer))
    }
}
