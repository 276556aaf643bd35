//! Newline-delimited UTF-8 framing. One frame is one line; the `\n` terminator is
//! added on write and stripped on read.
use super::{ConnectionError, Result};

use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt::{Debug, Display};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, trace};

/// Upper bound on a single inbound line, terminator included.
pub const MAX_LINE_BYTES: usize = 8 * 1024;

#[async_trait]
pub trait LineFrame: Debug + Display + Send + Sync {
    /// Render the frame followed by a single `\n`.
    fn encode(&self) -> Bytes {
        let line = self.to_string();
        let mut buf = BytesMut::with_capacity(line.len() + 1);
        buf.put_slice(line.as_bytes());
        buf.put_u8(b'\n');
        buf.freeze()
    }

    async fn write_line_to<W>(&self, writer: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let data = self.encode();
        writer.write_all(&data).await?;
        // Flush so buffered writers hand the line to the socket straight away.
        writer.flush().await?;
        Ok(())
    }
}

/// Read the next line from `reader` with its `\n` (and a preceding `\r`) removed.
///
/// Returns `Ok(None)` at EOF. Bytes after the last `\n` are discarded when the peer
/// closes, so a half-typed line is never treated as a command.
pub async fn read_line_from<R>(reader: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin + Send,
{
    let mut buf = Vec::new();
    let read = (&mut *reader)
        .take(MAX_LINE_BYTES as u64)
        .read_until(b'\n', &mut buf)
        .await
        .map_err(ConnectionError::from_read)?;

    if read == 0 {
        return Ok(None);
    }

    // The length check comes before UTF-8 validation: the cap can split a multibyte
    // character.
    if buf.last() != Some(&b'\n') {
        if read == MAX_LINE_BYTES {
            error!("Line exceeds {} bytes", MAX_LINE_BYTES);
            return Err(ConnectionError::LineTooLong);
        }
        trace!("Discarding {} bytes of unterminated input at EOF", read);
        return Ok(None);
    }

    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    let line = String::from_utf8(buf)
        .map_err(|e| ConnectionError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    Ok(Some(line))
}
