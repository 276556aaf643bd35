use super::Result;
use crate::common::{
    ClientCommand, ProcessMessage, SessionHandle, SessionId, SessionMessage,
};
use crate::connection::{read_line_from, ConnectionError, LineFrame};

use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Why the read loop stopped.
#[derive(Debug)]
enum ReadEnd {
    Quit,
    Eof,
    WriterClosed,
    Failed(ConnectionError),
}

/// Reads one client's lines, turns them into commands and posts them to the
/// coordinator. It never touches room or nickname state itself.
pub struct Session<R, W> {
    id: SessionId,
    reader: R,
    writer: W,
    command_tx: mpsc::UnboundedSender<ProcessMessage>,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(
        id: SessionId,
        reader: R,
        writer: W,
        command_tx: mpsc::UnboundedSender<ProcessMessage>,
    ) -> Self {
        Self {
            id,
            reader,
            writer,
            command_tx,
        }
    }

    #[instrument(skip_all, fields(peer = %self.id), level = "debug")]
    pub async fn run(self) -> Result<()> {
        let Self {
            id,
            mut reader,
            writer,
            command_tx,
        } = self;

        let (handle, outbound_rx) = SessionHandle::new(id);
        let mut writer_task = tokio::spawn(async move {
            if let Err(e) = write_outbound(writer, outbound_rx).await {
                debug!("Writer for {} stopped: {}", id, e);
            }
        });

        command_tx.send(ProcessMessage::Connect(handle.clone()))?;

        let end = loop {
            tokio::select! {
                line = read_line_from(&mut reader) => match line {
                    Ok(Some(line)) => {
                        if Self::handle_line(id, &line, &handle, &command_tx)? {
                            break ReadEnd::Quit;
                        }
                    }
                    Ok(None) => break ReadEnd::Eof,
                    Err(e) => break ReadEnd::Failed(e),
                },
                _ = &mut writer_task => break ReadEnd::WriterClosed,
            }
        };

        match &end {
            ReadEnd::Quit => debug!("{} asked to quit", id),
            ReadEnd::Eof => info!("Connection closed by {}", id),
            ReadEnd::WriterClosed => info!("Connection to {} closed while writing", id),
            ReadEnd::Failed(e) => warn!("Read from {} failed: {}", id, e),
        }

        if !matches!(end, ReadEnd::Quit) {
            // A closed command queue means the server is shutting down; nothing to clean.
            let _ = command_tx.send(ProcessMessage::Disconnect(id));
        }

        // The coordinator holds the last senders now; it closes the writer once it
        // has processed the quit or disconnect.
        drop(handle);
        if !matches!(end, ReadEnd::WriterClosed) {
            let _ = writer_task.await;
        }

        match end {
            ReadEnd::Failed(e) => Err(e.into()),
            _ => Ok(()),
        }
    }

    /// Returns `true` once the client has asked to quit.
    fn handle_line(
        id: SessionId,
        line: &str,
        handle: &SessionHandle,
        command_tx: &mpsc::UnboundedSender<ProcessMessage>,
    ) -> Result<bool> {
        match line.parse::<ClientCommand>() {
            Ok(command) => {
                debug!("{} issued {}", id, command);
                let quit = command == ClientCommand::Quit;
                command_tx.send(ProcessMessage::Client { from: id, command })?;
                Ok(quit)
            }
            Err(e) => {
                warn!("Bad command issued by {}: {}", id, e);
                handle.err(e.to_string());
                Ok(false)
            }
        }
    }
}

/// Drains a session's outbound queue onto the connection until it is told to close
/// or every sender is gone, then shuts the write side down.
async fn write_outbound<W>(
    mut writer: W,
    mut outbound_rx: mpsc::UnboundedReceiver<SessionMessage>,
) -> Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    while let Some(message) = outbound_rx.recv().await {
        match message {
            SessionMessage::Deliver(line) => line.write_line_to(&mut writer).await?,
            SessionMessage::Close => break,
        }
    }
    writer.shutdown().await?;
    Ok(())
}
