mod coordinator;
mod error;
mod session;

pub use coordinator::Coordinator;
use error::Result;
pub use error::ServerError;
pub use session::Session;

use crate::common::ProcessMessage;
use crate::{Config, Connection};

use std::future::Future;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Accepts connections and wires each one to the coordinator.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
}

impl Server {
    pub async fn bind(config: &Config) -> Result<Self> {
        let addr = config.resolve().await?;
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on: {}", listener.local_addr()?);
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves, then close every session and wait for the
    /// coordinator to finish.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        info!("Server started");
        let (coordinator, command_tx) = Coordinator::new();
        let coordinator_task = tokio::spawn(coordinator.run());
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((socket, client_address)) => {
                        info!("Accepted connection from: {:#}", client_address);
                        Self::spawn_session(socket, client_address, &command_tx);
                    }
                    Err(e) => error!("Unable to accept connection: {}", e),
                },
            }
        }

        command_tx.send(ProcessMessage::Shutdown)?;
        drop(command_tx);
        coordinator_task.await?;
        Ok(())
    }

    pub async fn run_until_ctrl_c(self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to install ctrl-c handler: {}", e);
            }
        })
        .await
    }

    fn spawn_session(
        socket: TcpStream,
        client_address: SocketAddr,
        command_tx: &mpsc::UnboundedSender<ProcessMessage>,
    ) {
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            let (reader, writer) = Connection::from_stream(socket).split_into();
            let session = Session::new(client_address, reader, writer, command_tx);
            if let Err(e) = session.run().await {
                error!("Error handling connection {}: {}", client_address, e);
            }
        });
    }
}
