use tcp_chat::{init, Result, Server};

use tracing::Level;

#[tokio::main]
async fn main() -> Result<()> {
    let config = init(Level::INFO)?;

    let server = Server::bind(&config).await?;

    Ok(server.run_until_ctrl_c().await?)
}
