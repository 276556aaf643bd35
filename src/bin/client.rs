use tcp_chat::{init, Client, Result};

use tracing::Level;

#[tokio::main]
async fn main() -> Result<()> {
    let config = init(Level::WARN)?;

    let client = Client::new(config.address());

    Ok(client.run().await?)
}
