mod error;

use crate::common::ServerMessage;
use crate::connection::{read_line_from, Connection, LineFrame};
pub use error::ClientError;
use error::Result;

use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use std::fmt::{self, Display, Formatter};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// A line typed by the user, sent to the server untouched.
#[derive(Debug)]
struct InputLine(String);

impl Display for InputLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl LineFrame for InputLine {}

/// Terminal client: stdin lines go to the server, server lines are printed.
pub struct Client {
    address: String,
}

impl Client {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    #[instrument(skip(input_sender), level = "debug")]
    async fn handle_user_input(input_sender: mpsc::Sender<InputLine>) {
        let reader = BufReader::new(tokio::io::stdin());
        let mut lines = reader.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Err(e) = execute!(
                std::io::stdout(),
                MoveUp(1),
                MoveToColumn(0),
                Clear(ClearType::CurrentLine)
            ) {
                error!("Failed to clear input line: {}", e);
            }
            println!("{:<10}: {}", "You".blue(), line);
            if input_sender.send(InputLine(line)).await.is_err() {
                break;
            }
        }
        info!("Stopped reading user input");
    }

    #[instrument(skip_all, level = "debug")]
    pub async fn run(self) -> Result<()> {
        let connection = Connection::init(&self.address).await?;
        let (mut reader, mut writer) = connection.split_into();

        let (input_sender, mut input_receiver) = mpsc::channel(16);
        tokio::spawn(async move {
            Self::handle_user_input(input_sender).await;
        });

        loop {
            tokio::select! {
                Some(line) = input_receiver.recv() => {
                    line.write_line_to(&mut writer).await?;
                }
                line = read_line_from(&mut reader) => match line? {
                    Some(line) => print_server_line(&line),
                    None => {
                        println!("{}", "Connection closed by server".grey());
                        break;
                    }
                },
            }
        }
        Ok(())
    }
}

fn print_server_line(line: &str) {
    match ServerMessage::from_line(line) {
        Some(ServerMessage::Error(message)) => {
            println!("{} {}", "Error:".bold().on_dark_red(), message.as_str().red())
        }
        Some(ServerMessage::Message(content)) => println!("{}", content),
        None => println!("{}", line.grey()),
    }
}
