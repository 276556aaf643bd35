use std::fmt;

/// A line that could not be turned into a command. The `Display` text is sent back
/// to the client verbatim after the `[ERROR]: ` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingArgument { usage: &'static str },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommandError::Unknown(verb) => write!(f, "unknown command: {}", verb),
            CommandError::MissingArgument { usage } => {
                write!(f, "missing argument, usage: {}", usage)
            }
        }
    }
}

impl std::error::Error for CommandError {}
