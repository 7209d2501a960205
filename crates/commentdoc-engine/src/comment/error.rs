use crate::source::SourcePosition;

/// Recoverable failure while converting or classifying one comment node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command '{command}'")]
    UnknownCommand {
        command: String,
        position: SourcePosition,
    },
    #[error("Unsupported markup: {construct}")]
    UnsupportedMarkup {
        construct: String,
        position: SourcePosition,
    },
    #[error("Command '{command}' requires an argument")]
    MissingArgument {
        command: String,
        position: SourcePosition,
    },
}

impl ParseError {
    pub fn position(&self) -> SourcePosition {
        match self {
            ParseError::UnknownCommand { position, .. }
            | ParseError::UnsupportedMarkup { position, .. }
            | ParseError::MissingArgument { position, .. } => *position,
        }
    }
}
