//! Console error types.

/// Message printed when a credential check fails.
pub const INCORRECT_CREDENTIALS: &str = "Incorrect credentials.";

/// Message printed when a login attempt is aborted.
pub const LOGIN_ABORTED: &str = "Error occurred. Exiting login module.";

/// Errors reported by the console.
///
/// Apart from [`ConsoleError::Busy`], every error returned from a
/// [`Console`](super::Console) operation has already been printed to the
/// display surface; the value is handed back so callers can branch on the
/// kind without parsing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// A command with this name is already registered (the first one is kept).
    DuplicateCommand { name: String },
    /// No command with this name is registered.
    UnknownCommand { name: String },
    /// Username unknown or password mismatch.
    LoginFailure,
    /// The login flow reached an inconsistent state and was abandoned.
    UnexpectedLogin { reason: String },
    /// The input surface is disabled because an invocation is in progress.
    Busy,
    /// Error raised by a command handler.
    Custom(String),
    /// A command handler panicked.
    HandlerPanic { name: String, message: String },
}

impl ConsoleError {
    /// Create a handler error with the given message.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

impl std::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsoleError::DuplicateCommand { name } => write!(
                f,
                "Command '{}' is defined more than once. Using first definition.",
                name
            ),
            ConsoleError::UnknownCommand { name } => write!(
                f,
                "'{}' is not a command. Type 'help' for a list of commands.",
                name
            ),
            ConsoleError::LoginFailure => f.write_str(INCORRECT_CREDENTIALS),
            ConsoleError::UnexpectedLogin { .. } => f.write_str(LOGIN_ABORTED),
            ConsoleError::Busy => f.write_str("Console is busy."),
            ConsoleError::Custom(message) => f.write_str(message),
            ConsoleError::HandlerPanic { name, message } => {
                write!(f, "Command '{}' panicked: {}", name, message)
            }
        }
    }
}

impl std::error::Error for ConsoleError {}

/// Result type returned by command handlers.
pub type CommandResult = Result<(), ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_message() {
        let err = ConsoleError::UnknownCommand { name: "frob".into() };
        assert_eq!(
            err.to_string(),
            "'frob' is not a command. Type 'help' for a list of commands."
        );
    }

    #[test]
    fn test_unexpected_login_hides_reason() {
        let err = ConsoleError::UnexpectedLogin {
            reason: "no pending username".into(),
        };
        assert_eq!(err.to_string(), LOGIN_ABORTED);
    }

    #[test]
    fn test_custom_message_is_verbatim() {
        assert_eq!(ConsoleError::custom("usage: greet <name>").to_string(), "usage: greet <name>");
    }
}
