//! Console commands.
//!
//! A [`ConsoleCommand`] is a named handler with a description and visibility. Once
//! registered it never changes.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::{CommandResult, Console, ConsoleError};

/// Description used when a command is registered without one.
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// Arguments passed to a command handler.
#[derive(Debug, Clone)]
pub struct CommandArgs<'a> {
    /// The raw command string.
    raw: &'a str,
    /// Parsed arguments (excluding command name).
    args: Vec<&'a str>,
}

impl<'a> CommandArgs<'a> {
    /// Create new command args from a raw string and parsed arguments.
    pub fn new(raw: &'a str, args: Vec<&'a str>) -> Self {
        Self { raw, args }
    }

    /// Get the raw command string.
    #[inline]
    pub fn raw(&self) -> &str {
        self.raw
    }

    /// Get the number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if there are no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Get an argument by index, exactly as tokenized.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).copied()
    }

    /// Get an argument with one pair of matching surrounding quotes removed.
    pub fn unquoted(&self, index: usize) -> Option<&'a str> {
        self.get(index).map(strip_quotes)
    }

    /// Try to parse an argument as a specific type.
    pub fn parse<T: std::str::FromStr>(&self, index: usize) -> Option<T> {
        self.get(index).and_then(|s| s.parse().ok())
    }

    /// Get all arguments as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[&'a str] {
        &self.args
    }

    /// Iterate over arguments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.args.iter().copied()
    }

    /// Join all arguments with a separator.
    pub fn join(&self, separator: &str) -> String {
        self.args.join(separator)
    }
}

impl std::ops::Index<usize> for CommandArgs<'_> {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        self.args[index]
    }
}

fn strip_quotes(arg: &str) -> &str {
    for quote in ['"', '\''] {
        if arg.len() >= 2 && arg.starts_with(quote) && arg.ends_with(quote) {
            return &arg[1..arg.len() - 1];
        }
    }
    arg
}

/// Behaviour behind a command.
///
/// Implemented for every closure of the shape
/// `Fn(&CommandArgs, &mut Console) -> CommandResult`, so most commands are
/// written inline. Handlers may print, log in, or invoke other commands
/// through the console they receive.
pub trait CommandHandler: Send + Sync + 'static {
    /// Run the command.
    fn run(&self, args: &CommandArgs<'_>, console: &mut Console) -> CommandResult;
}

impl<F> CommandHandler for F
where
    F: Fn(&CommandArgs<'_>, &mut Console) -> CommandResult + Send + Sync + 'static,
{
    fn run(&self, args: &CommandArgs<'_>, console: &mut Console) -> CommandResult {
        self(args, console)
    }
}

/// A console command with a handler.
///
/// # Examples
///
/// ```
/// use bevy_prompt_console::core::ConsoleCommand;
///
/// let greet = ConsoleCommand::new("greet", |args, console| {
///     console.print(format!("hi {}", args.get(0).unwrap_or("there")));
///     Ok(())
/// })
/// .description("Say hello");
///
/// assert_eq!(greet.name(), "greet");
/// assert!(greet.is_visible());
/// ```
#[derive(Clone)]
pub struct ConsoleCommand {
    name: Box<str>,
    description: Box<str>,
    hidden: bool,
    requires_login: bool,
    handler: Arc<dyn CommandHandler>,
}

impl ConsoleCommand {
    /// Create a new command with the given name and handler closure.
    pub fn new<F>(name: impl Into<Box<str>>, handler: F) -> Self
    where
        F: Fn(&CommandArgs<'_>, &mut Console) -> CommandResult + Send + Sync + 'static,
    {
        Self::from_handler(name, handler)
    }

    /// Create a new command from any [`CommandHandler`] implementation.
    pub fn from_handler(name: impl Into<Box<str>>, handler: impl CommandHandler) -> Self {
        Self {
            name: name.into(),
            description: DEFAULT_DESCRIPTION.into(),
            hidden: false,
            requires_login: false,
            handler: Arc::new(handler),
        }
    }

    /// Set the description.
    pub fn description(mut self, desc: impl Into<Box<str>>) -> Self {
        self.description = desc.into();
        self
    }

    /// Keep the command out of help listings. It can still be invoked.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Require a logged-in user. Invoking it while logged out starts the
    /// login flow and replays the command once it succeeds.
    pub fn requires_login(mut self) -> Self {
        self.requires_login = true;
        self
    }

    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description.
    #[inline]
    pub fn get_description(&self) -> &str {
        &self.description
    }

    /// Whether the command shows up in help listings.
    #[inline]
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    /// Whether the command needs a logged-in user.
    #[inline]
    pub fn is_login_required(&self) -> bool {
        self.requires_login
    }

    /// Execute the command.
    ///
    /// A panicking handler is reported as [`ConsoleError::HandlerPanic`].
    pub fn execute(&self, args: &CommandArgs<'_>, console: &mut Console) -> CommandResult {
        let handler = Arc::clone(&self.handler);
        match panic::catch_unwind(AssertUnwindSafe(|| handler.run(args, console))) {
            Ok(result) => result,
            Err(payload) => {
                let message = if let Some(s) = payload.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                Err(ConsoleError::HandlerPanic {
                    name: self.name.to_string(),
                    message,
                })
            }
        }
    }
}

impl std::fmt::Debug for ConsoleCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("hidden", &self.hidden)
            .field("requires_login", &self.requires_login)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args_basic() {
        let args = CommandArgs::new("echo hello world", vec!["hello", "world"]);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0), Some("hello"));
        assert_eq!(args.get(1), Some("world"));
        assert_eq!(args.get(2), None);
        assert_eq!(&args[1], "world");
    }

    #[test]
    fn test_command_args_parse() {
        let args = CommandArgs::new("set 42", vec!["42"]);
        assert_eq!(args.parse::<i32>(0), Some(42));
        assert_eq!(args.parse::<i32>(1), None);
    }

    #[test]
    fn test_command_args_unquoted() {
        let args = CommandArgs::new(
            r#"greet "Ann Lee" 'x' "mismatched' plain"#,
            vec![r#""Ann Lee""#, "'x'", r#""mismatched'"#, "plain"],
        );
        assert_eq!(args.get(0), Some(r#""Ann Lee""#));
        assert_eq!(args.unquoted(0), Some("Ann Lee"));
        assert_eq!(args.unquoted(1), Some("x"));
        assert_eq!(args.unquoted(2), Some(r#""mismatched'"#));
        assert_eq!(args.unquoted(3), Some("plain"));
    }

    #[test]
    fn test_command_args_lone_quote_is_not_stripped() {
        let args = CommandArgs::new(r#"x ""#, vec![r#"""#]);
        assert_eq!(args.unquoted(0), Some(r#"""#));
    }

    #[test]
    fn test_command_defaults() {
        let cmd = ConsoleCommand::new("test", |_args, _console| Ok(()));
        assert_eq!(cmd.name(), "test");
        assert_eq!(cmd.get_description(), DEFAULT_DESCRIPTION);
        assert!(cmd.is_visible());
        assert!(!cmd.is_login_required());
    }

    #[test]
    fn test_command_builder() {
        let cmd = ConsoleCommand::new("secret", |_args, _console| Ok(()))
            .description("Top secret")
            .hidden()
            .requires_login();
        assert_eq!(cmd.get_description(), "Top secret");
        assert!(!cmd.is_visible());
        assert!(cmd.is_login_required());
    }
}
