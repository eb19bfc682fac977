//! The console: command dispatch and the login state machine.
//!
//! A [`Console`] owns the registry, the credential table and the two surfaces.
//! Everything a user can do goes through three entry points:
//!
//! - [`Console::invoke`] runs a line (typed or programmatic)
//! - [`Console::handle_edit`] applies one keystroke-level edit to the input
//! - [`Console::submit`] is the Enter key, routed by login stage

use std::sync::Arc;

use bevy::log::{debug, error, info, warn};
use bevy::prelude::Resource;

use super::{
    tokenize, CommandArgs, CommandRegistry, CommandResult, ConsoleCommand, ConsoleError,
    CredentialCheck, Credentials, DisplaySurface, InputEdit, InputLine, InputSurface, LoginStage,
    LoginStatus, OutputBuffer, Session, INCORRECT_CREDENTIALS, LOGIN_ABORTED, PASSWORD_PROMPT,
    USERNAME_PROMPT,
};
use crate::config::ConsoleConfig;

/// Name of the built-in help listing.
pub const HELP_COMMAND: &str = "help";

/// Printed by the help listing when no visible command is registered.
pub const NO_COMMANDS: &str = "No commands defined";

/// A command console.
///
/// # Examples
///
/// ```
/// use bevy_prompt_console::core::{Console, ConsoleCommand, OutputBuffer};
/// use bevy_prompt_console::ConsoleConfig;
///
/// let output = OutputBuffer::new();
/// let mut console = Console::with_display(
///     ConsoleConfig::default().show_header(false),
///     output.clone(),
/// );
///
/// console
///     .register(ConsoleCommand::new("greet", |args, console| {
///         console.print(format!("hi {}", args.get(0).unwrap_or("there")));
///         Ok(())
///     }))
///     .unwrap();
///
/// console.invoke(Some("greet Ann"), false).unwrap();
/// assert_eq!(output.lines(), vec!["> greet Ann", "hi Ann", ""]);
/// ```
#[derive(Resource)]
pub struct Console {
    config: ConsoleConfig,
    registry: CommandRegistry,
    credentials: Credentials,
    session: Session,
    current_user: Option<String>,
    prompt: String,
    display: Box<dyn DisplaySurface>,
    input: Box<dyn InputSurface>,
}

impl Console {
    /// Create a console printing into a private, untracked [`OutputBuffer`].
    ///
    /// Use [`Console::with_display`] to read what the console prints.
    pub fn new(config: ConsoleConfig) -> Self {
        Self::with_surfaces(config, OutputBuffer::untracked(), InputLine::default())
    }

    /// Create a console printing into `display`.
    pub fn with_display(config: ConsoleConfig, display: impl DisplaySurface) -> Self {
        Self::with_surfaces(config, display, InputLine::default())
    }

    /// Create a console bound to the given surfaces.
    ///
    /// Prints the header (if enabled), shows the configured prompt and
    /// focuses the input.
    pub fn with_surfaces(
        config: ConsoleConfig,
        display: impl DisplaySurface,
        input: impl InputSurface,
    ) -> Self {
        let credentials = Credentials::new(config.users.clone());
        let prompt = config.prompt.clone();
        let mut console = Self {
            config,
            registry: CommandRegistry::new(),
            credentials,
            session: Session::default(),
            current_user: None,
            prompt: String::new(),
            display: Box::new(display),
            input: Box::new(input),
        };

        if console.config.show_header {
            for line in console.config.header_lines() {
                console.display.print(&line);
            }
        }
        console.set_prompt(&prompt);
        console.input.focus();

        debug!(
            "Console '{}' created with {} user(s)",
            console.config.name,
            console.credentials.len()
        );
        console
    }

    /// The configuration this console was built from.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// The command registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Login session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current login stage.
    pub fn login_stage(&self) -> LoginStage {
        self.session.stage()
    }

    /// The logged-in user, if any.
    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    /// The current prompt, trailing space included.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The input surface.
    pub fn input(&self) -> &dyn InputSurface {
        self.input.as_ref()
    }

    /// Whether an invocation is in progress (the input is disabled).
    pub fn is_busy(&self) -> bool {
        !self.input.is_enabled()
    }

    /// Print a line to the display.
    pub fn print(&mut self, line: impl AsRef<str>) {
        self.display.print(line.as_ref());
    }

    /// Clear the display.
    pub fn clear(&mut self) {
        self.display.clear();
    }

    /// Replace the prompt and reset the input to it.
    ///
    /// A trailing space is appended if `prompt` lacks one.
    pub fn set_prompt(&mut self, prompt: &str) {
        let mut prompt = prompt.to_string();
        if !prompt.ends_with(' ') {
            prompt.push(' ');
        }
        self.input.set_text(&prompt);
        self.prompt = prompt;
    }

    /// Register a command.
    ///
    /// A duplicate name is reported on the display and the first definition
    /// is kept.
    pub fn register(&mut self, command: ConsoleCommand) -> Result<Arc<ConsoleCommand>, ConsoleError> {
        match self.registry.register(command) {
            Ok(command) => {
                debug!("Registered console command '{}'", command.name());
                Ok(command)
            }
            Err(err) => {
                warn!("{}", err);
                self.display.print(&err.to_string());
                Err(err)
            }
        }
    }

    /// Run a line.
    ///
    /// With `raw` set the line is run as given; otherwise it is read from the
    /// input surface with the prompt removed. Unless `recall` is set the line
    /// is echoed after the prompt. Errors are printed before being returned.
    ///
    /// Reading from the input while it is disabled fails with
    /// [`ConsoleError::Busy`] and changes nothing. Handlers may call `invoke`
    /// with `Some(raw)` to run other commands; the input stays disabled until
    /// the outermost call returns.
    pub fn invoke(&mut self, raw: Option<&str>, recall: bool) -> CommandResult {
        let outermost = !self.is_busy();
        if raw.is_none() && !outermost {
            debug!("Ignoring console submission while busy");
            return Err(ConsoleError::Busy);
        }

        self.input.set_enabled(false);
        let line = match raw {
            Some(raw) => raw.to_string(),
            None => strip_prompt(self.input.text(), &self.prompt).to_string(),
        };
        if outermost {
            self.input.set_text("");
        }

        if !recall {
            let echo = format!("{}{}", self.prompt, line);
            self.display.print(&echo);
        }

        let result = if line.trim().is_empty() {
            Ok(())
        } else {
            self.dispatch(&line)
        };

        if let Err(err) = &result {
            self.display.print(&err.to_string());
        }
        if !line.is_empty() {
            self.display.print("");
        }

        if outermost {
            self.input.set_text(&self.prompt);
            self.input.set_enabled(true);
            self.input.focus();
        }
        result
    }

    fn dispatch(&mut self, line: &str) -> CommandResult {
        let tokens = tokenize(line);
        self.session.remember_command(tokens.command);

        if tokens.command == HELP_COMMAND && !self.registry.contains(HELP_COMMAND) {
            self.print_help();
            return Ok(());
        }

        let command = self.registry.lookup(tokens.command)?;
        if command.is_login_required() && self.current_user.is_none() {
            debug!("'{}' requires login", command.name());
            self.login(None, None)?;
            return Ok(());
        }

        debug!(
            "Running console command '{}' with {} arg(s)",
            command.name(),
            tokens.args.len()
        );
        let args = CommandArgs::new(line, tokens.args);
        command.execute(&args, self)
    }

    fn print_help(&mut self) {
        let width = self.config.help_width;
        let lines: Vec<String> = self
            .registry
            .visible()
            .map(|cmd| {
                format!(
                    "{:<width$} {}",
                    cmd.name(),
                    cmd.get_description(),
                    width = width
                )
            })
            .collect();

        if lines.is_empty() {
            self.display.print(NO_COMMANDS);
        }
        for line in &lines {
            self.display.print(line);
        }
    }

    /// Advance the login state machine.
    ///
    /// - someone is logged in: nothing happens
    /// - no username: prompt for one
    /// - no password: prompt for it, masking further edits
    /// - both: check them. On success the user is logged in, the saved prompt
    ///   comes back and the last attempted command is replayed. On failure
    ///   "Incorrect credentials." is printed and the username is asked again.
    ///
    /// Empty strings count as missing.
    pub fn login(
        &mut self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<LoginStatus, ConsoleError> {
        if self.current_user.is_some() {
            return Ok(LoginStatus::AlreadyLoggedIn);
        }
        self.session.begin(&self.prompt);

        let Some(username) = username.filter(|u| !u.is_empty()) else {
            debug!("Login waiting for username");
            self.session.await_username();
            self.set_prompt(USERNAME_PROMPT);
            return Ok(LoginStatus::AwaitingUsername);
        };

        let Some(password) = password.filter(|p| !p.is_empty()) else {
            debug!("Login waiting for password of '{}'", username);
            self.session.await_password(username);
            self.set_prompt(PASSWORD_PROMPT);
            return Ok(LoginStatus::AwaitingPassword);
        };

        match self.credentials.check(username, password) {
            CredentialCheck::Valid => Ok(self.complete_login(username)),
            check => {
                warn!("Login failed for '{}': {:?}", username, check);
                self.display.print(INCORRECT_CREDENTIALS);
                self.session.await_username();
                self.set_prompt(USERNAME_PROMPT);
                Err(ConsoleError::LoginFailure)
            }
        }
    }

    fn complete_login(&mut self, username: &str) -> LoginStatus {
        self.current_user = Some(username.to_string());
        self.display.print(&format!("Logged in as {}.", username));

        let (saved_prompt, pending_command) = self.session.reset().into_parts();
        let prompt = saved_prompt.unwrap_or_else(|| self.config.prompt.clone());
        self.set_prompt(&prompt);
        info!("Console user '{}' logged in", username);

        if let Some(command) = pending_command {
            // Errors from the replay are already on the display.
            let _ = self.invoke(Some(&command), true);
        }
        LoginStatus::LoggedIn(username.to_string())
    }

    fn abort_login(&mut self, reason: &str) -> ConsoleError {
        error!("Login aborted: {}", reason);
        self.display.print(LOGIN_ABORTED);

        let (saved_prompt, _) = self.session.reset().into_parts();
        let prompt = saved_prompt.unwrap_or_else(|| self.config.prompt.clone());
        self.set_prompt(&prompt);
        ConsoleError::UnexpectedLogin {
            reason: reason.to_string(),
        }
    }

    /// Log the current user out.
    pub fn logout(&mut self) -> Option<String> {
        match self.current_user.take() {
            Some(user) => {
                self.display.print(&format!("Logged out of {}.", user));
                info!("Console user '{}' logged out", user);
                Some(user)
            }
            None => {
                self.display.print("No user logged in.");
                None
            }
        }
    }

    /// Apply one edit to the input.
    ///
    /// While a password is awaited the edit goes to the password buffer and
    /// the input keeps showing only the password prompt. Otherwise it applies
    /// to the text after the prompt, so the prompt itself cannot be edited
    /// away. Ignored while busy.
    pub fn handle_edit(&mut self, edit: InputEdit) {
        if self.is_busy() {
            return;
        }

        if self.session.is_masking() {
            match edit {
                InputEdit::Insert(text) => self.session.push_password(&text),
                InputEdit::DeleteBackward => self.session.pop_password(),
            }
            self.set_prompt(PASSWORD_PROMPT);
            return;
        }

        let mut typed = strip_prompt(self.input.text(), &self.prompt).to_string();
        match edit {
            InputEdit::Insert(text) => typed.push_str(&text),
            InputEdit::DeleteBackward => {
                typed.pop();
            }
        }
        let text = format!("{}{}", self.prompt, typed);
        self.input.set_text(&text);
    }

    /// Handle the Enter key.
    ///
    /// Idle consoles run the input line. During a login the line is the
    /// username or the (masked) password.
    pub fn submit(&mut self) -> CommandResult {
        if self.is_busy() {
            return Err(ConsoleError::Busy);
        }

        match self.session.stage() {
            LoginStage::Idle => self.invoke(None, false),
            LoginStage::AwaitingUsername => {
                let echo = self.input.text().to_string();
                let username = strip_prompt(&echo, &self.prompt).trim().to_string();
                self.display.print(&echo);
                self.login(Some(&username), None).map(|_| ())
            }
            LoginStage::AwaitingPassword => {
                let echo = self.input.text().to_string();
                self.display.print(&echo);

                let password = self.session.take_password();
                let Some(username) = self.session.pending_username().map(str::to_owned) else {
                    let err = self.abort_login("password submitted without a username");
                    return Err(err);
                };
                self.login(Some(&username), Some(&password)).map(|_| ())
            }
        }
    }

    /// Type `line` and press Enter.
    pub fn enter_line(&mut self, line: &str) -> CommandResult {
        self.handle_edit(InputEdit::insert(line));
        self.submit()
    }

    /// Tear the console down, leaving only `message` on the display.
    pub fn destroy(mut self, message: Option<&str>) {
        self.display.clear();
        if let Some(message) = message {
            self.display.print(message);
        }
        self.input.set_text("");
        self.input.set_enabled(false);
        info!("Console '{}' destroyed", self.config.name);
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("name", &self.config.name)
            .field("prompt", &self.prompt)
            .field("commands", &self.registry.len())
            .field("current_user", &self.current_user)
            .field("stage", &self.session.stage())
            .finish_non_exhaustive()
    }
}

fn strip_prompt<'a>(text: &'a str, prompt: &str) -> &'a str {
    text.strip_prefix(prompt).unwrap_or(text)
}
