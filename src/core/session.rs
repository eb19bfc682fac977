//! Login session state and the credential table.

use std::collections::HashMap;

/// Prompt shown while waiting for a username.
pub const USERNAME_PROMPT: &str = "Username: ";

/// Prompt shown while waiting for a password.
pub const PASSWORD_PROMPT: &str = "Password: ";

/// Stage of the login state machine.
///
/// ```text
/// Idle -> AwaitingUsername -> AwaitingPassword -> Idle
/// ```
///
/// A failed credential check goes back to `AwaitingUsername`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginStage {
    /// Not logging in; input goes to the dispatcher.
    #[default]
    Idle,
    /// Enter submits a username.
    AwaitingUsername,
    /// Edits are masked into the password buffer; Enter submits it.
    AwaitingPassword,
}

/// Progress reported by [`Console::login`](super::Console::login).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStatus {
    /// Someone is already logged in; nothing happened.
    AlreadyLoggedIn,
    /// The console now prompts for a username.
    AwaitingUsername,
    /// The console now prompts for a password.
    AwaitingPassword,
    /// The user is logged in.
    LoggedIn(String),
}

/// Transient state of one login attempt.
///
/// Cleared wholesale when an attempt succeeds or is aborted.
#[derive(Debug, Default)]
pub struct Session {
    active: bool,
    stage: LoginStage,
    pending_username: Option<String>,
    password: String,
    saved_prompt: Option<String>,
    pending_command: Option<String>,
}

impl Session {
    /// Whether a login attempt is in progress.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current stage.
    #[inline]
    pub fn stage(&self) -> LoginStage {
        self.stage
    }

    /// Whether input edits are diverted into the password buffer.
    #[inline]
    pub fn is_masking(&self) -> bool {
        self.stage == LoginStage::AwaitingPassword
    }

    /// Username waiting for its password.
    pub fn pending_username(&self) -> Option<&str> {
        self.pending_username.as_deref()
    }

    /// Name of the last command the dispatcher attempted.
    pub fn pending_command(&self) -> Option<&str> {
        self.pending_command.as_deref()
    }

    /// Prompt to restore when the attempt ends.
    pub fn saved_prompt(&self) -> Option<&str> {
        self.saved_prompt.as_deref()
    }

    /// Number of characters buffered for the password.
    pub fn password_len(&self) -> usize {
        self.password.chars().count()
    }

    /// Start an attempt, remembering `prompt`. No-op if one is running.
    pub(crate) fn begin(&mut self, prompt: &str) {
        if !self.active {
            self.active = true;
            self.saved_prompt = Some(prompt.to_string());
        }
    }

    pub(crate) fn await_username(&mut self) {
        self.stage = LoginStage::AwaitingUsername;
        self.pending_username = None;
        self.password.clear();
    }

    pub(crate) fn await_password(&mut self, username: &str) {
        self.stage = LoginStage::AwaitingPassword;
        self.pending_username = Some(username.to_string());
        self.password.clear();
    }

    pub(crate) fn push_password(&mut self, text: &str) {
        self.password.push_str(text);
    }

    pub(crate) fn pop_password(&mut self) {
        self.password.pop();
    }

    pub(crate) fn take_password(&mut self) -> String {
        std::mem::take(&mut self.password)
    }

    pub(crate) fn remember_command(&mut self, name: &str) {
        self.pending_command = Some(name.to_string());
    }

    /// Clear everything, returning the previous state.
    pub(crate) fn reset(&mut self) -> Session {
        std::mem::take(self)
    }

    pub(crate) fn into_parts(self) -> (Option<String>, Option<String>) {
        (self.saved_prompt, self.pending_command)
    }

    #[cfg(test)]
    pub(crate) fn forget_username(&mut self) {
        self.pending_username = None;
    }
}

/// Outcome of checking a username/password pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    /// Username and password match.
    Valid,
    /// No such username.
    UnknownUser,
    /// Username exists but the password differs.
    WrongPassword,
}

/// Username to password table, fixed at construction.
///
/// Passwords are compared in memory as plain strings.
#[derive(Clone, Default)]
pub struct Credentials {
    users: HashMap<String, String>,
}

impl Credentials {
    /// Build a table from `(username, password)` pairs.
    pub fn new<I, U, P>(users: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            users: users
                .into_iter()
                .map(|(u, p)| (u.into(), p.into()))
                .collect(),
        }
    }

    /// Check a username/password pair.
    pub fn check(&self, username: &str, password: &str) -> CredentialCheck {
        match self.users.get(username) {
            None => CredentialCheck::UnknownUser,
            Some(expected) if expected == password => CredentialCheck::Valid,
            Some(_) => CredentialCheck::WrongPassword,
        }
    }

    /// Check if a username exists.
    pub fn contains_user(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Get the number of users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.users.keys().collect();
        names.sort();
        f.debug_struct("Credentials")
            .field("users", &names)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_check() {
        let creds = Credentials::new([("alice", "secret")]);
        assert_eq!(creds.check("alice", "secret"), CredentialCheck::Valid);
        assert_eq!(creds.check("alice", "wrong"), CredentialCheck::WrongPassword);
        assert_eq!(creds.check("bob", "secret"), CredentialCheck::UnknownUser);
        assert!(creds.contains_user("alice"));
        assert_eq!(creds.len(), 1);
    }

    #[test]
    fn test_credentials_debug_hides_passwords() {
        let creds = Credentials::new([("alice", "hunter2")]);
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_session_begin_snapshots_prompt_once() {
        let mut session = Session::default();
        session.begin("> ");
        session.begin(USERNAME_PROMPT);
        assert!(session.is_active());
        assert_eq!(session.saved_prompt(), Some("> "));
    }

    #[test]
    fn test_session_stages() {
        let mut session = Session::default();
        assert_eq!(session.stage(), LoginStage::Idle);

        session.begin("> ");
        session.await_username();
        assert_eq!(session.stage(), LoginStage::AwaitingUsername);
        assert!(!session.is_masking());

        session.await_password("alice");
        assert_eq!(session.stage(), LoginStage::AwaitingPassword);
        assert_eq!(session.pending_username(), Some("alice"));
        assert!(session.is_masking());
    }

    #[test]
    fn test_password_buffer() {
        let mut session = Session::default();
        session.await_password("alice");
        session.push_password("se");
        session.push_password("cx");
        session.pop_password();
        session.push_password("ret");
        assert_eq!(session.password_len(), 6);
        assert_eq!(session.take_password(), "secret");
        assert_eq!(session.password_len(), 0);
    }

    #[test]
    fn test_reset_returns_previous_state() {
        let mut session = Session::default();
        session.remember_command("deploy");
        session.begin("$ ");
        session.await_password("alice");

        let (prompt, command) = session.reset().into_parts();
        assert_eq!(prompt.as_deref(), Some("$ "));
        assert_eq!(command.as_deref(), Some("deploy"));
        assert!(!session.is_active());
        assert_eq!(session.stage(), LoginStage::Idle);
        assert_eq!(session.pending_command(), None);
    }
}
