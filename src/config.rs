//! Console configuration.

use std::collections::HashMap;

#[cfg(feature = "persist")]
use serde::{Deserialize, Serialize};

/// Settings a [`Console`](crate::core::Console) is built from.
///
/// # Examples
///
/// ```
/// use bevy_prompt_console::ConsoleConfig;
///
/// let config = ConsoleConfig::new("Ops Console")
///     .version("2.1")
///     .author("infra team")
///     .prompt("ops>")
///     .user("alice", "secret");
///
/// assert_eq!(config.header_lines()[0], "Ops Console v[2.1] created by infra team.");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "persist", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "persist", serde(default))]
pub struct ConsoleConfig {
    /// Console name shown in the header.
    pub name: String,
    /// Version shown in the header.
    pub version: String,
    /// Optional author shown in the header.
    pub author: Option<String>,
    /// Initial prompt. A trailing space is added if missing.
    pub prompt: String,
    /// Column the built-in help listing pads command names to.
    pub help_width: usize,
    /// Print the header when the console is created.
    pub show_header: bool,
    /// Register `clear`, `login`, `logout` and `whoami` (plugin only).
    pub builtin_commands: bool,
    /// Print captured application log lines into the console (egui only).
    pub mirror_logs: bool,
    /// Credential table: username -> password.
    pub users: HashMap<String, String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            name: "Console".to_string(),
            version: "0.1".to_string(),
            author: None,
            prompt: "> ".to_string(),
            help_width: 20,
            show_header: true,
            builtin_commands: true,
            mirror_logs: false,
            users: HashMap::new(),
        }
    }
}

impl ConsoleConfig {
    /// Create a config with the given console name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the prompt.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set the help column width.
    pub fn help_width(mut self, width: usize) -> Self {
        self.help_width = width;
        self
    }

    /// Enable or disable the header.
    pub fn show_header(mut self, show: bool) -> Self {
        self.show_header = show;
        self
    }

    /// Enable or disable the built-in commands.
    pub fn builtin_commands(mut self, enabled: bool) -> Self {
        self.builtin_commands = enabled;
        self
    }

    /// Enable or disable log mirroring.
    pub fn mirror_logs(mut self, enabled: bool) -> Self {
        self.mirror_logs = enabled;
        self
    }

    /// Add a user to the credential table.
    pub fn user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(username.into(), password.into());
        self
    }

    /// Lines printed as the console header.
    pub fn header_lines(&self) -> Vec<String> {
        let mut title = format!("{} v[{}]", self.name, self.version);
        if let Some(author) = &self.author {
            title.push_str(&format!(" created by {}.", author));
        }
        vec![
            title,
            "Type 'help' for a list of commands.".to_string(),
            String::new(),
        ]
    }
}

/// egui front end settings.
#[cfg(feature = "egui")]
#[derive(bevy::prelude::Resource, Debug, Clone)]
pub struct ConsoleUiConfig {
    /// Key that opens and closes the console window.
    pub open_key: bevy::prelude::KeyCode,
    /// Key that submits the input line.
    pub submit_key: bevy::prelude::KeyCode,
    /// Window width in points.
    pub width: f32,
    /// Colors and font.
    pub theme: ConsoleTheme,
}

#[cfg(feature = "egui")]
impl Default for ConsoleUiConfig {
    fn default() -> Self {
        Self {
            open_key: bevy::prelude::KeyCode::Backquote,
            submit_key: bevy::prelude::KeyCode::Enter,
            width: 815.0,
            theme: ConsoleTheme::default(),
        }
    }
}

/// Colors and font of the egui console.
#[cfg(feature = "egui")]
#[derive(Debug, Clone)]
pub struct ConsoleTheme {
    /// Font used for the transcript and the input line.
    pub font: bevy_egui::egui::FontId,
    /// Regular text color.
    pub text_color: bevy_egui::egui::Color32,
    /// Color of echoed command lines.
    pub echo_color: bevy_egui::egui::Color32,
    /// Window background.
    pub background: bevy_egui::egui::Color32,
}

#[cfg(feature = "egui")]
impl Default for ConsoleTheme {
    fn default() -> Self {
        use bevy_egui::egui::{Color32, FontId};

        Self {
            font: FontId::monospace(14.0),
            text_color: Color32::WHITE,
            echo_color: Color32::from_rgb(160, 160, 160),
            background: Color32::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.help_width, 20);
        assert!(config.show_header);
        assert!(config.users.is_empty());
    }

    #[test]
    fn test_header_without_author() {
        let config = ConsoleConfig::new("Shell").version("1.0");
        assert_eq!(
            config.header_lines(),
            vec!["Shell v[1.0]", "Type 'help' for a list of commands.", ""]
        );
    }

    #[test]
    fn test_builder_users() {
        let config = ConsoleConfig::default()
            .user("alice", "secret")
            .user("bob", "hunter2");
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users.get("bob").map(String::as_str), Some("hunter2"));
    }
}
