//! Command registry.
//!
//! Two name-ordered views over the same set of commands: every command (used
//! for dispatch) and the visible ones (used for help listings).

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{ConsoleCommand, ConsoleError};

/// Central registry for console commands.
///
/// Names are case-sensitive and unique; the first registration of a name wins.
/// Commands are shared behind [`Arc`] so a handler can run while the registry
/// is borrowed mutably by the console that owns it.
///
/// # Examples
///
/// ```
/// use bevy_prompt_console::core::{ConsoleCommand, CommandRegistry};
///
/// let mut registry = CommandRegistry::new();
/// registry.register(ConsoleCommand::new("quit", |_, _| Ok(()))).unwrap();
/// registry.register(ConsoleCommand::new("debug", |_, _| Ok(())).hidden()).unwrap();
///
/// assert!(registry.lookup("debug").is_ok());
/// assert_eq!(registry.visible().count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CommandRegistry {
    all: BTreeMap<Box<str>, Arc<ConsoleCommand>>,
    visible: BTreeMap<Box<str>, Arc<ConsoleCommand>>,
}

impl CommandRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command.
    ///
    /// Fails with [`ConsoleError::DuplicateCommand`] if the name is taken; the
    /// existing registration is left untouched.
    pub fn register(&mut self, command: ConsoleCommand) -> Result<Arc<ConsoleCommand>, ConsoleError> {
        if let Some(existing) = self.all.get(command.name()) {
            return Err(ConsoleError::DuplicateCommand {
                name: existing.name().to_string(),
            });
        }

        let name: Box<str> = command.name().into();
        let command = Arc::new(command);

        if command.is_visible() {
            self.visible.insert(name.clone(), Arc::clone(&command));
        }
        self.all.insert(name, Arc::clone(&command));

        Ok(command)
    }

    /// Get a command by name.
    pub fn get(&self, name: &str) -> Option<&Arc<ConsoleCommand>> {
        self.all.get(name)
    }

    /// Look up a command for dispatch.
    pub fn lookup(&self, name: &str) -> Result<Arc<ConsoleCommand>, ConsoleError> {
        self.all
            .get(name)
            .cloned()
            .ok_or_else(|| ConsoleError::UnknownCommand {
                name: name.to_string(),
            })
    }

    /// Check if a command exists.
    pub fn contains(&self, name: &str) -> bool {
        self.all.contains_key(name)
    }

    /// Get the number of registered commands.
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Iterate over all commands in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ConsoleCommand> {
        self.all.values().map(|cmd| cmd.as_ref())
    }

    /// Iterate over visible commands in name order.
    pub fn visible(&self) -> impl Iterator<Item = &ConsoleCommand> {
        self.visible.values().map(|cmd| cmd.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> ConsoleCommand {
        ConsoleCommand::new(name.to_string(), |_, _| Ok(()))
    }

    #[test]
    fn test_registry_register_and_lookup() {
        let mut registry = CommandRegistry::new();
        registry.register(noop("greet").description("Say hi")).unwrap();

        assert!(registry.contains("greet"));
        let cmd = registry.lookup("greet").unwrap();
        assert_eq!(cmd.name(), "greet");
        assert_eq!(cmd.get_description(), "Say hi");
    }

    #[test]
    fn test_registry_lookup_missing() {
        let registry = CommandRegistry::new();
        assert_eq!(
            registry.lookup("nope").unwrap_err(),
            ConsoleError::UnknownCommand { name: "nope".into() }
        );
    }

    #[test]
    fn test_registry_names_are_case_sensitive() {
        let mut registry = CommandRegistry::new();
        registry.register(noop("Greet")).unwrap();
        assert!(registry.lookup("greet").is_err());
        assert!(registry.register(noop("greet")).is_ok());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut registry = CommandRegistry::new();
        registry.register(noop("dup").description("first")).unwrap();

        let err = registry.register(noop("dup").description("second")).unwrap_err();
        assert_eq!(err, ConsoleError::DuplicateCommand { name: "dup".into() });

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("dup").unwrap().get_description(), "first");
    }

    #[test]
    fn test_hidden_commands_are_not_visible() {
        let mut registry = CommandRegistry::new();
        registry.register(noop("shown")).unwrap();
        registry.register(noop("secret").hidden()).unwrap();

        assert!(registry.lookup("secret").is_ok());
        let visible: Vec<_> = registry.visible().map(|c| c.name()).collect();
        assert_eq!(visible, vec!["shown"]);
        assert_eq!(registry.iter().count(), 2);
    }

    #[test]
    fn test_views_are_name_ordered() {
        let mut registry = CommandRegistry::new();
        for name in ["zeta", "alpha", "mu", "beta"] {
            registry.register(noop(name)).unwrap();
        }
        registry.register(noop("gamma").hidden()).unwrap();

        let all: Vec<_> = registry.iter().map(|c| c.name()).collect();
        assert_eq!(all, vec!["alpha", "beta", "gamma", "mu", "zeta"]);

        let visible: Vec<_> = registry.visible().map(|c| c.name()).collect();
        assert_eq!(visible, vec!["alpha", "beta", "mu", "zeta"]);
    }
}
