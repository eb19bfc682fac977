//! Console messages for communication between front ends and the console.
//!
//! - front end -> console: whole lines, single edits and the Enter key
//! - console -> front end: printed lines and clear requests

use bevy::prelude::*;

use super::InputEdit;

/// Submit a whole line, as if typed and followed by Enter.
///
/// During a login the line is taken as the username or password.
///
/// # Examples
///
/// ```ignore
/// fn run_motd(mut input: MessageWriter<ConsoleInputEvent>) {
///     input.write(ConsoleInputEvent::new("motd"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The line to submit, without the prompt.
    pub line: String,
}

impl ConsoleInputEvent {
    /// Create a new input event.
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }
}

/// Apply one edit to the input line.
#[derive(Message, Debug, Clone)]
pub struct ConsoleEditEvent {
    /// The edit.
    pub edit: InputEdit,
}

impl ConsoleEditEvent {
    /// Typed text.
    pub fn insert(text: impl Into<String>) -> Self {
        Self {
            edit: InputEdit::insert(text),
        }
    }

    /// Backspace.
    pub fn backspace() -> Self {
        Self {
            edit: InputEdit::DeleteBackward,
        }
    }
}

/// Press Enter on whatever the input line currently holds.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ConsoleSubmitEvent;

/// A line printed by the console.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOutputEvent {
    /// The printed text.
    pub message: String,
}

impl ConsoleOutputEvent {
    /// Create a new output event.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The console display was cleared.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ConsoleClearEvent;

/// Plugin that registers all console messages.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>()
            .add_message::<ConsoleEditEvent>()
            .add_message::<ConsoleSubmitEvent>()
            .add_message::<ConsoleOutputEvent>()
            .add_message::<ConsoleClearEvent>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_input_event() {
        let event = ConsoleInputEvent::new("greet Ann");
        assert_eq!(event.line, "greet Ann");
    }

    #[test]
    fn test_console_edit_event() {
        assert_eq!(ConsoleEditEvent::insert("a").edit, InputEdit::Insert("a".into()));
        assert_eq!(ConsoleEditEvent::backspace().edit, InputEdit::DeleteBackward);
    }
}
