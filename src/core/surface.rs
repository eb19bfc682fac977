//! Display and input surfaces.
//!
//! The console never draws anything itself. It prints lines to a
//! [`DisplaySurface`] and reads and writes the text of an [`InputSurface`];
//! front ends (egui, terminal, tests) decide how those look.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Output region of the console.
pub trait DisplaySurface: Send + Sync + 'static {
    /// Append a line.
    fn print(&mut self, line: &str);

    /// Remove all lines.
    fn clear(&mut self);
}

/// Single-line input box of the console.
pub trait InputSurface: Send + Sync + 'static {
    /// Current text, prompt included.
    fn text(&self) -> &str;

    /// Replace the text.
    fn set_text(&mut self, text: &str);

    /// Whether the surface accepts input.
    fn is_enabled(&self) -> bool;

    /// Enable or disable the surface.
    fn set_enabled(&mut self, enabled: bool);

    /// Ask for input focus.
    fn focus(&mut self);

    /// Whether focus has been requested.
    fn has_focus(&self) -> bool;
}

/// One keystroke-level change to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEdit {
    /// Text typed or pasted at the end of the input.
    Insert(String),
    /// Backspace.
    DeleteBackward,
}

impl InputEdit {
    /// Create an insert edit.
    pub fn insert(text: impl Into<String>) -> Self {
        Self::Insert(text.into())
    }
}

/// Operation recorded by an [`OutputBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOp {
    /// A printed line.
    Line(String),
    /// The display was cleared.
    Clear,
}

#[derive(Debug, Default)]
struct OutputState {
    lines: Vec<String>,
    pending: Vec<DisplayOp>,
    tracked: bool,
}

/// In-memory [`DisplaySurface`].
///
/// Clones share the same buffer, so a host can keep a handle while the
/// console owns another. It tracks the visible transcript and, unless created
/// with [`OutputBuffer::untracked`], a queue of operations not yet forwarded
/// to a front end.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    inner: Arc<Mutex<OutputState>>,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputBuffer {
    /// Create an empty buffer that queues operations for [`drain_pending`](Self::drain_pending).
    pub fn new() -> Self {
        Self::with_tracking(true)
    }

    /// Create an empty buffer with no pending queue.
    ///
    /// Use this when nothing will ever drain the buffer.
    pub fn untracked() -> Self {
        Self::with_tracking(false)
    }

    fn with_tracking(tracked: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(OutputState {
                tracked,
                ..Default::default()
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, OutputState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lines printed since the last clear.
    pub fn lines(&self) -> Vec<String> {
        self.state().lines.clone()
    }

    /// The visible transcript joined with newlines.
    pub fn transcript(&self) -> String {
        self.state().lines.join("\n")
    }

    /// Take the operations recorded since the last drain.
    pub fn drain_pending(&self) -> Vec<DisplayOp> {
        std::mem::take(&mut self.state().pending)
    }
}

impl DisplaySurface for OutputBuffer {
    fn print(&mut self, line: &str) {
        let mut state = self.state();
        state.lines.push(line.to_string());
        if state.tracked {
            state.pending.push(DisplayOp::Line(line.to_string()));
        }
    }

    fn clear(&mut self) {
        let mut state = self.state();
        state.lines.clear();
        if state.tracked {
            // Lines not yet forwarded would be wiped by this clear anyway.
            state.pending.clear();
            state.pending.push(DisplayOp::Clear);
        }
    }
}

/// Plain [`InputSurface`] holding its text in memory.
#[derive(Debug, Clone)]
pub struct InputLine {
    text: String,
    enabled: bool,
    focused: bool,
}

impl Default for InputLine {
    fn default() -> Self {
        Self {
            text: String::new(),
            enabled: true,
            focused: false,
        }
    }
}

impl InputSurface for InputLine {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn has_focus(&self) -> bool {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_buffer_shared_between_clones() {
        let buffer = OutputBuffer::new();
        let mut handle = buffer.clone();
        handle.print("one");
        handle.print("two");
        assert_eq!(buffer.lines(), vec!["one", "two"]);
        assert_eq!(buffer.transcript(), "one\ntwo");
    }

    #[test]
    fn test_output_buffer_clear() {
        let mut buffer = OutputBuffer::new();
        buffer.print("old");
        buffer.clear();
        buffer.print("new");
        assert_eq!(buffer.lines(), vec!["new"]);
        assert_eq!(
            buffer.drain_pending(),
            vec![DisplayOp::Clear, DisplayOp::Line("new".into())]
        );
        assert!(buffer.drain_pending().is_empty());
        assert_eq!(buffer.lines(), vec!["new"]);
    }

    #[test]
    fn test_output_buffer_clear_bounds_pending() {
        let mut buffer = OutputBuffer::new();
        for i in 0..1000 {
            buffer.print(&format!("line {i}"));
        }
        buffer.clear();
        assert_eq!(buffer.drain_pending(), vec![DisplayOp::Clear]);
        assert!(buffer.lines().is_empty());
    }

    #[test]
    fn test_untracked_buffer_queues_nothing() {
        let mut buffer = OutputBuffer::untracked();
        buffer.print("one");
        buffer.clear();
        buffer.print("two");
        assert_eq!(buffer.lines(), vec!["two"]);
        assert!(buffer.drain_pending().is_empty());
    }

    #[test]
    fn test_input_line() {
        let mut input = InputLine::default();
        assert!(input.is_enabled());
        assert!(!input.has_focus());

        input.set_text("> ls");
        input.set_enabled(false);
        input.focus();
        assert_eq!(input.text(), "> ls");
        assert!(!input.is_enabled());
        assert!(input.has_focus());
    }
}
