//! The egui front end of the console.
//!
//! The window shows the console transcript and a single-line input bound to
//! the console's [`InputSurface`](crate::core::InputSurface). The text box is
//! resynced from the console every frame; whatever the user changes in it is
//! turned into [`InputEdit`]s, so the console decides what the line looks
//! like (prompt guard, password masking).

use bevy::prelude::*;
use bevy_egui::*;

use crate::config::ConsoleUiConfig;
use crate::core::{Console, InputEdit};
use crate::ConsoleOutput;

/// State of the console window.
#[derive(Default, Resource)]
pub struct ConsoleUiState {
    /// Whether the window is open or not.
    pub(crate) open: bool,
    /// Whether we have set focus this open or not.
    pub(crate) text_focus: bool,
    /// Text box contents, mirrored from the console input.
    pub(crate) command: String,
}

impl ConsoleUiState {
    /// Whether the window is currently open or not.
    pub fn open(&self) -> bool {
        self.open
    }
}

pub(crate) fn open_close_ui(
    mut state: ResMut<ConsoleUiState>,
    key: Res<ButtonInput<KeyCode>>,
    config: Res<ConsoleUiConfig>,
) {
    if key.just_pressed(config.open_key) {
        state.open = !state.open;
        state.text_focus = false;
    }
}

pub(crate) fn render_ui_system(
    mut contexts: EguiContexts,
    mut state: ResMut<ConsoleUiState>,
    key: Res<ButtonInput<KeyCode>>,
    config: Res<ConsoleUiConfig>,
    output: Res<ConsoleOutput>,
    mut console: ResMut<Console>,
) -> Result<(), BevyError> {
    let title = console.config().name.clone();
    let lines = output.lines();

    egui::Window::new(title)
        .collapsible(false)
        .default_width(config.width)
        .frame(
            egui::Frame::NONE
                .fill(config.theme.background)
                .inner_margin(egui::Margin::same(8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            render_ui(ui, &mut state, &key, &config, &mut console, &lines)
        });
    Ok(())
}

/// Render the transcript and the input line, feeding edits and Enter into
/// `console`.
pub fn render_ui(
    ui: &mut egui::Ui,
    state: &mut ConsoleUiState,
    key: &ButtonInput<KeyCode>,
    config: &ConsoleUiConfig,
    console: &mut Console,
    lines: &[String],
) {
    let text_edit_id = egui::Id::new("prompt_console_input");

    egui::TopBottomPanel::bottom("prompt console input")
        .frame(egui::Frame::NONE.outer_margin(egui::Margin {
            left: 0,
            right: 0,
            top: 8,
            bottom: 0,
        }))
        .show_inside(ui, |ui| {
            state.command.clear();
            state.command.push_str(console.input().text());
            let before = state.command.clone();

            egui::TextEdit::singleline(&mut state.command)
                .id(text_edit_id)
                .desired_width(ui.available_width())
                .margin(egui::Vec2::splat(4.0))
                .font(config.theme.font.clone())
                .text_color(config.theme.text_color)
                .lock_focus(true)
                .interactive(!console.is_busy())
                .show(ui);

            for edit in diff_edits(&before, &state.command) {
                console.handle_edit(edit);
            }

            if key.just_pressed(config.submit_key) {
                // Errors are already printed to the transcript.
                let _ = console.submit();
                ui.ctx().memory_mut(|mem| mem.request_focus(text_edit_id));
            }

            if !state.text_focus {
                state.text_focus = true;
                ui.ctx().memory_mut(|mem| mem.request_focus(text_edit_id));
            }
        });

    let prompt = console.prompt().to_string();
    egui::ScrollArea::vertical()
        .auto_shrink([false, true])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                for line in lines {
                    let color = if line.starts_with(&prompt) {
                        config.theme.echo_color
                    } else {
                        config.theme.text_color
                    };
                    ui.label(
                        egui::RichText::new(line.as_str())
                            .font(config.theme.font.clone())
                            .color(color),
                    );
                }
            });
        });
}

/// Edits that turn `before` into `after` when applied at the end of the line.
///
/// Text after the first differing character is deleted and typed again, so
/// edits in the middle of the line survive a console that only appends and
/// backspaces.
fn diff_edits(before: &str, after: &str) -> Vec<InputEdit> {
    let common = before
        .char_indices()
        .zip(after.chars())
        .find(|((_, a), b)| a != b)
        .map(|((index, _), _)| index)
        .unwrap_or_else(|| before.len().min(after.len()));
    // `common` is a char boundary in both strings: everything before it is equal.
    let deletes = before[common..].chars().count();
    let inserted = &after[common..];

    let mut edits = vec![InputEdit::DeleteBackward; deletes];
    if !inserted.is_empty() {
        edits.push(InputEdit::insert(inserted));
    }
    edits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_unchanged() {
        assert!(diff_edits("> ls", "> ls").is_empty());
    }

    #[test]
    fn test_diff_typed_at_end() {
        assert_eq!(diff_edits("> l", "> ls"), vec![InputEdit::insert("s")]);
    }

    #[test]
    fn test_diff_backspace() {
        assert_eq!(
            diff_edits("> ls", "> "),
            vec![InputEdit::DeleteBackward, InputEdit::DeleteBackward]
        );
    }

    #[test]
    fn test_diff_edit_in_middle() {
        assert_eq!(
            diff_edits("> abc", "> aXbc"),
            vec![
                InputEdit::DeleteBackward,
                InputEdit::DeleteBackward,
                InputEdit::insert("Xbc"),
            ]
        );
    }

    #[test]
    fn test_diff_multibyte() {
        assert_eq!(
            diff_edits("> é", "> ü"),
            vec![InputEdit::DeleteBackward, InputEdit::insert("ü")]
        );
    }

    #[test]
    fn test_masked_typing_goes_through_console() {
        let mut console = Console::new(
            crate::ConsoleConfig::default()
                .show_header(false)
                .user("alice", "pw"),
        );
        console.login(Some("alice"), None).unwrap();

        let before = console.input().text().to_string();
        for edit in diff_edits(&before, "Password: pw") {
            console.handle_edit(edit);
        }
        assert_eq!(console.input().text(), "Password: ");
        assert_eq!(console.session().password_len(), 2);
    }
}
