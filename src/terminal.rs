//! Terminal backend for headless consoles.
//!
//! Each stdin line is submitted as a [`ConsoleInputEvent`] and every printed
//! line is written to stdout. Password entry is not masked here: the
//! terminal echoes what is typed.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

use bevy::prelude::*;

use crate::core::{Console, ConsoleClearEvent, ConsoleInputEvent, ConsoleOutputEvent};

/// Plugin that adds terminal (stdin/stdout) console support.
pub struct TerminalPlugin;

impl Plugin for TerminalPlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = mpsc::channel();
        let _handle = spawn_stdin_reader(sender);

        app.insert_resource(StdinReceiver(Mutex::new(receiver)))
            .init_resource::<TerminalConfig>()
            .init_resource::<PendingEchoes>()
            .add_systems(Update, read_stdin.before(crate::apply_console_input))
            .add_systems(Update, write_stdout.after(crate::send_console_output));
    }
}

/// Configuration for terminal behavior.
#[derive(Resource, Debug, Clone)]
pub struct TerminalConfig {
    /// Write the prompt after each batch of output.
    pub show_prompt: bool,
    /// Skip the console's echo of lines typed into the terminal.
    pub hide_echo: bool,
    /// Clear the screen with ANSI escape codes when the console is cleared.
    pub ansi_clear: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            show_prompt: true,
            hide_echo: true,
            ansi_clear: false,
        }
    }
}

#[derive(Resource)]
struct StdinReceiver(Mutex<Receiver<String>>);

/// Echo lines the console is expected to print for this frame's input.
#[derive(Resource, Default)]
struct PendingEchoes(VecDeque<String>);

fn spawn_stdin_reader(sender: Sender<String>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines().map_while(Result::ok) {
            let line = line.strip_suffix('\r').unwrap_or(&line).to_string();
            if sender.send(line).is_err() {
                break;
            }
        }
    })
}

fn read_stdin(
    receiver: Res<StdinReceiver>,
    console: Option<Res<Console>>,
    mut echoes: ResMut<PendingEchoes>,
    mut input: MessageWriter<ConsoleInputEvent>,
) {
    let Ok(rx) = receiver.0.lock() else {
        return;
    };
    for line in rx.try_iter() {
        if let Some(console) = &console {
            echoes.0.push_back(expected_echo(console, &line));
        }
        input.write(ConsoleInputEvent::new(line));
    }
}

fn expected_echo(console: &Console, line: &str) -> String {
    if console.session().is_masking() {
        console.prompt().to_string()
    } else {
        format!("{}{}", console.prompt(), line)
    }
}

fn write_stdout(
    mut outputs: MessageReader<ConsoleOutputEvent>,
    mut clears: MessageReader<ConsoleClearEvent>,
    mut echoes: ResMut<PendingEchoes>,
    config: Res<TerminalConfig>,
    console: Option<Res<Console>>,
) {
    let mut out = io::stdout().lock();

    if clears.read().count() > 0 && config.ansi_clear {
        let _ = write!(out, "\x1b[2J\x1b[H");
    }

    let mut any = false;
    for event in outputs.read() {
        any = true;
        if config.hide_echo && echoes.0.front() == Some(&event.message) {
            echoes.0.pop_front();
            continue;
        }
        let _ = writeln!(out, "{}", event.message);
    }
    echoes.0.clear();

    if any && config.show_prompt {
        if let Some(console) = console {
            let _ = write!(out, "{}", console.prompt());
        }
    }
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConsoleConfig;

    #[test]
    fn test_expected_echo() {
        let mut console = Console::new(
            ConsoleConfig::default()
                .show_header(false)
                .user("alice", "pw"),
        );
        assert_eq!(expected_echo(&console, "help"), "> help");

        console.login(Some("alice"), None).unwrap();
        assert_eq!(expected_echo(&console, "pw"), "Password: ");
    }
}
