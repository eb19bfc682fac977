//! Log capture for [LogPlugin](bevy::log::LogPlugin).
//!
//! Install [`custom_log_layer`] as the plugin's custom layer to receive every
//! tracing event as a [`LogLine`] message. With
//! [`ConsoleConfig::mirror_logs`](crate::ConsoleConfig::mirror_logs) set the
//! lines are also printed into the console.

use std::sync::mpsc;
use std::sync::Mutex;

use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;
use tracing::Subscriber;
use tracing_subscriber::field::Visit;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::core::Console;

/// Log target prefix of this crate; its own lines are never mirrored.
const OWN_TARGET: &str = "bevy_prompt_console";

/// Custom layer for [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer).
///
/// ```ignore
/// App::new().add_plugins(DefaultPlugins.set(LogPlugin {
///     custom_layer: bevy_prompt_console::logging::custom_log_layer,
///     ..default()
/// }));
/// ```
pub fn custom_log_layer(app: &mut App) -> Option<BoxedLayer> {
    let (sender, receiver) = mpsc::channel();
    app.add_message::<LogLine>()
        .insert_resource(CapturedLogs(Mutex::new(receiver)))
        .add_systems(PostUpdate, (forward_captured_logs, mirror_logs).chain());

    Some(Box::new(CaptureLayer { sender }))
}

/// One captured log event.
#[derive(Message, Debug, Clone)]
pub struct LogLine {
    /// Verbosity of the event.
    pub level: Level,
    /// Module target that emitted it.
    pub target: &'static str,
    /// The formatted `message` field.
    pub message: String,
}

impl LogLine {
    /// Text printed into the console for this line.
    pub fn console_text(&self) -> String {
        format!("[{}] {}", self.level, self.message)
    }

    fn is_own(&self) -> bool {
        self.target.starts_with(OWN_TARGET)
    }
}

#[derive(Resource)]
struct CapturedLogs(Mutex<mpsc::Receiver<LogLine>>);

fn forward_captured_logs(captured: Res<CapturedLogs>, mut lines: MessageWriter<LogLine>) {
    let Ok(receiver) = captured.0.lock() else {
        return;
    };
    for line in receiver.try_iter() {
        lines.write(line);
    }
}

fn mirror_logs(mut lines: MessageReader<LogLine>, console: Option<ResMut<Console>>) {
    let Some(mut console) = console else {
        lines.clear();
        return;
    };
    if !console.config().mirror_logs {
        lines.clear();
        return;
    }
    for line in lines.read().filter(|line| !line.is_own()) {
        console.print(line.console_text());
    }
}

struct CaptureLayer {
    sender: mpsc::Sender<LogLine>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let Some(message) = visitor.message else {
            return;
        };

        let metadata = event.metadata();
        // The receiver is gone once the app is dropped.
        let _ = self.sender.send(LogLine {
            level: *metadata.level(),
            target: metadata.target(),
            message,
        });
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_text() {
        let line = LogLine {
            level: Level::WARN,
            target: "my_game::physics",
            message: "tunnelling detected".to_string(),
        };
        assert_eq!(line.console_text(), "[WARN] tunnelling detected");
        assert!(!line.is_own());
    }

    #[test]
    fn test_own_lines_are_recognised() {
        let line = LogLine {
            level: Level::DEBUG,
            target: "bevy_prompt_console::core::console",
            message: "Registered console command 'x'".to_string(),
        };
        assert!(line.is_own());
    }
}
