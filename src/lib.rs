//! A terminal-style command console for Bevy.
//!
//! bevy_prompt_console provides:
//!
//! - **Console**: Command dispatcher with a prompt, help listing and errors
//! - **ConsoleCommand**: Named commands with handlers, optionally login-gated
//! - **Login**: Username/password flow with masked password entry
//! - **Tokenizer**: Whitespace splitting that keeps quoted arguments together
//!
//! # Features
//!
//! - `egui` (default): egui window with log mirroring
//! - `terminal`: stdin/stdout backend for headless apps
//! - `persist`: RON config files
//! - `full`: Enable egui + persist
//!
//! # Demos
//!
//! Runnable examples live under `demos/` rather than `examples/` and are
//! registered as `[[example]]` targets, so `cargo run --example minimal`,
//! `cargo run --example terminal --features terminal` and
//! `cargo run --example egui` work as usual.
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_prompt_console::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(bevy_egui::EguiPlugin::default())
//!         .add_plugins(ConsolePlugin::new(
//!             ConsoleConfig::new("Ops Console").user("alice", "secret"),
//!         ))
//!         .add_systems(Startup, setup_console)
//!         .run();
//! }
//!
//! fn setup_console(mut console: ResMut<Console>) {
//!     let _ = console.register(
//!         ConsoleCommand::new("greet", |args, console| {
//!             console.print(format!("hi {}", args.get(0).unwrap_or("there")));
//!             Ok(())
//!         })
//!         .description("Say hello"),
//!     );
//!
//!     let _ = console.register(
//!         ConsoleCommand::new("deploy", |_, console| {
//!             console.print("deploying");
//!             Ok(())
//!         })
//!         .requires_login(),
//!     );
//! }
//! ```

use bevy::prelude::*;

// Core module (always available, no UI)
pub mod core;
pub mod config;

pub use crate::core::{
    tokenize, tokenize_args, CommandArgs, CommandHandler, CommandRegistry, CommandResult,
    Console, ConsoleClearEvent, ConsoleCommand, ConsoleEditEvent, ConsoleError,
    ConsoleEventsPlugin, ConsoleInputEvent, ConsoleOutputEvent, ConsoleSubmitEvent,
    CredentialCheck, Credentials, DisplayOp, DisplaySurface, InputEdit, InputLine,
    InputSurface, LoginStage, LoginStatus, OutputBuffer, Session, TokenizedCommand,
};
pub use config::ConsoleConfig;

// UI modules (feature-gated)
#[cfg(feature = "egui")]
pub mod logging;
#[cfg(feature = "egui")]
pub mod ui;

// Terminal backend (feature-gated)
#[cfg(feature = "terminal")]
pub mod terminal;

// Persistence module (feature-gated)
#[cfg(feature = "persist")]
pub mod persist;

#[cfg(feature = "egui")]
pub use config::{ConsoleTheme, ConsoleUiConfig};

#[cfg(feature = "persist")]
pub use persist::{ConfigError, DEFAULT_CONFIG_FILE};

#[cfg(feature = "terminal")]
pub use terminal::{TerminalConfig, TerminalPlugin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::core::{
        CommandArgs, CommandResult, Console, ConsoleCommand, ConsoleEditEvent, ConsoleError,
        ConsoleInputEvent, ConsoleOutputEvent, ConsoleSubmitEvent, InputEdit, LoginStage,
        LoginStatus,
    };
    pub use crate::{ConsoleConfig, ConsoleOutput, ConsolePlugin};
}

/// Display buffer of the plugin's [`Console`].
///
/// Shares its lines with the console; the plugin drains newly printed lines
/// into [`ConsoleOutputEvent`]s every frame.
#[derive(Resource, Clone, Debug, Deref)]
pub struct ConsoleOutput(pub OutputBuffer);

/// Main console plugin.
///
/// # Configuration
///
/// ```ignore
/// ConsolePlugin::new(ConsoleConfig::new("Shell").prompt("$").user("alice", "secret"))
/// ```
#[derive(Default)]
pub struct ConsolePlugin {
    /// Config the [`Console`] resource is built from.
    pub config: ConsoleConfig,
}

impl ConsolePlugin {
    /// Create the plugin from a config.
    pub fn new(config: ConsoleConfig) -> Self {
        Self { config }
    }

    /// Create the plugin from a RON config file, falling back to the default
    /// config if it cannot be loaded.
    #[cfg(feature = "persist")]
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Self {
        match ConsoleConfig::load(path) {
            Ok(config) => Self::new(config),
            Err(e) => {
                warn!("{}; using default console config", e);
                Self::default()
            }
        }
    }
}

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        let output = OutputBuffer::new();
        let console = Console::with_display(self.config.clone(), output.clone());

        app.insert_resource(console)
            .insert_resource(ConsoleOutput(output))
            .add_plugins(core::ConsoleEventsPlugin);

        if self.config.builtin_commands {
            app.add_systems(Startup, register_builtin_commands);
        }

        // Three-stage pipeline:
        // 1. apply_console_edits: keystroke-level edits
        // 2. apply_console_input: whole lines, then Enter presses
        // 3. send_console_output: forward printed lines to front ends
        app.add_systems(
            Update,
            (apply_console_edits, apply_console_input, send_console_output).chain(),
        );

        // egui UI (feature-gated)
        #[cfg(feature = "egui")]
        {
            use bevy_egui::EguiPrimaryContextPass;
            use ui::ConsoleUiState;

            app.init_resource::<ConsoleUiState>()
                .init_resource::<ConsoleUiConfig>()
                .add_systems(Update, ui::open_close_ui)
                .add_systems(
                    EguiPrimaryContextPass,
                    ui::render_ui_system.run_if(|s: Res<ConsoleUiState>| s.open),
                );
        }

        // Terminal backend (feature-gated)
        #[cfg(feature = "terminal")]
        {
            app.add_plugins(terminal::TerminalPlugin);
        }
    }
}

/// Register built-in console commands.
fn register_builtin_commands(mut console: ResMut<Console>) {
    let builtins = [
        // clear - Clear the display
        ConsoleCommand::new("clear", |_args, console| {
            console.clear();
            Ok(())
        })
        .description("Clear the console"),
        // login - Start or complete a login
        ConsoleCommand::new("login", |args, console| {
            // Failures are printed by the login flow itself.
            let _ = console.login(args.get(0), args.get(1));
            Ok(())
        })
        .description("Log in: login [user] [password]"),
        // logout - Log the current user out
        ConsoleCommand::new("logout", |_args, console| {
            console.logout();
            Ok(())
        })
        .description("Log out the current user"),
        // whoami - Show the logged-in user
        ConsoleCommand::new("whoami", |_args, console| {
            let line = console
                .current_user()
                .map(str::to_string)
                .unwrap_or_else(|| "No user logged in.".to_string());
            console.print(line);
            Ok(())
        })
        .description("Show the logged-in user"),
    ];

    for command in builtins {
        // Duplicates are reported on the display.
        let _ = console.register(command);
    }
}

/// System that applies edit events to the input line.
pub(crate) fn apply_console_edits(
    mut edits: MessageReader<ConsoleEditEvent>,
    mut console: ResMut<Console>,
) {
    for event in edits.read() {
        console.handle_edit(event.edit.clone());
    }
}

/// System that submits whole lines, then Enter presses.
pub(crate) fn apply_console_input(
    mut lines: MessageReader<ConsoleInputEvent>,
    mut submits: MessageReader<ConsoleSubmitEvent>,
    mut console: ResMut<Console>,
) {
    for event in lines.read() {
        if let Err(e) = console.enter_line(&event.line) {
            debug!("Console input rejected: {}", e);
        }
    }
    for _ in submits.read() {
        if let Err(e) = console.submit() {
            debug!("Console submit rejected: {}", e);
        }
    }
}

/// System that forwards printed lines as output events.
pub(crate) fn send_console_output(
    output: Res<ConsoleOutput>,
    mut line_events: MessageWriter<ConsoleOutputEvent>,
    mut clear_events: MessageWriter<ConsoleClearEvent>,
) {
    for op in output.drain_pending() {
        match op {
            DisplayOp::Line(message) => {
                line_events.write(ConsoleOutputEvent::new(message));
            }
            DisplayOp::Clear => {
                clear_events.write(ConsoleClearEvent);
            }
        }
    }
}
