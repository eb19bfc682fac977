//! Minimal headless console example.
//!
//! Drives the console programmatically without any UI, including a login
//! triggered by a gated command.
//!
//! Run with: `cargo run --example minimal --no-default-features`

use bevy::prelude::*;
use bevy_prompt_console::prelude::*;

fn main() {
    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(ConsolePlugin::new(
            ConsoleConfig::new("Minimal Console")
                .version("1.0")
                .author("demo")
                .user("alice", "secret"),
        ))
        .add_systems(Startup, setup)
        .add_systems(Update, print_outputs)
        .add_systems(Update, send_test_commands.run_if(run_once))
        .run();
}

fn setup(mut console: ResMut<Console>) {
    let _ = console.register(
        ConsoleCommand::new("greet", |args, console| {
            let name = args.unquoted(0).unwrap_or("World");
            console.print(format!("Hello, {}!", name));
            Ok(())
        })
        .description("Greet someone"),
    );

    let _ = console.register(
        ConsoleCommand::new("secrets", |_args, console| {
            let user = console.current_user().unwrap_or_default().to_string();
            console.print(format!("The vault is open, {}.", user));
            Ok(())
        })
        .description("Show the secrets")
        .requires_login(),
    );
}

/// Send some test input programmatically.
fn send_test_commands(mut events: MessageWriter<ConsoleInputEvent>) {
    events.write(ConsoleInputEvent::new("help"));
    events.write(ConsoleInputEvent::new(r#"greet "Ann Lee""#));
    events.write(ConsoleInputEvent::new("frobnicate"));

    // The gated command asks for credentials, then runs once logged in
    events.write(ConsoleInputEvent::new("secrets"));
    events.write(ConsoleInputEvent::new("alice"));
    events.write(ConsoleInputEvent::new("secret"));
}

/// Print console output events.
fn print_outputs(mut events: MessageReader<ConsoleOutputEvent>) {
    for event in events.read() {
        println!("{}", event.message);
    }
}
