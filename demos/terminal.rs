//! Terminal console example.
//!
//! Uses stdin/stdout as the console surfaces, for headless applications.
//!
//! Run with: `cargo run --example terminal --no-default-features --features terminal`
//!
//! Commands:
//! - `help` - List available commands
//! - `uptime` - Show how long the app has been running
//! - `login` / `logout` / `whoami` - Session commands
//! - `shutdown` - Exit the application (requires login as admin/admin)

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_prompt_console::prelude::*;

/// Set by the `shutdown` command.
#[derive(Resource, Clone, Default)]
struct ShutdownFlag(std::sync::Arc<std::sync::atomic::AtomicBool>);

fn main() {
    let shutdown = ShutdownFlag::default();

    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(ConsolePlugin::new(
            ConsoleConfig::new("Server Console")
                .version("0.3")
                .prompt("server>")
                .user("admin", "admin"),
        ))
        .insert_resource(shutdown)
        .add_systems(Startup, setup)
        .add_systems(Update, exit_on_shutdown)
        .run();
}

fn setup(mut console: ResMut<Console>, shutdown: Res<ShutdownFlag>, time: Res<Time<Real>>) {
    let started = time.startup();
    let _ = console.register(
        ConsoleCommand::new("uptime", move |_args, console| {
            console.print(format!("Up for {:.1?}", started.elapsed()));
            Ok(())
        })
        .description("Show how long the app has been running"),
    );

    let flag = shutdown.0.clone();
    let _ = console.register(
        ConsoleCommand::new("shutdown", move |_args, console| {
            console.print("Shutting down...");
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        })
        .description("Exit the application")
        .requires_login(),
    );
}

fn exit_on_shutdown(shutdown: Res<ShutdownFlag>, mut exit: MessageWriter<AppExit>) {
    if shutdown.0.load(std::sync::atomic::Ordering::SeqCst) {
        exit.write(AppExit::Success);
    }
}
