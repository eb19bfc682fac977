//! Egui console example.
//!
//! Run with: `cargo run --example egui`
//!
//! Controls:
//! - Press ` (grave/tilde) to toggle the console
//! - Press Enter to submit
//!
//! Try these commands:
//! - `help` - List all commands
//! - `spawn` / `despawn` - Spawn/despawn entities
//! - `color red` - Recolor entities (requires login as alice/secret)
//! - `login`, `logout`, `whoami`, `clear`

use std::sync::{Arc, Mutex};

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_prompt_console::prelude::*;

/// Requests made by console commands, applied by [`apply_requests`].
#[derive(Resource, Clone, Default)]
struct Requests(Arc<Mutex<Vec<Request>>>);

enum Request {
    Spawn,
    Despawn,
    Recolor(Color),
}

/// Marker for demo entities.
#[derive(Component)]
struct DemoEntity;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(LogPlugin {
            custom_layer: bevy_prompt_console::logging::custom_log_layer,
            ..default()
        }))
        .add_plugins(bevy_egui::EguiPlugin::default())
        .add_plugins(ConsolePlugin::new(
            ConsoleConfig::new("Demo Console")
                .version("1.0")
                .author("the demo")
                .mirror_logs(true)
                .user("alice", "secret"),
        ))
        .init_resource::<Requests>()
        .add_systems(Startup, setup)
        .add_systems(Update, apply_requests)
        .run();
}

fn setup(mut commands: Commands, mut console: ResMut<Console>, requests: Res<Requests>) {
    commands.spawn(Camera2d);

    let queue = requests.0.clone();
    let _ = console.register(
        ConsoleCommand::new("spawn", move |_args, _console| {
            queue.lock().map_err(|_| ConsoleError::custom("queue poisoned"))?.push(Request::Spawn);
            Ok(())
        })
        .description("Spawn a demo entity"),
    );

    let queue = requests.0.clone();
    let _ = console.register(
        ConsoleCommand::new("despawn", move |_args, _console| {
            queue.lock().map_err(|_| ConsoleError::custom("queue poisoned"))?.push(Request::Despawn);
            Ok(())
        })
        .description("Despawn all demo entities"),
    );

    let queue = requests.0.clone();
    let _ = console.register(
        ConsoleCommand::new("color", move |args, _console| {
            let color = match args.get(0) {
                Some("red") => Color::srgb(0.8, 0.2, 0.2),
                Some("green") => Color::srgb(0.3, 0.7, 0.3),
                Some("blue") => Color::srgb(0.2, 0.4, 0.9),
                Some(other) => return Err(ConsoleError::custom(format!("Unknown color '{}'", other))),
                None => return Err(ConsoleError::custom("Usage: color <red|green|blue>")),
            };
            queue.lock().map_err(|_| ConsoleError::custom("queue poisoned"))?.push(Request::Recolor(color));
            Ok(())
        })
        .description("Recolor demo entities")
        .requires_login(),
    );

    info!("Press ` to open the console. Try: help, spawn, color red");
}

fn apply_requests(
    mut commands: Commands,
    requests: Res<Requests>,
    mut sprites: Query<(Entity, &mut Sprite), With<DemoEntity>>,
) {
    let Ok(mut queue) = requests.0.lock() else {
        return;
    };
    for request in queue.drain(..) {
        match request {
            Request::Spawn => {
                let offset = sprites.iter().count() as f32 * 60.0;
                commands.spawn((
                    Sprite {
                        color: Color::srgb(0.3, 0.7, 0.3),
                        custom_size: Some(Vec2::new(50.0, 50.0)),
                        ..default()
                    },
                    Transform::from_xyz(offset - 200.0, 0.0, 0.0),
                    DemoEntity,
                ));
                info!("Spawned entity");
            }
            Request::Despawn => {
                let mut count = 0;
                for (entity, _) in &sprites {
                    commands.entity(entity).despawn();
                    count += 1;
                }
                info!("Despawned {} entities", count);
            }
            Request::Recolor(color) => {
                for (_, mut sprite) in &mut sprites {
                    sprite.color = color;
                }
            }
        }
    }
}
