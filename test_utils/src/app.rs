//! Headless Bevy harness.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use frostwalk::locomotion::{FallLookLock, LocomotionEngine, LocomotionSnapshot};
use frostwalk::plugin::{LocomotionPlugin, MovementIntent, PlayerLocomotion};

/// App with `MinimalPlugins`, [`LocomotionPlugin`] and a fixed frame time of
/// `frame_seconds`.
#[must_use]
pub fn headless_app(frame_seconds: f32) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            frame_seconds,
        )))
        .add_plugins(LocomotionPlugin);
    app
}

/// Spawns a player entity carrying every locomotion component.
pub fn spawn_player(app: &mut App, engine: LocomotionEngine) -> Entity {
    let position = engine.state().position;
    app.world_mut()
        .spawn((
            PlayerLocomotion::new(engine),
            Transform::from_translation(position),
            MovementIntent::default(),
            LocomotionSnapshot::default(),
            FallLookLock::default(),
        ))
        .id()
}
