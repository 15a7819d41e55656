//! Bevy plugin driving locomotion from the ECS schedule.
//!
//! Terrain reaches the world either directly as an [`ActiveTerrain`]
//! resource or through a [`TerrainFeed`] wrapping the async channel. The
//! locomotion systems only run once [`ActiveTerrain`] exists, which is the
//! in-engine counterpart of awaiting [`crate::terrain::TerrainWatch::ready`].

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use glam::EulerRot;
use log::{debug, info};

use crate::config::LocomotionConfig;
use crate::locomotion::{
    FallLookLock, LocomotionEngine, LocomotionSnapshot, MovementInput, Transition,
};
use crate::terrain::{FrameHeightCache, GroundQuery, TerrainHandle, TerrainVersion, TerrainWatch};

/// The surface every [`PlayerLocomotion`] ticks against.
#[derive(Resource, Debug, Clone)]
pub struct ActiveTerrain(pub TerrainHandle);

/// Async terrain channel polled once per frame to refresh [`ActiveTerrain`].
#[derive(Resource, Debug, Clone)]
pub struct TerrainFeed(pub TerrainWatch);

/// Locomotion engine attached to a player entity.
#[derive(Component, Debug, Clone)]
pub struct PlayerLocomotion {
    engine: LocomotionEngine,
    bound: Option<TerrainVersion>,
}

impl PlayerLocomotion {
    /// Wraps an engine that has not been bound to any terrain yet.
    #[must_use]
    pub const fn new(engine: LocomotionEngine) -> Self {
        Self {
            engine,
            bound: None,
        }
    }

    /// The wrapped engine.
    #[must_use]
    pub const fn engine(&self) -> &LocomotionEngine {
        &self.engine
    }

    /// Mutable access for respawns.
    pub const fn engine_mut(&mut self) -> &mut LocomotionEngine {
        &mut self.engine
    }

    /// Terrain version the engine last ticked against.
    #[must_use]
    pub const fn bound_version(&self) -> Option<TerrainVersion> {
        self.bound
    }
}

/// Input written by the controls for the next tick. Consumed and reset by
/// [`locomotion_tick_system`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementIntent(pub MovementInput);

/// Raised whenever a player changes locomotion state.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocomotionTransition {
    /// Player entity.
    pub entity: Entity,
    /// What happened.
    pub transition: Transition,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_transition(event: On<LocomotionTransition>) {
    let LocomotionTransition { entity, transition } = event.event();
    debug!("{entity} locomotion transition: {transition:?}");
}

/// Copies the latest published surface from [`TerrainFeed`] into
/// [`ActiveTerrain`] when its version changes.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn sync_terrain_feed_system(
    mut commands: Commands,
    feed: Res<TerrainFeed>,
    active: Option<Res<ActiveTerrain>>,
) {
    let Some(latest) = feed.0.current() else {
        return;
    };
    if active.is_some_and(|terrain| terrain.0.version() == latest.version()) {
        return;
    }
    info!("activating terrain {}", latest.version());
    commands.insert_resource(ActiveTerrain(latest));
}

/// Records the active terrain version on every player, logging rebinds.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn bind_terrain_system(
    terrain: Res<ActiveTerrain>,
    mut players: Query<(Entity, &mut PlayerLocomotion)>,
) {
    let version = terrain.0.version();
    for (entity, mut player) in &mut players {
        if player.bound == Some(version) {
            continue;
        }
        match player.bound {
            Some(previous) => info!("{entity} rebinding terrain {previous} -> {version}"),
            None => info!("{entity} bound to terrain {version}"),
        }
        player.bound = Some(version);
    }
}

/// Advances every player one tick and writes the result to its transform.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn locomotion_tick_system(
    mut commands: Commands,
    time: Res<Time>,
    terrain: Res<ActiveTerrain>,
    config: Res<LocomotionConfig>,
    mut players: Query<(
        Entity,
        &mut PlayerLocomotion,
        &mut Transform,
        Option<&mut MovementIntent>,
        Option<&mut LocomotionSnapshot>,
    )>,
) {
    let ground = FrameHeightCache::new(&terrain.0);
    let dt = time.delta_secs();
    for (entity, mut player, mut transform, intent, observed) in &mut players {
        if config.is_changed() {
            player.engine.set_config(config.clone());
        }
        let input = intent.map_or(MovementInput::IDLE, |mut pending| {
            std::mem::take(&mut pending.0)
        });
        let report = player.engine.step(&ground, &input, dt);
        transform.translation = report.snapshot.position;
        if let Some(mut snapshot) = observed {
            *snapshot = report.snapshot;
        }
        if let Some(transition) = report.transition {
            commands.trigger(LocomotionTransition { entity, transition });
        }
    }
}

/// Pins camera pitch straight down while a player plummets from spawn.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn fall_look_lock_system(
    terrain: Res<ActiveTerrain>,
    config: Res<LocomotionConfig>,
    mut players: Query<(&LocomotionSnapshot, &mut FallLookLock, &mut Transform)>,
) {
    for (snapshot, mut lock, mut transform) in &mut players {
        let position = snapshot.position;
        let ground = terrain.0.height_at(position.x, position.z);
        lock.observe(snapshot, ground, &config);
        if lock.is_engaged() {
            let (yaw, free_pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);
            let (locked_yaw, pitch) = lock.apply(yaw, free_pitch);
            transform.rotation = Quat::from_euler(EulerRot::YXZ, locked_yaw, pitch, 0.0);
        }
    }
}

/// Installs locomotion resources, systems and the transition observer.
///
/// # Examples
///
/// ```ignore
/// use bevy::prelude::*;
/// use frostwalk::plugin::LocomotionPlugin;
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(LocomotionPlugin)
///     .run();
/// ```
#[derive(Debug, Default)]
pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LocomotionConfig>();
        app.add_observer(log_transition);
        app.add_systems(
            Update,
            (
                sync_terrain_feed_system.run_if(resource_exists::<TerrainFeed>),
                (
                    bind_terrain_system,
                    locomotion_tick_system,
                    fall_look_lock_system,
                )
                    .chain()
                    .run_if(resource_exists::<ActiveTerrain>),
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{terrain_channel, GroundFn, SharedSurface};
    use rstest::rstest;
    use std::sync::Arc;

    fn flat(height: f32) -> SharedSurface {
        Arc::new(GroundFn(move |_, _| Some(height)))
    }

    #[rstest]
    fn plugin_inserts_default_config() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(LocomotionPlugin);
        assert_eq!(
            app.world().get_resource::<LocomotionConfig>(),
            Some(&LocomotionConfig::default())
        );
    }

    #[rstest]
    fn plugin_keeps_existing_config() {
        let custom = LocomotionConfig {
            gravity: 10.0,
            ..LocomotionConfig::default()
        };
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(custom.clone());
        app.add_plugins(LocomotionPlugin);
        assert_eq!(app.world().get_resource::<LocomotionConfig>(), Some(&custom));
    }

    #[rstest]
    fn feed_activates_published_terrain() {
        let (mut publisher, watch) = terrain_channel();
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(LocomotionPlugin);
        app.insert_resource(TerrainFeed(watch));

        app.update();
        assert!(!app.world().contains_resource::<ActiveTerrain>());

        publisher.publish(flat(0.0));
        app.update();
        let first = app.world().resource::<ActiveTerrain>();
        assert_eq!(first.0.version(), TerrainVersion(1));

        publisher.publish(flat(3.0));
        app.update();
        let second = app.world().resource::<ActiveTerrain>();
        assert_eq!(second.0.version(), TerrainVersion(2));
    }
}
