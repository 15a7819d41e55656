//! Headless locomotion runner.
//!
//! Drops a player onto flat, ramped or procedural terrain, runs the Bevy
//! schedule for a fixed number of frames and logs the final snapshot as JSON.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::{Parser, ValueEnum};
use log::info;

use frostwalk::constants::{MOVE_SPEED, RUN_MULTIPLIER};
use frostwalk::locomotion::{FallLookLock, LocomotionEngine, LocomotionSnapshot, MovementInput};
use frostwalk::terrain::{procedural, terrain_channel, HeightField, SharedSurface};
use frostwalk::{
    init_logging, LocomotionConfig, LocomotionPlugin, MovementIntent, PlayerLocomotion,
    TerrainFeed,
};

/// Fixed frame time used by the headless loop.
const FRAME_SECONDS: f32 = 1.0 / 60.0;

/// Frames between progress lines.
const REPORT_INTERVAL: u32 = 60;

/// Surfaces the runner can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TerrainKind {
    /// Level ground at y = 0.
    Flat,
    /// A 35 degree incline, steep enough to slide down.
    Ramp,
    /// Procedural rolling hills.
    Hills,
}

/// Headless locomotion runner: drops a player onto terrain and logs the result
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON file overriding locomotion tuning
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u32,
    /// Terrain to walk on
    #[arg(short, long, value_enum, default_value_t = TerrainKind::Hills)]
    terrain: TerrainKind,
    /// Spawn height above the origin
    #[arg(long, default_value_t = 100.0)]
    spawn_height: f32,
    /// Hold the forward key for the whole run
    #[arg(long)]
    walk: bool,
}

fn build_terrain(kind: TerrainKind) -> Result<SharedSurface> {
    let field: HeightField = match kind {
        TerrainKind::Flat => procedural::flat(0.0),
        TerrainKind::Ramp => procedural::ramp(35.0),
        TerrainKind::Hills => procedural::rolling_hills(),
    }
    .with_context(|| format!("failed to build {kind:?} terrain"))?;
    Ok(Arc::new(field))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.config.as_deref().map_or_else(
        || Ok(LocomotionConfig::default()),
        |path| {
            LocomotionConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))
        },
    )?;
    let surface = build_terrain(args.terrain)?;
    let (mut publisher, watch) = terrain_channel();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            FRAME_SECONDS,
        )))
        .insert_resource(config.clone())
        .insert_resource(TerrainFeed(watch))
        .add_plugins(LocomotionPlugin);

    let spawn = Vec3::new(0.0, args.spawn_height, 0.0);
    let player = app
        .world_mut()
        .spawn((
            PlayerLocomotion::new(LocomotionEngine::new(config, spawn)),
            Transform::from_translation(spawn),
            MovementIntent::default(),
            LocomotionSnapshot::default(),
            FallLookLock::default(),
        ))
        .id();

    publisher.publish(surface);
    let forward = MovementInput::from_local_axes(1.0, 0.0, 0.0, MOVE_SPEED, false, RUN_MULTIPLIER);

    for frame in 1..=args.frames {
        if args.walk {
            if let Some(mut intent) = app.world_mut().get_mut::<MovementIntent>(player) {
                intent.0 = forward;
            }
        }
        app.update();
        if frame % REPORT_INTERVAL == 0 {
            if let Some(snapshot) = app.world().get::<LocomotionSnapshot>(player) {
                info!(
                    "frame {frame}: position {} grounded {} slope {:.1}",
                    snapshot.position, snapshot.grounded, snapshot.slope_angle
                );
            }
        }
    }

    let snapshot = app
        .world()
        .get::<LocomotionSnapshot>(player)
        .copied()
        .context("player entity lost its locomotion snapshot")?;
    let summary = serde_json::to_string(&snapshot).context("failed to encode snapshot")?;
    info!("final state after {} frames: {summary}", args.frames);
    Ok(())
}
