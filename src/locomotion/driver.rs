//! Couples an engine to the terrain channel outside of Bevy.
//!
//! The driver re-checks the published terrain version before every tick so
//! the engine never steps against a surface that has been replaced.

use log::info;

use super::engine::{LocomotionEngine, TickReport};
use super::intent::MovementInput;
use crate::terrain::{FrameHeightCache, TerrainError, TerrainHandle, TerrainVersion, TerrainWatch};

/// What happened during [`LocomotionDriver::frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// The engine ticked against the surface it was already bound to.
    Advanced(TickReport),
    /// A newer surface was picked up before ticking.
    Rebound {
        /// Version now bound.
        version: TerrainVersion,
        /// Tick result against the new surface.
        report: TickReport,
    },
    /// No terrain has been published yet; the engine did not tick.
    Waiting,
}

/// Owns a [`LocomotionEngine`] and keeps it bound to the latest terrain.
#[derive(Debug)]
pub struct LocomotionDriver {
    engine: LocomotionEngine,
    watch: TerrainWatch,
    bound: Option<TerrainHandle>,
}

impl LocomotionDriver {
    /// Creates a driver with no surface bound yet.
    #[must_use]
    pub const fn new(engine: LocomotionEngine, watch: TerrainWatch) -> Self {
        Self {
            engine,
            watch,
            bound: None,
        }
    }

    /// The driven engine.
    #[must_use]
    pub const fn engine(&self) -> &LocomotionEngine {
        &self.engine
    }

    /// Mutable access for respawns and config changes.
    pub const fn engine_mut(&mut self) -> &mut LocomotionEngine {
        &mut self.engine
    }

    /// Version of the bound surface, if any.
    #[must_use]
    pub fn bound_version(&self) -> Option<TerrainVersion> {
        self.bound.as_ref().map(TerrainHandle::version)
    }

    /// Waits until terrain is available and binds it.
    ///
    /// # Errors
    /// Returns [`TerrainError::PublisherClosed`] if the loader went away
    /// without publishing.
    pub async fn wait_for_terrain(&mut self) -> Result<TerrainVersion, TerrainError> {
        let handle = self.watch.ready().await?;
        let version = handle.version();
        info!("terrain {version} ready");
        self.bound = Some(handle);
        Ok(version)
    }

    /// Runs one tick, rebinding first if a newer surface was published.
    pub fn frame(&mut self, input: &MovementInput, dt: f32) -> FrameOutcome {
        let rebound = self.refresh();
        let Some(handle) = self.bound.as_ref() else {
            return FrameOutcome::Waiting;
        };
        let cache = FrameHeightCache::new(handle);
        let report = self.engine.step(&cache, input, dt);
        rebound.map_or(FrameOutcome::Advanced(report), |version| {
            FrameOutcome::Rebound { version, report }
        })
    }

    fn refresh(&mut self) -> Option<TerrainVersion> {
        if self
            .bound
            .as_ref()
            .is_some_and(|handle| self.watch.is_current(handle))
        {
            return None;
        }
        let latest = self.watch.current()?;
        let version = latest.version();
        if let Some(previous) = self.bound_version() {
            info!("terrain {previous} replaced by {version}; rebinding");
        } else {
            info!("binding terrain {version}");
        }
        self.bound = Some(latest);
        Some(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocomotionConfig;
    use crate::terrain::{terrain_channel, GroundFn, SharedSurface};
    use approx::assert_relative_eq;
    use glam::Vec3;
    use std::sync::Arc;

    fn flat(height: f32) -> SharedSurface {
        Arc::new(GroundFn(move |_, _| Some(height)))
    }

    fn driver(watch: TerrainWatch) -> LocomotionDriver {
        LocomotionDriver::new(
            LocomotionEngine::new(LocomotionConfig::default(), Vec3::new(0.0, 20.0, 0.0)),
            watch,
        )
    }

    #[test]
    fn waits_until_terrain_exists() {
        let (mut publisher, watch) = terrain_channel();
        let mut driver = driver(watch);
        assert_eq!(driver.frame(&MovementInput::IDLE, 0.016), FrameOutcome::Waiting);
        assert_eq!(driver.engine().state().position.y, 20.0);

        publisher.publish(flat(0.0));
        assert!(matches!(
            driver.frame(&MovementInput::IDLE, 0.016),
            FrameOutcome::Rebound { version: TerrainVersion(1), .. }
        ));
        assert!(matches!(
            driver.frame(&MovementInput::IDLE, 0.016),
            FrameOutcome::Advanced(_)
        ));
    }

    #[test]
    fn stale_surface_is_replaced_before_ticking() {
        let (mut publisher, watch) = terrain_channel();
        let mut driver = driver(watch);
        publisher.publish(flat(0.0));
        for _ in 0..200 {
            driver.frame(&MovementInput::IDLE, 0.016);
        }
        assert!(driver.engine().state().grounded);

        publisher.publish(flat(5.0));
        let outcome = driver.frame(&MovementInput::IDLE, 0.016);
        assert!(matches!(
            outcome,
            FrameOutcome::Rebound { version: TerrainVersion(2), .. }
        ));
        assert_eq!(driver.bound_version(), Some(TerrainVersion(2)));
        assert_relative_eq!(driver.engine().state().position.y, 6.6);
    }
}
