//! Shared, versioned terrain surfaces.
//!
//! Terrain loads asynchronously. The loader owns a [`TerrainPublisher`] and
//! pushes each finished surface through it; consumers hold a
//! [`TerrainWatch`] and either wait for the first surface with
//! [`TerrainWatch::ready`] or poll [`TerrainWatch::current`] each frame.
//! Every publish bumps the [`TerrainVersion`], so a consumer holding an older
//! [`TerrainHandle`] can tell it has gone stale.

use std::fmt;
use std::sync::Arc;

use log::info;
use thiserror::Error;
use tokio::sync::watch;

use super::GroundQuery;

/// A terrain surface shared between threads.
pub type SharedSurface = Arc<dyn GroundQuery + Send + Sync>;

/// Monotonic identifier of a published surface. The first publish is `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TerrainVersion(pub u64);

impl fmt::Display for TerrainVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Errors raised while waiting for terrain.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TerrainError {
    /// The publisher was dropped before any surface was published.
    #[error("terrain publisher closed before a surface was published")]
    PublisherClosed,
}

/// Cheap clonable reference to a published surface.
#[derive(Clone)]
pub struct TerrainHandle {
    surface: SharedSurface,
    version: TerrainVersion,
}

impl TerrainHandle {
    /// Wraps a surface outside of any channel, e.g. for tests or a static
    /// level.
    #[must_use]
    pub const fn new(surface: SharedSurface, version: TerrainVersion) -> Self {
        Self { surface, version }
    }

    /// Version this handle was published under.
    #[must_use]
    pub const fn version(&self) -> TerrainVersion {
        self.version
    }

    /// The underlying surface.
    #[must_use]
    pub const fn surface(&self) -> &SharedSurface {
        &self.surface
    }
}

impl fmt::Debug for TerrainHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerrainHandle")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl GroundQuery for TerrainHandle {
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.surface.height_at(x, z)
    }
}

/// Creates a connected publisher/watch pair with no surface yet.
#[must_use]
pub fn terrain_channel() -> (TerrainPublisher, TerrainWatch) {
    let (sender, receiver) = watch::channel(None);
    (
        TerrainPublisher {
            sender,
            next: TerrainVersion(1),
        },
        TerrainWatch { receiver },
    )
}

/// Loader side of the terrain channel.
#[derive(Debug)]
pub struct TerrainPublisher {
    sender: watch::Sender<Option<TerrainHandle>>,
    next: TerrainVersion,
}

impl TerrainPublisher {
    /// Publishes `surface`, replacing any previous one, and returns its
    /// version. Publishing succeeds even with no watchers attached.
    pub fn publish(&mut self, surface: SharedSurface) -> TerrainVersion {
        let version = self.next;
        self.next = TerrainVersion(version.0.saturating_add(1));
        self.sender
            .send_replace(Some(TerrainHandle::new(surface, version)));
        info!("published terrain {version}");
        version
    }

    /// Creates another watch on this channel.
    #[must_use]
    pub fn subscribe(&self) -> TerrainWatch {
        TerrainWatch {
            receiver: self.sender.subscribe(),
        }
    }
}

/// Consumer side of the terrain channel.
#[derive(Debug, Clone)]
pub struct TerrainWatch {
    receiver: watch::Receiver<Option<TerrainHandle>>,
}

impl TerrainWatch {
    /// Latest published surface, if any. Never blocks.
    #[must_use]
    pub fn current(&self) -> Option<TerrainHandle> {
        self.receiver.borrow().clone()
    }

    /// Whether `handle` is still the latest published surface.
    #[must_use]
    pub fn is_current(&self, handle: &TerrainHandle) -> bool {
        self.receiver
            .borrow()
            .as_ref()
            .is_some_and(|latest| latest.version == handle.version)
    }

    /// Waits until a surface has been published.
    ///
    /// Resolves immediately when one already exists.
    ///
    /// # Errors
    /// Returns [`TerrainError::PublisherClosed`] if the publisher is dropped
    /// before publishing anything.
    pub async fn ready(&mut self) -> Result<TerrainHandle, TerrainError> {
        let latest = self
            .receiver
            .wait_for(Option::is_some)
            .await
            .map_err(|_| TerrainError::PublisherClosed)?;
        latest.clone().ok_or(TerrainError::PublisherClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::GroundFn;

    fn flat(height: f32) -> SharedSurface {
        Arc::new(GroundFn(move |_, _| Some(height)))
    }

    #[test]
    fn versions_increase_per_publish() {
        let (mut publisher, watch) = terrain_channel();
        assert!(watch.current().is_none());

        let first = publisher.publish(flat(0.0));
        let second = publisher.publish(flat(4.0));
        assert_eq!(first, TerrainVersion(1));
        assert_eq!(second, TerrainVersion(2));

        let handle = watch.current().expect("published");
        assert_eq!(handle.version(), second);
        assert_eq!(handle.height_at(0.0, 0.0), Some(4.0));
    }

    #[test]
    fn older_handles_are_stale() {
        let (mut publisher, watch) = terrain_channel();
        publisher.publish(flat(0.0));
        let old = watch.current().expect("published");
        assert!(watch.is_current(&old));

        publisher.publish(flat(1.0));
        assert!(!watch.is_current(&old));
        assert_eq!(old.height_at(0.0, 0.0), Some(0.0));
    }

    #[tokio::test]
    async fn ready_fails_when_publisher_drops() {
        let (publisher, mut watch) = terrain_channel();
        drop(publisher);
        assert_eq!(watch.ready().await.err(), Some(TerrainError::PublisherClosed));
    }

    #[test]
    fn subscribers_see_later_publishes() {
        let (mut publisher, first) = terrain_channel();
        let second = publisher.subscribe();
        let version = publisher.publish(flat(2.0));
        assert_eq!(first.current().map(|h| h.version()), Some(version));
        assert_eq!(second.current().map(|h| h.version()), Some(version));
    }
}
