//! Per-frame memoization of ground queries.
//!
//! A tick probes the same handful of points repeatedly (current position,
//! the two slope samples, the destination). Wrapping the surface in a
//! [`FrameHeightCache`] for the frame keeps mesh ray casts from being
//! repeated. Drop or [`clear`](FrameHeightCache::clear) it between frames.

use std::cell::{Cell, RefCell};

use hashbrown::HashMap;
use ordered_float::OrderedFloat;

use super::GroundQuery;

type Key = (OrderedFloat<f32>, OrderedFloat<f32>);

/// Hit and miss counters for a [`FrameHeightCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u32,
    /// Lookups forwarded to the wrapped surface.
    pub misses: u32,
}

/// Memoizing [`GroundQuery`] wrapper. Both present and absent heights are
/// remembered.
#[derive(Debug)]
pub struct FrameHeightCache<Q> {
    inner: Q,
    entries: RefCell<HashMap<Key, Option<f32>>>,
    hits: Cell<u32>,
    misses: Cell<u32>,
}

impl<Q: GroundQuery> FrameHeightCache<Q> {
    /// Wraps `inner` with an empty cache.
    #[must_use]
    pub fn new(inner: Q) -> Self {
        Self {
            inner,
            entries: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Forgets every cached height and resets the counters.
    pub fn clear(&mut self) {
        self.entries.get_mut().clear();
        self.hits.set(0);
        self.misses.set(0);
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
        }
    }

    /// Unwraps the underlying surface.
    #[must_use]
    pub fn into_inner(self) -> Q {
        self.inner
    }
}

impl<Q: GroundQuery> GroundQuery for FrameHeightCache<Q> {
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        let key = (OrderedFloat(x), OrderedFloat(z));
        if let Some(&cached) = self.entries.borrow().get(&key) {
            self.hits.set(self.hits.get().saturating_add(1));
            return cached;
        }
        let height = self.inner.height_at(x, z);
        self.entries.borrow_mut().insert(key, height);
        self.misses.set(self.misses.get().saturating_add(1));
        height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::MockGroundQuery;
    use mockall::predicate::eq;

    #[test]
    fn repeated_queries_hit_the_surface_once() {
        let mut mock = MockGroundQuery::new();
        mock.expect_height_at()
            .with(eq(1.0_f32), eq(2.0_f32))
            .times(1)
            .return_const(Some(7.5_f32));
        let cache = FrameHeightCache::new(mock);

        assert_eq!(cache.height_at(1.0, 2.0), Some(7.5));
        assert_eq!(cache.height_at(1.0, 2.0), Some(7.5));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn absent_heights_are_cached_too() {
        let mut mock = MockGroundQuery::new();
        mock.expect_height_at().times(1).return_const(None::<f32>);
        let cache = FrameHeightCache::new(mock);

        assert_eq!(cache.height_at(500.0, 0.0), None);
        assert_eq!(cache.height_at(500.0, 0.0), None);
    }

    #[test]
    fn clear_forces_a_fresh_lookup() {
        let mut mock = MockGroundQuery::new();
        mock.expect_height_at().times(2).return_const(Some(0.0_f32));
        let mut cache = FrameHeightCache::new(mock);

        let _ = cache.height_at(0.0, 0.0);
        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
        let _ = cache.height_at(0.0, 0.0);
    }

    #[test]
    fn into_inner_returns_the_surface() {
        let mut mock = MockGroundQuery::new();
        mock.expect_height_at().times(1).return_const(Some(3.0_f32));
        let cache = FrameHeightCache::new(mock);
        let _ = cache.height_at(0.0, 0.0);

        let surface = cache.into_inner();
        assert_eq!(surface.height_at(9.0, 9.0), Some(3.0));
    }
}
