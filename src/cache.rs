//! Route resolution caching.
//!
//! Resolving a path means testing regular expressions in registration order,
//! and with polling the same path is resolved over and over. [`RouteCache`]
//! remembers the outcome per path. It is gated behind the `cache` feature and
//! uses the [`lru`] crate so a long session cannot grow it without bound.
//!
//! Misses are cached too: a path that matched no route stays unmatched until
//! the routes change. Registering routes clears the cache.
//!
//! [`CacheStats`] tracks hits, misses and invalidations.
//!
//! # Examples
//!
//! ```
//! use spa_navigator::cache::RouteCache;
//!
//! let mut cache = RouteCache::new();
//! cache.insert("#!/products".to_string(), Some(0));
//!
//! assert_eq!(cache.get("#!/products"), Some(Some(0)));
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking route cache effectiveness.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that had to scan the route table.
    pub misses: usize,
    /// Number of full invalidations (via [`RouteCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache from path to the index of the matching route (or `None` when
/// no route matched).
#[derive(Debug)]
pub struct RouteCache {
    entries: LruCache<String, Option<usize>>,
    stats: CacheStats,
}

impl RouteCache {
    /// Default number of remembered paths.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache remembering up to `capacity` paths.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up the cached resolution of `path`.
    ///
    /// The outer `None` is a cache miss; `Some(None)` is a cached "no route".
    pub fn get(&mut self, path: &str) -> Option<Option<usize>> {
        if let Some(index) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Route cache hit for path: '{}'", path);
            Some(*index)
        } else {
            self.stats.misses += 1;
            trace_log!("Route cache miss for path: '{}'", path);
            None
        }
    }

    /// Remember the resolution of `path`.
    pub fn insert(&mut self, path: String, index: Option<usize>) {
        self.entries.push(path, index);
    }

    /// Forget every resolution and count an invalidation.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Route cache cleared: {} entries removed ({} invalidations, hit rate {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Return the current statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Reset all counters to zero.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    /// Number of remembered paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new()
    }
}
