//! LRU memo for rendered block trees.
//!
//! `render` is a pure function of the message text, so it is safe to
//! memoize keyed on the input string. The chat view re-renders on every
//! content change; the memo makes re-renders of unchanged messages a
//! lookup. Bounded capacity with LRU eviction.

use crate::markdown::block::Block;
use crate::markdown::parser::render;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Default number of memoized messages.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CACHE_CAPACITY) {
    Some(capacity) => capacity,
    None => panic!("default cache capacity must be non-zero"),
};

/// Memoizing wrapper around [`render`].
///
/// Stores shared `Arc<[Block]>` trees so repeated lookups hand out the
/// same allocation. Capacity 0 falls back to the default.
pub struct RenderCache {
    cache: LruCache<String, Arc<[Block]>>,
}

impl RenderCache {
    /// Create a cache with the given capacity (0 means default).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(FALLBACK_CAPACITY);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Render `content`, reusing the memoized tree when present.
    ///
    /// Updates LRU ordering on hit.
    pub fn render(&mut self, content: &str) -> Arc<[Block]> {
        if let Some(hit) = self.cache.get(content) {
            return Arc::clone(hit);
        }
        let blocks: Arc<[Block]> = render(content).into();
        self.cache.put(content.to_string(), Arc::clone(&blocks));
        blocks
    }

    /// Drop all memoized trees.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Number of memoized messages.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the memo is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

// ===== Tests =====
