//! Cache for encoded PNG tiles.
//!
//! An LRU cache keyed by the full identity of a rendered tile, so repeated
//! requests for the same tile skip the render and encode stages entirely.
//!
//! # Cache Key
//!
//! A tile is identified by:
//! - The provider-specific extra key (data set, layer filter, ...)
//! - Zoom level
//! - Tile X and Y coordinates
//!
//! # Size-Based Eviction
//!
//! The cache tracks the total size of the encoded tiles in bytes and evicts
//! least-recently-used entries once the byte capacity is exceeded. An entry
//! count bound keeps LRU bookkeeping overhead in check.

use std::hash::Hash;

use bytes::Bytes;
use lru::LruCache;
use tokio::sync::RwLock;

/// Default cache capacity: 100MB
pub const DEFAULT_TILE_CACHE_CAPACITY: usize = 100 * 1024 * 1024;

/// Default maximum number of entries (to bound LRU overhead)
const DEFAULT_MAX_ENTRIES: usize = 10_000;

// =============================================================================
// Cache Key
// =============================================================================

/// Cache key for encoded tiles, generic over the provider's extra key.
///
/// Two requests map to the same entry exactly when every field matches, so
/// tiles rendered for different data sets or layer filters never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileCacheKey<K> {
    /// Provider-specific extra key carried through from the request.
    pub extra: K,

    /// Zoom level (0 = whole world in one tile)
    pub zoom: u8,

    /// Tile X coordinate (0-indexed from the west)
    pub x: u32,

    /// Tile Y coordinate (0-indexed from the north)
    pub y: u32,
}

impl<K> TileCacheKey<K> {
    /// Create a new cache key.
    pub fn new(extra: K, zoom: u8, x: u32, y: u32) -> Self {
        Self { extra, zoom, x, y }
    }
}

// =============================================================================
// Tile Cache
// =============================================================================

/// LRU cache for encoded PNG tiles with size-based capacity.
///
/// # Thread Safety
///
/// The cache is thread-safe and can be shared across async tasks via `Arc`.
///
/// # Example
///
/// ```
/// use tilepaint::tile::{TileCache, TileCacheKey};
/// use bytes::Bytes;
///
/// #[tokio::main]
/// async fn main() {
///     let cache: TileCache<String> = TileCache::new();
///
///     let key = TileCacheKey::new("roads".to_string(), 10, 511, 340);
///     let tile_data = Bytes::from_static(b"\x89PNG\r\n\x1a\n");
///
///     cache.put(key.clone(), tile_data.clone()).await;
///     assert_eq!(cache.get(&key).await, Some(tile_data));
/// }
/// ```
pub struct TileCache<K: Eq + Hash> {
    /// The underlying LRU cache
    cache: RwLock<LruCache<TileCacheKey<K>, Bytes>>,

    /// Maximum total size in bytes
    max_size: usize,

    /// Current total size in bytes
    current_size: RwLock<usize>,
}

impl<K: Eq + Hash> TileCache<K> {
    /// Create a new tile cache with default capacity (100MB).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TILE_CACHE_CAPACITY)
    }

    /// Create a new tile cache with the specified capacity in bytes.
    pub fn with_capacity(max_size: usize) -> Self {
        Self::with_capacity_and_entries(max_size, DEFAULT_MAX_ENTRIES)
    }

    /// Create a new tile cache with specified byte capacity and maximum
    /// entry count.
    pub fn with_capacity_and_entries(max_size: usize, max_entries: usize) -> Self {
        Self {
            cache: RwLock::new(LruCache::new(
                std::num::NonZeroUsize::new(max_entries.max(1)).unwrap(),
            )),
            max_size,
            current_size: RwLock::new(0),
        }
    }

    /// Get a tile from the cache.
    ///
    /// Returns `Some(data)` if the tile is cached, `None` otherwise.
    /// This operation marks the entry as recently used.
    pub async fn get(&self, key: &TileCacheKey<K>) -> Option<Bytes> {
        let mut cache = self.cache.write().await;
        cache.get(key).cloned()
    }

    /// Check if a tile is in the cache without updating LRU order.
    pub async fn contains(&self, key: &TileCacheKey<K>) -> bool {
        let cache = self.cache.read().await;
        cache.contains(key)
    }

    /// Store a tile in the cache.
    ///
    /// If the cache is over capacity after insertion, least-recently-used
    /// entries are evicted until the cache is within capacity.
    ///
    /// If the tile already exists, it is updated and marked as recently used.
    pub async fn put(&self, key: TileCacheKey<K>, data: Bytes) {
        let data_size = data.len();
        let mut cache = self.cache.write().await;
        let mut current_size = self.current_size.write().await;

        // If key exists, subtract old size first
        if let Some(old_data) = cache.peek(&key) {
            *current_size = current_size.saturating_sub(old_data.len());
        }

        cache.put(key, data);
        *current_size += data_size;

        // Evict entries until we're under capacity
        while *current_size > self.max_size {
            if let Some((_, evicted_data)) = cache.pop_lru() {
                *current_size = current_size.saturating_sub(evicted_data.len());
            } else {
                // Cache is empty, nothing more to evict
                break;
            }
        }
    }

    /// Remove a tile from the cache.
    ///
    /// Returns the cached data if it existed, `None` otherwise.
    pub async fn remove(&self, key: &TileCacheKey<K>) -> Option<Bytes> {
        let mut cache = self.cache.write().await;
        let mut current_size = self.current_size.write().await;

        if let Some(data) = cache.pop(key) {
            *current_size = current_size.saturating_sub(data.len());
            Some(data)
        } else {
            None
        }
    }

    /// Clear all entries from the cache.
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        let mut current_size = self.current_size.write().await;
        cache.clear();
        *current_size = 0;
    }

    /// Get the current number of cached tiles.
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        let cache = self.cache.read().await;
        cache.is_empty()
    }

    /// Get the current total size of cached tiles in bytes.
    pub async fn size(&self) -> usize {
        let current_size = self.current_size.read().await;
        *current_size
    }

    /// Get the maximum capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

impl<K: Eq + Hash> Default for TileCache<K> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
