//! Tile Service for orchestrating tile generation.
//!
//! The TileService is the main entry point for tile requests. It orchestrates:
//! - Request validation
//! - Cache lookups
//! - Object retrieval via the provider
//! - Rasterization and PNG encoding
//! - Result caching
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         TileService                              │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │                    get_tile()                           │    │
//! │  │  1. Validate address  4. Render objects                 │    │
//! │  │  2. Check cache       5. Encode as PNG                  │    │
//! │  │  3. Fetch objects     6. Cache & return                 │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! │           │                    │                    │            │
//! │           ▼                    ▼                    ▼            │
//! │    ┌───────────┐      ┌──────────────┐    ┌──────────────────┐  │
//! │    │ TileCache │      │ObjectProvider│    │  PngTileEncoder  │  │
//! │    └───────────┘      └──────────────┘    └──────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concurrent requests for the same tile are coalesced with a singleflight
//! scheme: one task renders while the others wait for its result, so a
//! burst of identical requests costs one provider query and one render.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{Mutex, Notify};
use tracing::debug;

use crate::error::TileError;
use crate::mercator::{TileAddress, MAX_ZOOM};
use crate::provider::ObjectProvider;
use crate::render::{ObjectStyler, RenderOptions, TileRenderer};

use super::cache::{TileCache, TileCacheKey, DEFAULT_TILE_CACHE_CAPACITY};
use super::encoder::PngTileEncoder;

// =============================================================================
// Service Options
// =============================================================================

/// Configuration for a [`TileService`].
#[derive(Debug, Clone)]
pub struct TileServiceOptions {
    /// Rasterization options (tile size, cropping).
    pub render: RenderOptions,

    /// Byte capacity for the encoded tile cache; `None` disables caching.
    pub cache_capacity: Option<usize>,

    /// Highest zoom level the service accepts.
    pub max_zoom: u8,
}

impl Default for TileServiceOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            cache_capacity: Some(DEFAULT_TILE_CACHE_CAPACITY),
            max_zoom: MAX_ZOOM,
        }
    }
}

// =============================================================================
// Tile Request
// =============================================================================

/// A request for a tile.
#[derive(Debug, Clone)]
pub struct TileRequest<K> {
    /// Zoom level (0 = whole world in one tile)
    pub zoom: u8,

    /// Tile X coordinate (0-indexed from the west)
    pub x: u32,

    /// Tile Y coordinate (0-indexed from the north)
    pub y: u32,

    /// Provider-specific extra key (data set, layer filter, ...)
    pub extra: K,
}

impl<K> TileRequest<K> {
    pub fn new(zoom: u8, x: u32, y: u32, extra: K) -> Self {
        Self { zoom, x, y, extra }
    }
}

// =============================================================================
// Tile Response
// =============================================================================

/// Response from the tile service.
#[derive(Debug, Clone)]
pub struct TileResponse {
    /// The encoded PNG tile data
    pub data: Bytes,

    /// Whether this tile was served without rendering, either from the
    /// cache or by waiting on an identical in-flight request.
    pub cache_hit: bool,
}

// =============================================================================
// Tile Service
// =============================================================================

/// Shared result slot for requests coalesced onto one render.
struct InFlightTile {
    notify: Notify,
    result: Mutex<Option<Result<Bytes, TileError>>>,
}

/// Service for generating and caching map tiles.
///
/// The same tile request always yields byte-identical PNG data: rendering
/// is deterministic, tiles covering no objects share one pre-encoded blank
/// tile, and the cache stores the exact bytes that were first produced.
///
/// # Type Parameters
///
/// * `P` - The object provider supplying renderable objects per tile
///
/// # Example
///
/// ```ignore
/// use tilepaint::tile::{TileRequest, TileService};
///
/// let service = TileService::new(provider, styler)?;
///
/// let request = TileRequest::new(10, 511, 340, "roads".to_string());
/// let response = service.get_tile(request).await?;
///
/// println!("{} bytes, cache hit: {}", response.data.len(), response.cache_hit);
/// ```
pub struct TileService<P: ObjectProvider> {
    /// Source of renderable objects
    provider: P,

    /// Resolves a style per (object, zoom)
    styler: Arc<dyn ObjectStyler<P::Object>>,

    /// Rasterizer
    renderer: TileRenderer,

    /// PNG encoder
    encoder: PngTileEncoder,

    /// Cache for encoded tiles, if enabled
    cache: Option<TileCache<P::Key>>,

    /// In-flight renders for the singleflight pattern
    in_flight: Mutex<HashMap<TileCacheKey<P::Key>, Arc<InFlightTile>>>,

    /// Pre-encoded transparent tile shared by all empty responses
    blank_tile: Bytes,

    /// Highest accepted zoom level
    max_zoom: u8,
}

impl<P: ObjectProvider> TileService<P> {
    /// Create a new tile service with default options.
    ///
    /// # Errors
    ///
    /// Fails only if the shared blank tile cannot be encoded, which implies
    /// an invalid tile size.
    pub fn new(provider: P, styler: Arc<dyn ObjectStyler<P::Object>>) -> Result<Self, TileError> {
        Self::with_options(provider, styler, TileServiceOptions::default())
    }

    /// Create a new tile service with custom options.
    pub fn with_options(
        provider: P,
        styler: Arc<dyn ObjectStyler<P::Object>>,
        options: TileServiceOptions,
    ) -> Result<Self, TileError> {
        let encoder = PngTileEncoder::new();
        let blank_tile = encoder.encode_blank(options.render.tile_size)?;
        Ok(Self {
            provider,
            styler,
            renderer: TileRenderer::new(options.render),
            encoder,
            cache: options.cache_capacity.map(TileCache::with_capacity),
            in_flight: Mutex::new(HashMap::new()),
            blank_tile,
            max_zoom: options.max_zoom,
        })
    }

    /// Get a tile, using the cache and request coalescing when possible.
    ///
    /// This is the main entry point for tile requests. It:
    /// 1. Validates the tile address
    /// 2. Checks the cache for an existing tile
    /// 3. Joins an identical in-flight render, or renders and caches
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The zoom level exceeds the configured maximum
    /// - The tile coordinates are out of bounds for the zoom level
    /// - The provider query fails
    /// - Rendering or encoding fails
    pub async fn get_tile(&self, request: TileRequest<P::Key>) -> Result<TileResponse, TileError> {
        if request.zoom > self.max_zoom {
            return Err(TileError::InvalidZoom {
                zoom: request.zoom,
                max_zoom: self.max_zoom,
            });
        }
        let address = TileAddress::new(request.zoom, request.x, request.y);
        if !address.is_valid() {
            return Err(TileError::TileOutOfBounds {
                zoom: request.zoom,
                x: request.x,
                y: request.y,
                max: address.tiles_per_axis().saturating_sub(1).min(u32::MAX as u64) as u32,
            });
        }

        let cache_key = TileCacheKey::new(request.extra, request.zoom, request.x, request.y);

        // Join an in-flight render or become the leader. The cache check is
        // part of the loop so a task that raced past a finished leader picks
        // up the freshly cached tile instead of rendering it again.
        loop {
            if let Some(cache) = &self.cache {
                if let Some(cached_data) = cache.get(&cache_key).await {
                    return Ok(TileResponse {
                        data: cached_data,
                        cache_hit: true,
                    });
                }
            }

            let state = {
                let mut in_flight = self.in_flight.lock().await;

                if let Some(state) = in_flight.get(&cache_key) {
                    // Another task is rendering this tile
                    state.clone()
                } else {
                    let state = Arc::new(InFlightTile {
                        notify: Notify::new(),
                        result: Mutex::new(None),
                    });
                    in_flight.insert(cache_key.clone(), state.clone());
                    drop(in_flight);

                    let result = self.generate_tile(address, &cache_key.extra).await;

                    {
                        let mut result_guard = state.result.lock().await;
                        *result_guard = Some(result.clone());
                    }

                    if let (Some(cache), Ok(data)) = (&self.cache, &result) {
                        cache.put(cache_key.clone(), data.clone()).await;
                    }

                    {
                        let mut in_flight = self.in_flight.lock().await;
                        in_flight.remove(&cache_key);
                    }
                    state.notify.notify_waiters();

                    return result.map(|data| TileResponse {
                        data,
                        cache_hit: false,
                    });
                }
            };

            // Register for the leader's wakeup before reading the result.
            // notify_waiters only wakes already-registered futures, so
            // enabling first closes the window where the leader finishes
            // between our in_flight lookup and the wait.
            let notified = state.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let result_guard = state.result.lock().await;
                if let Some(ref result) = *result_guard {
                    return result.clone().map(|data| TileResponse {
                        data,
                        cache_hit: true,
                    });
                }
            }

            // Wait for the leader to finish
            notified.await;

            let result_guard = state.result.lock().await;
            if let Some(ref result) = *result_guard {
                return result.clone().map(|data| TileResponse {
                    data,
                    cache_hit: true,
                });
            }

            // Result not yet available, loop back (shouldn't normally happen)
        }
    }

    /// Render and encode a tile without touching the cache.
    pub async fn generate_tile(
        &self,
        address: TileAddress,
        extra: &P::Key,
    ) -> Result<Bytes, TileError> {
        let window = self.renderer.query_window(address);
        let objects = self
            .provider
            .get_objects(address.zoom, window, extra)
            .await?;

        if objects.is_empty() {
            debug!(%address, "no objects in tile window, serving blank tile");
            return Ok(self.blank_tile.clone());
        }

        debug!(%address, objects = objects.len(), "rendering tile");
        let surface = self
            .renderer
            .render(address, &objects, self.styler.as_ref())?;
        self.encoder.encode(&surface)
    }

    /// Get tile cache statistics.
    ///
    /// Returns `(current_size, capacity, entry_count)`; zeros when the
    /// cache is disabled.
    pub async fn cache_stats(&self) -> (usize, usize, usize) {
        match &self.cache {
            Some(cache) => (cache.size().await, cache.capacity(), cache.len().await),
            None => (0, 0, 0),
        }
    }

    /// Clear the tile cache.
    pub async fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear().await;
        }
    }

    /// The highest zoom level this service accepts.
    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    /// Edge length of served tiles in pixels.
    pub fn tile_size(&self) -> u32 {
        self.renderer.options().tile_size
    }
}

// =============================================================================
// Tests
// =============================================================================
