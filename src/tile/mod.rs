//! Tile service layer.
//!
//! This module provides tile generation and caching for serving rendered
//! map tiles over HTTP.
//!
//! # Architecture
//!
//! The tile service sits between the HTTP layer and the object provider:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              Tile Service               │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  TileCache   │  │  TileRenderer   │  │
//! │  │  (encoded    │  │  (project →     │  │
//! │  │   PNGs)      │  │   paint → PNG)  │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            ObjectProvider               │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TileService`]: Main entry point for tile requests, orchestrates the full pipeline
//! - [`TileCache`]: LRU cache for encoded PNG tiles with size-based eviction
//! - [`TileCacheKey`]: Composite key for tile identification (extra key, zoom, coords)
//! - [`PngTileEncoder`]: Encodes rendered surfaces as PNG
//! - [`TileRequest`]: Parameters for a tile request
//! - [`TileResponse`]: Response containing tile data and metadata

mod cache;
mod encoder;
mod service;

pub use cache::{TileCache, TileCacheKey, DEFAULT_TILE_CACHE_CAPACITY};
pub use encoder::PngTileEncoder;
pub use service::{TileRequest, TileResponse, TileService, TileServiceOptions};
