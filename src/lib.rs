//! # Tilepaint
//!
//! A raster tile server for vector map data.
//!
//! This library renders XYZ map tiles (the slippy-map scheme used by web
//! map clients) on demand: a tile request selects the objects intersecting
//! the tile's geographic envelope, projects them through spherical Mercator
//! into pixel space, paints them with per-object styles and returns the
//! result as PNG. The same request always produces byte-identical output.
//!
//! ## Features
//!
//! - **XYZ tile math**: seamless tile envelopes in lng/lat and Mercator meters
//! - **Declarative styling**: outline/fill/pattern styles resolved per
//!   (object, zoom), including decorated strokes (shapes repeated along a path)
//! - **Pluggable data sources**: any [`provider::ObjectProvider`] works; an
//!   in-memory GeoJSON provider is included
//! - **Caching and coalescing**: size-bounded LRU cache for encoded tiles,
//!   singleflight for concurrent identical requests
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`mercator`] - XYZ tile addresses and projection formulas
//! - [`render`] - projection, styles, decorated strokes, rasterization
//! - [`provider`] - object source abstraction and GeoJSON provider
//! - [`tile`] - tile service, PNG encoding and caching
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tilepaint::provider::GeoJsonProvider;
//! use tilepaint::render::{FixedStyler, ObjectStyle};
//! use tilepaint::tile::{TileRequest, TileService};
//! use tiny_skia::Color;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GeoJsonProvider::from_path("data/roads.geojson")?;
//!     let styler = Arc::new(FixedStyler::new(ObjectStyle::outline(Color::BLACK)));
//!     let service = TileService::new(provider, styler)?;
//!
//!     let tile = service
//!         .get_tile(TileRequest::new(10, 511, 340, String::new()))
//!         .await?;
//!     println!("{} bytes", tile.data.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod mercator;
pub mod provider;
pub mod render;
pub mod server;
pub mod tile;

// Re-export commonly used types
pub use config::Config;
pub use error::{ProviderError, RenderError, TileError};
pub use mercator::{TileAddress, DEFAULT_TILE_SIZE, MAX_ZOOM};
pub use provider::{GeoJsonFeature, GeoJsonProvider, ObjectProvider, RenderableObject};
pub use render::{
    decorated_outline, FillPattern, FixedStyler, ObjectStyle, ObjectStyler, PathDecorationSpec,
    Projector, RenderOptions, ShapePainter, StrokeStyle, TileRenderer, ZoomBandedStyler,
};
pub use server::{create_router, AppState, RouterConfig};
pub use tile::{
    PngTileEncoder, TileCache, TileCacheKey, TileRequest, TileResponse, TileService,
    TileServiceOptions, DEFAULT_TILE_CACHE_CAPACITY,
};
