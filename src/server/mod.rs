//! HTTP server layer.
//!
//! This module provides the HTTP API for serving rendered map tiles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │               GET /tiles/{zoom}/{x}/{y}.png                     │
//! │                                                                 │
//! │       ┌──────────────────┐      ┌─────────────────────────┐     │
//! │       │     handlers     │      │         routes          │     │
//! │       │    (requests)    │      │    (router config)      │     │
//! │       └──────────────────┘      └─────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, tile_handler, AppState, ErrorResponse, HealthResponse, TilePathParams,
    TileQueryParams,
};
pub use routes::{create_router, RouterConfig};
