//! HTTP request handlers.
//!
//! Handler functions for the tile endpoint and health check, plus the
//! request/response parameter types and the mapping from [`TileError`] to
//! HTTP responses.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{ProviderError, TileError};
use crate::provider::ObjectProvider;
use crate::tile::{TileRequest, TileService};

// =============================================================================
// Application State
// =============================================================================

/// Shared state for HTTP handlers.
pub struct AppState<P: ObjectProvider> {
    /// The tile service handling tile generation
    pub tile_service: Arc<TileService<P>>,

    /// Cache-Control max-age for tile responses (seconds)
    pub cache_max_age: u32,
}

impl<P: ObjectProvider> AppState<P> {
    /// Create new application state with default cache headers (1 hour).
    pub fn new(tile_service: TileService<P>) -> Self {
        Self::with_cache_max_age(tile_service, 3600)
    }

    /// Create new application state with a custom Cache-Control max-age.
    pub fn with_cache_max_age(tile_service: TileService<P>, cache_max_age: u32) -> Self {
        Self {
            tile_service: Arc::new(tile_service),
            cache_max_age,
        }
    }
}

impl<P: ObjectProvider> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            tile_service: self.tile_service.clone(),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Path parameters for tile requests.
#[derive(Debug, Deserialize)]
pub struct TilePathParams {
    /// Zoom level
    pub zoom: u8,

    /// Tile X coordinate
    pub x: u32,

    /// Y coordinate with optional extension, e.g. "340" or "340.png"
    pub filename: String,
}

impl TilePathParams {
    /// Parse the Y coordinate from the filename, accepting a bare number
    /// or a `.png` suffix.
    pub fn y(&self) -> Result<u32, std::num::ParseIntError> {
        let y_str = self.filename.strip_suffix(".png").unwrap_or(&self.filename);
        y_str.parse()
    }
}

/// Query parameters for tile requests.
#[derive(Debug, Deserialize)]
pub struct TileQueryParams {
    /// Layer filter passed through to the object provider; empty or absent
    /// means all layers.
    #[serde(default)]
    pub layer: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error type
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: status.as_u16(),
        }
    }
}

/// Health check response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("healthy")
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert TileError to HTTP response.
///
/// - 4xx errors are logged at WARN level (client errors), except 404s
///   which are common and logged at DEBUG
/// - 5xx errors are logged at ERROR level (server errors)
impl IntoResponse for TileError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            TileError::InvalidZoom { zoom, max_zoom } => (
                StatusCode::BAD_REQUEST,
                "invalid_zoom",
                format!("Invalid zoom: {} (valid range: 0-{})", zoom, max_zoom),
            ),

            TileError::TileOutOfBounds { zoom, x, y, max } => (
                StatusCode::BAD_REQUEST,
                "tile_out_of_bounds",
                format!(
                    "Tile ({}, {}) at zoom {} is out of bounds (valid range: 0-{})",
                    x, y, zoom, max
                ),
            ),

            TileError::InvalidPath { segment } => (
                StatusCode::BAD_REQUEST,
                "invalid_path",
                format!("Cannot parse tile coordinate from {:?}", segment),
            ),

            TileError::Provider(ProviderError::UnknownDataSet(name)) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Unknown data set: {}", name),
            ),

            TileError::Provider(ProviderError::Unavailable(msg)) => (
                StatusCode::BAD_GATEWAY,
                "provider_unavailable",
                format!("Object provider unavailable: {}", msg),
            ),

            TileError::Provider(ProviderError::Query(msg)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "provider_error",
                format!("Object query failed: {}", msg),
            ),

            TileError::Render(render_err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "render_error",
                format!("Failed to render tile: {}", render_err),
            ),

            TileError::Encode { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "encode_error",
                format!("Failed to encode tile: {}", message),
            ),
        };

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else if status == StatusCode::NOT_FOUND {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                message
            );
        } else if status.is_client_error() {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::new(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

/// Wrapper for handler errors to implement IntoResponse.
pub struct HandlerError(pub TileError);

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        self.0.into_response()
    }
}

impl From<TileError> for HandlerError {
    fn from(err: TileError) -> Self {
        HandlerError(err)
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle tile requests.
///
/// # Endpoint
///
/// `GET /tiles/{zoom}/{x}/{y}.png`
///
/// # Path Parameters
///
/// - `zoom`: Zoom level (0 = whole world in one tile)
/// - `x`: Tile X coordinate (0-indexed from the west)
/// - `y`: Tile Y coordinate (0-indexed from the north)
///
/// # Query Parameters
///
/// - `layer`: Layer filter forwarded to the object provider (optional)
///
/// # Response
///
/// - `200 OK`: PNG tile image with `Content-Type: image/png`
/// - `400 Bad Request`: Invalid zoom or tile coordinates
/// - `404 Not Found`: Unknown data set
/// - `500 Internal Server Error`: Render or encode error
/// - `502 Bad Gateway`: Object provider unavailable
///
/// # Headers
///
/// - `Content-Type: image/png`
/// - `Cache-Control: public, max-age={cache_max_age}`
/// - `X-Tile-Cache-Hit: true|false`
pub async fn tile_handler<P>(
    State(state): State<AppState<P>>,
    Path(params): Path<TilePathParams>,
    Query(query): Query<TileQueryParams>,
) -> Result<Response, HandlerError>
where
    P: ObjectProvider<Key = String>,
{
    // Parse Y coordinate from filename (handles both "340" and "340.png")
    let y = params.y().map_err(|_| {
        HandlerError(TileError::InvalidPath {
            segment: params.filename.clone(),
        })
    })?;

    let request = TileRequest::new(params.zoom, params.x, y, query.layer.unwrap_or_default());
    let response = state.tile_service.get_tile(request).await?;

    let http_response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.cache_max_age),
        )
        .header("X-Tile-Cache-Hit", response.cache_hit.to_string())
        .body(axum::body::Body::from(response.data))
        .map_err(|e| {
            HandlerError(TileError::Encode {
                message: e.to_string(),
            })
        })?;

    Ok(http_response)
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
