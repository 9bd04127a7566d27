use thiserror::Error;

/// Errors raised by object providers (data-source errors).
///
/// These propagate to the caller uncaught; retry/backoff policy, if any,
/// belongs to the provider implementation.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The spatial query against the backing store failed
    #[error("provider query failed: {0}")]
    Query(String),

    /// The backing store is unreachable or not ready
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The extra key does not identify a known data set
    #[error("unknown data set: {0}")]
    UnknownDataSet(String),
}

/// Errors raised while rasterizing a tile.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// The paint surface could not be allocated
    #[error("cannot allocate a {width}x{height} paint surface")]
    Surface { width: u32, height: u32 },

    /// The tile's projected envelope is degenerate (zero width or height)
    #[error("degenerate tile envelope at zoom {zoom}: {width}x{height} meters")]
    DegenerateEnvelope { zoom: u8, width: f64, height: f64 },
}

/// Errors returned by the tile service.
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// Zoom level exceeds the supported range
    #[error("invalid zoom: {zoom} (maximum is {max_zoom})")]
    InvalidZoom { zoom: u8, max_zoom: u8 },

    /// Tile coordinates are outside the valid range for the zoom level.
    ///
    /// Out-of-range coordinates are rejected, never wrapped modulo.
    #[error("tile ({x}, {y}) at zoom {zoom} is out of bounds (valid range: 0-{max})")]
    TileOutOfBounds { zoom: u8, x: u32, y: u32, max: u32 },

    /// A tile coordinate in the request path could not be parsed
    #[error("cannot parse tile coordinate from {segment:?}")]
    InvalidPath { segment: String },

    /// The object provider failed
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Rasterization failed
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// PNG encoding failed; no partial image is returned
    #[error("failed to encode tile: {message}")]
    Encode { message: String },
}
