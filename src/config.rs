//! Configuration management.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `TILEPAINT_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use tilepaint::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}:{}", config.host, config.port);
//! println!("Data: {}", config.geojson_path);
//! ```
//!
//! # Environment Variables
//!
//! All configuration options can be set via environment variables with the
//! `TILEPAINT_` prefix:
//!
//! - `TILEPAINT_HOST` - Server bind address (default: 0.0.0.0)
//! - `TILEPAINT_PORT` - Server port (default: 3000)
//! - `TILEPAINT_GEOJSON` - Path to the GeoJSON data file (required)
//! - `TILEPAINT_TILE_SIZE` - Tile edge length in pixels (default: 256)
//! - `TILEPAINT_MAX_ZOOM` - Highest accepted zoom level (default: 30)
//! - `TILEPAINT_CACHE_BYTES` - Tile cache capacity in bytes (default: 100MB)
//! - `TILEPAINT_PADDING_SHARE` - Crop window padding fraction (default: 0.125)
//! - `TILEPAINT_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 3600)

use clap::Parser;

use crate::mercator::{DEFAULT_TILE_SIZE, MAX_ZOOM};
use crate::tile::DEFAULT_TILE_CACHE_CAPACITY;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default crop window padding as a fraction of the tile extent.
pub const DEFAULT_PADDING_SHARE: f64 = 0.125;

/// Default HTTP cache max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Tilepaint - a raster tile server for vector map data.
///
/// Renders XYZ map tiles (PNG) from a GeoJSON data set on demand, with an
/// in-memory LRU cache for encoded tiles.
#[derive(Parser, Debug, Clone)]
#[command(name = "tilepaint")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "TILEPAINT_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "TILEPAINT_PORT")]
    pub port: u16,

    // =========================================================================
    // Data Configuration
    // =========================================================================
    /// Path to the GeoJSON file with the objects to render.
    #[arg(long, env = "TILEPAINT_GEOJSON")]
    pub geojson_path: String,

    // =========================================================================
    // Tile Configuration
    // =========================================================================
    /// Tile edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "TILEPAINT_TILE_SIZE")]
    pub tile_size: u32,

    /// Highest zoom level the server accepts.
    #[arg(long, default_value_t = MAX_ZOOM, env = "TILEPAINT_MAX_ZOOM")]
    pub max_zoom: u8,

    /// Crop window padding as a fraction of the tile extent (0.0 - 1.0).
    #[arg(long, default_value_t = DEFAULT_PADDING_SHARE, env = "TILEPAINT_PADDING_SHARE")]
    pub padding_share: f64,

    /// Disable geometry cropping before projection.
    #[arg(long, default_value_t = false, env = "TILEPAINT_NO_CROP")]
    pub no_crop: bool,

    // =========================================================================
    // Cache Configuration
    // =========================================================================
    /// Tile cache capacity in bytes (0 disables the cache).
    #[arg(long, default_value_t = DEFAULT_TILE_CACHE_CAPACITY, env = "TILEPAINT_CACHE_BYTES")]
    pub cache_bytes: usize,

    /// HTTP Cache-Control max-age in seconds.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "TILEPAINT_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "TILEPAINT_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.geojson_path.is_empty() {
            return Err(
                "GeoJSON path is required. Set --geojson-path or TILEPAINT_GEOJSON".to_string(),
            );
        }

        if self.tile_size == 0 || self.tile_size > 4096 {
            return Err("tile_size must be between 1 and 4096".to_string());
        }

        if self.max_zoom > MAX_ZOOM {
            return Err(format!("max_zoom must be at most {}", MAX_ZOOM));
        }

        if !(0.0..1.0).contains(&self.padding_share) {
            return Err("padding_share must be in [0.0, 1.0)".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            geojson_path: "data/roads.geojson".to_string(),
            tile_size: 256,
            max_zoom: 22,
            padding_share: 0.125,
            no_crop: false,
            cache_bytes: 50 * 1024 * 1024,
            cache_max_age: 7200,
            cors_origins: None,
            verbose: false,
            no_tracing: false,
        }
    }

    #[test]
    fn test_valid_config() {
        let config = test_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_geojson_path() {
        let mut config = test_config();
        config.geojson_path = String::new();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("GeoJSON"));
    }

    #[test]
    fn test_invalid_tile_size() {
        let mut config = test_config();
        config.tile_size = 0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.tile_size = 8192;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_max_zoom() {
        let mut config = test_config();
        config.max_zoom = MAX_ZOOM + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_padding_share() {
        let mut config = test_config();
        config.padding_share = 1.0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.padding_share = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_cache_disables_cache() {
        let mut config = test_config();
        config.cache_bytes = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_address() {
        let config = test_config();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_cors_origins() {
        let mut config = test_config();
        config.cors_origins = Some(vec![
            "https://example.com".to_string(),
            "https://other.com".to_string(),
        ]);
        assert!(config.validate().is_ok());
        assert_eq!(config.cors_origins.as_ref().unwrap().len(), 2);
    }
}
