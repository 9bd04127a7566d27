//! Tilepaint - a raster tile server for vector map data.
//!
//! This binary loads a GeoJSON data set, starts the HTTP server and wires
//! all components together.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tiny_skia::Color;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tilepaint::{
    config::Config,
    provider::{GeoJsonFeature, GeoJsonProvider, RenderableObject},
    render::{ObjectStyle, ObjectStyler, RenderOptions, StrokeStyle},
    server::{create_router, RouterConfig},
    tile::{TileService, TileServiceOptions},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Data: {}", config.geojson_path);
    info!("  Tile size: {} px", config.tile_size);
    info!("  Max zoom: {}", config.max_zoom);
    if config.cache_bytes > 0 {
        info!("  Cache: {}MB tiles", config.cache_bytes / (1024 * 1024));
    } else {
        info!("  Cache: disabled");
    }

    // Load the data set up front so config errors surface at startup.
    let provider = match GeoJsonProvider::from_path(&config.geojson_path) {
        Ok(provider) => {
            info!("Loaded {} feature(s)", provider.len());
            provider
        }
        Err(e) => {
            error!("Failed to load {}: {}", config.geojson_path, e);
            return ExitCode::FAILURE;
        }
    };

    let service_options = TileServiceOptions {
        render: RenderOptions {
            tile_size: config.tile_size,
            crop_geometries: !config.no_crop,
            padding_share: config.padding_share,
        },
        cache_capacity: (config.cache_bytes > 0).then_some(config.cache_bytes),
        max_zoom: config.max_zoom,
    };

    let tile_service =
        match TileService::with_options(provider, Arc::new(FeatureStyler), service_options) {
            Ok(service) => service,
            Err(e) => {
                error!("Failed to create tile service: {}", e);
                return ExitCode::FAILURE;
            }
        };

    let router = create_router(tile_service, build_router_config(&config));

    let addr = config.bind_address();
    info!("Server listening on http://{}", addr);
    info!("  curl http://{}/health", addr);
    info!("  curl http://{}/tiles/10/511/340.png", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Default Styling
// =============================================================================

/// Styler for GeoJSON features: polygons get a translucent fill, everything
/// else an outline, with strokes widening as zoom increases.
struct FeatureStyler;

impl ObjectStyler<Arc<GeoJsonFeature>> for FeatureStyler {
    fn style_object(&self, feature: &Arc<GeoJsonFeature>, zoom: u8) -> ObjectStyle {
        let outline = Color::from_rgba8(40, 40, 160, 255);
        let width = if zoom >= 14 {
            3.0
        } else if zoom >= 8 {
            2.0
        } else {
            1.0
        };
        let stroke = StrokeStyle::Solid { width };

        match feature.geometry() {
            geo::Geometry::Polygon(_) | geo::Geometry::MultiPolygon(_) => {
                let fill = Color::from_rgba8(40, 40, 160, 64);
                ObjectStyle::OutlineFill {
                    color: outline,
                    stroke: Some(stroke),
                    fill,
                }
            }
            _ => ObjectStyle::outline_with(outline, stroke),
        }
    }
}

// =============================================================================
// Setup Helpers
// =============================================================================

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "tilepaint=debug,tower_http=debug"
    } else {
        "tilepaint=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config =
        RouterConfig::default().with_cache_max_age(config.cache_max_age);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}
