//! API integration tests for tile retrieval and error handling.
//!
//! Tests verify:
//! - Tile retrieval over the HTTP router
//! - Error cases (invalid zoom, out-of-range coordinates)
//! - HTTP response codes, headers and bodies

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tilepaint::{create_router, RouterConfig};

use super::test_utils::{covering_polygon_geojson, decode_png, is_valid_png, red_fill_service};

fn test_router() -> axum::Router {
    let service = red_fill_service(&covering_polygon_geojson("roads"));
    create_router(service, RouterConfig::default().with_tracing(false))
}

async fn get(router: axum::Router, uri: &str) -> axum::http::Response<axum::body::Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.oneshot(request).await.unwrap()
}

// =============================================================================
// Basic Tile Retrieval
// =============================================================================

#[tokio::test]
async fn test_tile_retrieval_success() {
    let response = get(test_router(), "/tiles/10/511/340.png").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "image/png");
    assert!(response.headers().contains_key("cache-control"));
    assert_eq!(response.headers().get("x-tile-cache-hit").unwrap(), "false");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(is_valid_png(&body), "Response should be a valid PNG");

    // The covering polygon paints the whole tile red.
    let img = decode_png(&body);
    assert_eq!(img.dimensions(), (256, 256));
    assert_eq!(img.get_pixel(128, 128).0, [255, 0, 0, 255]);
}

#[tokio::test]
async fn test_tile_retrieval_without_extension() {
    let response = get(test_router(), "/tiles/10/511/340").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "image/png");
}

#[tokio::test]
async fn test_empty_area_serves_transparent_tile() {
    // A tile on the other side of the world has no objects.
    let response = get(test_router(), "/tiles/10/100/340.png").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let img = decode_png(&body);
    assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 0]));
}

// =============================================================================
// Layer Filtering
// =============================================================================

#[tokio::test]
async fn test_layer_query_filters_features() {
    let router = test_router();

    // Matching layer paints the tile.
    let response = get(router.clone(), "/tiles/10/511/340.png?layer=roads").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(decode_png(&body).get_pixel(128, 128).0, [255, 0, 0, 255]);

    // A different layer yields a blank tile.
    let response = get(router, "/tiles/10/511/340.png?layer=rivers").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(decode_png(&body).pixels().all(|p| p.0 == [0, 0, 0, 0]));
}

// =============================================================================
// Error Handling
// =============================================================================

#[tokio::test]
async fn test_invalid_zoom_rejected() {
    let response = get(test_router(), "/tiles/31/0/0.png").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "invalid_zoom");
}

#[tokio::test]
async fn test_out_of_range_coordinates_rejected() {
    // Zoom 10 has tiles 0..1024 per axis.
    let response = get(test_router(), "/tiles/10/1024/0.png").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "tile_out_of_bounds");
    assert_eq!(error["status"], 400);
}

#[tokio::test]
async fn test_unparsable_y_rejected() {
    let response = get(test_router(), "/tiles/10/511/x.png").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["error"], "invalid_path");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = get(test_router(), "/tiles/10/511").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Health Check
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let response = get(test_router(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "healthy");
    assert!(health["version"].is_string());
}
