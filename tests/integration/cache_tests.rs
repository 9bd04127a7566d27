//! Cache behavior tests over the HTTP surface and the tile service.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tilepaint::{create_router, RouterConfig, TileRequest};

use super::test_utils::{
    covering_polygon_geojson, red_fill_service, TEST_X, TEST_Y, TEST_ZOOM,
};

async fn fetch(router: axum::Router, uri: &str) -> (String, bytes::Bytes) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cache_hit = response
        .headers()
        .get("x-tile-cache-hit")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (cache_hit, body)
}

// =============================================================================
// HTTP Cache Behavior
// =============================================================================

#[tokio::test]
async fn test_repeated_request_hits_cache() {
    let service = red_fill_service(&covering_polygon_geojson("roads"));
    let router = create_router(service, RouterConfig::default().with_tracing(false));

    let (first_hit, first_body) = fetch(router.clone(), "/tiles/10/511/340.png").await;
    let (second_hit, second_body) = fetch(router, "/tiles/10/511/340.png").await;

    assert_eq!(first_hit, "false");
    assert_eq!(second_hit, "true");
    assert_eq!(first_body, second_body, "Cached tile must be byte-identical");
}

#[tokio::test]
async fn test_different_layers_cached_separately() {
    let service = red_fill_service(&covering_polygon_geojson("roads"));
    let router = create_router(service, RouterConfig::default().with_tracing(false));

    let (roads_hit, roads_body) =
        fetch(router.clone(), "/tiles/10/511/340.png?layer=roads").await;
    let (rivers_hit, rivers_body) =
        fetch(router, "/tiles/10/511/340.png?layer=rivers").await;

    assert_eq!(roads_hit, "false");
    assert_eq!(rivers_hit, "false", "A different layer is a different key");
    assert_ne!(roads_body, rivers_body);
}

// =============================================================================
// Tile Service Cache Behavior
// =============================================================================

#[tokio::test]
async fn test_empty_tiles_share_one_encoding() {
    let service = red_fill_service(&covering_polygon_geojson("roads"));

    // Two different tiles far away from the polygon are both blank.
    let a = service
        .get_tile(TileRequest::new(TEST_ZOOM, 0, 0, String::new()))
        .await
        .unwrap();
    let b = service
        .get_tile(TileRequest::new(TEST_ZOOM, 1, 1, String::new()))
        .await
        .unwrap();

    assert_eq!(a.data, b.data, "Blank tiles reuse the pre-encoded PNG");
}

#[tokio::test]
async fn test_cache_stats_reflect_usage() {
    let service = red_fill_service(&covering_polygon_geojson("roads"));

    let (size_before, capacity, len_before) = service.cache_stats().await;
    assert_eq!(size_before, 0);
    assert!(capacity > 0);
    assert_eq!(len_before, 0);

    service
        .get_tile(TileRequest::new(TEST_ZOOM, TEST_X, TEST_Y, String::new()))
        .await
        .unwrap();

    let (size_after, _, len_after) = service.cache_stats().await;
    assert!(size_after > 0);
    assert_eq!(len_after, 1);

    service.clear_cache().await;
    let (size_cleared, _, len_cleared) = service.cache_stats().await;
    assert_eq!(size_cleared, 0);
    assert_eq!(len_cleared, 0);
}
