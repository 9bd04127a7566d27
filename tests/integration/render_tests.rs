//! End-to-end rendering tests driving the tile service directly.

use std::sync::Arc;

use geo::{Coord, LineString};
use tilepaint::provider::{GeoJsonFeature, GeoJsonProvider};
use tilepaint::render::{FixedStyler, ObjectStyle, PathDecorationSpec, StrokeStyle};
use tilepaint::{TileRequest, TileService, TileServiceOptions};

use super::test_utils::{
    covering_polygon_geojson, decode_png, is_valid_png, red, red_fill_service, test_address,
    TEST_X, TEST_Y, TEST_ZOOM,
};

fn test_request() -> TileRequest<String> {
    TileRequest::new(TEST_ZOOM, TEST_X, TEST_Y, String::new())
}

// =============================================================================
// Pixel-Level Rendering
// =============================================================================

#[tokio::test]
async fn test_covering_polygon_paints_whole_tile() {
    let service = red_fill_service(&covering_polygon_geojson("roads"));
    let response = service.get_tile(test_request()).await.unwrap();

    assert!(is_valid_png(&response.data));
    let img = decode_png(&response.data);
    assert_eq!(img.dimensions(), (256, 256));
    for (x, y) in [(0, 0), (128, 128), (255, 255), (0, 255)] {
        assert_eq!(img.get_pixel(x, y).0, [255, 0, 0, 255], "pixel ({x}, {y})");
    }
}

#[tokio::test]
async fn test_empty_region_is_fully_transparent() {
    let service = red_fill_service(&covering_polygon_geojson("roads"));
    let response = service
        .get_tile(TileRequest::new(TEST_ZOOM, 0, 0, String::new()))
        .await
        .unwrap();

    let img = decode_png(&response.data);
    assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 0]));
}

#[tokio::test]
async fn test_decorated_stroke_renders_marks() {
    // A horizontal line through the middle of the test tile.
    let bbox = test_address().bbox_lnglat(256);
    let line = LineString::new(vec![
        Coord {
            x: bbox.min().x,
            y: bbox.center().y,
        },
        Coord {
            x: bbox.max().x,
            y: bbox.center().y,
        },
    ]);
    let feature = GeoJsonFeature::new(line.into(), serde_json::Map::new());
    let provider = GeoJsonProvider::from_features(vec![feature]);

    let styler = Arc::new(FixedStyler::new(ObjectStyle::Outline {
        color: red(),
        stroke: Some(StrokeStyle::Decorated(PathDecorationSpec::tick(
            16.0, 2.0, 8.0, 2.0,
        ))),
    }));
    let service =
        TileService::with_options(provider, styler, TileServiceOptions::default()).unwrap();

    let img = decode_png(&service.get_tile(test_request()).await.unwrap().data);

    // The line itself crosses the tile center.
    assert_eq!(img.get_pixel(128, 128).0, [255, 0, 0, 255]);

    // Ticks extend above the line, well past the bare 2px stroke.
    let painted_above = (0..256).any(|x| img.get_pixel(x, 122).0[3] != 0);
    assert!(painted_above, "Tick marks should extend beyond the line");
}

// =============================================================================
// Determinism
// =============================================================================

#[tokio::test]
async fn test_independent_services_render_identical_tiles() {
    let geojson = covering_polygon_geojson("roads");
    let a = red_fill_service(&geojson);
    let b = red_fill_service(&geojson);

    let tile_a = a.get_tile(test_request()).await.unwrap();
    let tile_b = b.get_tile(test_request()).await.unwrap();

    assert_eq!(tile_a.data, tile_b.data);
}
