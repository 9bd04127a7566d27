//! Shared helpers for integration tests.

use std::sync::Arc;

use tilepaint::mercator::TileAddress;
use tilepaint::provider::GeoJsonProvider;
use tilepaint::render::{FixedStyler, ObjectStyle, ObjectStyler, StrokeStyle};
use tilepaint::tile::{TileService, TileServiceOptions};
use tiny_skia::Color;

/// The tile most tests render into.
pub const TEST_ZOOM: u8 = 10;
pub const TEST_X: u32 = 511;
pub const TEST_Y: u32 = 340;

pub fn test_address() -> TileAddress {
    TileAddress::new(TEST_ZOOM, TEST_X, TEST_Y)
}

/// A GeoJSON polygon generously covering the test tile, tagged with the
/// given layer.
pub fn covering_polygon_geojson(layer: &str) -> String {
    let bbox = test_address().bbox_lnglat(256);
    let pad_x = bbox.width();
    let pad_y = bbox.height();
    let (x0, y0) = (bbox.min().x - pad_x, bbox.min().y - pad_y);
    let (x1, y1) = (bbox.max().x + pad_x, bbox.max().y + pad_y);
    format!(
        r#"{{
            "type": "FeatureCollection",
            "features": [
                {{
                    "type": "Feature",
                    "properties": {{ "layer": "{layer}" }},
                    "geometry": {{
                        "type": "Polygon",
                        "coordinates": [[
                            [{x0}, {y0}], [{x1}, {y0}], [{x1}, {y1}],
                            [{x0}, {y1}], [{x0}, {y0}]
                        ]]
                    }}
                }}
            ]
        }}"#
    )
}

pub fn red() -> Color {
    Color::from_rgba8(255, 0, 0, 255)
}

/// Styler painting everything as an opaque red fill with a red outline.
pub fn red_fill_styler<O>() -> Arc<dyn ObjectStyler<O>>
where
    O: Send + Sync + 'static,
{
    Arc::new(FixedStyler::new(ObjectStyle::OutlineFill {
        color: red(),
        stroke: Some(StrokeStyle::Solid { width: 2.0 }),
        fill: red(),
    }))
}

/// Tile service over the given GeoJSON document with a red fill style.
pub fn red_fill_service(geojson: &str) -> TileService<GeoJsonProvider> {
    let provider = GeoJsonProvider::from_str(geojson).expect("test GeoJSON parses");
    TileService::with_options(provider, red_fill_styler(), TileServiceOptions::default())
        .expect("service construction")
}

pub fn is_valid_png(data: &[u8]) -> bool {
    data.len() > 8 && &data[..8] == b"\x89PNG\r\n\x1a\n"
}

/// Decode PNG bytes into an RGBA image.
pub fn decode_png(data: &[u8]) -> image::RgbaImage {
    image::ImageReader::with_format(std::io::Cursor::new(data), image::ImageFormat::Png)
        .decode()
        .expect("response body is a decodable PNG")
        .to_rgba8()
}
