//! Tile coordinate math for the XYZ tiling scheme.
//!
//! Pure, stateless functions mapping (zoom, x, y) tile addresses to
//! geographic (WGS84 lng/lat) and projected (spherical Mercator, EPSG:3857)
//! envelopes. These are the usual web-mercator formulas with
//! `originShift = PI * R` and `R = 6378137`; tile boundaries are seamless
//! with adjacent tiles as long as the formulas are evaluated in f64 exactly
//! as written here.
//!
//! The Y axis of tile addresses grows downward (row 0 is the north edge of
//! the map), while projected meters grow upward, hence the sign flips below.

use geo::{coord, Coord, Rect};

/// Equatorial radius of the WGS84 ellipsoid in meters.
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Half the projected extent of the world map in meters (PI * R).
pub const ORIGIN_SHIFT: f64 = std::f64::consts::PI * EARTH_RADIUS;

/// Default square tile size in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Highest zoom level the service accepts.
///
/// 2^30 tiles per axis already exceeds f64 pixel precision at tile size 256;
/// anything deeper cannot produce seamless tiles.
pub const MAX_ZOOM: u8 = 30;

// =============================================================================
// Tile Address
// =============================================================================

/// An XYZ tile address.
///
/// `x` and `y` are valid when inside `[0, 2^zoom)`; use [`TileAddress::is_valid`]
/// before deriving envelopes. A valid address maps to exactly one envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileAddress {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl TileAddress {
    /// Create a new tile address. No validation is performed here.
    pub fn new(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }

    /// Number of tiles per axis at this address's zoom level.
    pub fn tiles_per_axis(&self) -> u64 {
        1u64 << self.zoom
    }

    /// Whether the address is inside the valid range for its zoom level.
    pub fn is_valid(&self) -> bool {
        self.zoom <= MAX_ZOOM
            && (self.x as u64) < self.tiles_per_axis()
            && (self.y as u64) < self.tiles_per_axis()
    }

    /// The tile's geographic envelope in WGS84 lng/lat.
    pub fn bbox_lnglat(&self, tile_size: u32) -> Rect<f64> {
        tile_bbox_lnglat(self.x, self.y, self.zoom, tile_size)
    }

    /// The tile's projected envelope in Mercator meters.
    pub fn bbox_meters(&self, tile_size: u32) -> Rect<f64> {
        tile_bbox_meters(self.x, self.y, self.zoom, tile_size)
    }
}

impl std::fmt::Display for TileAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

// =============================================================================
// Projection Formulas
// =============================================================================

/// Meters per pixel at the equator for the given zoom level.
pub fn resolution(zoom: u8, tile_size: u32) -> f64 {
    (2.0 * std::f64::consts::PI * EARTH_RADIUS / tile_size as f64) / 2f64.powi(zoom as i32)
}

/// Projected meters of the top-left corner of tile `(tx, ty)`.
///
/// Pixel origin is the top-left of the map, meters origin is the map center,
/// so Y is inverted: `my = -py * res + ORIGIN_SHIFT`.
pub fn tile_top_left_meters(tx: u32, ty: u32, zoom: u8, tile_size: u32) -> Coord<f64> {
    let res = resolution(zoom, tile_size);
    let px = tx as f64 * tile_size as f64;
    let py = ty as f64 * tile_size as f64;
    coord! {
        x: px * res - ORIGIN_SHIFT,
        y: -py * res + ORIGIN_SHIFT,
    }
}

/// Inverse spherical Mercator: projected meters to WGS84 lng/lat.
pub fn meters_to_lnglat(mx: f64, my: f64) -> Coord<f64> {
    let lng = (mx / ORIGIN_SHIFT) * 180.0;
    let lat_m = (my / ORIGIN_SHIFT) * 180.0;
    let lat = (180.0 / std::f64::consts::PI)
        * (2.0 * (lat_m * std::f64::consts::PI / 180.0).exp().atan() - std::f64::consts::FRAC_PI_2);
    coord! { x: lng, y: lat }
}

/// Forward spherical Mercator: WGS84 lng/lat to projected meters.
pub fn lnglat_to_meters(lng: f64, lat: f64) -> Coord<f64> {
    let mx = lng / 180.0 * ORIGIN_SHIFT;
    let my = ((90.0 + lat) * std::f64::consts::PI / 360.0).tan().ln()
        / (std::f64::consts::PI / 180.0);
    let my = my / 180.0 * ORIGIN_SHIFT;
    coord! { x: mx, y: my }
}

/// Geographic envelope of tile `(tx, ty)` in WGS84 lng/lat.
///
/// Formed by the top-left corner of `(tx, ty)` and the top-left corner of
/// `(tx + 1, ty + 1)`.
pub fn tile_bbox_lnglat(tx: u32, ty: u32, zoom: u8, tile_size: u32) -> Rect<f64> {
    let tl = tile_top_left_meters(tx, ty, zoom, tile_size);
    let br = tile_top_left_meters(tx + 1, ty + 1, zoom, tile_size);
    let tl = meters_to_lnglat(tl.x, tl.y);
    let br = meters_to_lnglat(br.x, br.y);
    // Rect::new normalizes min/max per axis
    Rect::new(tl, br)
}

/// Projected envelope of tile `(tx, ty)` in Mercator meters.
pub fn tile_bbox_meters(tx: u32, ty: u32, zoom: u8, tile_size: u32) -> Rect<f64> {
    let tl = tile_top_left_meters(tx, ty, zoom, tile_size);
    let br = tile_top_left_meters(tx + 1, ty + 1, zoom, tile_size);
    Rect::new(tl, br)
}

/// The tile address containing a WGS84 coordinate at the given zoom.
///
/// Coordinates on the very edge of the map are clamped into the last
/// tile row/column.
pub fn lnglat_to_tile(lng: f64, lat: f64, zoom: u8, tile_size: u32) -> TileAddress {
    let m = lnglat_to_meters(lng, lat);
    let res = resolution(zoom, tile_size);
    let px = (m.x + ORIGIN_SHIFT) / res;
    let py = (ORIGIN_SHIFT - m.y) / res;
    let last = (1u64 << zoom) - 1;
    let tx = ((px / tile_size as f64).floor() as i64).clamp(0, last as i64) as u32;
    let ty = ((py / tile_size as f64).floor() as i64).clamp(0, last as i64) as u32;
    TileAddress::new(zoom, tx, ty)
}

// =============================================================================
// Tests
// =============================================================================
