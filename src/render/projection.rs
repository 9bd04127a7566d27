//! Geographic-to-pixel projection for a single tile.
//!
//! A [`Projector`] is built for one tile's Mercator envelope and maps
//! lng/lat geometry into that tile's local pixel space, where (0, 0) is the
//! tile's top-left corner and +Y points down. Projection and rasterization
//! geometry conversion live here so the render pipeline only ever sees
//! pixel-space paths.

use geo::{Coord, Geometry, LineString, MapCoords, Point, Polygon, Rect};
use tiny_skia::{Path, PathBuilder};

use crate::mercator::{lnglat_to_meters, TileAddress};

/// Radius in pixels used to rasterize point geometries.
const POINT_RADIUS: f32 = 0.5;

// =============================================================================
// Projector
// =============================================================================

/// Maps lng/lat coordinates into the local pixel space of one tile.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    min_x: f64,
    min_y: f64,
    width: f64,
    height: f64,
    tile_size: f64,
}

impl Projector {
    /// Projector for the given tile at the given pixel resolution.
    pub fn for_tile(address: TileAddress, tile_size: u32) -> Self {
        Self::for_envelope(address.bbox_meters(tile_size), tile_size)
    }

    /// Projector for an arbitrary Mercator-meter envelope. The envelope must
    /// have positive extent in both axes.
    pub fn for_envelope(envelope: Rect<f64>, tile_size: u32) -> Self {
        Self {
            min_x: envelope.min().x,
            min_y: envelope.min().y,
            width: envelope.width(),
            height: envelope.height(),
            tile_size: f64::from(tile_size),
        }
    }

    /// Project one lng/lat coordinate to tile-local pixels.
    ///
    /// The Mercator Y axis points up but pixel Y points down, hence the
    /// vertical flip.
    pub fn project(&self, lnglat: Coord<f64>) -> Coord<f64> {
        let m = lnglat_to_meters(lnglat.x, lnglat.y);
        Coord {
            x: (m.x - self.min_x) / self.width * self.tile_size,
            y: self.tile_size - (m.y - self.min_y) / self.height * self.tile_size,
        }
    }

    /// Project a whole geometry from lng/lat into tile-local pixels.
    pub fn project_geometry(&self, geometry: &Geometry<f64>) -> Geometry<f64> {
        geometry.map_coords(|c| self.project(c))
    }
}

// =============================================================================
// Geometry -> Path
// =============================================================================

/// Convert a pixel-space geometry into a drawable path.
///
/// Polygons become closed subpaths (exterior plus holes, relying on the fill
/// rule to carve interiors), line strings become open polylines and points
/// become tiny circles. Returns `None` when the geometry has no drawable
/// content.
pub fn geometry_to_path(geometry: &Geometry<f64>) -> Option<Path> {
    let mut builder = PathBuilder::new();
    append_geometry(&mut builder, geometry);
    builder.finish()
}

fn append_geometry(builder: &mut PathBuilder, geometry: &Geometry<f64>) {
    match geometry {
        Geometry::Point(point) => append_point(builder, point),
        Geometry::MultiPoint(points) => {
            for point in points {
                append_point(builder, point);
            }
        }
        Geometry::Line(line) => {
            builder.move_to(line.start.x as f32, line.start.y as f32);
            builder.line_to(line.end.x as f32, line.end.y as f32);
        }
        Geometry::LineString(line) => append_line_string(builder, line, false),
        Geometry::MultiLineString(lines) => {
            for line in lines {
                append_line_string(builder, line, false);
            }
        }
        Geometry::Polygon(polygon) => append_polygon(builder, polygon),
        Geometry::MultiPolygon(polygons) => {
            for polygon in polygons {
                append_polygon(builder, polygon);
            }
        }
        Geometry::GeometryCollection(collection) => {
            for inner in collection {
                append_geometry(builder, inner);
            }
        }
        Geometry::Rect(rect) => append_polygon(builder, &rect.to_polygon()),
        Geometry::Triangle(triangle) => append_polygon(builder, &triangle.to_polygon()),
    }
}

fn append_point(builder: &mut PathBuilder, point: &Point<f64>) {
    builder.push_circle(point.x() as f32, point.y() as f32, POINT_RADIUS);
}

fn append_line_string(builder: &mut PathBuilder, line: &LineString<f64>, close: bool) {
    let mut coords = line.coords();
    let Some(first) = coords.next() else {
        return;
    };
    builder.move_to(first.x as f32, first.y as f32);
    let mut any = false;
    for coord in coords {
        builder.line_to(coord.x as f32, coord.y as f32);
        any = true;
    }
    if close && any {
        builder.close();
    }
}

fn append_polygon(builder: &mut PathBuilder, polygon: &Polygon<f64>) {
    append_line_string(builder, polygon.exterior(), true);
    for interior in polygon.interiors() {
        append_line_string(builder, interior, true);
    }
}

// =============================================================================
// Tests
// =============================================================================
