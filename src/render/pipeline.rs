//! Tile rendering pipeline.
//!
//! Pure rasterization stage: given a tile address and the objects that
//! intersect it, produce an RGBA surface. No I/O, no caching, no encoding.
//!
//! ```text
//!  objects ──► style lookup ──► crop ──► project ──► path ──► paint
//!                 (styler)    (meters)  (lng/lat        (tiny-skia)
//!                                        to pixels)
//! ```
//!
//! Objects are painted in input order, each in up to three passes (outline
//! stroke, then solid fill, then pattern fill) so later objects composite
//! over earlier ones.

use std::panic::{self, AssertUnwindSafe};

use geo::{BooleanOps, BoundingRect, Geometry, MultiLineString, Rect};
use tiny_skia::{FillRule, LineCap, Paint, Path, Pattern, Pixmap, SpreadMode, Stroke, Transform};
use tracing::debug;

use crate::error::RenderError;
use crate::mercator::{meters_to_lnglat, TileAddress};
use crate::provider::RenderableObject;
use crate::render::decoration::decorated_outline;
use crate::render::projection::{geometry_to_path, Projector};
use crate::render::style::{
    FillPattern, ObjectStyle, ObjectStyler, StrokeStyle, DEFAULT_STROKE_WIDTH,
};

// =============================================================================
// Options
// =============================================================================

/// Rendering knobs, fixed per renderer instance.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Edge length of the square output surface in pixels.
    pub tile_size: u32,

    /// Clip object geometries to the padded tile window before projecting.
    /// Purely an optimization; the painted result is unchanged because
    /// out-of-window fragments would land outside the surface anyway.
    pub crop_geometries: bool,

    /// Fraction of the tile extent added on every side of the crop window,
    /// so strokes near tile edges are not cut visibly short. Measured in
    /// projected meter space, where it is an exact fraction of the tile.
    /// Must be in `[0, 1)`.
    pub padding_share: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tile_size: crate::mercator::DEFAULT_TILE_SIZE,
            crop_geometries: true,
            padding_share: 0.125,
        }
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Stateless tile rasterizer.
#[derive(Debug, Clone)]
pub struct TileRenderer {
    options: RenderOptions,
}

impl TileRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The padded lng/lat window objects should be fetched for when
    /// rendering `address`, matching the crop window used by [`render`].
    ///
    /// [`render`]: TileRenderer::render
    pub fn query_window(&self, address: TileAddress) -> Rect<f64> {
        padded_window(
            address,
            self.options.tile_size,
            self.options.padding_share,
        )
    }

    /// Rasterize `objects` onto a fresh transparent surface for `address`.
    ///
    /// Styles are resolved per object at the tile's zoom level. Objects
    /// whose geometry misses the padded tile window are skipped.
    pub fn render<O: RenderableObject>(
        &self,
        address: TileAddress,
        objects: &[O],
        styler: &dyn ObjectStyler<O>,
    ) -> Result<Pixmap, RenderError> {
        let tile_size = self.options.tile_size;
        let mut surface = Pixmap::new(tile_size, tile_size).ok_or(RenderError::Surface {
            width: tile_size,
            height: tile_size,
        })?;

        let envelope = address.bbox_lnglat(tile_size);
        if !(envelope.width() > 0.0 && envelope.height() > 0.0) {
            return Err(RenderError::DegenerateEnvelope {
                zoom: address.zoom,
                width: envelope.width(),
                height: envelope.height(),
            });
        }

        let window = padded_window(address, tile_size, self.options.padding_share);
        let projector = Projector::for_tile(address, tile_size);

        for object in objects {
            let style = styler.style_object(object, address.zoom);
            let geometry = object.geometry();

            let drawable = if self.options.crop_geometries {
                match crop_geometry(geometry, &window) {
                    Cropped::Outside => continue,
                    Cropped::Whole => projector.project_geometry(geometry),
                    Cropped::Clipped(clipped) => projector.project_geometry(&clipped),
                }
            } else {
                projector.project_geometry(geometry)
            };

            if let Some(path) = geometry_to_path(&drawable) {
                paint_object(&mut surface, &path, &style);
            }
        }

        Ok(surface)
    }
}

// =============================================================================
// Cropping
// =============================================================================

enum Cropped {
    /// Entirely outside the window; skip the object.
    Outside,
    /// Keep the original geometry.
    Whole,
    /// Replaced with the clipped geometry.
    Clipped(Geometry<f64>),
}

/// The tile's crop window in lng/lat, padded in projected meter space.
///
/// The Mercator latitude axis is nonlinear, so padding the lng/lat bbox
/// directly would make the vertical margin drift from `share` at high
/// latitudes. Padding the meter envelope keeps the margin an exact fraction
/// of the tile on both axes; the corners convert back to lng/lat because
/// source geometry is clipped before projection.
fn padded_window(address: TileAddress, tile_size: u32, share: f64) -> Rect<f64> {
    let meters = pad_rect(address.bbox_meters(tile_size), share);
    Rect::new(
        meters_to_lnglat(meters.min().x, meters.min().y),
        meters_to_lnglat(meters.max().x, meters.max().y),
    )
}

fn pad_rect(rect: Rect<f64>, share: f64) -> Rect<f64> {
    let dx = rect.width() * share;
    let dy = rect.height() * share;
    Rect::new(
        geo::coord! { x: rect.min().x - dx, y: rect.min().y - dy },
        geo::coord! { x: rect.max().x + dx, y: rect.max().y + dy },
    )
}

/// Clip `geometry` to `window`.
///
/// Boolean overlay can panic on degenerate rings in real-world data; in
/// that case the uncropped geometry is kept, which only costs projection
/// work for pixels that end up off-surface.
fn crop_geometry(geometry: &Geometry<f64>, window: &Rect<f64>) -> Cropped {
    match geometry.bounding_rect() {
        Some(bbox) if rects_overlap(&bbox, window) => {}
        Some(_) => return Cropped::Outside,
        None => return Cropped::Whole,
    }

    let clipper = window.to_polygon();
    let result = panic::catch_unwind(AssertUnwindSafe(|| match geometry {
        Geometry::Polygon(polygon) => {
            let clipped = clipper.intersection(polygon);
            if clipped.0.is_empty() {
                Cropped::Outside
            } else {
                Cropped::Clipped(Geometry::MultiPolygon(clipped))
            }
        }
        Geometry::MultiPolygon(polygons) => {
            let clipped = clipper.intersection(polygons);
            if clipped.0.is_empty() {
                Cropped::Outside
            } else {
                Cropped::Clipped(Geometry::MultiPolygon(clipped))
            }
        }
        Geometry::LineString(line) => {
            let clipped = clipper.clip(&MultiLineString::new(vec![line.clone()]), false);
            if clipped.0.is_empty() {
                Cropped::Outside
            } else {
                Cropped::Clipped(Geometry::MultiLineString(clipped))
            }
        }
        Geometry::MultiLineString(lines) => {
            let clipped = clipper.clip(lines, false);
            if clipped.0.is_empty() {
                Cropped::Outside
            } else {
                Cropped::Clipped(Geometry::MultiLineString(clipped))
            }
        }
        // Points and mixed collections are cheap to project as-is.
        _ => Cropped::Whole,
    }));

    match result {
        Ok(cropped) => cropped,
        Err(_) => {
            debug!("geometry clipping panicked, rendering uncropped geometry");
            Cropped::Whole
        }
    }
}

fn rects_overlap(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x <= b.max().x
        && a.max().x >= b.min().x
        && a.min().y <= b.max().y
        && a.max().y >= b.min().y
}

// =============================================================================
// Painting
// =============================================================================

fn paint_object(surface: &mut Pixmap, path: &Path, style: &ObjectStyle) {
    match style {
        ObjectStyle::Custom(painter) => painter.paint_shape(surface, path),
        ObjectStyle::Outline { color, stroke } => {
            stroke_outline(surface, path, *color, stroke.as_ref());
        }
        ObjectStyle::OutlineFill {
            color,
            stroke,
            fill,
        } => {
            stroke_outline(surface, path, *color, stroke.as_ref());
            fill_solid(surface, path, *fill);
        }
        ObjectStyle::OutlinePattern {
            color,
            stroke,
            fill,
            pattern,
        } => {
            stroke_outline(surface, path, *color, stroke.as_ref());
            if let Some(fill) = fill {
                fill_solid(surface, path, *fill);
            }
            fill_pattern(surface, path, pattern);
        }
    }
}

fn fill_solid(surface: &mut Pixmap, path: &Path, color: tiny_skia::Color) {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    // Even-odd so polygon holes carve regardless of ring orientation.
    surface.fill_path(path, &paint, FillRule::EvenOdd, Transform::identity(), None);
}

fn fill_pattern(surface: &mut Pixmap, path: &Path, pattern: &FillPattern) {
    let mut paint = Paint::default();
    paint.shader = Pattern::new(
        pattern.pixmap.as_ref().as_ref(),
        SpreadMode::Repeat,
        tiny_skia::FilterQuality::Bilinear,
        pattern.opacity,
        Transform::identity(),
    );
    paint.anti_alias = true;
    surface.fill_path(path, &paint, FillRule::EvenOdd, Transform::identity(), None);
}

fn stroke_outline(
    surface: &mut Pixmap,
    path: &Path,
    color: tiny_skia::Color,
    stroke: Option<&StrokeStyle>,
) {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;

    match stroke {
        Some(StrokeStyle::Decorated(spec)) => {
            // The decorated outline is one pre-unioned region; filling it
            // once keeps translucent strokes from double-blending where the
            // line and its decorations overlap.
            if let Some(outline) = decorated_outline(path, spec) {
                surface.fill_path(
                    &outline,
                    &paint,
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }
        Some(style) => {
            surface.stroke_path(path, &paint, &style.to_stroke(), Transform::identity(), None);
        }
        None => {
            let stroke = Stroke {
                width: DEFAULT_STROKE_WIDTH,
                line_cap: LineCap::Round,
                ..Stroke::default()
            };
            surface.stroke_path(path, &paint, &stroke, Transform::identity(), None);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
