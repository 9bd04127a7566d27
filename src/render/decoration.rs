//! Path decoration stroking.
//!
//! Given a path and a [`PathDecorationSpec`], this module produces a filled
//! outline combining a conventional line stroke with copies of a decorative
//! shape placed at fixed arc-length intervals along the path, each rotated to
//! the local tangent. A single declarative stroke spec fully describes a
//! decorated line style ("railway hatching", "flag poles", ...) without the
//! caller pre-slicing the path.
//!
//! Placement walks the path's segments carrying a distance accumulator that
//! persists across segments of the same path, so decorations stay evenly
//! spaced along the whole path instead of restarting at every vertex. Curved
//! segments contribute to the main stroke outline but are not decorated and
//! do not advance the accumulator; the same goes for the implicit closing
//! edge of a `Close`.
//!
//! The result is a single path: the union (nonzero winding) of the stroked
//! main outline and the stroked decoration copies. Filling it once means
//! translucent decorated strokes do not double-blend where the two overlap.

use std::fmt;

use tiny_skia::{LineCap, Path, PathBuilder, PathSegment, PathStroker, Point, Stroke, Transform};

// =============================================================================
// Decoration Spec
// =============================================================================

/// Parameters of a decorated stroke.
///
/// `step_distance`, `line_width` and `decoration_stroke_width` must be
/// positive; a non-positive step disables decoration placement.
#[derive(Clone)]
pub struct PathDecorationSpec {
    /// Arc-length interval between consecutive decorations, in pixels.
    pub step_distance: f32,

    /// Width of the main line stroke.
    pub line_width: f32,

    /// Decoration shape template in local coordinates: +X points along the
    /// path tangent, the origin is placed on the path.
    pub shape: Path,

    /// Width of the stroke applied to the decoration copies.
    pub decoration_stroke_width: f32,
}

impl PathDecorationSpec {
    pub fn new(
        step_distance: f32,
        line_width: f32,
        shape: Path,
        decoration_stroke_width: f32,
    ) -> Self {
        Self {
            step_distance,
            line_width,
            shape,
            decoration_stroke_width,
        }
    }

    /// A perpendicular tick decoration: a bar of `tick_length` pixels
    /// standing on the line, repeated every `step_distance` pixels.
    pub fn tick(step_distance: f32, line_width: f32, tick_length: f32, tick_width: f32) -> Self {
        let mut shape = PathBuilder::new();
        shape.move_to(0.0, 0.0);
        shape.line_to(0.0, -tick_length.max(1.0));
        // A two-point line with distinct endpoints always builds.
        let shape = shape.finish().unwrap();
        Self::new(step_distance, line_width, shape, tick_width)
    }
}

impl fmt::Debug for PathDecorationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathDecorationSpec")
            .field("step_distance", &self.step_distance)
            .field("line_width", &self.line_width)
            .field("decoration_stroke_width", &self.decoration_stroke_width)
            .finish()
    }
}

// =============================================================================
// Placement
// =============================================================================

/// A placed decoration: anchor point and tangent angle in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    x: f32,
    y: f32,
    angle: f32,
}

/// Walk the straight segments of `path`, placing a decoration every `step`
/// pixels of arc length. The distance accumulator carries across segments.
///
/// A decoration landing exactly on a segment end is placed (so a straight
/// path of length `N * step` yields exactly `N` placements).
fn placements(path: &Path, step: f32) -> Vec<Placement> {
    let mut placed = Vec::new();
    if step <= 0.0 {
        return placed;
    }

    // (accumulated distance since the last decoration, current point)
    let mut carried = 0.0_f32;
    let mut cursor: Option<Point> = None;

    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo(p) => cursor = Some(p),
            PathSegment::LineTo(p) => {
                if let Some(start) = cursor {
                    let dx = p.x - start.x;
                    let dy = p.y - start.y;
                    let len = (dx * dx + dy * dy).sqrt();
                    if len > 0.0 {
                        if carried + len < step {
                            // No decoration fits in this segment.
                            carried += len;
                        } else {
                            let angle = dy.atan2(dx);
                            let mut offset = (step - carried).max(0.0);
                            while offset <= len {
                                let t = offset / len;
                                placed.push(Placement {
                                    x: start.x + dx * t,
                                    y: start.y + dy * t,
                                    angle,
                                });
                                offset += step;
                            }
                            // Leftover distance before the next step threshold.
                            carried = len - (offset - step);
                        }
                    }
                }
                cursor = Some(p);
            }
            // Curves pass through to the main stroke undecorated and do not
            // advance the accumulator.
            PathSegment::QuadTo(_, p) => cursor = Some(p),
            PathSegment::CubicTo(_, _, p) => cursor = Some(p),
            PathSegment::Close => cursor = None,
        }
    }

    placed
}

/// All placed decoration-shape copies combined into one path, or `None`
/// when nothing was placed.
fn placed_shapes(path: &Path, spec: &PathDecorationSpec) -> Option<Path> {
    let placed = placements(path, spec.step_distance);
    if placed.is_empty() {
        return None;
    }

    let mut builder = PathBuilder::new();
    for placement in placed {
        // Rotate to the tangent first, then translate onto the path.
        let transform = Transform::from_rotate(placement.angle.to_degrees())
            .post_translate(placement.x, placement.y);
        if let Some(copy) = spec.shape.clone().transform(transform) {
            append_path(&mut builder, &copy);
        }
    }
    builder.finish()
}

/// Replay `path` into `builder` as additional subpaths.
fn append_path(builder: &mut PathBuilder, path: &Path) {
    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo(p) => builder.move_to(p.x, p.y),
            PathSegment::LineTo(p) => builder.line_to(p.x, p.y),
            PathSegment::QuadTo(c, p) => builder.quad_to(c.x, c.y, p.x, p.y),
            PathSegment::CubicTo(c1, c2, p) => builder.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
            PathSegment::Close => builder.close(),
        }
    }
}

// =============================================================================
// Decorated Outline
// =============================================================================

/// The decorated stroke outline of `path`: the geometric union of the main
/// line stroke and the stroked decoration copies, as one path to be filled
/// with the nonzero winding rule.
///
/// Returns `None` for degenerate input (an empty path).
pub fn decorated_outline(path: &Path, spec: &PathDecorationSpec) -> Option<Path> {
    let mut stroker = PathStroker::new();

    let line_stroke = Stroke {
        width: spec.line_width,
        line_cap: LineCap::Round,
        ..Stroke::default()
    };
    let main = stroker.stroke(path, &line_stroke, 1.0)?;

    let mut combined = PathBuilder::new();
    append_path(&mut combined, &main);

    if let Some(decorations) = placed_shapes(path, spec) {
        let decoration_stroke = Stroke {
            width: spec.decoration_stroke_width,
            line_cap: LineCap::Butt,
            ..Stroke::default()
        };
        if let Some(outline) = stroker.stroke(&decorations, &decoration_stroke, 1.0) {
            append_path(&mut combined, &outline);
        }
    }

    combined.finish()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line_path(points: &[(f32, f32)]) -> Path {
        let mut builder = PathBuilder::new();
        builder.move_to(points[0].0, points[0].1);
        for &(x, y) in &points[1..] {
            builder.line_to(x, y);
        }
        builder.finish().unwrap()
    }

    fn spec(step: f32) -> PathDecorationSpec {
        PathDecorationSpec::tick(step, 2.0, 6.0, 1.0)
    }

    #[test]
    fn test_exact_multiple_places_n_decorations() {
        // Length 64 with step 16: decorations at 16, 32, 48 and 64.
        let path = line_path(&[(0.0, 0.0), (64.0, 0.0)]);
        let placed = placements(&path, 16.0);
        assert_eq!(placed.len(), 4);
        let xs: Vec<f32> = placed.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![16.0, 32.0, 48.0, 64.0]);
        for p in &placed {
            assert_eq!(p.y, 0.0);
            assert!(p.angle.abs() < 1e-6);
        }
    }

    #[test]
    fn test_too_short_segment_places_nothing() {
        let path = line_path(&[(0.0, 0.0), (5.0, 0.0)]);
        assert!(placements(&path, 16.0).is_empty());
    }

    #[test]
    fn test_accumulator_carries_across_segments() {
        // Two 10 px segments, step 8: decorations at arc length 8 and 16.
        let path = line_path(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let placed = placements(&path, 8.0);
        assert_eq!(placed.len(), 2);

        // First lands 8 px into the horizontal segment.
        assert!((placed[0].x - 8.0).abs() < 1e-5);
        assert!(placed[0].y.abs() < 1e-5);
        assert!(placed[0].angle.abs() < 1e-6);

        // Second lands 6 px into the vertical segment (2 px carried over).
        assert!((placed[1].x - 10.0).abs() < 1e-5);
        assert!((placed[1].y - 6.0).abs() < 1e-5);
        assert!((placed[1].angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_many_short_segments_accumulate() {
        // Five 4 px segments, step 10: decorations at arc length 10 and 20.
        let points: Vec<(f32, f32)> = (0..=5).map(|i| (i as f32 * 4.0, 0.0)).collect();
        let path = line_path(&points);
        let placed = placements(&path, 10.0);
        assert_eq!(placed.len(), 2);
        assert!((placed[0].x - 10.0).abs() < 1e-5);
        assert!((placed[1].x - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_orientation_follows_tangent() {
        let path = line_path(&[(0.0, 0.0), (32.0, 32.0)]);
        let placed = placements(&path, 16.0);
        assert!(!placed.is_empty());
        for p in &placed {
            assert!((p.angle - std::f32::consts::FRAC_PI_4).abs() < 1e-5);
        }
    }

    #[test]
    fn test_curves_are_not_decorated() {
        let mut builder = PathBuilder::new();
        builder.move_to(0.0, 0.0);
        builder.quad_to(50.0, 50.0, 100.0, 0.0);
        let path = builder.finish().unwrap();
        assert!(placements(&path, 10.0).is_empty());
    }

    #[test]
    fn test_line_after_curve_starts_from_curve_end() {
        let mut builder = PathBuilder::new();
        builder.move_to(0.0, 0.0);
        builder.quad_to(50.0, 50.0, 100.0, 0.0);
        builder.line_to(132.0, 0.0);
        let path = builder.finish().unwrap();

        // Only the trailing 32 px line is decorated; the curve neither
        // places decorations nor advances the accumulator.
        let placed = placements(&path, 16.0);
        assert_eq!(placed.len(), 2);
        assert!((placed[0].x - 116.0).abs() < 1e-4);
        assert!((placed[1].x - 132.0).abs() < 1e-4);
    }

    #[test]
    fn test_non_positive_step_disables_placement() {
        let path = line_path(&[(0.0, 0.0), (100.0, 0.0)]);
        assert!(placements(&path, 0.0).is_empty());
        assert!(placements(&path, -3.0).is_empty());
    }

    #[test]
    fn test_decorated_outline_without_placements_still_strokes_line() {
        let path = line_path(&[(0.0, 0.0), (5.0, 0.0)]);
        let outline = decorated_outline(&path, &spec(16.0));
        assert!(outline.is_some());
    }

    #[test]
    fn test_decorated_outline_grows_with_decorations() {
        let path = line_path(&[(0.0, 0.0), (64.0, 0.0)]);
        let plain = decorated_outline(&path, &spec(1000.0)).unwrap();
        let decorated = decorated_outline(&path, &spec(16.0)).unwrap();
        // The decorated outline carries extra subpaths for the tick copies.
        assert!(decorated.len() > plain.len());
        let bounds = decorated.bounds();
        // Ticks stand 6 px above the line.
        assert!(bounds.top() <= -5.0);
    }

    #[test]
    fn test_decoration_shape_is_rotated_then_translated() {
        // A vertical path with an upward tick: after rotating by the tangent
        // (90 degrees) the tick points in +X.
        let path = line_path(&[(0.0, 0.0), (0.0, 32.0)]);
        let decorated = decorated_outline(&path, &spec(16.0)).unwrap();
        let bounds = decorated.bounds();
        assert!(bounds.right() >= 5.0, "tick should extend right of the line");
    }
}
