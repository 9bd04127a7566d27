//! Style model: how a renderable object is painted.
//!
//! An [`ObjectStyle`] is a tagged value with exactly four variants, selected
//! by pattern match in the pipeline rather than by probing optional fields:
//!
//! - [`ObjectStyle::Outline`] - outline only
//! - [`ObjectStyle::OutlineFill`] - outline plus a solid fill
//! - [`ObjectStyle::OutlinePattern`] - outline plus a tiled pattern fill
//!   (optionally over a base fill color; the pattern is applied last)
//! - [`ObjectStyle::Custom`] - a fully custom paint routine
//!
//! Styles are resolved per (object, zoom) by an [`ObjectStyler`], which must
//! be pure: safe to call concurrently and repeatedly for the same inputs.

use std::fmt;
use std::sync::Arc;

use tiny_skia::{Color, LineCap, Path, Pixmap, Stroke, StrokeDash};

use super::decoration::PathDecorationSpec;

/// Stroke width used when an outline gives no explicit stroke.
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;

// =============================================================================
// Paint Building Blocks
// =============================================================================

/// How an outline is stroked.
#[derive(Debug, Clone)]
pub enum StrokeStyle {
    /// A plain solid stroke of the given width.
    Solid { width: f32 },

    /// A dashed stroke; `dash` is the on/off interval array in pixels.
    Dashed { width: f32, dash: Vec<f32> },

    /// A decorated stroke: a solid line plus a shape repeated along the path
    /// at fixed arc-length intervals (railway hatching, flag poles, ...).
    Decorated(PathDecorationSpec),
}

impl StrokeStyle {
    /// The tiny-skia stroke for the non-decorated variants.
    ///
    /// [`StrokeStyle::Decorated`] is rasterized through the decoration
    /// module instead; this returns its plain line stroke so callers that
    /// ignore decorations still draw something sensible.
    pub fn to_stroke(&self) -> Stroke {
        let mut stroke = Stroke {
            line_cap: LineCap::Round,
            ..Stroke::default()
        };
        match self {
            StrokeStyle::Solid { width } => stroke.width = *width,
            StrokeStyle::Dashed { width, dash } => {
                stroke.width = *width;
                stroke.dash = StrokeDash::new(dash.clone(), 0.0);
            }
            StrokeStyle::Decorated(spec) => stroke.width = spec.line_width,
        }
        stroke
    }
}

/// A tiled pattern fill backed by a small pixmap template.
#[derive(Clone)]
pub struct FillPattern {
    /// The pattern tile; repeated across the filled area.
    pub pixmap: Arc<Pixmap>,

    /// Pattern opacity in `[0, 1]`.
    pub opacity: f32,
}

impl FillPattern {
    pub fn new(pixmap: Arc<Pixmap>) -> Self {
        Self {
            pixmap,
            opacity: 1.0,
        }
    }
}

impl fmt::Debug for FillPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillPattern")
            .field("size", &(self.pixmap.width(), self.pixmap.height()))
            .field("opacity", &self.opacity)
            .finish()
    }
}

/// A fully custom paint routine.
///
/// Invoked with the tile's paint surface and the already-projected
/// pixel-space shape; the routine has full control over how it paints.
pub trait ShapePainter: Send + Sync {
    fn paint_shape(&self, surface: &mut Pixmap, shape: &Path);
}

// =============================================================================
// Object Style
// =============================================================================

/// How an object should be painted. Exactly one variant is active at a time;
/// when the variant is [`ObjectStyle::Custom`] nothing else fires.
#[derive(Clone)]
pub enum ObjectStyle {
    /// Outline only. A missing stroke means a default 2 px solid stroke.
    Outline {
        color: Color,
        stroke: Option<StrokeStyle>,
    },

    /// Outline plus a solid interior fill.
    OutlineFill {
        color: Color,
        stroke: Option<StrokeStyle>,
        fill: Color,
    },

    /// Outline plus a tiled pattern fill. When `fill` is also given, the
    /// pattern is painted over it (pattern applied last).
    OutlinePattern {
        color: Color,
        stroke: Option<StrokeStyle>,
        fill: Option<Color>,
        pattern: FillPattern,
    },

    /// A fully custom paint routine; short-circuits all other painting.
    Custom(Arc<dyn ShapePainter>),
}

impl ObjectStyle {
    /// Outline-only style with the default stroke.
    pub fn outline(color: Color) -> Self {
        ObjectStyle::Outline {
            color,
            stroke: None,
        }
    }

    /// Outline-only style with an explicit stroke.
    pub fn outline_with(color: Color, stroke: StrokeStyle) -> Self {
        ObjectStyle::Outline {
            color,
            stroke: Some(stroke),
        }
    }

    /// Outline plus solid fill with the default stroke.
    pub fn filled(color: Color, fill: Color) -> Self {
        ObjectStyle::OutlineFill {
            color,
            stroke: None,
            fill,
        }
    }

    /// Custom paint routine style.
    pub fn custom(painter: Arc<dyn ShapePainter>) -> Self {
        ObjectStyle::Custom(painter)
    }
}

impl fmt::Debug for ObjectStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectStyle::Outline { color, stroke } => f
                .debug_struct("Outline")
                .field("color", color)
                .field("stroke", stroke)
                .finish(),
            ObjectStyle::OutlineFill {
                color,
                stroke,
                fill,
            } => f
                .debug_struct("OutlineFill")
                .field("color", color)
                .field("stroke", stroke)
                .field("fill", fill)
                .finish(),
            ObjectStyle::OutlinePattern {
                color,
                stroke,
                fill,
                pattern,
            } => f
                .debug_struct("OutlinePattern")
                .field("color", color)
                .field("stroke", stroke)
                .field("fill", fill)
                .field("pattern", pattern)
                .finish(),
            ObjectStyle::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// =============================================================================
// Stylers
// =============================================================================

/// Resolves a style per (object, zoom).
///
/// Implementations must be deterministic for the same inputs within one
/// render call and safe to call concurrently.
pub trait ObjectStyler<O: ?Sized>: Send + Sync {
    fn style_object(&self, object: &O, zoom: u8) -> ObjectStyle;
}

/// Styler that ignores its inputs and always returns one style.
#[derive(Debug, Clone)]
pub struct FixedStyler {
    style: ObjectStyle,
}

impl FixedStyler {
    pub fn new(style: ObjectStyle) -> Self {
        Self { style }
    }
}

impl<O: ?Sized> ObjectStyler<O> for FixedStyler {
    fn style_object(&self, _object: &O, _zoom: u8) -> ObjectStyle {
        self.style.clone()
    }
}

/// Styler that is a total function from zoom level to style.
///
/// A base style guarantees totality; bands override it from their minimum
/// zoom upward. This enables progressive stroke widening and feature
/// suppression at low zoom.
#[derive(Debug, Clone)]
pub struct ZoomBandedStyler {
    base: ObjectStyle,
    /// Bands sorted ascending by minimum zoom.
    bands: Vec<(u8, ObjectStyle)>,
}

impl ZoomBandedStyler {
    pub fn new(base: ObjectStyle) -> Self {
        Self {
            base,
            bands: Vec::new(),
        }
    }

    /// Use `style` for every zoom level at or above `min_zoom`
    /// (until a higher band takes over).
    pub fn with_band(mut self, min_zoom: u8, style: ObjectStyle) -> Self {
        let pos = self
            .bands
            .iter()
            .position(|(z, _)| *z >= min_zoom)
            .unwrap_or(self.bands.len());
        // Replace an existing band at the same zoom instead of shadowing it.
        if pos < self.bands.len() && self.bands[pos].0 == min_zoom {
            self.bands[pos].1 = style;
        } else {
            self.bands.insert(pos, (min_zoom, style));
        }
        self
    }

    fn style_for_zoom(&self, zoom: u8) -> &ObjectStyle {
        self.bands
            .iter()
            .rev()
            .find(|(min_zoom, _)| zoom >= *min_zoom)
            .map(|(_, style)| style)
            .unwrap_or(&self.base)
    }
}

impl<O: ?Sized> ObjectStyler<O> for ZoomBandedStyler {
    fn style_object(&self, _object: &O, zoom: u8) -> ObjectStyle {
        self.style_for_zoom(zoom).clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
