//! Rasterization of map objects onto tile surfaces.
//!
//! Split into four stages, each independently testable:
//!
//! - [`projection`]: lng/lat to tile-local pixel coordinates, and geometry
//!   to drawable paths
//! - [`style`]: the paint model and per-(object, zoom) style resolution
//! - [`decoration`]: decorated stroke outlines (shapes repeated along a path)
//! - [`pipeline`]: the renderer tying the stages together

pub mod decoration;
pub mod pipeline;
pub mod projection;
pub mod style;

pub use decoration::{decorated_outline, PathDecorationSpec};
pub use pipeline::{RenderOptions, TileRenderer};
pub use projection::{geometry_to_path, Projector};
pub use style::{
    FillPattern, FixedStyler, ObjectStyle, ObjectStyler, ShapePainter, StrokeStyle,
    ZoomBandedStyler, DEFAULT_STROKE_WIDTH,
};
