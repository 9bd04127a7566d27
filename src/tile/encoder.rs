//! PNG tile encoder.
//!
//! Turns a rendered surface into the PNG bytes that go over the wire (and
//! into the cache). PNG is the one output format: it is lossless and keeps
//! the alpha channel, which blank and sparsely painted tiles rely on.
//!
//! The raster surface stores premultiplied alpha; PNG expects straight
//! alpha, so pixels are demultiplied before encoding.

use bytes::Bytes;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tiny_skia::Pixmap;

use crate::error::TileError;

// =============================================================================
// PNG Encoder
// =============================================================================

/// PNG tile encoder.
///
/// # Example
///
/// ```
/// use tilepaint::tile::PngTileEncoder;
/// use tiny_skia::Pixmap;
///
/// let encoder = PngTileEncoder::new();
/// let surface = Pixmap::new(256, 256).unwrap();
/// let png = encoder.encode(&surface).unwrap();
/// assert_eq!(&png[..4], b"\x89PNG");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PngTileEncoder {
    // Currently stateless, but struct allows future extension
    // (e.g., compression level, palette reduction)
}

impl PngTileEncoder {
    /// Create a new PNG tile encoder.
    pub fn new() -> Self {
        Self {}
    }

    /// Encode a rendered surface as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails. Encoding a well-formed
    /// surface does not fail in practice; the error path exists for I/O
    /// adapters and future encoder settings.
    pub fn encode(&self, surface: &Pixmap) -> Result<Bytes, TileError> {
        let mut rgba = Vec::with_capacity(surface.data().len());
        for pixel in surface.pixels() {
            let p = pixel.demultiply();
            rgba.extend_from_slice(&[p.red(), p.green(), p.blue(), p.alpha()]);
        }

        let mut output = Vec::new();
        PngEncoder::new(&mut output)
            .write_image(
                &rgba,
                surface.width(),
                surface.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| TileError::Encode {
                message: e.to_string(),
            })?;

        Ok(Bytes::from(output))
    }

    /// Encode a fully transparent tile of the given size.
    ///
    /// Tiles with no objects all share these bytes, so empty-area responses
    /// are byte-identical and cheap.
    pub fn encode_blank(&self, tile_size: u32) -> Result<Bytes, TileError> {
        let surface = Pixmap::new(tile_size, tile_size).ok_or(TileError::Encode {
            message: format!("invalid blank tile size {tile_size}"),
        })?;
        self.encode(&surface)
    }
}

// =============================================================================
// Tests
// =============================================================================
