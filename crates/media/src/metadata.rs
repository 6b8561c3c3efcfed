//! Header-only metadata extraction for uploaded images.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::error::{IngestError, IngestResult};

/// What the probe learns about an upload without fully decoding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Pixel width of the full image.
    pub width: u32,
    /// Pixel height of the full image.
    pub height: u32,
    /// Sniffed container format.
    pub format: ImageFormat,
    /// MIME type matching `format`.
    pub mime: &'static str,
}

/// Probe dimensions and format from raw upload bytes.
///
/// Reads only as far into the stream as dimension extraction needs.
/// The full decode happens later, and only for thumbnailing.
pub fn probe(bytes: &[u8]) -> IngestResult<ImageMetadata> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| IngestError::Decode(e.to_string()))?;
    let format = reader
        .format()
        .ok_or_else(|| IngestError::Decode("unrecognized image format".to_string()))?;
    let (width, height) =
        reader.into_dimensions().map_err(|e| IngestError::Decode(e.to_string()))?;

    Ok(ImageMetadata { width, height, format, mime: mime_for(format) })
}

/// MIME type for a sniffed image format.
fn mime_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::WebP => "image/webp",
        _ => "application/octet-stream",
    }
}
