//! Thumbnail rendering.

use std::io::Cursor;

use image::imageops::FilterType;

use crate::error::{IngestError, IngestResult};

/// Output dimensions for derived thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSpec {
    pub width: u32,
    pub height: u32,
}

impl Default for ThumbnailSpec {
    /// 300x300, the size the gallery grid renders.
    fn default() -> Self {
        Self { width: 300, height: 300 }
    }
}

/// Render a cover-cropped thumbnail, re-encoded in the source format.
///
/// Cover semantics: the image is scaled to fill the requested
/// dimensions and center-cropped, so the output size is exact whatever
/// the input aspect ratio. Small inputs are scaled up rather than left
/// under-size.
pub fn render(bytes: &[u8], spec: ThumbnailSpec) -> IngestResult<Vec<u8>> {
    let format =
        image::guess_format(bytes).map_err(|e| IngestError::Decode(e.to_string()))?;
    let img =
        image::load_from_memory(bytes).map_err(|e| IngestError::Decode(e.to_string()))?;

    let thumb = img.resize_to_fill(spec.width, spec.height, FilterType::Lanczos3);

    let mut buf = Cursor::new(Vec::new());
    thumb.write_to(&mut buf, format).map_err(|e| IngestError::Decode(e.to_string()))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .expect("encode fixture");
        buf.into_inner()
    }

    #[test]
    fn output_dimensions_are_exact_for_wide_input() {
        let spec = ThumbnailSpec { width: 32, height: 32 };
        let rendered = render(&png_bytes(128, 16), spec).unwrap();

        let meta = crate::metadata::probe(&rendered).unwrap();
        assert_eq!((meta.width, meta.height), (32, 32));
    }

    #[test]
    fn output_dimensions_are_exact_for_tall_input() {
        let spec = ThumbnailSpec { width: 32, height: 32 };
        let rendered = render(&png_bytes(16, 128), spec).unwrap();

        let meta = crate::metadata::probe(&rendered).unwrap();
        assert_eq!((meta.width, meta.height), (32, 32));
    }

    #[test]
    fn small_inputs_are_scaled_up() {
        let spec = ThumbnailSpec { width: 32, height: 32 };
        let rendered = render(&png_bytes(4, 4), spec).unwrap();

        let meta = crate::metadata::probe(&rendered).unwrap();
        assert_eq!((meta.width, meta.height), (32, 32));
    }

    #[test]
    fn output_keeps_the_source_format() {
        let spec = ThumbnailSpec::default();
        let rendered = render(&png_bytes(64, 64), spec).unwrap();

        let meta = crate::metadata::probe(&rendered).unwrap();
        assert_eq!(meta.format, image::ImageFormat::Png);
    }

    #[test]
    fn render_rejects_non_image_bytes() {
        let result = render(b"not an image", ThumbnailSpec::default());
        assert_matches!(result, Err(IngestError::Decode(_)));
    }
}
