//! Upload validation.
//!
//! Client-declared content types are advisory at best, so the policy
//! sniffs the actual bytes and accepts only the formats the image stack
//! compiles in: PNG, JPEG and WebP.

use image::ImageFormat;

use crate::error::{IngestError, IngestResult};

/// Default upload size cap: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Limits applied to every upload before any bytes hit disk.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    /// Maximum accepted payload size in bytes.
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self { max_bytes: DEFAULT_MAX_UPLOAD_BYTES }
    }
}

impl UploadPolicy {
    /// Validate one upload, returning its sniffed format.
    ///
    /// `filename` is only used in error messages; the decision is made
    /// from the bytes.
    pub fn validate(&self, filename: &str, bytes: &[u8]) -> IngestResult<ImageFormat> {
        if bytes.is_empty() {
            return Err(IngestError::Validation(format!("{filename}: file is empty")));
        }
        if bytes.len() as u64 > self.max_bytes {
            return Err(IngestError::Validation(format!(
                "{filename}: {} bytes exceeds the {} byte limit",
                bytes.len(),
                self.max_bytes
            )));
        }

        let format = image::guess_format(bytes).map_err(|_| {
            IngestError::Validation(format!("{filename}: not a recognized image"))
        })?;
        if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP) {
            return Err(IngestError::UnsupportedFormat(format!(
                "{filename}: only PNG, JPEG and WebP are accepted"
            )));
        }

        Ok(format)
    }
}
