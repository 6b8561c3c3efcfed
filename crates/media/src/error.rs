//! Error types for the ingest pipeline.

use lightbox_core::storage::StorageError;

/// Everything that can go wrong between receiving upload bytes and
/// having an original plus a thumbnail on disk.
///
/// Wraps [`StorageError`] for path and filesystem failures and adds the
/// image-level variants the pipeline itself produces.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The upload failed a policy check before touching disk.
    #[error("Invalid upload: {0}")]
    Validation(String),

    /// The bytes are a real image, but in a format the pipeline does
    /// not accept.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The bytes could not be decoded as the format they claim to be.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The storage layer refused the path or the filesystem failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Raw I/O failure writing the original or the thumbnail.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for ingest results.
pub type IngestResult<T> = Result<T, IngestError>;
