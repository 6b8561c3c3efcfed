//! Ingest orchestration: the filesystem half of an upload.
//!
//! One call takes validated upload bytes to two files on disk, the
//! full-resolution original under `uploads/` and a cover-cropped
//! thumbnail under `thumbnails/`, and returns the record the caller
//! persists. The pipeline never leaves a half-ingested upload behind:
//! if the thumbnail step fails, the already written original is
//! reclaimed before the error propagates.

use chrono::Utc;
use serde::Serialize;
use tokio::fs;

use lightbox_core::storage::{MediaKind, MediaStore, ReclaimReport};
use lightbox_core::types::Timestamp;

use crate::error::IngestResult;
use crate::metadata;
use crate::thumbnail::{self, ThumbnailSpec};
use crate::validate::UploadPolicy;

/// The durable record of one ingested upload.
///
/// The storage layer keeps no records of its own; whatever the caller
/// persists, `url` and `thumbnail_url` are what it later hands back to
/// [`MediaIngestor::remove`] when the record is deleted.
#[derive(Debug, Clone, Serialize)]
pub struct StoredMedia {
    /// Client-supplied filename, kept for display only.
    pub filename: String,
    /// MIME type derived from the sniffed format.
    pub mime: String,
    /// Size of the original in bytes.
    pub size_bytes: u64,
    /// Pixel width of the original.
    pub width: u32,
    /// Pixel height of the original.
    pub height: u32,
    /// Public URL of the stored original.
    pub url: String,
    /// Public URL of the derived thumbnail.
    pub thumbnail_url: String,
    /// When the ingest happened.
    pub uploaded_at: Timestamp,
}

/// Runs uploads through validation, storage and thumbnailing.
#[derive(Debug, Clone)]
pub struct MediaIngestor {
    store: MediaStore,
    policy: UploadPolicy,
    thumbnail: ThumbnailSpec,
}

impl MediaIngestor {
    /// Ingestor with the default policy (10 MiB cap) and 300x300
    /// thumbnails.
    pub fn new(store: MediaStore) -> Self {
        Self { store, policy: UploadPolicy::default(), thumbnail: ThumbnailSpec::default() }
    }

    /// Replace the upload policy.
    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the thumbnail dimensions.
    pub fn with_thumbnail_spec(mut self, spec: ThumbnailSpec) -> Self {
        self.thumbnail = spec;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &MediaStore {
        &self.store
    }

    /// Validate, store and thumbnail one upload.
    pub async fn ingest(&self, original_filename: &str, bytes: &[u8]) -> IngestResult<StoredMedia> {
        self.policy.validate(original_filename, bytes)?;
        let meta = metadata::probe(bytes)?;

        let original = self.store.allocate(original_filename, MediaKind::Image).await?;
        fs::write(&original.absolute_path, bytes).await?;
        tracing::debug!(url = %original.url, size = bytes.len(), "Stored original upload");

        let thumbnail_url = match self.derive_thumbnail(original_filename, bytes).await {
            Ok(url) => url,
            Err(e) => {
                // A failed ingest must not leave the original behind.
                if let Err(rollback) = self.store.reclaim(&original.url).await {
                    tracing::warn!(
                        url = %original.url,
                        error = %rollback,
                        "Failed to roll back original after ingest failure"
                    );
                }
                return Err(e);
            }
        };

        Ok(StoredMedia {
            filename: original_filename.to_string(),
            mime: meta.mime.to_string(),
            size_bytes: bytes.len() as u64,
            width: meta.width,
            height: meta.height,
            url: original.url,
            thumbnail_url,
            uploaded_at: Utc::now(),
        })
    }

    /// Remove a stored upload: the original and, when the record has
    /// one, its thumbnail. Best-effort on both, like any cascading
    /// delete; the caller decides what to do with a dirty report.
    pub async fn remove(&self, url: &str, thumbnail_url: Option<&str>) -> ReclaimReport {
        self.store.reclaim_many(std::iter::once(url).chain(thumbnail_url)).await
    }

    /// Render the thumbnail and store it in the thumbnail tree.
    async fn derive_thumbnail(&self, original_filename: &str, bytes: &[u8]) -> IngestResult<String> {
        let rendered = thumbnail::render(bytes, self.thumbnail)?;
        let thumb = self.store.allocate(original_filename, MediaKind::Thumbnail).await?;
        fs::write(&thumb.absolute_path, &rendered).await?;
        tracing::debug!(url = %thumb.url, size = rendered.len(), "Stored thumbnail");
        Ok(thumb.url)
    }
}
