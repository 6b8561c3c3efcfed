//! Image ingest pipeline for the lightbox photo library.
//!
//! Takes raw upload bytes the rest of the way: policy checks, a
//! header-only metadata probe, date-bucketed storage of the original
//! through [`lightbox_core::storage::MediaStore`], and a cover-cropped
//! thumbnail stored alongside it. Callers persist the returned
//! [`StoredMedia`] record; handing its URLs back to
//! [`MediaIngestor::remove`] undoes the whole ingest.

pub mod error;
pub mod ingest;
pub mod metadata;
pub mod thumbnail;
pub mod validate;

pub use error::IngestError;
pub use ingest::{MediaIngestor, StoredMedia};
