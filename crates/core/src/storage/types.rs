//! Shared types for the media storage subsystem.

use std::path::PathBuf;

use serde::Serialize;

/// Which tree a stored file belongs to: full-resolution originals or
/// derived thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Thumbnail,
}

impl MediaKind {
    /// Directory name under the public root, which is also the leading
    /// URL segment.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Image => "uploads",
            Self::Thumbnail => "thumbnails",
        }
    }
}

/// A freshly allocated destination for one media file.
///
/// The caller writes bytes to `absolute_path` and persists `url`. The
/// two always name the same file: `absolute_path` is the public root
/// joined with the path components of `url`.
#[derive(Debug, Clone)]
pub struct AllocatedPath {
    /// Root-relative public path, e.g. `/uploads/2024/12/10/1733834096000-ab12Cd.jpg`.
    pub url: String,
    /// Absolute filesystem path of the same file.
    pub absolute_path: PathBuf,
}

/// What a single reclaim actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclaimOutcome {
    /// The file existed and was deleted.
    Deleted,
    /// Nothing to do: the file was already gone, or the URL was empty.
    NotFound,
}

/// Tally of a bulk reclaim.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReclaimReport {
    /// Files that existed and were deleted.
    pub deleted: usize,
    /// URLs whose files were already gone.
    pub missing: usize,
    /// Human-readable descriptions of the failures, one per failed URL.
    pub errors: Vec<String>,
}

impl ReclaimReport {
    /// True when every URL was deleted or already gone.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Errors from the media storage subsystem.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The URL would resolve outside the public root, or has no usable
    /// path components at all.
    #[error("Invalid media URL: {url}")]
    InvalidPath { url: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_prefixes_match_public_trees() {
        assert_eq!(MediaKind::Image.prefix(), "uploads");
        assert_eq!(MediaKind::Thumbnail.prefix(), "thumbnails");
    }

    #[test]
    fn report_is_clean_only_without_errors() {
        let mut report = ReclaimReport { deleted: 3, missing: 1, errors: Vec::new() };
        assert!(report.is_clean());

        report.errors.push("boom".to_string());
        assert!(!report.is_clean());
    }
}
