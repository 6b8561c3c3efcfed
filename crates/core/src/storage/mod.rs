//! Date-bucketed media storage under a single public root.
//!
//! Stored files live in two parallel trees, one per [`MediaKind`]:
//!
//! ```text
//! <public root>/uploads/YYYY/MM/DD/<millis>-<suffix>.<ext>
//! <public root>/thumbnails/YYYY/MM/DD/<millis>-<suffix>.<ext>
//! ```
//!
//! [`MediaStore::allocate`] hands out a fresh destination with the
//! bucket directory already created; the caller writes the bytes and
//! persists the returned URL. [`MediaStore::reclaim`] takes such a URL
//! back, deleting the file and pruning whatever date directories the
//! deletion emptied. The store keeps no state between calls, so every
//! operation has to be safe to repeat and safe to run concurrently.

mod clock;
mod types;

pub use clock::{Clock, SystemClock};
pub use types::{AllocatedPath, MediaKind, ReclaimOutcome, ReclaimReport, StorageError};

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tokio::fs;

use crate::naming;

/// Environment variable naming the public root directory.
pub const PUBLIC_ROOT_ENV: &str = "LIGHTBOX_PUBLIC_ROOT";

/// Public root used when the environment does not say otherwise.
pub const DEFAULT_PUBLIC_ROOT: &str = "public";

// ---------------------------------------------------------------------------
// MediaStore
// ---------------------------------------------------------------------------

/// Allocates and reclaims date-bucketed media paths under one public root.
///
/// Cheap to clone; clones share the same root and clock.
#[derive(Debug, Clone)]
pub struct MediaStore {
    public_root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl MediaStore {
    /// Create a store rooted at `public_root`.
    ///
    /// The root is not created here; the first allocation creates
    /// whatever is missing beneath it.
    pub fn new(public_root: impl Into<PathBuf>) -> Self {
        Self::with_clock(public_root, Arc::new(SystemClock))
    }

    /// Create a store with an explicit time source. Tests use this to
    /// pin the date bucket.
    pub fn with_clock(public_root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self { public_root: public_root.into(), clock }
    }

    /// Create a store configured from the environment.
    ///
    /// | Env Var                | Default  |
    /// |------------------------|----------|
    /// | `LIGHTBOX_PUBLIC_ROOT` | `public` |
    pub fn from_env() -> Self {
        let root =
            std::env::var(PUBLIC_ROOT_ENV).unwrap_or_else(|_| DEFAULT_PUBLIC_ROOT.to_string());
        Self::new(root)
    }

    /// The configured public root.
    pub fn public_root(&self) -> &Path {
        &self.public_root
    }

    /// Allocate a fresh destination for one media file.
    ///
    /// Only the extension of `original_filename` survives into the
    /// stored name; everything else is replaced by a timestamp and a
    /// random suffix from a single clock capture, so the bucket date
    /// and the filename millis always agree. The bucket directory
    /// exists when this returns and the caller can write to
    /// `absolute_path` immediately. No file is created here: a caller
    /// that never writes costs at most an empty directory, which later
    /// allocations on the same date reuse.
    pub async fn allocate(
        &self,
        original_filename: &str,
        kind: MediaKind,
    ) -> Result<AllocatedPath, StorageError> {
        let now = self.clock.now();
        let bucket = now.format("%Y/%m/%d").to_string();

        let mut dir = self.public_root.join(kind.prefix());
        for segment in bucket.split('/') {
            dir.push(segment);
        }
        fs::create_dir_all(&dir).await?;

        let filename = naming::unique_media_filename(
            now.timestamp_millis(),
            naming::extension_of(original_filename),
        );
        let absolute_path = dir.join(&filename);
        let url = format!("/{}/{}/{}", kind.prefix(), bucket, filename);

        tracing::debug!(url = %url, "Allocated media path");
        Ok(AllocatedPath { url, absolute_path })
    }

    /// Resolve a stored URL back to an absolute path under the public
    /// root.
    ///
    /// Purely lexical; the target does not have to exist. Anything that
    /// could land outside the root is refused: `..` segments, rooted
    /// paths, drive prefixes, URLs with no path components at all.
    pub fn resolve(&self, url: &str) -> Result<PathBuf, StorageError> {
        let invalid = || StorageError::InvalidPath { url: url.to_string() };

        let relative = url.strip_prefix('/').unwrap_or(url);
        if relative.is_empty() {
            return Err(invalid());
        }

        let mut resolved = self.public_root.clone();
        let mut components = 0usize;
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(segment) => {
                    resolved.push(segment);
                    components += 1;
                }
                // Bare `.` segments change nothing.
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid());
                }
            }
        }
        if components == 0 {
            return Err(invalid());
        }

        Ok(resolved)
    }

    /// Delete the file a previously issued URL points at, then prune
    /// any date directories the deletion emptied.
    ///
    /// Idempotent: a missing file, or an empty URL from a record that
    /// never had one, is `Ok(NotFound)`, so reclaiming the same URL
    /// twice is harmless. `InvalidPath` and `Io` are real failures;
    /// callers cleaning up in bulk want [`Self::reclaim_many`], which
    /// collects them instead of stopping.
    pub async fn reclaim(&self, url: &str) -> Result<ReclaimOutcome, StorageError> {
        if url.is_empty() {
            tracing::warn!("Reclaim called with an empty URL");
            return Ok(ReclaimOutcome::NotFound);
        }

        let path = self.resolve(url)?;

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(url = %url, "Reclaim target already gone");
                return Ok(ReclaimOutcome::NotFound);
            }
            Err(e) => return Err(e.into()),
        }
        tracing::debug!(url = %url, "Reclaimed media file");

        // Walk emptied directories upward, but never past the tree root
        // (`<root>/uploads` or `<root>/thumbnails`).
        if let Some(stop) = self.tree_root_of(&path) {
            if let Some(parent) = path.parent() {
                prune_upward(parent, &stop).await;
            }
        }

        Ok(ReclaimOutcome::Deleted)
    }

    /// Reclaim a batch of URLs, keeping going when individual ones fail.
    ///
    /// Used for cascading deletes, where one unreadable file must not
    /// strand the rest of an album's cleanup. Failures are logged and
    /// collected into the report.
    pub async fn reclaim_many<I, S>(&self, urls: I) -> ReclaimReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = ReclaimReport::default();
        for url in urls {
            let url = url.as_ref();
            match self.reclaim(url).await {
                Ok(ReclaimOutcome::Deleted) => report.deleted += 1,
                Ok(ReclaimOutcome::NotFound) => report.missing += 1,
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Failed to reclaim media file");
                    report.errors.push(format!("Failed to reclaim {url}: {e}"));
                }
            }
        }
        report
    }

    /// Sweep both media trees, removing every empty date directory.
    ///
    /// Covers what the inline pruning in [`Self::reclaim`] cannot:
    /// chains emptied by crashes mid-reclaim or by files removed behind
    /// the store's back. Tree roots themselves are left in place, and a
    /// tree that does not exist yet is skipped. Returns the number of
    /// directories removed.
    pub async fn prune_empty_buckets(&self) -> Result<usize, StorageError> {
        let mut removed = 0usize;
        for kind in [MediaKind::Image, MediaKind::Thumbnail] {
            let tree = self.public_root.join(kind.prefix());
            let years = match subdirs(&tree).await {
                Ok(years) => years,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            for year in years {
                for month in subdirs(&year).await? {
                    for day in subdirs(&month).await? {
                        removed += try_remove_dir(&day).await;
                    }
                    removed += try_remove_dir(&month).await;
                }
                removed += try_remove_dir(&year).await;
            }
        }
        Ok(removed)
    }

    /// The top-level media tree a resolved path belongs to, if the path
    /// is deeper than the root itself.
    fn tree_root_of(&self, path: &Path) -> Option<PathBuf> {
        let relative = path.strip_prefix(&self.public_root).ok()?;
        let first = relative.components().next()?;
        Some(self.public_root.join(first))
    }
}

// ---------------------------------------------------------------------------
// Directory pruning
// ---------------------------------------------------------------------------

/// Walk upward from `start`, removing directories for as long as they
/// are empty, stopping at (and never removing) `stop`.
///
/// `remove_dir` refuses non-empty directories at the syscall level, so
/// there is no emptiness check to race against. Failures are logged and
/// end the walk.
async fn prune_upward(start: &Path, stop: &Path) {
    let mut dir = start.to_path_buf();
    while dir.as_path() != stop && dir.starts_with(stop) {
        match fs::remove_dir(&dir).await {
            Ok(()) => {
                tracing::debug!(dir = %dir.display(), "Pruned empty media directory");
            }
            // Still in use, or a concurrent reclaim got here first.
            Err(e)
                if e.kind() == std::io::ErrorKind::DirectoryNotEmpty
                    || e.kind() == std::io::ErrorKind::NotFound =>
            {
                break;
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Failed to prune media directory");
                break;
            }
        }
        match dir.parent() {
            Some(parent) => dir = parent.to_path_buf(),
            None => break,
        }
    }
}

/// Immediate subdirectories of `dir`.
async fn subdirs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

/// Try to remove one directory, counting success. Directories that
/// still hold anything are left alone.
async fn try_remove_dir(dir: &Path) -> usize {
    match fs::remove_dir(dir).await {
        Ok(()) => {
            tracing::debug!(dir = %dir.display(), "Pruned empty media directory");
            1
        }
        Err(_) => 0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
