//! Filename conventions for stored media.
//!
//! Uploaded files never keep their client-supplied names on disk. Every
//! write gets a fresh `{millis}-{suffix}` name, so two uploads of
//! `photo.jpg` in the same second land as distinct files and nothing a
//! client sends can influence where bytes end up.

use rand::Rng;

/// Number of random alphanumeric characters appended to each filename.
pub const RANDOM_SUFFIX_LENGTH: usize = 6;

/// Generate a unique on-disk filename for one stored file.
///
/// The name is `{millis}-{suffix}` plus the optional extension. The
/// millisecond timestamp keeps files within a bucket roughly
/// chronological; the random suffix keeps same-millisecond allocations
/// distinct.
pub fn unique_media_filename(now_millis: i64, extension: Option<&str>) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(RANDOM_SUFFIX_LENGTH)
        .map(char::from)
        .collect();

    match extension {
        Some(ext) => format!("{now_millis}-{suffix}.{ext}"),
        None => format!("{now_millis}-{suffix}"),
    }
}

/// Extract the usable extension from an original filename.
///
/// Looks at the text after the last `.` of the final path component,
/// case preserved (`IMG.JPG` keeps `JPG`). Returns `None` for names
/// without a dot, bare dotfiles like `.gitignore`, and suffixes that
/// contain anything other than ASCII alphanumerics. Such files are
/// stored without an extension rather than carrying arbitrary bytes
/// into the URL.
pub fn extension_of(original: &str) -> Option<&str> {
    let name = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- unique_media_filename --------------------------------------------

    #[test]
    fn filename_has_millis_prefix_and_extension() {
        let name = unique_media_filename(1733834096000, Some("jpg"));
        assert!(name.starts_with("1733834096000-"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), "1733834096000-".len() + RANDOM_SUFFIX_LENGTH + ".jpg".len());
    }

    #[test]
    fn filename_suffix_is_alphanumeric() {
        let name = unique_media_filename(1733834096000, None);
        let suffix = name.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), RANDOM_SUFFIX_LENGTH);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn filename_without_extension_has_no_dot() {
        let name = unique_media_filename(1733834096000, None);
        assert!(!name.contains('.'));
    }

    #[test]
    fn filenames_are_unique_within_one_millisecond() {
        let a = unique_media_filename(1733834096000, Some("png"));
        let b = unique_media_filename(1733834096000, Some("png"));
        assert_ne!(a, b);
    }

    #[test]
    fn extension_case_is_preserved() {
        let name = unique_media_filename(1733834096000, Some("JPG"));
        assert!(name.ends_with(".JPG"));
    }

    // -- extension_of ------------------------------------------------------

    #[test]
    fn extension_of_simple_name() {
        assert_eq!(extension_of("photo.jpg"), Some("jpg"));
        assert_eq!(extension_of("photo.JPG"), Some("JPG"));
    }

    #[test]
    fn extension_of_takes_last_dot() {
        assert_eq!(extension_of("archive.tar.gz"), Some("gz"));
    }

    #[test]
    fn extension_of_ignores_directories() {
        assert_eq!(extension_of("holiday/day.1/photo.png"), Some("png"));
        assert_eq!(extension_of("C:\\Pictures\\photo.png"), Some("png"));
    }

    #[test]
    fn extension_of_rejects_odd_names() {
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".gitignore"), None);
        assert_eq!(extension_of("trailing."), None);
        assert_eq!(extension_of("weird.j pg"), None);
        assert_eq!(extension_of("weird.jp?g"), None);
        assert_eq!(extension_of(""), None);
    }
}
