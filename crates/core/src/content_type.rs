//! Content-Type lookup for stored media files.

/// Guess a Content-Type from a file extension.
///
/// Accepts a bare filename or a full stored URL. Unknown extensions
/// fall back to `application/octet-stream`.
pub fn content_type_for_extension(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_image_extensions() {
        assert_eq!(content_type_for_extension("photo.jpg"), "image/jpeg");
        assert_eq!(content_type_for_extension("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for_extension("photo.png"), "image/png");
        assert_eq!(content_type_for_extension("anim.gif"), "image/gif");
        assert_eq!(content_type_for_extension("photo.webp"), "image/webp");
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(content_type_for_extension("PHOTO.JPG"), "image/jpeg");
    }

    #[test]
    fn accepts_full_stored_urls() {
        assert_eq!(
            content_type_for_extension("/uploads/2024/12/10/1733834096000-ab12Cd.png"),
            "image/png"
        );
    }

    #[test]
    fn unknown_extensions_fall_back_to_octet_stream() {
        assert_eq!(content_type_for_extension("file.xyz"), "application/octet-stream");
        assert_eq!(content_type_for_extension("Makefile"), "application/octet-stream");
    }
}
