//! Artifact name extraction from the download URL.

/// Extracts the last path segment of `url`, ignoring query and fragment.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        assert_eq!(
            filename_from_url_path(
                "https://downloads.cursor.com/production/abc/linux/x64/Cursor-1.2.4-x86_64.AppImage"
            )
            .as_deref(),
            Some("Cursor-1.2.4-x86_64.AppImage")
        );
    }

    #[test]
    fn root_or_empty() {
        assert_eq!(filename_from_url_path("https://example.com/"), None);
        assert_eq!(filename_from_url_path("https://example.com"), None);
    }

    #[test]
    fn with_query() {
        assert_eq!(
            filename_from_url_path("https://example.com/Cursor-1.0.0.AppImage?sig=abc").as_deref(),
            Some("Cursor-1.0.0.AppImage")
        );
    }

    #[test]
    fn not_a_url() {
        assert_eq!(filename_from_url_path("Cursor-1.0.0.AppImage"), None);
    }
}
