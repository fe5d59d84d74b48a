//! Basename extraction from a URL path.

/// Returns the last non-empty path segment of `url`, percent-decoding left as-is.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn url_basename(url: &str) -> Option<String> {
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
            url_basename("https://example.com/a/b/tool.tar.gz").as_deref(),
            Some("tool.tar.gz")
        );
        assert_eq!(url_basename("https://example.com/single").as_deref(), Some("single"));
    }

    #[test]
    fn trailing_slash_uses_last_segment() {
        assert_eq!(
            url_basename("https://example.com/releases/latest/").as_deref(),
            Some("latest")
        );
    }

    #[test]
    fn root_or_empty() {
        assert_eq!(url_basename("https://example.com/"), None);
        assert_eq!(url_basename("https://example.com"), None);
        assert_eq!(url_basename("::garbage::"), None);
    }

    #[test]
    fn with_query_and_fragment() {
        assert_eq!(
            url_basename("https://example.com/file.zip?token=abc#frag").as_deref(),
            Some("file.zip")
        );
    }
}
