use thiserror::Error;
use url::Url;

/// Errors that can occur when validating an article link before fetching it.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The link could not be parsed as an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The link uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Validates a link for use as an enrichment target.
///
/// Rejects anything that is not an absolute `http://` or `https://` URL, so
/// feed-supplied values such as `file:///etc/passwd` or `javascript:` links
/// are never handed to the HTTP client.
///
/// # Examples
///
/// ```
/// use newswire::util::validate_link;
///
/// let url = validate_link("https://example.com/story").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_link("file:///etc/passwd").is_err());
/// assert!(validate_link("not a url").is_err());
/// ```
pub fn validate_link(link: &str) -> Result<Url, LinkError> {
    let url = Url::parse(link.trim())?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(LinkError::UnsupportedScheme(scheme.to_owned())),
    }
}

/// Returns the `scheme://host[:port]` prefix of a link.
///
/// Returns `None` when the link cannot be parsed or has no host
/// (e.g. `mailto:` or `data:` URLs). Default ports are omitted.
///
/// # Examples
///
/// ```
/// use newswire::util::origin_of;
///
/// assert_eq!(
///     origin_of("https://www.example.com/news/1?ref=rss").as_deref(),
///     Some("https://www.example.com")
/// );
/// assert_eq!(origin_of("not a url"), None);
/// ```
pub fn origin_of(link: &str) -> Option<String> {
    let url = Url::parse(link.trim()).ok()?;
    let host = url.host_str()?;

    Some(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_links() {
        assert!(validate_link("https://example.com/story").is_ok());
        assert!(validate_link("http://news.example.org").is_ok());
    }

    #[test]
    fn test_link_is_trimmed() {
        let url = validate_link("  https://example.com/a  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(matches!(
            validate_link("file:///etc/passwd"),
            Err(LinkError::UnsupportedScheme(s)) if s == "file"
        ));
        assert!(validate_link("ftp://example.com").is_err());
        assert!(validate_link("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_relative_link_rejected() {
        assert!(matches!(
            validate_link("/news/1"),
            Err(LinkError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_origin_strips_path_and_query() {
        assert_eq!(
            origin_of("https://news.google.com/rss/articles/abc?oc=5").as_deref(),
            Some("https://news.google.com")
        );
    }

    #[test]
    fn test_origin_keeps_explicit_port() {
        assert_eq!(
            origin_of("http://127.0.0.1:8080/article").as_deref(),
            Some("http://127.0.0.1:8080")
        );
    }

    #[test]
    fn test_origin_drops_default_port() {
        assert_eq!(
            origin_of("https://example.com:443/a").as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_origin_without_host() {
        assert_eq!(origin_of("mailto:someone@example.com"), None);
        assert_eq!(origin_of(""), None);
    }
}
