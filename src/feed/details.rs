use crate::feed::fetcher::{get_limited, FetchError};
use crate::feed::parser::RawItem;
use crate::util::{origin_of, validate_link, LinkError};
use scraper::{Html, Selector};
use thiserror::Error;

const MAX_PAGE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Errors that can occur while enriching a single item.
///
/// Never surfaced to callers of [`try_enrich`]; they are logged and the
/// item is returned untouched.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The item link is not an absolute http(s) URL
    #[error("invalid link: {0}")]
    InvalidLink(#[from] LinkError),
    /// Fetching the article page failed
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Best-effort enrichment of a feed item. Never fails.
///
/// Follows the item's link through any redirects and, on success, returns
/// a copy with:
/// - `loaded_url` set to the final URL
/// - `image` replaced by the page's `og:image`, when present
/// - `source_url` replaced by the final URL's `scheme://host`
///
/// Items without a link are returned as-is. On any error the original
/// item is returned unchanged and a warning is logged.
pub async fn try_enrich(
    client: &reqwest::Client,
    item: RawItem,
    user_agent: Option<&str>,
) -> RawItem {
    match enrich(client, &item, user_agent).await {
        Ok(Some(enriched)) => enriched,
        Ok(None) => item,
        Err(e) => {
            tracing::warn!(
                link = item.link.as_deref().unwrap_or_default(),
                error = %e,
                "Enrichment failed, keeping feed item"
            );
            item
        }
    }
}

/// Returns `Ok(None)` when the item has no link to follow.
async fn enrich(
    client: &reqwest::Client,
    item: &RawItem,
    user_agent: Option<&str>,
) -> Result<Option<RawItem>, EnrichError> {
    let Some(link) = item.link.as_deref() else {
        return Ok(None);
    };

    let url = validate_link(link)?;
    let page = get_limited(client, url.as_str(), user_agent, MAX_PAGE_SIZE).await?;
    let html = String::from_utf8_lossy(&page.bytes);

    let mut enriched = item.clone();
    if let Some(image) = find_meta_property(&html, "og:image") {
        enriched.image = Some(image);
    }
    enriched.source_url = origin_of(&page.final_url);
    enriched.loaded_url = Some(page.final_url);

    Ok(Some(enriched))
}

/// Returns the trimmed `content` of the first `<meta property="...">` tag
/// matching `property`, or `None` if that tag is missing or has no content.
///
/// Only the first matching tag is considered. Attribute values are parsed
/// as HTML, so unquoted values and character references are handled.
fn find_meta_property(html: &str, property: &str) -> Option<String> {
    let selector = Selector::parse("meta[property]").ok()?;
    let document = Html::parse_document(html);

    let tag = document
        .select(&selector)
        .find(|el| el.value().attr("property") == Some(property))?;

    let content = tag.value().attr("content")?.trim();
    (!content.is_empty()).then(|| content.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fetcher::build_client;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn item_with_link(link: Option<String>) -> RawItem {
        RawItem {
            title: Some("Story".into()),
            source_url: link.as_deref().and_then(origin_of),
            link,
            guid: Some("g-1".into()),
            source: Some("Example Times".into()),
            published_at: Some("2024-01-01T10:00:00+00:00".into()),
            loaded_url: None,
            rss_link: "https://news.google.com/rss/search?q=ai".into(),
            image: Some("https://img.example.com/feed.jpg".into()),
            fetched_at: 1_700_000_000,
        }
    }

    // --- Unit tests for meta extraction (no network) ---

    #[test]
    fn test_find_og_image() {
        let html = r#"<html><head>
            <meta property="og:title" content="Title">
            <meta property="og:image" content="https://cdn.example.com/Hero.JPG">
        </head></html>"#;
        assert_eq!(
            find_meta_property(html, "og:image").as_deref(),
            Some("https://cdn.example.com/Hero.JPG")
        );
    }

    #[test]
    fn test_find_og_image_reversed_attrs_single_quotes() {
        let html = r#"<META content='https://cdn.example.com/a.png' PROPERTY='og:image' />"#;
        assert_eq!(
            find_meta_property(html, "og:image").as_deref(),
            Some("https://cdn.example.com/a.png")
        );
    }

    #[test]
    fn test_find_og_image_unquoted_attrs() {
        let html = "<head><meta property=og:image content=https://cdn.example.com/x.jpg></head>";
        assert_eq!(
            find_meta_property(html, "og:image").as_deref(),
            Some("https://cdn.example.com/x.jpg")
        );
    }

    #[test]
    fn test_find_og_image_after_quoted_angle_bracket() {
        let html = r#"<meta data-x="a>b" property="og:image" content="https://cdn.example.com/y.jpg">"#;
        assert_eq!(
            find_meta_property(html, "og:image").as_deref(),
            Some("https://cdn.example.com/y.jpg")
        );
    }

    #[test]
    fn test_og_image_width_is_not_og_image() {
        let html = r#"<meta property="og:image:width" content="1200">
            <meta property="og:image" content="https://cdn.example.com/b.png">"#;
        assert_eq!(
            find_meta_property(html, "og:image").as_deref(),
            Some("https://cdn.example.com/b.png")
        );
    }

    #[test]
    fn test_og_image_entities_decoded_and_trimmed() {
        let html = r#"<meta property="og:image" content=" https://cdn.example.com/i?w=1&amp;h=2 ">"#;
        assert_eq!(
            find_meta_property(html, "og:image").as_deref(),
            Some("https://cdn.example.com/i?w=1&h=2")
        );
    }

    #[test]
    fn test_only_first_og_image_is_considered() {
        let html = r#"<meta property="og:image" content="  ">
            <meta property="og:image" content="https://cdn.example.com/c.png">"#;
        assert_eq!(find_meta_property(html, "og:image"), None);
    }

    #[test]
    fn test_no_og_image() {
        let html = r#"<meta name="description" content="og:image lookalike">"#;
        assert_eq!(find_meta_property(html, "og:image"), None);
        assert_eq!(find_meta_property("<meta property=\"og:image\">", "og:image"), None);
        assert_eq!(find_meta_property("", "og:image"), None);
    }

    // --- Enrichment against a mock server ---

    #[tokio::test]
    async fn test_enrich_follows_redirect_and_reads_og_image() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/articles/abc"))
            .respond_with(ResponseTemplate::new(302).insert_header(
                "Location",
                format!("{}/news/story-1", mock_server.uri()).as_str(),
            ))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/news/story-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(
                        r#"<html><head><meta property="og:image" content="https://cdn.example.com/og.jpg"></head></html>"#,
                    )
                    .insert_header("Content-Type", "text/html"),
            )
            .mount(&mock_server)
            .await;

        let client = build_client().unwrap();
        let item = item_with_link(Some(format!("{}/rss/articles/abc", mock_server.uri())));

        let enriched = try_enrich(&client, item.clone(), None).await;

        assert_eq!(
            enriched.loaded_url,
            Some(format!("{}/news/story-1", mock_server.uri()))
        );
        assert_eq!(enriched.image.as_deref(), Some("https://cdn.example.com/og.jpg"));
        assert_eq!(enriched.source_url, Some(mock_server.uri()));
        assert_eq!(enriched.title, item.title);
        assert_eq!(enriched.guid, item.guid);
        assert_eq!(enriched.published_at, item.published_at);
    }

    #[tokio::test]
    async fn test_enrich_without_og_image_keeps_feed_image() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let client = build_client().unwrap();
        let item = item_with_link(Some(format!("{}/a", mock_server.uri())));

        let enriched = try_enrich(&client, item, None).await;
        assert_eq!(
            enriched.image.as_deref(),
            Some("https://img.example.com/feed.jpg")
        );
        assert_eq!(enriched.loaded_url, Some(format!("{}/a", mock_server.uri())));
    }

    #[tokio::test]
    async fn test_failed_enrichment_returns_item_unchanged() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = build_client().unwrap();
        let item = item_with_link(Some(format!("{}/broken", mock_server.uri())));

        let result = try_enrich(&client, item.clone(), None).await;
        assert_eq!(result, item);
    }

    #[tokio::test]
    async fn test_item_without_link_is_untouched() {
        let client = build_client().unwrap();
        let item = item_with_link(None);

        let result = try_enrich(&client, item.clone(), None).await;
        assert_eq!(result, item);
    }

    #[tokio::test]
    async fn test_non_http_link_is_untouched() {
        let client = build_client().unwrap();
        let item = item_with_link(Some("file:///etc/passwd".into()));

        let result = try_enrich(&client, item.clone(), None).await;
        assert_eq!(result, item);
    }
}
