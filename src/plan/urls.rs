//! Google News RSS URL construction.
//!
//! Every component is form-urlencoded (space becomes `+`), and `ceid` is
//! always `<region>:<language>`, e.g. `US:en`.

use chrono::NaiveDate;
use url::form_urlencoded::byte_serialize;

const SEARCH_BASE: &str = "https://news.google.com/rss/search";
const TOPIC_BASE: &str = "https://news.google.com/rss/topics";

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

fn locale_params(language: &str, region: &str) -> String {
    format!(
        "hl={}&gl={}&ceid={}",
        encode(language),
        encode(region),
        encode(&format!("{}:{}", region, language))
    )
}

/// Builds a search feed URL for `query`.
///
/// When both bounds are given, ` after:<from> before:<to>` is appended to
/// the query text. The bounds are emitted verbatim; callers wanting a
/// single day pass the same date for both.
pub fn build_search_url(
    query: &str,
    language: &str,
    region: &str,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
) -> String {
    let mut q = query.trim().to_owned();
    if let (Some(from), Some(to)) = (date_from, date_to) {
        q = format!("{} after:{} before:{}", q, from, to);
    }

    format!(
        "{}?q={}&{}",
        SEARCH_BASE,
        encode(&q),
        locale_params(language, region)
    )
}

/// Builds a topic feed URL for an already-resolved topic id.
pub fn build_topic_url(topic_id: &str, language: &str, region: &str) -> String {
    format!(
        "{}/{}?{}",
        TOPIC_BASE,
        encode(topic_id),
        locale_params(language, region)
    )
}
