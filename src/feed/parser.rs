use anyhow::Result;
use chrono::Utc;
use feed_rs::model::{Entry, FeedType};
use feed_rs::parser;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::util::origin_of;

/// A feed entry as fetched, before optional enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: Option<String>,
    /// Article link; items without one are never enriched.
    pub link: Option<String>,
    pub guid: Option<String>,
    /// Publisher name from the RSS `<source>` element.
    pub source: Option<String>,
    /// `scheme://host` of the link, replaced by the final host after enrichment.
    pub source_url: Option<String>,
    /// Feed timestamp as written in the feed (RSS), or RFC 3339 (Atom).
    pub published_at: Option<String>,
    /// Final URL after following redirects; set only by enrichment.
    pub loaded_url: Option<String>,
    /// The feed URL this item came from.
    pub rss_link: String,
    pub image: Option<String>,
    /// Capture time, Unix seconds.
    pub fetched_at: i64,
}

/// Per-`<item>` values read verbatim from the RSS document.
///
/// `feed-rs` normalizes these away: it invents ids for items without a
/// `<guid>`, folds `<enclosure>` into media content, and drops dates it
/// cannot parse.
#[derive(Debug, Default)]
struct ItemExtras {
    guid: Option<String>,
    source: Option<String>,
    pub_date: Option<String>,
    media_content: Option<String>,
    media_thumbnail: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum ExtraField {
    Guid,
    Source,
    PubDate,
}

/// Parses RSS/Atom bytes into [`RawItem`]s in document order.
///
/// `rss_link` is recorded on every item. RSS items take their guid,
/// publisher, date and image from a lightweight XML scan of each `<item>`;
/// Atom entries use what `feed-rs` reports.
pub fn parse_feed(bytes: &[u8], rss_link: &str) -> Result<Vec<RawItem>> {
    let feed = parser::parse(bytes)?;
    let fetched_at = Utc::now().timestamp();
    let is_rss = matches!(
        feed.feed_type,
        FeedType::RSS0 | FeedType::RSS1 | FeedType::RSS2
    );

    let mut extras = if is_rss {
        scan_item_extras(bytes)
    } else {
        Vec::new()
    };
    if is_rss && extras.len() != feed.entries.len() {
        tracing::debug!(
            feed = %rss_link,
            entries = feed.entries.len(),
            scanned = extras.len(),
            "Item count mismatch, ignoring RSS item scan"
        );
        extras.clear();
    }
    let mut extras = extras.into_iter();

    let items = feed
        .entries
        .into_iter()
        .map(|entry| {
            let item = if is_rss {
                from_rss_item(&entry, extras.next().unwrap_or_default())
            } else {
                from_atom_entry(&entry)
            };
            RawItem {
                title: entry.title.map(|t| t.content),
                source_url: item.link.as_deref().and_then(origin_of),
                rss_link: rss_link.to_owned(),
                fetched_at,
                ..item
            }
        })
        .collect();

    Ok(items)
}

fn entry_link(entry: &Entry) -> Option<String> {
    entry.links.first().map(|l| l.href.trim().to_owned())
}

fn entry_timestamp(entry: &Entry) -> Option<String> {
    entry.published.or(entry.updated).map(|dt| dt.to_rfc3339())
}

/// Only the item's own `<guid>` counts; a missing one stays missing.
fn from_rss_item(entry: &Entry, extra: ItemExtras) -> RawItem {
    RawItem {
        link: entry_link(entry),
        guid: extra.guid,
        source: extra.source,
        published_at: extra.pub_date.or_else(|| entry_timestamp(entry)),
        image: extra.media_content.or(extra.media_thumbnail),
        ..Default::default()
    }
}

fn from_atom_entry(entry: &Entry) -> RawItem {
    let id = entry.id.trim();
    RawItem {
        link: entry_link(entry),
        guid: (!id.is_empty()).then(|| id.to_owned()),
        published_at: entry_timestamp(entry),
        image: media_image(entry),
        ..Default::default()
    }
}

/// First `media:content` URL, else first `media:thumbnail` URL.
fn media_image(entry: &Entry) -> Option<String> {
    let content = entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .find_map(|c| c.url.as_ref().map(|u| u.to_string()));

    content.or_else(|| {
        entry
            .media
            .iter()
            .flat_map(|m| m.thumbnails.iter())
            .map(|t| t.image.uri.trim())
            .find(|uri| !uri.is_empty())
            .map(str::to_owned)
    })
}

/// Collects raw per-`<item>` values: `<guid>`, `<source>` and `<pubDate>`
/// text, and the first `media:content` / `media:thumbnail` URLs.
///
/// Returns an empty list if the document is not well-formed; `feed-rs`
/// is the authority on whether the feed parses at all.
fn scan_item_extras(bytes: &[u8]) -> Vec<ItemExtras> {
    // SEC-002: quick-xml (0.37) never expands custom <!ENTITY> declarations.
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<ItemExtras> = None;
    let mut field: Option<ExtraField> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"item" => current = Some(ItemExtras::default()),
                b"guid" if current.is_some() => field = Some(ExtraField::Guid),
                b"source" if current.is_some() => field = Some(ExtraField::Source),
                b"pubDate" if current.is_some() => field = Some(ExtraField::PubDate),
                _ => {
                    if let Some(item) = current.as_mut() {
                        record_media(item, &e);
                    }
                }
            },
            Ok(Event::Empty(e)) => {
                if let Some(item) = current.as_mut() {
                    record_media(item, &e);
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    if let Ok(text) = t.unescape() {
                        push_text(item, f, &text);
                    }
                }
            }
            Ok(Event::CData(c)) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    if let Ok(text) = c.decode() {
                        push_text(item, f, &text);
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"item" => {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                    field = None;
                }
                b"guid" | b"source" | b"pubDate" => field = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!(error = %e, "XML scan for item extras failed");
                return Vec::new();
            }
            _ => {}
        }
        buf.clear();
    }

    items
}

/// Keeps the first `url` of each Media RSS element kind. `<enclosure>` is
/// never an image source.
fn record_media(item: &mut ItemExtras, e: &BytesStart<'_>) {
    let name = e.name();
    if !name.prefix().is_some_and(|p| p.as_ref() == b"media") {
        return;
    }
    let slot = match name.local_name().as_ref() {
        b"content" => &mut item.media_content,
        b"thumbnail" => &mut item.media_thumbnail,
        _ => return,
    };
    if slot.is_some() {
        return;
    }
    if let Ok(Some(attr)) = e.try_get_attribute("url") {
        if let Ok(url) = attr.unescape_value() {
            let url = url.trim();
            if !url.is_empty() {
                *slot = Some(url.to_owned());
            }
        }
    }
}

fn push_text(item: &mut ItemExtras, field: ExtraField, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let slot = match field {
        ExtraField::Guid => &mut item.guid,
        ExtraField::Source => &mut item.source,
        ExtraField::PubDate => &mut item.pub_date,
    };
    slot.get_or_insert_with(String::new).push_str(text);
}
