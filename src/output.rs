//! Output schema and JSON emission.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::feed::RawItem;
use crate::plan::utc_now_iso;

/// One emitted result. Field order here is the serialized order.
///
/// Absent values serialize as `null`; `fetched_at` from [`RawItem`] is not
/// carried over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub title: Option<String>,
    pub link: Option<String>,
    pub guid: Option<String>,
    pub source: Option<String>,
    pub source_url: Option<String>,
    /// Never empty: falls back to the normalization time.
    pub published_at: String,
    pub loaded_url: Option<String>,
    pub rss_link: String,
    pub image: Option<String>,
}

impl From<RawItem> for OutputRecord {
    fn from(item: RawItem) -> Self {
        let published_at = item
            .published_at
            .filter(|p| !p.is_empty())
            .unwrap_or_else(utc_now_iso);

        Self {
            title: item.title,
            link: item.link,
            guid: item.guid,
            source: item.source,
            source_url: item.source_url,
            published_at,
            loaded_url: item.loaded_url,
            rss_link: item.rss_link,
            image: item.image,
        }
    }
}

/// Projects items onto the output schema, preserving order.
pub fn normalize(items: Vec<RawItem>) -> Vec<OutputRecord> {
    items.into_iter().map(OutputRecord::from).collect()
}

/// Renders records as an indented JSON array. Non-ASCII text is left as-is.
pub fn to_json(records: &[OutputRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize results")
}

/// Writes the JSON document to `path`, or to stdout when `path` is `None`.
///
/// Parent directories are created as needed and the file is replaced
/// atomically, so an interrupted run never leaves a truncated document.
pub fn write_output(records: &[OutputRecord], path: Option<&Path>) -> Result<()> {
    let json = to_json(records)?;

    let Some(path) = path else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{}", json).context("Failed to write results to stdout")?;
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create output directory '{}'", parent.display())
        })?;
    }

    replace_file(path, json.as_bytes())?;
    tracing::info!(path = %path.display(), records = records.len(), "Wrote results");
    Ok(())
}

/// Writes the document beside `dst` as `<name>.partial`, then renames it
/// into place. A failed write removes the partial file and leaves any
/// previous `dst` untouched.
fn replace_file(dst: &Path, content: &[u8]) -> Result<()> {
    let mut partial = dst.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    let written = std::fs::write(&partial, content).and_then(|()| std::fs::rename(&partial, dst));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&partial);
        return Err(e).with_context(|| format!("Failed to write results to '{}'", dst.display()));
    }
    Ok(())
}
