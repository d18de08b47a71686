//! Feed retrieval and per-item enrichment.
//!
//! - [`parser`] - RSS/Atom parsing using the `feed-rs` crate
//! - [`fetcher`] - HTTP GET with User-Agent, timeout and size limits
//! - [`details`] - best-effort article enrichment (final URL, `og:image`)
//!
//! # Example
//!
//! ```ignore
//! use newswire::feed::{build_client, fetch_items, try_enrich};
//!
//! let client = build_client()?;
//! for item in fetch_items(&client, url, None).await? {
//!     let item = try_enrich(&client, item, None).await;
//! }
//! ```

mod details;
mod fetcher;
mod parser;

pub use details::{try_enrich, EnrichError};
pub use fetcher::{build_client, fetch_items, FetchError, DEFAULT_USER_AGENT, REQUEST_TIMEOUT};
pub use parser::{parse_feed, RawItem};
