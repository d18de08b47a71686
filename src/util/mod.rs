//! Small URL helpers shared by feed parsing and article enrichment.
//!
//! - **Link validation**: only `http`/`https` links are ever requested
//! - **Origin extraction**: `scheme://host[:port]` for the `sourceUrl` field

mod links;

pub use links::{origin_of, validate_link, LinkError};
