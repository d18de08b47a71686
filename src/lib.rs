//! Google News RSS collection.
//!
//! A run has three stages:
//!
//! 1. [`plan`] turns settings and CLI overrides into an ordered list of feed URLs
//! 2. [`collect::run`] fetches them in order, optionally enriches each item,
//!    and stops at a global item cap
//! 3. [`output`] normalizes items to the fixed record schema and writes JSON

pub mod collect;
pub mod config;
pub mod feed;
pub mod output;
pub mod plan;
pub mod util;
