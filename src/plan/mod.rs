//! Fetch task planning.
//!
//! Turns settings, command-line overrides and an optional inputs file into
//! an ordered list of Google News RSS URLs to fetch:
//!
//! - **Dates**: strict `YYYY-MM-DD` parsing and inclusive day ranges
//! - **Topics**: friendly section names → hashed topic ids
//! - **URLs**: search and topic feed URL construction
//! - **Tasks**: precedence rules and day-by-day expansion
//!
//! # Example
//!
//! ```
//! use newswire::config::Settings;
//! use newswire::plan::{plan, Overrides, TaskKind};
//!
//! let cli = Overrides {
//!     query: Some("ai".into()),
//!     date_from: Some("2024-01-01".into()),
//!     date_to: Some("2024-01-03".into()),
//!     ..Default::default()
//! };
//! let tasks = plan(&Settings::default(), &cli).unwrap();
//!
//! assert_eq!(tasks.len(), 3);
//! assert!(tasks.iter().all(|t| t.kind() == TaskKind::Search));
//! ```

mod dates;
mod inputs;
mod tasks;
mod topics;
mod urls;

pub use dates::{inclusive_days, parse_date, utc_now_iso, DateError, InclusiveDays};
pub use inputs::read_queries;
pub use tasks::{
    plan, Overrides, PlanError, Task, TaskKind, TaskOptions, DEFAULT_LANGUAGE, DEFAULT_MAX_ITEMS,
    DEFAULT_QUERY, DEFAULT_REGION,
};
pub use topics::{resolve, TopicError};
pub use urls::{build_search_url, build_topic_url};
