use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::Settings;
use crate::plan::dates::{inclusive_days, parse_date, DateError};
use crate::plan::inputs::read_queries;
use crate::plan::topics::{resolve, TopicError};
use crate::plan::urls::{build_search_url, build_topic_url};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_REGION: &str = "US";
pub const DEFAULT_MAX_ITEMS: usize = 200;
/// Query used when neither flags, settings nor the inputs file supply one.
pub const DEFAULT_QUERY: &str = "technology";

/// Errors that abort planning. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Topic(#[from] TopicError),

    #[error("Failed to read inputs file '{path}': {source}")]
    Inputs {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Topic,
    Search,
}

/// Settings shared by every task of one planning pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOptions {
    pub fetch_details: bool,
    pub user_agent: Option<String>,
    pub language: String,
    pub region: String,
    pub max_items: usize,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            fetch_details: true,
            user_agent: None,
            language: DEFAULT_LANGUAGE.to_owned(),
            region: DEFAULT_REGION.to_owned(),
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

/// One feed to fetch. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    kind: TaskKind,
    url: String,
    query: Option<String>,
    day: Option<NaiveDate>,
    options: TaskOptions,
}

impl Task {
    pub fn topic(url: impl Into<String>, options: TaskOptions) -> Self {
        Self {
            kind: TaskKind::Topic,
            url: url.into(),
            query: None,
            day: None,
            options,
        }
    }

    pub fn search(
        url: impl Into<String>,
        query: impl Into<String>,
        day: Option<NaiveDate>,
        options: TaskOptions,
    ) -> Self {
        Self {
            kind: TaskKind::Search,
            url: url.into(),
            query: Some(query.into()),
            day,
            options,
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Original query text; `None` for topic tasks.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// The single day covered by a date-expanded search task.
    pub fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    pub fn options(&self) -> &TaskOptions {
        &self.options
    }
}

/// Values given explicitly on the command line. They win over [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub query: Option<String>,
    pub topic: Option<String>,
    pub hashed_topic: Option<String>,
    pub language: Option<String>,
    pub region: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub max_items: Option<usize>,
    /// `Some(false)` when `--no-details` was passed.
    pub fetch_details: Option<bool>,
    pub user_agent: Option<String>,
    /// Line-delimited file of extra queries.
    pub inputs: Option<PathBuf>,
}

/// First present value, CLI before settings file.
fn coalesce<T: Clone>(cli: &Option<T>, file: &Option<T>) -> Option<T> {
    cli.as_ref().or(file.as_ref()).cloned()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Builds the ordered list of fetch tasks.
///
/// Each setting resolves CLI value, then settings file, then built-in
/// default. A topic (or hashed topic) short-circuits everything else and
/// yields exactly one task. Otherwise queries are gathered from `--query`,
/// the settings `query`, and the inputs file, in that order, falling back
/// to [`DEFAULT_QUERY`].
///
/// With both date bounds set, each query is expanded into one task per day,
/// and every task searches a single-day window (`after:D before:D`). A lone
/// bound is ignored.
///
/// # Errors
///
/// - [`PlanError::Date`] for a malformed date, even when a topic is selected
/// - [`PlanError::Topic`] for a blank topic value
/// - [`PlanError::Inputs`] if the inputs file exists but cannot be read
pub fn plan(settings: &Settings, cli: &Overrides) -> Result<Vec<Task>, PlanError> {
    let options = TaskOptions {
        fetch_details: coalesce(&cli.fetch_details, &settings.fetch_article_details)
            .unwrap_or(true),
        user_agent: non_empty(coalesce(&cli.user_agent, &settings.user_agent)),
        language: coalesce(&cli.language, &settings.language)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
        region: coalesce(&cli.region, &settings.region)
            .unwrap_or_else(|| DEFAULT_REGION.to_owned()),
        max_items: coalesce(&cli.max_items, &settings.max_items).unwrap_or(DEFAULT_MAX_ITEMS),
    };

    let date_from = non_empty(coalesce(&cli.date_from, &settings.date_from))
        .map(|s| parse_date(&s))
        .transpose()?;
    let date_to = non_empty(coalesce(&cli.date_to, &settings.date_to))
        .map(|s| parse_date(&s))
        .transpose()?;

    let topic = non_empty(coalesce(&cli.topic, &settings.topic));
    let hashed_topic = non_empty(coalesce(&cli.hashed_topic, &settings.hashed_topic));

    if let Some(value) = topic.or(hashed_topic) {
        let topic_id = resolve(&value)?;
        let url = build_topic_url(&topic_id, &options.language, &options.region);
        tracing::debug!(topic = %value, url = %url, "Planned topic task");
        return Ok(vec![Task::topic(url, options)]);
    }

    let mut queries = Vec::new();
    queries.extend(non_empty(cli.query.clone()));
    queries.extend(non_empty(settings.query.clone()));
    if let Some(path) = &cli.inputs {
        let extra = read_queries(path).map_err(|source| PlanError::Inputs {
            path: path.clone(),
            source,
        })?;
        queries.extend(extra);
    }
    if queries.is_empty() {
        queries.push(DEFAULT_QUERY.to_owned());
    }

    let mut tasks = Vec::new();
    match (date_from, date_to) {
        (Some(from), Some(to)) => {
            let days = inclusive_days(from, to);
            for query in &queries {
                for day in days.clone() {
                    let url = build_search_url(
                        query,
                        &options.language,
                        &options.region,
                        Some(day),
                        Some(day),
                    );
                    tasks.push(Task::search(url, query.as_str(), Some(day), options.clone()));
                }
            }
        }
        (from, to) => {
            if from.is_some() || to.is_some() {
                tracing::debug!(
                    date_from = ?from,
                    date_to = ?to,
                    "Only one date bound given, searching without date bounds"
                );
            }
            for query in &queries {
                let url = build_search_url(query, &options.language, &options.region, None, None);
                tasks.push(Task::search(url, query.as_str(), None, options.clone()));
            }
        }
    }

    tracing::debug!(
        queries = queries.len(),
        tasks = tasks.len(),
        "Planned search tasks"
    );
    Ok(tasks)
}
