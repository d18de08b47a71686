//! Sequential fetch loop with a global item cap.
use crate::feed::{fetch_items, try_enrich, RawItem};
use crate::output::{normalize, OutputRecord};
use crate::plan::{Task, DEFAULT_MAX_ITEMS};

/// Fetches every task in order and returns normalized records.
///
/// The cap is the first task's `max_items` and applies across all tasks:
/// it is checked after every appended item, and once reached no further
/// items are appended and no further feeds are requested.
///
/// Per-task fetch failures are logged and the task contributes nothing;
/// per-item enrichment failures keep the item as fetched. Neither aborts
/// the run.
pub async fn run(client: &reqwest::Client, tasks: &[Task]) -> Vec<OutputRecord> {
    normalize(collect_items(client, tasks).await)
}

async fn collect_items(client: &reqwest::Client, tasks: &[Task]) -> Vec<RawItem> {
    let limit = tasks
        .first()
        .map_or(DEFAULT_MAX_ITEMS, |t| t.options().max_items);
    let mut results: Vec<RawItem> = Vec::new();

    'tasks: for task in tasks {
        let options = task.options();
        let user_agent = options.user_agent.as_deref();

        let items = match fetch_items(client, task.url(), user_agent).await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(url = %task.url(), error = %e, "Failed to fetch RSS");
                continue;
            }
        };

        for item in items {
            let item = if options.fetch_details {
                try_enrich(client, item, user_agent).await
            } else {
                item
            };

            results.push(item);
            if results.len() >= limit {
                tracing::debug!(limit, "Global item cap reached");
                break 'tasks;
            }
        }
    }

    results
}
