// Repository Discovery - several search queries merged into one ranked list
use crate::{connectors::StatsSource, context::RepositorySummary};
use futures::future::join_all;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Run every query concurrently and merge what comes back.
///
/// A failed query contributes nothing; it never aborts the others. An empty
/// result means every query failed or matched nothing, and is not an error.
pub async fn discover_repositories(source: &dyn StatsSource, queries: &[String]) -> Vec<RepositorySummary> {
    let results = join_all(queries.iter().map(|query| search_isolated(source, query))).await;
    let merged = merge_repositories(results);

    info!(
        queries = queries.len(),
        repositories = merged.len(),
        "Repository discovery complete"
    );
    merged
}

async fn search_isolated(source: &dyn StatsSource, query: &str) -> Vec<RepositorySummary> {
    match source.search_repositories(query).await {
        Ok(repos) => {
            debug!(query, count = repos.len(), "Discovery query returned");
            repos
        }
        Err(e) => {
            warn!(query, error = %e, "Discovery query failed, continuing without it");
            Vec::new()
        }
    }
}

/// Deduplicate by repository id (last seen wins) and sort by stars, most first.
///
/// Entries keep the position of their first sighting, and the sort is stable,
/// so repositories with equal star counts stay in query order.
pub fn merge_repositories<I>(result_sets: I) -> Vec<RepositorySummary>
where
    I: IntoIterator<Item = Vec<RepositorySummary>>,
{
    let mut slots: HashMap<u64, usize> = HashMap::new();
    let mut merged: Vec<RepositorySummary> = Vec::new();

    for repo in result_sets.into_iter().flatten() {
        match slots.get(&repo.id()) {
            Some(&slot) => merged[slot] = repo,
            None => {
                slots.insert(repo.id(), merged.len());
                merged.push(repo);
            }
        }
    }

    merged.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    merged
}
