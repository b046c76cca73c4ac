//! Bounded fan-out of per-id detail lookups.

use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::future::Future;

use crate::error::ApiError;

/// Ids in first-seen order with duplicates removed.
pub fn unique_ids(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Looks up every unique id with at most `concurrency` requests in flight and pairs each
/// detail with the metadata of the id's first occurrence.
///
/// Failed lookups are logged and dropped; the batch itself never fails. Output order
/// follows the first occurrence of each id. `max_ids` caps the number of unique ids.
pub async fn expand_by_id<M, D, F, Fut>(
    entries: impl IntoIterator<Item = (i64, M)>,
    max_ids: Option<usize>,
    concurrency: usize,
    fetch: F,
) -> Vec<(D, M)>
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<D, ApiError>>,
{
    let mut order = Vec::new();
    let mut metadata = HashMap::new();
    // Entries arrive ranked, so a repeated id keeps its first (highest-ranked) metadata
    // rather than the last one seen.
    for (id, meta) in entries {
        if !metadata.contains_key(&id) {
            order.push(id);
            metadata.insert(id, meta);
        }
    }
    if let Some(max) = max_ids {
        order.truncate(max);
    }

    let results: Vec<(i64, Result<D, ApiError>)> = stream::iter(order)
        .map(|id| {
            let lookup = fetch(id);
            async move { (id, lookup.await) }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    results
        .into_iter()
        .filter_map(|(id, result)| match result {
            Ok(detail) => metadata.remove(&id).map(|meta| (detail, meta)),
            Err(e) => {
                log::warn!("Dropping id {} from batch: {}", id, e);
                None
            }
        })
        .collect()
}
