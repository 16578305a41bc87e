//! Search across the latest version of every library.

use futures::future::join_all;
use serde::Serialize;

use super::query::paginate;
use crate::cache::{IndexCache, IndexKey};
use crate::error::{Result, SearchError};
use crate::store::ComponentStore;
use crate::types::SearchHit;

/// One page of federated hits plus the number of hits before pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FederatedSearch {
    pub hits: Vec<SearchHit>,
    pub total: usize,
}

/// Runs `query` against every library's latest version and returns one page.
///
/// See [`search_all_counted`] for failure handling.
pub async fn search_all(
    store: &dyn ComponentStore,
    cache: &IndexCache,
    query: &str,
    limit: usize,
    offset: usize,
) -> Result<Vec<SearchHit>> {
    Ok(search_all_counted(store, cache, query, limit, offset)
        .await?
        .hits)
}

/// Runs `query` against every library's latest version.
///
/// Hits are tagged with their library and version, merged in listing order and
/// stably sorted by score, so equal scores keep listing order. A library the
/// store does not know (or whose latest version it does not know) contributes
/// no hits. Any other fetch or build failure is returned as an error.
pub async fn search_all_counted(
    store: &dyn ComponentStore,
    cache: &IndexCache,
    query: &str,
    limit: usize,
    offset: usize,
) -> Result<FederatedSearch> {
    let hits = merged_hits(store, cache, query).await?;
    let total = hits.len();
    Ok(FederatedSearch {
        hits: paginate(hits, limit, offset),
        total,
    })
}

/// Every federated hit, ranked, before pagination.
async fn merged_hits(
    store: &dyn ComponentStore,
    cache: &IndexCache,
    query: &str,
) -> Result<Vec<SearchHit>> {
    let libraries = store
        .list_libraries()
        .await
        .map_err(SearchError::from_listing)?;

    let searches = libraries.iter().map(|info| {
        let key = IndexKey::new(info.name.clone(), info.latest_version.clone());
        async move {
            let index = cache.get_resolved(key.clone()).await?;
            let hits: Vec<SearchHit> = index
                .search(query)
                .into_iter()
                .map(|mut hit| {
                    hit.library = Some(key.library.clone());
                    hit.library_version = Some(key.version.clone());
                    hit
                })
                .collect();
            Ok::<_, SearchError>((key, hits))
        }
    });

    let mut merged = Vec::new();
    for (info, result) in libraries.iter().zip(join_all(searches).await) {
        match result {
            Ok((key, hits)) => {
                tracing::debug!("{} hits from {}", hits.len(), key);
                merged.extend(hits);
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("Skipping library '{}' in federated search: {}", info.name, e);
            }
            Err(e) => {
                tracing::error!("Federated search failed on library '{}': {}", info.name, e);
                return Err(e);
            }
        }
    }

    // Stable sort keeps listing order among equal scores
    merged.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::{Fetcher, FetcherRegistry, StaticFetcher};
    use crate::types::{ComponentRecord, LibraryInfo};
    use assert2::{check, let_assert};
    use futures::FutureExt;
    use futures::future::BoxFuture;
    use std::sync::Arc;

    /// Fetcher whose records can never be read.
    struct BrokenFetcher;

    impl Fetcher for BrokenFetcher {
        fn fetch<'a>(
            &'a self,
            library: &'a LibraryInfo,
            version: &'a str,
        ) -> BoxFuture<'a, Result<Vec<ComponentRecord>, StoreError>> {
            futures::future::ready(Err(StoreError::Fetch {
                library: library.name.clone(),
                version: version.to_string(),
                reason: "truncated record".to_string(),
            }))
            .boxed()
        }
    }

    fn setup() -> (Arc<FetcherRegistry>, IndexCache) {
        let registry = Arc::new(FetcherRegistry::new());
        registry.register(
            LibraryInfo::new("alpha", "1.0.0"),
            Arc::new(StaticFetcher::uniform(vec![ComponentRecord::new(
                "hooks/useHook",
                "hook",
            )])),
        );
        registry.register(
            LibraryInfo::new("beta", "2.0.0"),
            Arc::new(StaticFetcher::uniform(vec![ComponentRecord::new(
                "hooks/hook",
                "hook",
            )])),
        );
        let cache = IndexCache::new(registry.clone());
        (registry, cache)
    }

    #[tokio::test]
    async fn test_equal_scores_keep_listing_order() {
        let (registry, cache) = setup();
        let_assert!(Ok(result) = search_all_counted(registry.as_ref(), &cache, "hook", 10, 0).await);
        check!(result.total == 2);
        let libraries: Vec<_> = result
            .hits
            .iter()
            .map(|hit| hit.library.as_deref())
            .collect();
        check!(libraries == vec![Some("alpha"), Some("beta")]);
        check!(result.hits[1].library_version.as_deref() == Some("2.0.0"));
    }

    #[tokio::test]
    async fn test_offset_past_end_is_empty() {
        let (registry, cache) = setup();
        let_assert!(Ok(hits) = search_all(registry.as_ref(), &cache, "hook", 10, 5).await);
        check!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_unfetchable_library_skipped() {
        let (registry, cache) = setup();
        // Lists a version the fetcher has no records for
        registry.register(
            LibraryInfo::new("gamma", "0.1.0"),
            Arc::new(StaticFetcher::new()),
        );
        let_assert!(Ok(result) = search_all_counted(registry.as_ref(), &cache, "hook", 10, 0).await);
        check!(result.total == 2);
    }

    #[tokio::test]
    async fn test_build_failure_fails_whole_search() {
        let (registry, cache) = setup();
        registry.register(LibraryInfo::new("gamma", "0.1.0"), Arc::new(BrokenFetcher));
        let_assert!(
            Err(SearchError::BuildFailure { library, .. }) =
                search_all_counted(registry.as_ref(), &cache, "hook", 10, 0).await
        );
        check!(library == "gamma");
        // The healthy libraries are still cached for the next request
        check!(cache.len().await == 2);
    }
}
