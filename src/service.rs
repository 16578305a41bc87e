//! The search facade consumed by the request layer.

use serde::Serialize;
use std::sync::Arc;

use crate::cache::{IndexCache, IndexKey};
use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::popularity::{PopularTerm, PopularityTracker};
use crate::search::{self, FederatedSearch, name_similarity, paginate};
use crate::store::ComponentStore;
use crate::types::{LibraryInfo, SearchHit};

/// Minimum Jaro-Winkler similarity for a library to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Maximum number of suggestions returned.
const MAX_SUGGESTIONS: usize = 5;

/// One page of hits from a single library version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibrarySearch {
    /// Canonical library name
    pub library: String,
    /// Resolved version that was searched
    pub version: String,
    pub hits: Vec<SearchHit>,
    /// Number of hits before pagination
    pub total: usize,
}

/// Owns the index cache, the popularity tracker and the store handle.
///
/// Construct once and share behind an `Arc`.
pub struct DocSearch {
    store: Arc<dyn ComponentStore>,
    cache: IndexCache,
    popularity: PopularityTracker,
}

impl std::fmt::Debug for DocSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocSearch")
            .field("cache", &self.cache)
            .field("popularity", &self.popularity)
            .finish_non_exhaustive()
    }
}

impl DocSearch {
    pub fn new(store: Arc<dyn ComponentStore>) -> Self {
        Self::with_popularity(store, PopularityTracker::new())
    }

    pub fn with_config(store: Arc<dyn ComponentStore>, config: &Config) -> Self {
        Self::with_popularity(
            store,
            PopularityTracker::with_capacity(config.max_popular_terms),
        )
    }

    fn with_popularity(store: Arc<dyn ComponentStore>, popularity: PopularityTracker) -> Self {
        Self {
            cache: IndexCache::new(Arc::clone(&store)),
            store,
            popularity,
        }
    }

    /// Searches one library version. An absent version means the latest.
    ///
    /// The query is recorded in the popularity tracker before it runs.
    pub async fn search_library(
        &self,
        library: &str,
        version: Option<&str>,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<LibrarySearch> {
        self.popularity.record(query);

        let key = self.cache.resolve(library, version).await?;
        let index = self.cache.get_resolved(key.clone()).await?;

        let hits = index.search(query);
        let total = hits.len();
        tracing::debug!("'{}' matched {} components in {}", query, total, key);

        let IndexKey { library, version } = key;
        Ok(LibrarySearch {
            library,
            version,
            hits: paginate(hits, limit, offset),
            total,
        })
    }

    /// Searches the latest version of every library.
    ///
    /// Libraries that fail to load are skipped. The query is recorded once.
    pub async fn search_all(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<FederatedSearch> {
        self.popularity.record(query);
        search::search_all_counted(self.store.as_ref(), &self.cache, query, limit, offset).await
    }

    /// The `limit` most searched terms.
    pub fn popular_terms(&self, limit: usize) -> Vec<PopularTerm> {
        self.popularity.top(limit)
    }

    /// Drops cached indexes of a library, or of one version of it.
    pub async fn invalidate(&self, library: &str, version: Option<&str>) -> usize {
        self.cache.invalidate(library, version).await
    }

    pub async fn invalidate_all(&self) -> usize {
        self.cache.invalidate_all().await
    }

    pub async fn list_libraries(&self) -> Result<Vec<LibraryInfo>> {
        self.store
            .list_libraries()
            .await
            .map_err(SearchError::from_listing)
    }

    /// Known library names similar to `name`, most similar first.
    pub async fn suggest_libraries(&self, name: &str) -> Result<Vec<String>> {
        let libraries = self.list_libraries().await?;

        let mut scored: Vec<(f64, String)> = libraries
            .into_iter()
            .map(|info| (name_similarity(name, &info.name), info.name))
            .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        Ok(scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, name)| name)
            .collect())
    }

    pub const fn cache(&self) -> &IndexCache {
        &self.cache
    }

    pub const fn popularity(&self) -> &PopularityTracker {
        &self.popularity
    }
}
