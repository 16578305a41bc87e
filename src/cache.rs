//! Process-wide index cache keyed by library and resolved version.
//!
//! Entries move through absent → building → ready and only leave `ready` by
//! explicit invalidation. Concurrent misses for the same key await one shared
//! build; builds for different keys never wait on each other.

use crate::error::{Result, SearchError};
use crate::search::LibraryIndex;
use crate::store::{ComponentStore, find_library};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};

/// Type alias for shared index build futures.
type SharedBuild = Shared<BoxFuture<'static, Result<Arc<LibraryIndex>>>>;

/// Cache key: canonical library name and a concrete version.
///
/// A request for "latest" is resolved before it becomes a key, so implicit and
/// explicit requests for the latest version share one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexKey {
    pub library: String,
    pub version: String,
}

impl IndexKey {
    pub fn new(library: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            version: version.into(),
        }
    }

    fn matches(&self, library: &str, version: Option<&str>) -> bool {
        self.library.eq_ignore_ascii_case(library) && version.is_none_or(|v| self.version == v)
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.library, self.version)
    }
}

/// A build in progress, tagged with the ticket of the request that started it.
struct InFlight {
    ticket: u64,
    build: SharedBuild,
}

/// Keyed cache of built library indexes.
pub struct IndexCache {
    store: Arc<dyn ComponentStore>,

    /// Ready entries
    entries: RwLock<HashMap<IndexKey, Arc<LibraryIndex>>>,

    /// In-flight builds (can be awaited by multiple callers)
    in_flight: Mutex<HashMap<IndexKey, InFlight>>,

    next_ticket: AtomicU64,
}

impl fmt::Debug for IndexCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexCache")
            .field(
                "cache_size",
                &self.entries.try_read().map(|e| e.len()).ok(),
            )
            .field(
                "in_flight_count",
                &self.in_flight.try_lock().map(|f| f.len()).ok(),
            )
            .finish_non_exhaustive()
    }
}

impl IndexCache {
    pub fn new(store: Arc<dyn ComponentStore>) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            next_ticket: AtomicU64::new(0),
        }
    }

    /// Resolves a library name and optional version into a cache key.
    ///
    /// The library name becomes its canonical spelling; an absent version
    /// becomes the library's latest version.
    pub async fn resolve(&self, library: &str, version: Option<&str>) -> Result<IndexKey> {
        let libraries = self
            .store
            .list_libraries()
            .await
            .map_err(SearchError::from_listing)?;

        let info = find_library(&libraries, library)
            .ok_or_else(|| SearchError::LibraryNotFound(library.to_string()))?;

        let version = version.map_or_else(|| info.latest_version.clone(), str::to_string);
        Ok(IndexKey::new(info.name.clone(), version))
    }

    /// Get the index for a library version, building it on a miss.
    pub async fn get(&self, library: &str, version: Option<&str>) -> Result<Arc<LibraryIndex>> {
        let key = self.resolve(library, version).await?;
        self.get_resolved(key).await
    }

    /// Get the index for an already resolved key.
    ///
    /// 1. Checks ready entries
    /// 2. Joins an in-flight build if one exists
    /// 3. Starts a new build otherwise
    pub async fn get_resolved(&self, key: IndexKey) -> Result<Arc<LibraryIndex>> {
        if let Some(index) = self.entries.read().await.get(&key) {
            tracing::debug!("Index cache hit for {}", key);
            return Ok(Arc::clone(index));
        }

        let (ticket, build) = {
            let mut in_flight = self.in_flight.lock().await;

            // A build may have completed between the read above and taking this lock
            if let Some(index) = self.entries.read().await.get(&key) {
                return Ok(Arc::clone(index));
            }

            if let Some(existing) = in_flight.get(&key) {
                tracing::debug!("Awaiting in-flight index build for {}", key);
                (existing.ticket, existing.build.clone())
            } else {
                let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
                let build = build_index(Arc::clone(&self.store), key.clone())
                    .boxed()
                    .shared();
                in_flight.insert(
                    key.clone(),
                    InFlight {
                        ticket,
                        build: build.clone(),
                    },
                );
                (ticket, build)
            }
        };

        let result = build.await;
        self.complete(&key, ticket, &result).await;
        result
    }

    /// Publishes a finished build, unless it was invalidated while running.
    async fn complete(&self, key: &IndexKey, ticket: u64, result: &Result<Arc<LibraryIndex>>) {
        let mut in_flight = self.in_flight.lock().await;
        if !in_flight.get(key).is_some_and(|f| f.ticket == ticket) {
            // Already published by another waiter, or detached by invalidation
            return;
        }
        in_flight.remove(key);

        if let Ok(index) = result {
            self.entries
                .write()
                .await
                .insert(key.clone(), Arc::clone(index));
            tracing::debug!("Cached index for {}", key);
        }
    }

    /// Drops one version's entry, or every entry of the library when `version` is `None`.
    ///
    /// In-flight builds for the dropped keys are detached and will not be stored.
    /// Returns the number of ready entries dropped.
    pub async fn invalidate(&self, library: &str, version: Option<&str>) -> usize {
        let mut in_flight = self.in_flight.lock().await;
        let mut entries = self.entries.write().await;

        in_flight.retain(|key, _| !key.matches(library, version));
        let before = entries.len();
        entries.retain(|key, _| !key.matches(library, version));
        let dropped = before - entries.len();

        tracing::info!(
            "Invalidated {} index entries for {}{}",
            dropped,
            library,
            version.map(|v| format!("@{}", v)).unwrap_or_default()
        );
        dropped
    }

    /// Drops every entry and detaches every in-flight build.
    pub async fn invalidate_all(&self) -> usize {
        let mut in_flight = self.in_flight.lock().await;
        let mut entries = self.entries.write().await;

        in_flight.clear();
        let dropped = entries.len();
        entries.clear();

        tracing::info!("Invalidated all {} index entries", dropped);
        dropped
    }

    /// Check if an index is ready for a key.
    pub async fn is_cached(&self, key: &IndexKey) -> bool {
        self.entries.read().await.contains_key(key)
    }

    /// Check if a build is in progress for a key.
    pub async fn is_building(&self, key: &IndexKey) -> bool {
        self.in_flight.lock().await.contains_key(key)
    }

    /// Number of ready entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Fetches records for `key` and builds its index.
async fn build_index(store: Arc<dyn ComponentStore>, key: IndexKey) -> Result<Arc<LibraryIndex>> {
    let start = std::time::Instant::now();

    let records = store
        .get_components(&key.library, &key.version)
        .await
        .map_err(|e| SearchError::from_fetch(e, &key))
        .inspect_err(|e| tracing::warn!("Fetching components for {} failed: {}", key, e))?;

    tracing::info!("Building search index for {} ({} components)", key, records.len());

    // Index in spawn_blocking since it's CPU intensive
    let (library, version) = (key.library.clone(), key.version.clone());
    let index = tokio::task::spawn_blocking(move || LibraryIndex::build(library, version, records))
        .await
        .map_err(|e| {
            tracing::error!("Index build task for {} failed: {}", key, e);
            SearchError::BuildFailure {
                library: key.library.clone(),
                version: key.version.clone(),
                reason: e.to_string(),
            }
        })?;

    tracing::debug!("Index build for {} completed in {:?}", key, start.elapsed());
    Ok(Arc::new(index))
}
