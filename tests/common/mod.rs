//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `react_registry`: react 18.2.0 hooks, for ranking tests
//! - `hook_registry`: two libraries with one "hook" component each
//! - `sample_registry`: the built-in react/vue/angular catalog
//!
//! Stores that misbehave on purpose live here too: [`CountingStore`] counts
//! fetches and can delay them, [`UnavailableStore`] fails every call.
//!
//! Every fixture and constructor here initializes tracing, so search and cache
//! logs show up in failing test output.

#![allow(dead_code)] // Items used across different integration test crates

use docsearch::{
    ComponentRecord, ComponentStore, FetcherRegistry, LibraryInfo, StaticFetcher, StoreError,
};
use futures::FutureExt;
use futures::future::BoxFuture;
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

pub fn record(path: &str, name: &str, kind: &str, description: &str) -> ComponentRecord {
    ComponentRecord::new(path, name)
        .with_kind(kind)
        .with_description(description)
}

/// react 18.2.0 (latest) with hooks whose descriptions mention state.
#[fixture]
pub fn react_registry() -> Arc<FetcherRegistry> {
    docsearch::tracing::init();
    let registry = FetcherRegistry::new();
    registry.register(
        LibraryInfo::new("react", "18.2.0").with_versions(["18.2.0", "17.0.2"]),
        Arc::new(StaticFetcher::uniform(vec![
            record(
                "hooks/useEffect",
                "useEffect",
                "hook",
                "Synchronizes a component with an external system.",
            ),
            record(
                "hooks/useReducer",
                "useReducer",
                "hook",
                "An alternative to useState for complex logic.",
            ),
            record(
                "hooks/useState",
                "useState",
                "hook",
                "Returns a state value and a function to update it.",
            ),
            record(
                "hooks/useContext",
                "useContext",
                "hook",
                "Reads and subscribes to context.",
            ),
        ])),
    );
    Arc::new(registry)
}

/// Two libraries, each with exactly one component matching "hook".
///
/// `alpha` matches by name, `beta` only by description, so `alpha` ranks first.
#[fixture]
pub fn hook_registry() -> Arc<FetcherRegistry> {
    docsearch::tracing::init();
    let registry = FetcherRegistry::new();
    registry.register(
        LibraryInfo::new("alpha", "1.0.0"),
        Arc::new(StaticFetcher::uniform(vec![
            record("hooks/useHook", "useHook", "function", "Creates a thing."),
            record("misc/noop", "noop", "function", "Does nothing."),
        ])),
    );
    registry.register(
        LibraryInfo::new("beta", "2.0.0"),
        Arc::new(StaticFetcher::uniform(vec![record(
            "events/listen",
            "listen",
            "function",
            "Registers a hook for lifecycle events.",
        )])),
    );
    Arc::new(registry)
}

#[fixture]
pub fn sample_registry() -> Arc<FetcherRegistry> {
    docsearch::tracing::init();
    Arc::new(FetcherRegistry::samples())
}

/// Store wrapper that counts `get_components` calls.
pub struct CountingStore {
    inner: Arc<dyn ComponentStore>,
    fetches: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingStore {
    pub fn new(inner: Arc<dyn ComponentStore>) -> Self {
        docsearch::tracing::init();
        Self {
            inner,
            fetches: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Holds every fetch open for `delay`, so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ComponentStore for CountingStore {
    fn list_libraries(&self) -> BoxFuture<'_, Result<Vec<LibraryInfo>, StoreError>> {
        self.inner.list_libraries()
    }

    fn get_components<'a>(
        &'a self,
        library: &'a str,
        version: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ComponentRecord>, StoreError>> {
        async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.inner.get_components(library, version).await
        }
        .boxed()
    }
}

/// Store whose backend is down.
pub struct UnavailableStore;

impl ComponentStore for UnavailableStore {
    fn list_libraries(&self) -> BoxFuture<'_, Result<Vec<LibraryInfo>, StoreError>> {
        futures::future::ready(Err(StoreError::Unavailable("connection refused".into()))).boxed()
    }

    fn get_components<'a>(
        &'a self,
        _library: &'a str,
        _version: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ComponentRecord>, StoreError>> {
        futures::future::ready(Err(StoreError::Unavailable("connection refused".into()))).boxed()
    }
}

/// A temporary data directory in the on-disk catalog layout.
pub struct DataDir {
    _temp: TempDir,
    root: PathBuf,
}

impl DataDir {
    pub fn new() -> Self {
        docsearch::tracing::init();
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file (and parent directories) within the data directory.
    pub fn create_file(&self, path: &str, content: &str) {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("Failed to create {}: {}", parent.display(), e));
        }
        std::fs::write(&full, content)
            .unwrap_or_else(|e| panic!("Failed to write {}: {}", full.display(), e));
    }

    /// Writes `<name>.json` library metadata with the given versions, first one latest.
    pub fn add_library(&self, name: &str, versions: &[&str]) {
        let info = LibraryInfo::new(name, versions[0]).with_versions(versions.iter().copied());
        let json = serde_json::to_string(&info).expect("Failed to serialize library info");
        self.create_file(&format!("{}.json", name), &json);
    }

    /// Writes one component record file.
    pub fn add_component(&self, library: &str, version: &str, record: &ComponentRecord) {
        let file = record.path.replace('/', "_");
        let json = serde_json::to_string(record).expect("Failed to serialize record");
        self.create_file(
            &format!("{}/{}/components/{}.json", library, version, file),
            &json,
        );
    }
}
