//! Periodic data directory rescans that invalidate stale indexes.
//!
//! The search core has no timer of its own. This worker fingerprints the
//! catalog (`<root>/*.json`) and each library's record tree (`<root>/<library>/`)
//! and turns changes into `invalidate` calls.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use xxhash_rust::xxh3::Xxh3;

use crate::service::DocSearch;
use crate::store::FetcherRegistry;

/// What one scan changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// The catalog changed, so the registry was reloaded and every index dropped
    pub catalog_changed: bool,
    /// Libraries whose indexes were dropped
    pub invalidated: Vec<String>,
}

impl RefreshOutcome {
    pub fn is_empty(&self) -> bool {
        !self.catalog_changed && self.invalidated.is_empty()
    }
}

/// Rescans a data directory and invalidates indexes whose records changed.
#[derive(Debug)]
pub struct RefreshWorker {
    docs: Arc<DocSearch>,
    registry: Arc<FetcherRegistry>,
    root: PathBuf,
    catalog: Option<u64>,
    libraries: HashMap<String, u64>,
}

impl RefreshWorker {
    pub fn new(docs: Arc<DocSearch>, registry: Arc<FetcherRegistry>, root: impl Into<PathBuf>) -> Self {
        Self {
            docs,
            registry,
            root: root.into(),
            catalog: None,
            libraries: HashMap::new(),
        }
    }

    /// Runs one scan.
    ///
    /// The first scan only records fingerprints. Later scans invalidate what
    /// changed since the previous one.
    pub async fn scan(&mut self) -> Result<RefreshOutcome> {
        if !tokio::fs::try_exists(&self.root).await.unwrap_or(false) {
            tracing::debug!("Data directory {} missing, skipping scan", self.root.display());
            return Ok(RefreshOutcome::default());
        }

        let mut outcome = RefreshOutcome::default();
        let catalog = fingerprint_directory(&self.root, Some(1)).await?;

        if self.catalog.is_some_and(|previous| previous != catalog) {
            tracing::info!("Library catalog changed, reloading {}", self.root.display());
            self.registry
                .reload_directory(&self.root)
                .await
                .context("Failed to reload library catalog")?;
            self.docs.invalidate_all().await;
            self.libraries.clear();
            outcome.catalog_changed = true;
        }
        let first_scan = self.catalog.is_none();
        self.catalog = Some(catalog);

        let libraries = self
            .docs
            .list_libraries()
            .await
            .context("Failed to list libraries")?;

        let mut current = HashMap::with_capacity(libraries.len());
        for info in libraries {
            let fingerprint = fingerprint_directory(&self.root.join(&info.name), None).await?;
            let changed = self
                .libraries
                .get(&info.name)
                .is_some_and(|&previous| previous != fingerprint);

            if changed && !first_scan && !outcome.catalog_changed {
                self.docs.invalidate(&info.name, None).await;
                outcome.invalidated.push(info.name.clone());
            }
            current.insert(info.name, fingerprint);
        }
        self.libraries = current;

        if !outcome.is_empty() {
            tracing::info!(
                "Refresh scan: catalog changed: {}, invalidated: {:?}",
                outcome.catalog_changed,
                outcome.invalidated
            );
        }
        Ok(outcome)
    }

    /// Scans every `interval` until `cancel` fires.
    pub async fn run(mut self, interval: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("Refresh worker stopped");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.scan().await {
                        tracing::warn!("Refresh scan failed: {:#}", e);
                    }
                }
            }
        }
    }

    /// Spawns [`run`](Self::run) on the current runtime.
    pub fn spawn(self, interval: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(interval, cancel))
    }
}

/// Hashes relative paths and contents of every file under `dir`.
///
/// Files are visited in path order so the result only depends on content. A
/// missing directory hashes like an empty one.
pub async fn fingerprint_directory(dir: &Path, max_depth: Option<usize>) -> Result<u64> {
    let dir = dir.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let mut hasher = Xxh3::new();

        let mut files: Vec<PathBuf> = WalkBuilder::new(&dir)
            .max_depth(max_depth)
            .standard_filters(false)
            .build()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
            .map(ignore::DirEntry::into_path)
            .collect();

        files.sort();

        for path in files {
            // Relative path, so the fingerprint survives moving the data directory
            if let Ok(relative) = path.strip_prefix(&dir) {
                hasher.update(relative.to_string_lossy().as_bytes());
            }

            if let Ok(content) = std::fs::read(&path) {
                hasher.update(&content);
            }
        }

        hasher.digest()
    })
    .await
    .context("Fingerprint task panicked")
}
