//! File-based component fetcher.
//!
//! Layout under the data root:
//!
//! ```text
//! <root>/react.json                              library metadata
//! <root>/react/18.2.0/components/useState.json   one component record per file
//! ```

use futures::FutureExt;
use futures::future::BoxFuture;
use ignore::WalkBuilder;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use super::registry::Fetcher;
use crate::error::StoreError;
use crate::types::{ComponentRecord, LibraryInfo};

/// Reads component records from `<root>/<library>/<version>/components/*.json`.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn components_dir(&self, library: &str, version: &str) -> PathBuf {
        self.root.join(library).join(version).join("components")
    }
}

impl Fetcher for DirectoryFetcher {
    fn fetch<'a>(
        &'a self,
        library: &'a LibraryInfo,
        version: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ComponentRecord>, StoreError>> {
        async move {
            let dir = self.components_dir(&library.name, version);

            if !tokio::fs::try_exists(&dir).await.unwrap_or(false) {
                return Err(StoreError::NotFound {
                    library: library.name.clone(),
                    version: Some(version.to_string()),
                });
            }

            let records = read_json_files::<ComponentRecord>(dir)
                .await
                .map_err(|reason| StoreError::Fetch {
                    library: library.name.clone(),
                    version: version.to_string(),
                    reason,
                })?;

            tracing::debug!(
                "Read {} components for {}@{}",
                records.len(),
                library.name,
                version
            );
            Ok(records)
        }
        .boxed()
    }
}

/// Reads the library catalog (`<root>/*.json`), ordered by file name.
pub(super) async fn read_catalog(root: &Path) -> Result<Vec<LibraryInfo>, StoreError> {
    read_json_files::<LibraryInfo>(root.to_path_buf())
        .await
        .map_err(|reason| {
            StoreError::Unavailable(format!(
                "failed to read library catalog at {}: {}",
                root.display(),
                reason
            ))
        })
}

/// Parses every `*.json` file directly inside `dir`, in file name order.
async fn read_json_files<T>(dir: PathBuf) -> Result<Vec<T>, String>
where
    T: DeserializeOwned + Send + 'static,
{
    // Walk and parse in spawn_blocking since it's file-bound
    tokio::task::spawn_blocking(move || {
        let mut files: Vec<PathBuf> = WalkBuilder::new(&dir)
            .max_depth(Some(1))
            .standard_filters(false)
            .build()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
            .map(ignore::DirEntry::into_path)
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();

        files.sort();

        files
            .iter()
            .map(|path| {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
                serde_json::from_str(&content)
                    .map_err(|e| format!("failed to parse {}: {}", path.display(), e))
            })
            .collect()
    })
    .await
    .map_err(|e| format!("reader task failed: {}", e))?
}
