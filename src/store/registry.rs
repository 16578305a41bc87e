//! Registered-fetcher-per-library component store.

use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use super::directory::{DirectoryFetcher, read_catalog};
use super::samples::sample_catalog;
use super::ComponentStore;
use crate::error::StoreError;
use crate::types::{ComponentRecord, LibraryInfo};

/// Produces the component records of one library.
pub trait Fetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        library: &'a LibraryInfo,
        version: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ComponentRecord>, StoreError>>;
}

/// In-memory fetcher serving fixed records per version.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    versions: HashMap<String, Vec<ComponentRecord>>,
    /// Served for any version without its own records
    fallback: Option<Vec<ComponentRecord>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves the same records for every version.
    pub fn uniform(records: Vec<ComponentRecord>) -> Self {
        Self {
            versions: HashMap::new(),
            fallback: Some(records),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>, records: Vec<ComponentRecord>) -> Self {
        self.versions.insert(version.into(), records);
        self
    }
}

impl Fetcher for StaticFetcher {
    fn fetch<'a>(
        &'a self,
        library: &'a LibraryInfo,
        version: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ComponentRecord>, StoreError>> {
        let result = self
            .versions
            .get(version)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                library: library.name.clone(),
                version: Some(version.to_string()),
            });
        futures::future::ready(result).boxed()
    }
}

/// A library and the fetcher that serves it.
#[derive(Clone)]
struct Registration {
    info: LibraryInfo,
    fetcher: Arc<dyn Fetcher>,
}

/// Component store resolving each library name to its registered fetcher.
///
/// Registration order is the listing order. Names resolve case-insensitively.
#[derive(Default)]
pub struct FetcherRegistry {
    libraries: RwLock<Vec<Registration>>,
}

impl std::fmt::Debug for FetcherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.snapshot().into_iter().map(|r| r.info.name).collect();
        f.debug_struct("FetcherRegistry")
            .field("libraries", &names)
            .finish()
    }
}

impl FetcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry serving the built-in sample catalog.
    pub fn samples() -> Self {
        let registry = Self::new();
        for (info, fetcher) in sample_catalog() {
            registry.register(info, Arc::new(fetcher));
        }
        registry
    }

    /// Registry backed by a data directory.
    ///
    /// Reads `<root>/*.json` library metadata and serves components from
    /// `<root>/<library>/<version>/components/`. Falls back to the built-in
    /// samples when `root` does not exist.
    pub async fn from_directory(root: &Path) -> Result<Self, StoreError> {
        let registry = Self::new();
        registry.reload_directory(root).await?;
        Ok(registry)
    }

    /// Replaces every registration with the catalog found under `root`.
    pub async fn reload_directory(&self, root: &Path) -> Result<usize, StoreError> {
        if !tokio::fs::try_exists(root).await.unwrap_or(false) {
            tracing::info!(
                "Data directory {} not found, serving sample catalog",
                root.display()
            );
            let samples = sample_catalog()
                .into_iter()
                .map(|(info, fetcher)| Registration {
                    info,
                    fetcher: Arc::new(fetcher),
                })
                .collect();
            return Ok(self.replace(samples));
        }

        let fetcher: Arc<dyn Fetcher> = Arc::new(DirectoryFetcher::new(root));
        let registrations = read_catalog(root)
            .await?
            .into_iter()
            .map(|info| Registration {
                info,
                fetcher: Arc::clone(&fetcher),
            })
            .collect();

        let count = self.replace(registrations);
        tracing::info!("Loaded {} libraries from {}", count, root.display());
        Ok(count)
    }

    /// Registers a library, replacing any registration with the same name.
    pub fn register(&self, info: LibraryInfo, fetcher: Arc<dyn Fetcher>) {
        let mut libraries = self
            .libraries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let registration = Registration { info, fetcher };
        match libraries
            .iter_mut()
            .find(|r| r.info.name.eq_ignore_ascii_case(&registration.info.name))
        {
            Some(existing) => *existing = registration,
            None => libraries.push(registration),
        }
    }

    /// Removes a library. Returns whether it was registered.
    pub fn unregister(&self, name: &str) -> bool {
        let mut libraries = self
            .libraries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = libraries.len();
        libraries.retain(|r| !r.info.name.eq_ignore_ascii_case(name));
        libraries.len() != before
    }

    fn replace(&self, registrations: Vec<Registration>) -> usize {
        let mut libraries = self
            .libraries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *libraries = registrations;
        libraries.len()
    }

    fn snapshot(&self) -> Vec<Registration> {
        self.libraries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ComponentStore for FetcherRegistry {
    fn list_libraries(&self) -> BoxFuture<'_, Result<Vec<LibraryInfo>, StoreError>> {
        let libraries = self.snapshot().into_iter().map(|r| r.info).collect();
        futures::future::ready(Ok(libraries)).boxed()
    }

    fn get_components<'a>(
        &'a self,
        library: &'a str,
        version: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ComponentRecord>, StoreError>> {
        async move {
            let registrations = self.snapshot();
            let Some(registration) = registrations
                .iter()
                .find(|r| r.info.name.eq_ignore_ascii_case(library))
            else {
                return Err(StoreError::NotFound {
                    library: library.to_string(),
                    version: None,
                });
            };

            if !registration.info.has_version(version) {
                return Err(StoreError::NotFound {
                    library: registration.info.name.clone(),
                    version: Some(version.to_string()),
                });
            }

            registration.fetcher.fetch(&registration.info, version).await
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    fn registry() -> FetcherRegistry {
        let registry = FetcherRegistry::new();
        registry.register(
            LibraryInfo::new("react", "18.2.0").with_versions(["18.2.0", "17.0.2"]),
            Arc::new(
                StaticFetcher::new()
                    .with_version("18.2.0", vec![ComponentRecord::new("hooks/useId", "useId")])
                    .with_version(
                        "17.0.2",
                        vec![ComponentRecord::new("hooks/useState", "useState")],
                    ),
            ),
        );
        registry
    }

    #[tokio::test]
    async fn test_resolves_case_insensitively() {
        let registry = registry();
        let_assert!(Ok(records) = registry.get_components("React", "17.0.2").await);
        check!(records[0].name == "useState");
    }

    #[tokio::test]
    async fn test_unknown_library_is_not_found() {
        let registry = registry();
        let_assert!(
            Err(StoreError::NotFound { version: None, .. }) =
                registry.get_components("foo", "1.0.0").await
        );
    }

    #[tokio::test]
    async fn test_unknown_version_is_not_found() {
        let registry = registry();
        let_assert!(
            Err(StoreError::NotFound {
                version: Some(version),
                ..
            }) = registry.get_components("react", "16.14.0").await
        );
        check!(version == "16.14.0");
    }

    #[tokio::test]
    async fn test_register_replaces_same_name() {
        let registry = registry();
        registry.register(
            LibraryInfo::new("REACT", "19.0.0"),
            Arc::new(StaticFetcher::uniform(vec![])),
        );
        let_assert!(Ok(libraries) = registry.list_libraries().await);
        check!(libraries.len() == 1);
        check!(libraries[0].latest_version == "19.0.0");
    }

    #[tokio::test]
    async fn test_unregister() {
        let registry = registry();
        check!(registry.unregister("react"));
        check!(!registry.unregister("react"));
        let_assert!(Ok(libraries) = registry.list_libraries().await);
        check!(libraries.is_empty());
    }

    #[tokio::test]
    async fn test_samples_listing_order() {
        let registry = FetcherRegistry::samples();
        let_assert!(Ok(libraries) = registry.list_libraries().await);
        let names: Vec<_> = libraries.iter().map(|l| l.name.as_str()).collect();
        check!(names == vec!["react", "vue", "angular"]);
    }
}
