//! Error handling types and utilities.
//!
//! Both enums are `Clone` so a single in-flight index build can hand the same
//! failure to every caller awaiting it.

use crate::cache::IndexKey;

/// A specialized Result type for search operations.
pub type Result<T, E = SearchError> = std::result::Result<T, E>;

/// Error returned by a [`ComponentStore`](crate::store::ComponentStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The library, or the requested version of it, is unknown to the store.
    #[error("{}", not_found_message(library, version.as_deref()))]
    NotFound {
        library: String,
        version: Option<String>,
    },
    /// Records for one library version could not be read or parsed.
    #[error("failed to fetch components for {library}@{version}: {reason}")]
    Fetch {
        library: String,
        version: String,
        reason: String,
    },
    /// The store itself cannot serve requests.
    #[error("component store unavailable: {0}")]
    Unavailable(String),
}

fn not_found_message(library: &str, version: Option<&str>) -> String {
    match version {
        Some(version) => format!("version '{}' of library '{}' not found", version, library),
        None => format!("library '{}' not found", library),
    }
}

/// Error surfaced by the search core to the request layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("library '{0}' not found")]
    LibraryNotFound(String),

    #[error("version '{version}' of library '{library}' not found")]
    VersionNotFound { library: String, version: String },

    /// Fetching or indexing one library version failed. The cache entry stays absent.
    #[error("failed to build index for {library}@{version}: {reason}")]
    BuildFailure {
        library: String,
        version: String,
        reason: String,
    },

    /// Systemic failure of the component store.
    #[error("component store unavailable: {0}")]
    StoreUnavailable(String),
}

impl SearchError {
    /// Whether this error is the 404-equivalent outcome.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::LibraryNotFound(_) | Self::VersionNotFound { .. })
    }

    /// Whether this error indicates the store as a whole is failing.
    pub const fn is_systemic(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Maps a failed `get_components` call for `key` into a search error.
    pub(crate) fn from_fetch(err: StoreError, key: &IndexKey) -> Self {
        match err {
            StoreError::NotFound { version: None, .. } => {
                Self::LibraryNotFound(key.library.clone())
            }
            StoreError::NotFound {
                version: Some(_), ..
            } => Self::VersionNotFound {
                library: key.library.clone(),
                version: key.version.clone(),
            },
            StoreError::Fetch { reason, .. } => Self::BuildFailure {
                library: key.library.clone(),
                version: key.version.clone(),
                reason,
            },
            StoreError::Unavailable(reason) => Self::StoreUnavailable(reason),
        }
    }

    /// Maps a failed `list_libraries` call. Any failure to list is systemic.
    pub(crate) fn from_listing(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => Self::StoreUnavailable(reason),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}
