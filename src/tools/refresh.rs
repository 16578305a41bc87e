use crate::service::DocSearch;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RefreshIndexRequest {
    /// Library whose indexes to drop (default: all libraries)
    #[serde(default)]
    pub library: Option<String>,
    /// Only drop this version of the library
    #[serde(default)]
    pub version: Option<String>,
}

/// Drop cached indexes so the next search rebuilds them.
pub async fn handle_refresh_index(docs: &DocSearch, request: RefreshIndexRequest) -> Result<String, String> {
    match (request.library, request.version) {
        (None, Some(_)) => Err("A version can only be refreshed together with its library.".to_string()),
        (None, None) => {
            let dropped = docs.invalidate_all().await;
            Ok(format!("Dropped {} cached indexes. They rebuild on next search.\n", dropped))
        }
        (Some(library), version) => {
            let dropped = docs.invalidate(&library, version.as_deref()).await;
            let scope = version.map_or_else(|| library.clone(), |v| format!("{}@{}", library, v));
            Ok(format!(
                "Dropped {} cached indexes for {}. They rebuild on next search.\n",
                dropped, scope
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FetcherRegistry;
    use assert2::{check, let_assert};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_refresh_library() {
        let docs = DocSearch::new(Arc::new(FetcherRegistry::samples()));
        let_assert!(Ok(_) = docs.search_library("vue", None, "ref", 5, 0).await);

        let request = RefreshIndexRequest {
            library: Some("vue".into()),
            version: None,
        };
        let_assert!(Ok(output) = handle_refresh_index(&docs, request).await);
        check!(output.contains("Dropped 1 cached indexes for vue"));
        check!(docs.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_version_without_library() {
        let docs = DocSearch::new(Arc::new(FetcherRegistry::samples()));
        let request = RefreshIndexRequest {
            library: None,
            version: Some("1.0.0".into()),
        };
        check!(handle_refresh_index(&docs, request).await.is_err());
    }
}
