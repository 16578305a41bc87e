mod common;

use assert2::{check, let_assert};
use common::{CountingStore, UnavailableStore, hook_registry, record, sample_registry};
use docsearch::{DocSearch, FetcherRegistry, LibraryInfo, StaticFetcher};
use rstest::rstest;
use std::sync::Arc;

/// Test: one hit per page, highest score first, tagged with its source.
#[rstest]
#[tokio::test]
async fn search_all_pages_across_libraries(hook_registry: Arc<FetcherRegistry>) {
    let docs = DocSearch::new(hook_registry);

    let_assert!(Ok(first) = docs.search_all("hook", 1, 0).await);
    check!(first.total == 2);
    check!(first.hits.len() == 1);
    check!(first.hits[0].component.name == "useHook");
    check!(first.hits[0].library.as_deref() == Some("alpha"));
    check!(first.hits[0].library_version.as_deref() == Some("1.0.0"));

    let_assert!(Ok(second) = docs.search_all("hook", 1, 1).await);
    check!(second.hits.len() == 1);
    check!(second.hits[0].component.name == "listen");
    check!(second.hits[0].library.as_deref() == Some("beta"));
    check!(first.hits[0].score >= second.hits[0].score);
}

/// Test: federated total equals the sum of per-library totals.
#[rstest]
#[case("component")]
#[case("class")]
#[case("reactive ref")]
#[tokio::test]
async fn federated_total_is_sum_of_libraries(
    sample_registry: Arc<FetcherRegistry>,
    #[case] query: &str,
) {
    let docs = DocSearch::new(sample_registry);

    let_assert!(Ok(libraries) = docs.list_libraries().await);
    let mut expected = 0;
    for library in &libraries {
        let_assert!(Ok(result) = docs.search_library(&library.name, None, query, 1000, 0).await);
        expected += result.total;
    }

    let_assert!(Ok(federated) = docs.search_all(query, 1000, 0).await);
    check!(federated.total == expected);
    check!(federated.hits.len() == expected);
}

/// Test: hits are globally sorted by score.
#[rstest]
#[tokio::test]
async fn federated_hits_sorted_by_score(sample_registry: Arc<FetcherRegistry>) {
    let docs = DocSearch::new(sample_registry);
    let_assert!(Ok(result) = docs.search_all("component", 100, 0).await);
    check!(result.total > 1);
    check!(result.hits.windows(2).all(|pair| pair[0].score >= pair[1].score));
}

/// Test: a listed library with no records for its latest version is skipped.
#[rstest]
#[tokio::test]
async fn unfetchable_library_is_skipped(hook_registry: Arc<FetcherRegistry>) {
    hook_registry.register(LibraryInfo::new("foo", "1.0.0"), Arc::new(StaticFetcher::new()));
    let docs = DocSearch::new(hook_registry);

    let_assert!(Ok(result) = docs.search_all("hook", 10, 0).await);
    check!(result.total == 2);
    check!(result.hits.iter().all(|hit| hit.library.as_deref() != Some("foo")));

    // The same library is a hard error when searched directly
    let_assert!(Err(err) = docs.search_library("foo", None, "hook", 10, 0).await);
    check!(err.is_not_found());
}

#[tokio::test]
async fn unavailable_store_propagates() {
    let docs = DocSearch::new(Arc::new(UnavailableStore));
    let_assert!(Err(err) = docs.search_all("hook", 10, 0).await);
    check!(err.is_systemic());
}

/// Test: offset past the end gives an empty page with the full total.
#[rstest]
#[tokio::test]
async fn offset_past_end(hook_registry: Arc<FetcherRegistry>) {
    let docs = DocSearch::new(hook_registry);
    let_assert!(Ok(result) = docs.search_all("hook", 10, 2).await);
    check!(result.hits.is_empty());
    check!(result.total == 2);
}

/// Test: federated search uses the same cache entries as single-library search.
#[rstest]
#[tokio::test]
async fn federated_reuses_cached_indexes(hook_registry: Arc<FetcherRegistry>) {
    let store = Arc::new(CountingStore::new(hook_registry));
    let docs = DocSearch::new(store.clone());

    let_assert!(Ok(_) = docs.search_library("alpha", None, "hook", 10, 0).await);
    let_assert!(Ok(_) = docs.search_all("hook", 10, 0).await);
    let_assert!(Ok(_) = docs.search_all("noop", 10, 0).await);
    check!(store.fetches() == 2);
}

/// Test: equal scores keep library listing order.
#[tokio::test]
async fn ties_keep_listing_order() {
    let registry = FetcherRegistry::new();
    for name in ["zeta", "alpha", "mu"] {
        registry.register(
            LibraryInfo::new(name, "1.0.0"),
            Arc::new(StaticFetcher::uniform(vec![record(
                "x/widget",
                "widget",
                "component",
                "",
            )])),
        );
    }
    let docs = DocSearch::new(Arc::new(registry));

    let_assert!(Ok(result) = docs.search_all("widget", 10, 0).await);
    let order: Vec<_> = result.hits.iter().filter_map(|h| h.library.as_deref()).collect();
    check!(order == vec!["zeta", "alpha", "mu"]);
}
