//! Full-text search over versioned library documentation.
//!
//! Builds field-weighted inverted indexes from component records, caches them
//! per library version, answers single-library and federated queries, and
//! tracks popular search terms.

pub mod cache;
pub mod config;
pub mod error;
pub mod popularity;
pub mod refresh;
pub mod search;
pub mod server;
pub mod service;
pub mod store;
pub mod tools;
pub mod tracing;
pub mod types;

pub use cache::{IndexCache, IndexKey};
pub use config::Config;
pub use error::{Result, SearchError, StoreError};
pub use popularity::{PopularTerm, PopularityTracker};
pub use refresh::{RefreshOutcome, RefreshWorker};
pub use search::{FederatedSearch, LibraryIndex};
pub use server::SearchServer;
pub use service::{DocSearch, LibrarySearch};
pub use store::{ComponentStore, DirectoryFetcher, Fetcher, FetcherRegistry, StaticFetcher};
pub use types::{ComponentRecord, Field, LibraryInfo, MatchMetadata, SearchHit};
