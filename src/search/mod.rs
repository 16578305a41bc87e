//! Full-text search over component documentation.
//!
//! Tokenization, the field-weighted inverted index, BM25-style scoring, query
//! execution and the cross-library coordinator.

pub(crate) mod federated;
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod scoring;
pub(crate) mod tokenize;

pub use federated::{FederatedSearch, search_all, search_all_counted};
pub use index::{InvertedIndex, LibraryIndex};
pub use query::{Query, paginate};
pub use scoring::name_similarity;
