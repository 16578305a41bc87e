//! Query parsing, execution against an inverted index, and pagination.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeMap;

use super::index::InvertedIndex;
use super::tokenize::tokenize_and_stem;
use crate::types::MatchMetadata;

/// A parsed query: the distinct stemmed terms, OR-combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    terms: Vec<String>,
}

/// One scored document, before it is resolved back to its record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DocMatch {
    pub(crate) doc: usize,
    pub(crate) score: f32,
    pub(crate) matches: MatchMetadata,
}

impl Query {
    /// Tokenizes a query string the same way indexed fields are tokenized.
    ///
    /// Splits on whitespace, punctuation and case boundaries, lower-cases, drops
    /// stop words and stems. Repeated terms are kept once.
    pub fn parse(text: &str) -> Self {
        let stemmer = Stemmer::create(Algorithm::English);
        let mut terms: Vec<String> = Vec::new();
        for term in tokenize_and_stem(text, &stemmer) {
            if !terms.contains(&term) {
                terms.push(term);
            }
        }
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Scores every document matching at least one term.
    ///
    /// Returns matches sorted by score descending; equal scores keep document order.
    pub(crate) fn execute(&self, index: &InvertedIndex) -> Vec<DocMatch> {
        if self.terms.is_empty() {
            return vec![];
        }

        // Combine scores for documents that match multiple terms or fields
        let mut combined: BTreeMap<usize, (f32, MatchMetadata)> = BTreeMap::new();

        for term in &self.terms {
            let Some(postings) = index.postings(term) else {
                continue;
            };

            for posting in postings {
                let (score, metadata) = combined.entry(posting.doc).or_default();
                let term_fields = metadata.entry(term.clone()).or_default();
                for field_posting in &posting.fields {
                    *score += field_posting.score;
                    term_fields
                        .entry(field_posting.field)
                        .or_default()
                        .extend_from_slice(&field_posting.positions);
                }
            }
        }

        let mut results: Vec<DocMatch> = combined
            .into_iter()
            .map(|(doc, (score, matches))| DocMatch {
                doc,
                score,
                matches,
            })
            .collect();

        // Stable sort keeps ascending document order among ties
        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        results
    }
}

/// Returns the `[offset, offset + limit)` window of `items`, clamped to its length.
pub fn paginate<T>(items: Vec<T>, limit: usize, offset: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}
