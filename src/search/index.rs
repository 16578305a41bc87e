//! Weighted multi-field inverted index and the per-library-version index entry.

use ahash::AHashMap;
use std::collections::HashSet;

use super::query::Query;
use super::tokenize::TermBuilder;
use crate::types::{ComponentRecord, Field, Position, SearchHit};

/// Precomputed score and positions of a term inside one field of a document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldPosting {
    pub(crate) field: Field,
    pub(crate) score: f32,
    pub(crate) positions: Vec<Position>,
}

/// All fields of one document that contain a term.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Posting {
    pub(crate) doc: usize,
    pub(crate) fields: Vec<FieldPosting>,
}

/// A searchable term index with field-weighted scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct InvertedIndex {
    /// Map from stemmed term to its postings, sorted by document index
    terms: AHashMap<String, Vec<Posting>>,
    /// Map from document index to its reference (component path)
    refs: Vec<String>,
}

impl InvertedIndex {
    pub(super) const fn new(terms: AHashMap<String, Vec<Posting>>, refs: Vec<String>) -> Self {
        Self { terms, refs }
    }

    pub(crate) fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    /// Reference (component path) of a document.
    pub fn reference(&self, doc: usize) -> Option<&str> {
        self.refs.get(doc).map(String::as_str)
    }

    /// Get the number of unique terms in the index
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Get the number of documents in the index
    pub fn document_count(&self) -> usize {
        self.refs.len()
    }
}

/// The built, queryable index of one library version plus the records it was built from.
///
/// Never mutated after construction; content changes require a fresh build.
#[derive(Debug, Clone)]
pub struct LibraryIndex {
    library: String,
    version: String,
    terms: InvertedIndex,
    /// Backing records, indexed by document number
    components: Vec<ComponentRecord>,
    by_path: AHashMap<String, usize>,
}

impl LibraryIndex {
    /// Builds the index for one library version.
    ///
    /// Never fails: missing optional fields are indexed as empty text and an
    /// empty record set produces an empty index. Records whose `path` repeats an
    /// earlier record are skipped.
    pub fn build(
        library: impl Into<String>,
        version: impl Into<String>,
        records: impl IntoIterator<Item = ComponentRecord>,
    ) -> Self {
        let library = library.into();
        let version = version.into();

        let mut builder = TermBuilder::default();
        let mut seen = HashSet::new();
        let mut components = Vec::new();
        let mut by_path = AHashMap::new();

        for record in records {
            if !seen.insert(record.path.clone()) {
                tracing::warn!(
                    "Skipping duplicate component path '{}' in {}@{}",
                    record.path,
                    library,
                    version
                );
                continue;
            }

            let doc = builder.add_record(&record);
            by_path.insert(record.path.clone(), doc);
            components.push(record);
        }

        Self {
            library,
            version,
            terms: builder.finalize(),
            components,
            by_path,
        }
    }

    /// Runs a query and returns hits ordered by score, highest first.
    ///
    /// Ties keep record order. Empty or stop-word-only queries return no hits.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        Query::parse(query)
            .execute(&self.terms)
            .into_iter()
            .map(|doc_match| SearchHit {
                // Document numbers are positions in the backing records
                component: self.components[doc_match.doc].clone(),
                score: doc_match.score,
                matches: doc_match.matches,
                library: None,
                library_version: None,
            })
            .collect()
    }

    /// Looks up a backing record by its path.
    pub fn component(&self, path: &str) -> Option<&ComponentRecord> {
        self.by_path.get(path).map(|&doc| &self.components[doc])
    }

    pub fn components(&self) -> &[ComponentRecord] {
        &self.components
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub const fn terms(&self) -> &InvertedIndex {
        &self.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    fn react_records() -> Vec<ComponentRecord> {
        vec![
            ComponentRecord::new("hooks/useState", "useState")
                .with_kind("hook")
                .with_description("Returns a stateful value and a function to update it."),
            ComponentRecord::new("hooks/useEffect", "useEffect")
                .with_kind("hook")
                .with_description("Accepts a function that contains imperative, effectful code."),
            ComponentRecord::new("hooks/useReducer", "useReducer")
                .with_kind("hook")
                .with_description("An alternative for managing complex state logic."),
        ]
    }

    #[test]
    fn test_empty_records_build_empty_index() {
        let index = LibraryIndex::build("react", "18.2.0", Vec::new());
        check!(index.terms().document_count() == 0);
        check!(index.search("state").is_empty());
    }

    #[test]
    fn test_empty_query_has_no_hits() {
        let index = LibraryIndex::build("react", "18.2.0", react_records());
        check!(index.search("").is_empty());
        check!(index.search("   \t").is_empty());
        check!(index.search("the of").is_empty());
    }

    #[test]
    fn test_name_match_outranks_description_match() {
        let index = LibraryIndex::build("react", "18.2.0", react_records());
        let hits = index.search("state");
        let paths: Vec<_> = hits.iter().map(|h| h.component.path.as_str()).collect();
        check!(paths.first() == Some(&"hooks/useState"));
        check!(paths.contains(&"hooks/useReducer"));
        check!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_match_metadata_reports_fields() {
        let index = LibraryIndex::build("react", "18.2.0", react_records());
        let hits = index.search("state");
        let use_state = &hits[0];
        let fields = &use_state.matches["state"];
        check!(fields.contains_key(&Field::Name));
        check!(fields[&Field::Name] == vec![[3, 5]]);

        let reducer = hits
            .iter()
            .find(|h| h.component.path == "hooks/useReducer")
            .unwrap();
        check!(!reducer.matches["state"].contains_key(&Field::Name));
        check!(reducer.matches["state"].contains_key(&Field::Description));
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let first = LibraryIndex::build("react", "18.2.0", react_records());
        let second = LibraryIndex::build("react", "18.2.0", react_records());
        check!(first.terms() == second.terms());
        check!(first.search("hook function") == second.search("hook function"));
    }

    #[test]
    fn test_duplicate_paths_keep_first() {
        let mut records = react_records();
        records.push(ComponentRecord::new("hooks/useState", "shadowed"));
        let index = LibraryIndex::build("react", "18.2.0", records);
        check!(index.components().len() == 3);
        check!(index.component("hooks/useState").unwrap().name == "useState");
        check!(index.search("shadowed").is_empty());
    }

    #[test]
    fn test_missing_optional_fields() {
        let index = LibraryIndex::build(
            "vue",
            "3.3.4",
            vec![ComponentRecord::new("reactivity/ref", "ref")],
        );
        let hits = index.search("ref");
        check!(hits.len() == 1);
        check!(hits[0].score > 0.0);
    }
}
