//! Text tokenization and stemming utilities for search indexing.

use ahash::AHashMap;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeMap;

use super::index::{FieldPosting, InvertedIndex, Posting};
use super::scoring::{field_score, inverse_document_frequency};
use crate::types::{ComponentRecord, Field, Position};

/// Minimum token length for indexing. Set to 1 so short names like `h` or `$` helpers survive.
const MIN_TOKEN_LENGTH: usize = 1;

const FIELD_COUNT: usize = Field::ALL.len();

/// Common English stop words to filter out from indexing.
/// These high-frequency words add little value to search relevance.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with",
];

/// A stemmed term and where it came from in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) term: String,
    /// Byte offset and length of the source slice
    pub(crate) position: Position,
}

/// Occurrences of one term in one field of one document.
#[derive(Debug, Default)]
struct Occurrences {
    count: u32,
    positions: Vec<Position>,
}

/// Builder for accumulating term occurrences before scoring finalization.
pub(crate) struct TermBuilder {
    /// term → doc → per-field occurrences; docs kept ordered for deterministic postings
    term_docs: AHashMap<String, BTreeMap<usize, [Occurrences; FIELD_COUNT]>>,
    /// Map from doc index to its reference (component path)
    refs: Vec<String>,
    /// Map from doc index to token count per field (for length normalization)
    field_lengths: Vec<[u32; FIELD_COUNT]>,
    /// Reusable stemmer instance for English language stemming
    stemmer: Stemmer,
}

impl Default for TermBuilder {
    fn default() -> Self {
        Self {
            term_docs: AHashMap::default(),
            refs: Vec::new(),
            field_lengths: Vec::new(),
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl TermBuilder {
    /// Adds a component as the next document and indexes its four fields.
    /// Returns the document index.
    pub(crate) fn add_record(&mut self, record: &ComponentRecord) -> usize {
        let doc = self.refs.len();
        self.refs.push(record.path.clone());
        self.field_lengths.push([0; FIELD_COUNT]);

        for field in Field::ALL {
            self.add_terms(record.field(field), doc, field);
        }

        doc
    }

    /// Extracts terms from a field's text and records every occurrence.
    fn add_terms(&mut self, text: &str, doc: usize, field: Field) {
        let tokens = tokenize(text, &self.stemmer);
        self.field_lengths[doc][field.index()] += tokens.len() as u32;

        for token in tokens {
            let docs = self.term_docs.entry(token.term).or_default();
            let occurrences = &mut docs.entry(doc).or_default()[field.index()];
            occurrences.count += 1;
            occurrences.positions.push(token.position);
        }
    }

    /// Calculates IDF and per-field scores and produces the final searchable index.
    ///
    /// Each (term, doc, field) triple is scored once here so queries only sum
    /// precomputed contributions.
    pub(crate) fn finalize(self) -> InvertedIndex {
        let start = std::time::Instant::now();
        let total_docs = self.refs.len();

        // Average token count per field, across all documents
        let mut avg_lengths = [0.0f32; FIELD_COUNT];
        if total_docs > 0 {
            for lengths in &self.field_lengths {
                for (avg, len) in avg_lengths.iter_mut().zip(lengths) {
                    *avg += *len as f32;
                }
            }
            for avg in &mut avg_lengths {
                *avg /= total_docs as f32;
            }
        }

        let total_term_doc_pairs: usize = self.term_docs.values().map(BTreeMap::len).sum();
        let mut terms: AHashMap<String, Vec<Posting>> = AHashMap::with_capacity(self.term_docs.len());

        for (term, docs) in self.term_docs {
            let idf = inverse_document_frequency(total_docs, docs.len());

            let postings = docs
                .into_iter()
                .map(|(doc, occurrences)| {
                    let fields = Field::ALL
                        .into_iter()
                        .zip(occurrences)
                        .filter(|(_, occ)| occ.count > 0)
                        .map(|(field, occ)| FieldPosting {
                            field,
                            score: field_score(
                                field,
                                occ.count,
                                self.field_lengths[doc][field.index()],
                                avg_lengths[field.index()],
                                idf,
                            ),
                            positions: occ.positions,
                        })
                        .collect();
                    Posting { doc, fields }
                })
                .collect();

            terms.insert(term, postings);
        }

        let index = InvertedIndex::new(terms, self.refs);

        tracing::debug!(
            "Built inverted index: {} unique terms, {} documents, {} term-document pairs in {:?}",
            index.term_count(),
            index.document_count(),
            total_term_doc_pairs,
            start.elapsed()
        );

        index
    }
}

/// Tokenizes text into searchable terms with stemming and case-aware splitting.
///
/// This function implements a state machine that splits text on multiple boundaries:
/// - **camelCase**: "useState" → ["use", "State", "useState"]
/// - **snake_case**: "define_props" → ["define", "props"]
/// - **hyphen-case**: "ng-model" → ["ng", "model"]
/// - whitespace, punctuation and digits end a word
///
/// The state machine maintains two pointers:
/// - `word_start`: Start of the complete word (e.g., "useState")
/// - `subword_start`: Start of the current sub-component (e.g., "State")
///
/// This allows extracting both individual components and the full compound term.
pub(crate) fn tokenize(text: &str, stemmer: &Stemmer) -> Vec<Token> {
    let mut tokens = vec![];

    // State machine variables
    let mut last_case = None; // Track case transitions (None/Some(false)/Some(true))
    let mut word_start = 0; // Start of full word (e.g., "useState")
    let mut subword_start = 0; // Start of subword (e.g., "State")
    let mut word_start_next_char = true; // Flag: start new word at next char
    let mut subword_start_next_char = true; // Flag: start new subword at next char

    for (i, c) in text.char_indices() {
        // Initialize word/subword pointers at the start of a new word
        if word_start_next_char {
            word_start = i;
            subword_start = i;
            word_start_next_char = false;
            subword_start_next_char = false;
        }

        // Initialize subword pointer for camelCase boundaries
        if subword_start_next_char {
            subword_start = i;
            subword_start_next_char = false;
        }

        // Detect case changes for camelCase splitting (lowercase → uppercase)
        let current_case = c.is_alphabetic().then(|| c.is_uppercase());
        let case_change = last_case == Some(false) && current_case == Some(true);
        last_case = current_case;

        if c == '-' || c == '_' {
            // Extract the current subword (e.g., "define" from "define_props")
            if i.saturating_sub(subword_start) >= MIN_TOKEN_LENGTH {
                push_token(text, subword_start, i, &mut tokens, stemmer);
            }
            subword_start_next_char = true;
        } else if !c.is_alphabetic() {
            // End of complete word: last subword if distinct, then the whole word
            if i.saturating_sub(subword_start) >= MIN_TOKEN_LENGTH && subword_start != word_start {
                push_token(text, subword_start, i, &mut tokens, stemmer);
            }
            if i.saturating_sub(word_start) >= MIN_TOKEN_LENGTH {
                push_token(text, word_start, i, &mut tokens, stemmer);
            }
            word_start_next_char = true;
        } else if case_change {
            // camelCase boundary: emit the previous subword, start a new one here
            if i.saturating_sub(subword_start) >= MIN_TOKEN_LENGTH {
                push_token(text, subword_start, i, &mut tokens, stemmer);
            }
            subword_start = i;
        }
    }

    // Final tokens at end of string
    if !word_start_next_char {
        let end = text.len();
        if word_start != subword_start && end - subword_start >= MIN_TOKEN_LENGTH {
            push_token(text, subword_start, end, &mut tokens, stemmer);
        }
        if end - word_start >= MIN_TOKEN_LENGTH {
            push_token(text, word_start, end, &mut tokens, stemmer);
        }
    }

    tokens
}

/// Tokenizes and returns only the stemmed terms.
pub(crate) fn tokenize_and_stem(text: &str, stemmer: &Stemmer) -> Vec<String> {
    tokenize(text, stemmer).into_iter().map(|t| t.term).collect()
}

/// Add the token `text[start..end]` using proper stemming, filtering out stop words
/// and slices that held only separators.
fn push_token(text: &str, start: usize, end: usize, tokens: &mut Vec<Token>, stemmer: &Stemmer) {
    let slice = &text[start..end];
    if !slice.chars().any(char::is_alphabetic) {
        return;
    }

    let lowercase = slice.to_lowercase();

    // Skip stop words
    if STOP_WORDS.contains(&lowercase.as_str()) {
        return;
    }

    let stemmed = stemmer.stem(&lowercase);
    tokens.push(Token {
        term: stemmed.into_owned(),
        position: [start, end - start],
    });
}
