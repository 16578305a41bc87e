//! Bounded frequency table of normalized search terms.

use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

/// Default number of distinct terms retained.
pub const DEFAULT_CAPACITY: usize = 100;

/// Terms shorter than this (in characters, after normalization) are not recorded.
const MIN_TERM_CHARS: usize = 2;

/// A tracked search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularTerm {
    pub term: String,
    pub count: u64,
    pub last_searched_at: SystemTime,
}

#[derive(Debug)]
struct Entry {
    term: PopularTerm,
    /// Monotonic recency, used to order equal counts
    seq: u64,
}

#[derive(Debug, Default)]
struct State {
    entries: Vec<Entry>,
    next_seq: u64,
}

/// Tracks the most frequently searched terms.
///
/// Entries stay sorted by count descending, most recently searched first among
/// equal counts, and never exceed the capacity. All updates happen under one lock.
#[derive(Debug)]
pub struct PopularityTracker {
    state: Mutex<State>,
    capacity: usize,
}

impl Default for PopularityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PopularityTracker {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State::default()),
            capacity,
        }
    }

    /// Trims and lower-cases a raw query. Returns `None` if it is too short to track.
    pub fn normalize(term: &str) -> Option<String> {
        let normalized = term.trim().to_lowercase();
        (normalized.chars().count() >= MIN_TERM_CHARS).then_some(normalized)
    }

    /// Records one search for `term`.
    ///
    /// Returns whether the term was tracked. A new term that ranks below a full
    /// table is dropped again by the truncation.
    pub fn record(&self, term: &str) -> bool {
        let Some(normalized) = Self::normalize(term) else {
            return false;
        };

        let now = SystemTime::now();
        let mut state = self.lock();
        let seq = state.next_seq;
        state.next_seq += 1;

        if let Some(entry) = state
            .entries
            .iter_mut()
            .find(|entry| entry.term.term == normalized)
        {
            entry.term.count += 1;
            entry.term.last_searched_at = now;
            entry.seq = seq;
        } else {
            state.entries.push(Entry {
                term: PopularTerm {
                    term: normalized,
                    count: 1,
                    last_searched_at: now,
                },
                seq,
            });
        }

        state
            .entries
            .sort_by(|a, b| b.term.count.cmp(&a.term.count).then(b.seq.cmp(&a.seq)));
        state.entries.truncate(self.capacity);
        true
    }

    /// The `limit` most popular terms, in ranking order.
    pub fn top(&self, limit: usize) -> Vec<PopularTerm> {
        self.lock()
            .entries
            .iter()
            .take(limit)
            .map(|entry| entry.term.clone())
            .collect()
    }

    /// Number of tracked terms.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        tracing::debug!("Cleared popularity tracker");
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
