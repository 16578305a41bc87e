//! Search relevance and ranking algorithms.
//!
//! Field scores combine a saturating, length-normalized term frequency with a
//! smoothed inverse document frequency, scaled by the field's weight.

use crate::types::Field;

/// Term frequency saturation. Higher values let repeated terms keep adding score.
const K1: f32 = 1.2;

/// Strength of field length normalization (0 disables it).
const B: f32 = 0.75;

/// Smoothed inverse document frequency.
///
/// `ln(1 + (N - df + 0.5) / (df + 0.5))` stays positive even when a term
/// occurs in every document, so single-document indexes still rank matches.
pub fn inverse_document_frequency(total_docs: usize, doc_freq: usize) -> f32 {
    let n = total_docs as f32;
    let df = doc_freq as f32;
    (1.0 + ((n - df + 0.5) / (df + 0.5)).abs()).ln()
}

/// Score contribution of one term occurring `count` times in a field of
/// `field_len` tokens, where fields of this kind average `avg_len` tokens.
pub fn field_score(field: Field, count: u32, field_len: u32, avg_len: f32, idf: f32) -> f32 {
    let tf = count as f32;
    let length_ratio = if avg_len > 0.0 {
        field_len as f32 / avg_len
    } else {
        1.0
    };
    let saturated = (tf * (K1 + 1.0)) / (tf + K1 * (1.0 - B + B * length_ratio));

    field.weight() * idf * saturated
}

/// Calculate a similarity score between a requested name and a known one.
///
/// Used for "did you mean" suggestions on unknown library names.
pub fn name_similarity(requested: &str, known: &str) -> f64 {
    rapidfuzz::distance::jaro_winkler::similarity(
        requested.to_lowercase().chars(),
        known.to_lowercase().chars(),
    )
}
