use crate::service::DocSearch;
use rmcp::schemars;
use serde::Deserialize;
use std::time::SystemTime;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PopularTermsRequest {
    /// Maximum number of terms to return
    #[serde(default)]
    pub limit: Option<usize>,
}

/// List the most searched terms, most popular first.
pub fn handle_popular_terms(docs: &DocSearch, request: &PopularTermsRequest, default_limit: usize) -> String {
    let terms = docs.popular_terms(request.limit.unwrap_or(default_limit));
    if terms.is_empty() {
        return "No searches recorded yet.\n".to_string();
    }

    let now = SystemTime::now();
    let mut output = format!("Popular search terms ({}):\n", terms.len());
    for (idx, term) in terms.iter().enumerate() {
        let ago = now
            .duration_since(term.last_searched_at)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        output.push_str(&format!(
            "  {}. {} - {} searches, last {}s ago\n",
            idx + 1,
            term.term,
            term.count,
            ago
        ));
    }
    output
}
