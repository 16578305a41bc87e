//! Search handlers for one library or all of them.

use crate::service::DocSearch;
use crate::types::SearchHit;
use rmcp::schemars;
use serde::Deserialize;

use super::describe_error;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchLibraryRequest {
    /// Library to search, e.g. "react"
    pub library: String,
    /// Search query
    pub query: String,
    /// Library version (default: latest)
    #[serde(default)]
    pub version: Option<String>,
    /// Maximum number of results to return
    #[serde(default)]
    pub limit: Option<usize>,
    /// Number of results to skip
    #[serde(default)]
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchAllRequest {
    /// Search query
    pub query: String,
    /// Maximum number of results to return
    #[serde(default)]
    pub limit: Option<usize>,
    /// Number of results to skip
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Search the components of one library version.
pub async fn handle_search_library(
    docs: &DocSearch,
    request: SearchLibraryRequest,
    default_limit: usize,
) -> Result<String, String> {
    let limit = request.limit.unwrap_or(default_limit);
    let offset = request.offset.unwrap_or(0);

    let result = match docs
        .search_library(
            &request.library,
            request.version.as_deref(),
            &request.query,
            limit,
            offset,
        )
        .await
    {
        Ok(result) => result,
        Err(e) if e.is_not_found() => return Ok(describe_error(docs, &request.library, &e).await),
        Err(e) => return Err(e.to_string()),
    };

    let scope = format!("{}@{}", result.library, result.version);
    if result.hits.is_empty() {
        return Ok(no_results(&request.query, &scope, result.total));
    }

    Ok(format_hits(
        &result.hits,
        &request.query,
        &scope,
        offset,
        result.total,
    ))
}

/// Search the latest version of every library.
pub async fn handle_search_all(
    docs: &DocSearch,
    request: SearchAllRequest,
    default_limit: usize,
) -> Result<String, String> {
    let limit = request.limit.unwrap_or(default_limit);
    let offset = request.offset.unwrap_or(0);

    let result = docs
        .search_all(&request.query, limit, offset)
        .await
        .map_err(|e| e.to_string())?;

    if result.hits.is_empty() {
        return Ok(no_results(&request.query, "any library", result.total));
    }

    Ok(format_hits(
        &result.hits,
        &request.query,
        "all libraries",
        offset,
        result.total,
    ))
}

fn no_results(query: &str, scope: &str, total: usize) -> String {
    if total > 0 {
        return format!(
            "No results on this page for '{}' in {} ({} total). Try a smaller offset.\n",
            query, scope, total
        );
    }

    let mut msg = format!("No results found for '{}' in {}.\n\n", query, scope);
    msg.push_str("Search tips:\n");
    msg.push_str("• Try a shorter or more general term\n");
    msg.push_str("• Search for component names like 'useState' or 'computed'\n");
    msg.push_str("• Search uses stemming: 'hooks' matches 'hook'\n");
    msg
}

/// Format a page of hits into a readable string output.
fn format_hits(hits: &[SearchHit], query: &str, scope: &str, offset: usize, total: usize) -> String {
    let mut output = format!(
        "Search results for '{}' in {} ({}-{} of {}):\n\n",
        query,
        scope,
        offset + 1,
        offset + hits.len(),
        total
    );

    for (idx, hit) in hits.iter().enumerate() {
        let component = &hit.component;
        let source = match (&hit.library, &hit.library_version) {
            (Some(library), Some(version)) => format!(" [{}@{}]", library, version),
            _ => String::new(),
        };
        let kind = if component.kind.is_empty() {
            String::new()
        } else {
            format!(" ({})", component.kind)
        };

        output.push_str(&format!(
            "{}. `{}`{}{} - score: {:.2}\n",
            offset + idx + 1,
            component.name,
            kind,
            source,
            hit.score
        ));
        output.push_str(&format!("   path: {}\n", component.path));

        if let Some(line) = component
            .description
            .lines()
            .find(|line| !line.trim().is_empty())
        {
            output.push_str(&format!("   {}\n", line.trim()));
        }

        let matched: Vec<String> = hit
            .matches
            .iter()
            .map(|(term, fields)| {
                let fields: Vec<&str> = fields.keys().map(|field| field.as_str()).collect();
                format!("{} ({})", term, fields.join(", "))
            })
            .collect();
        if !matched.is_empty() {
            output.push_str(&format!("   matched: {}\n", matched.join("; ")));
        }

        output.push('\n');
    }

    output
}
