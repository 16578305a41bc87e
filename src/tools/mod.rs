pub mod libraries;
pub mod popular;
pub mod refresh;
pub mod search;

pub use libraries::*;
pub use popular::*;
pub use refresh::*;
pub use search::*;

use crate::error::SearchError;
use crate::service::DocSearch;

/// Renders a search error for a tool response, with suggestions for unknown libraries.
pub(crate) async fn describe_error(docs: &DocSearch, library: &str, err: &SearchError) -> String {
    let SearchError::LibraryNotFound(_) = err else {
        return err.to_string();
    };

    let mut message = format!("Library '{}' not found.", library);
    match docs.suggest_libraries(library).await {
        Ok(suggestions) if !suggestions.is_empty() => {
            message.push_str(" Did you mean one of these?\n\n");
            for name in suggestions {
                message.push_str(&format!("• `{}`\n", name));
            }
        }
        _ => message.push_str(" Use list_libraries to see what is available.\n"),
    }
    message
}
