//! MCP server exposing the search operations as tools.

use crate::config::Config;
use crate::service::DocSearch;
use crate::tools::{
    PopularTermsRequest, RefreshIndexRequest, SearchAllRequest, SearchLibraryRequest,
    handle_list_libraries, handle_popular_terms, handle_refresh_index, handle_search_all,
    handle_search_library,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// Page sizes applied when a tool call gives no limit.
#[derive(Debug, Clone, Copy)]
struct Limits {
    search: usize,
    popular: usize,
}

/// MCP Server for library documentation search
#[derive(Clone)]
pub struct SearchServer {
    /// Shared search state (index cache, popularity tracker, store)
    docs: Arc<DocSearch>,

    limits: Limits,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SearchServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchServer")
            .field("docs", &self.docs)
            .field("limits", &self.limits)
            .finish()
    }
}

#[tool_router]
impl SearchServer {
    pub fn new(docs: Arc<DocSearch>, config: &Config) -> Self {
        Self {
            docs,
            limits: Limits {
                search: config.default_limit,
                popular: config.popular_limit,
            },
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the shared search state.
    pub const fn docs(&self) -> &Arc<DocSearch> {
        &self.docs
    }

    #[tool(
        description = "Search the components (hooks, functions, classes, decorators) of one library. Matches names, descriptions, types and examples, ranked by relevance. Searches the latest version unless a version is given."
    )]
    async fn search_library(
        &self,
        Parameters(request): Parameters<SearchLibraryRequest>,
    ) -> std::result::Result<String, String> {
        handle_search_library(&self.docs, request, self.limits.search).await
    }

    #[tool(
        description = "Search the latest version of every library at once. Results from all libraries are ranked together and tagged with their source library."
    )]
    async fn search_all(
        &self,
        Parameters(request): Parameters<SearchAllRequest>,
    ) -> std::result::Result<String, String> {
        handle_search_all(&self.docs, request, self.limits.search).await
    }

    #[tool(description = "List the most frequently searched terms.")]
    async fn popular_terms(
        &self,
        Parameters(request): Parameters<PopularTermsRequest>,
    ) -> std::result::Result<String, String> {
        Ok(handle_popular_terms(
            &self.docs,
            &request,
            self.limits.popular,
        ))
    }

    #[tool(description = "List the available libraries with their latest and older versions.")]
    async fn list_libraries(&self) -> std::result::Result<String, String> {
        handle_list_libraries(&self.docs).await
    }

    #[tool(
        description = "Drop cached search indexes so they are rebuilt from current documentation on the next search. Without a library, drops every index."
    )]
    async fn refresh_index(
        &self,
        Parameters(request): Parameters<RefreshIndexRequest>,
    ) -> std::result::Result<String, String> {
        handle_refresh_index(&self.docs, request).await
    }
}

#[tool_handler]
impl ServerHandler for SearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "docsearch: full-text search over versioned library documentation. \
                 Use list_libraries to see what is indexed, search_library to search one library \
                 and search_all to search every library at once.",
            )
    }
}
