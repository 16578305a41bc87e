use anyhow::Context;
use docsearch::{Config, DocSearch, FetcherRegistry, RefreshWorker, SearchServer};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    // Logs go to stderr to avoid interfering with MCP protocol on stdout
    docsearch::tracing::init_with(&config.logging);

    tracing::info!(
        "Starting docsearch MCP server (data directory: {})",
        config.data_dir.display()
    );

    let registry = Arc::new(
        FetcherRegistry::from_directory(&config.data_dir)
            .await
            .context("Failed to load library catalog")?,
    );
    let docs = Arc::new(DocSearch::with_config(registry.clone(), &config));

    let cancel = CancellationToken::new();
    let refresh = config.refresh_interval().map(|interval| {
        tracing::info!("Rescanning data directory every {:?}", interval);
        RefreshWorker::new(docs.clone(), registry, &config.data_dir).spawn(interval, cancel.clone())
    });

    let server = SearchServer::new(docs, &config);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    // Wait for the service to complete
    let result = service.waiting().await;

    cancel.cancel();
    if let Some(handle) = refresh {
        let _ = handle.await;
    }

    result?;
    tracing::info!("docsearch MCP server stopped");
    Ok(())
}
