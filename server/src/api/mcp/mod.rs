use std::sync::Arc;

use axum::Router;
use rmcp::ServiceExt;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;

use crate::core::constants::MCP_HTTP_PATH;
use crate::core::shutdown::ShutdownService;
use crate::data::DatasetService;

mod tools;
mod types;

pub use self::tools::GazetteerServer;

/// Streamable HTTP transport. Sessions share one `LocalSessionManager` and
/// each session gets its own `GazetteerServer` over the shared datasets.
pub fn routes(datasets: Arc<DatasetService>, ct: CancellationToken) -> Router<()> {
    let service = StreamableHttpService::new(
        move || Ok(GazetteerServer::new(datasets.clone())),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            cancellation_token: ct,
            ..Default::default()
        },
    );
    Router::new().nest_service(MCP_HTTP_PATH, service)
}

/// Serve a single MCP session over stdin/stdout until the client
/// disconnects or `ct` is cancelled.
pub async fn serve_stdio(datasets: Arc<DatasetService>, ct: CancellationToken) -> anyhow::Result<()> {
    let service = GazetteerServer::new(datasets)
        .serve_with_ct(rmcp::transport::stdio(), ct)
        .await?;
    tracing::debug!("MCP stdio session started");
    let reason = service.waiting().await?;
    tracing::debug!(?reason, "MCP stdio session ended");
    Ok(())
}

pub fn cancellation_token_from_shutdown(shutdown: &ShutdownService) -> CancellationToken {
    let token = CancellationToken::new();
    let mut rx = shutdown.subscribe();
    let t = token.clone();
    tokio::spawn(async move {
        let _ = rx.wait_for(|&v| v).await;
        t.cancel();
    });
    token
}
