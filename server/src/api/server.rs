//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::mcp;
use super::middleware::{self, AllowedOrigins};
use super::routes::health;
use crate::core::CoreApp;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);
        Self {
            app,
            allowed_origins,
        }
    }

    /// Build the router: health probe plus the MCP endpoint
    pub fn router(&self) -> Router<()> {
        let app = &self.app;
        let ct = mcp::cancellation_token_from_shutdown(&app.shutdown);

        Router::new()
            .route("/health", get(health::health))
            .with_state(app.datasets.clone())
            .merge(mcp::routes(app.datasets.clone(), ct))
            .fallback(middleware::handle_404)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(middleware::cors(&self.allowed_origins)),
            )
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let router = self.router();
        let app = self.app;
        let shutdown = app.shutdown.clone();

        let listener =
            TcpListener::bind((app.config.server.host.as_str(), app.config.server.port)).await?;
        let addr = listener.local_addr()?;
        tracing::info!(%addr, "HTTP server listening");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AppConfig, DataConfig, ServerConfig, Transport};
    use crate::core::constants::{DEFAULT_HOST, DEFAULT_PORT};
    use crate::data::test_support;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app(data_dir: &std::path::Path) -> CoreApp {
        CoreApp::from_config(AppConfig {
            server: ServerConfig {
                transport: Transport::StreamableHttp,
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            data: DataConfig {
                dir: data_dir.to_path_buf(),
                max_connections: 1,
            },
        })
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let resp = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health_reports_datasets() {
        let fixture = test_support::fixture().await;
        let router = ApiServer::new(app(fixture.path())).router();

        let (status, body) = get(router, "/health").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["datasets"][0]["name"], "world");
        assert_eq!(json["datasets"][0]["available"], true);
        assert_eq!(json["datasets"][1]["available"], true);
    }

    #[tokio::test]
    async fn test_health_ok_with_missing_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let router = ApiServer::new(app(dir.path())).router();

        let (status, body) = get(router, "/health").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["datasets"][0]["available"], false);
    }

    #[tokio::test]
    async fn test_unknown_route_404() {
        let dir = tempfile::tempdir().unwrap();
        let router = ApiServer::new(app(dir.path())).router();

        let (status, _) = get(router, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
