//! Webmail server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::WebConfig;
use crate::{DmailError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router, create_static_router};

/// Web server for the webmail API.
pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    web_config: WebConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &WebConfig, app_state: Arc<AppState>) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| {
                DmailError::Config(format!(
                    "invalid web server address {}:{}: {e}",
                    config.host, config.port
                ))
            })?;

        Ok(Self {
            addr,
            app_state,
            web_config: config.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(&self) -> Router {
        let mut router = create_router(self.app_state.clone(), &self.web_config.cors_origins)
            .merge(create_health_router());

        if self.web_config.serve_static {
            if let Some(static_router) = create_static_router(&self.web_config.static_path) {
                router = router.merge(static_router);
            }
        }

        router.layer(CompressionLayer::new())
    }

    /// Run the web server.
    pub async fn run(self) -> std::io::Result<()> {
        let router = self.build_router();
        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Useful for tests binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let router = self.build_router();
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::MemoryActorFactory;
    use crate::auth::AuthClient;
    use candid::Principal;

    fn create_test_config() -> WebConfig {
        WebConfig {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec![],
            serve_static: false,
            static_path: "web/dist".to_string(),
        }
    }

    fn app_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            Arc::new(AuthClient::signed_out()),
            Arc::new(MemoryActorFactory::new()),
            Principal::anonymous(),
        ))
    }

    #[test]
    fn test_web_server_new() {
        let server = WebServer::new(&create_test_config(), app_state()).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[test]
    fn test_web_server_bad_host() {
        let mut config = create_test_config();
        config.host = "not a host".to_string();
        assert!(matches!(
            WebServer::new(&config, app_state()),
            Err(DmailError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let server = WebServer::new(&create_test_config(), app_state()).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let client = reqwest::Client::new();
        let resp = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();

        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "OK");
    }
}
