//! API Server - HTTP server for the classification form

use axum::{routing::get, Router};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::handlers::{self, AppState};
use crate::api::web;
use crate::classifier::Classifier;
use crate::error::{DetectorError, Result};

/// Build the router around a fitted classifier
pub fn router(classifier: Arc<dyn Classifier>) -> Router {
    Router::new()
        .route("/", get(web::index_page).post(web::classify_submit))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(classifier))
}

/// API Server configuration
pub struct ApiServer {
    classifier: Arc<dyn Classifier>,
    addr: SocketAddr,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(classifier: Arc<dyn Classifier>, addr: SocketAddr) -> Self {
        Self { classifier, addr }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        router(Arc::clone(&self.classifier))
    }

    /// Bind the listener and report the actual local address
    pub async fn bind(&self) -> Result<(SocketAddr, tokio::net::TcpListener)> {
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| DetectorError::Server(format!("Failed to bind {}: {}", self.addr, e)))?;
        let local = listener.local_addr()?;
        Ok((local, listener))
    }

    /// Start the API server
    pub async fn run(&self) -> Result<()> {
        let (local, listener) = self.bind().await?;
        self.serve(local, listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(&self, local: SocketAddr, listener: tokio::net::TcpListener) -> Result<()> {
        info!("Spam detector listening on http://{}/", local);

        axum::serve(listener, self.router())
            .await
            .map_err(|e| DetectorError::Server(e.to_string()))
    }
}

/// Address a local browser should open; wildcard binds map to loopback
pub fn browser_url(addr: SocketAddr) -> String {
    let mut target = addr;
    if addr.ip().is_unspecified() {
        let loopback = match addr.ip() {
            IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
        };
        target.set_ip(loopback);
    }
    format!("http://{}/", target)
}

/// Open the default browser on `url` after `delay`; failures are only logged
pub fn spawn_browser_launch(url: String, delay: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let target = url.clone();
        match tokio::task::spawn_blocking(move || webbrowser::open(&target)).await {
            Ok(Ok(())) => info!("Opened browser at {}", url),
            Ok(Err(e)) => warn!("Could not open browser at {}: {}", url, e),
            Err(e) => warn!("Browser launch task failed: {}", e),
        }
    })
}
