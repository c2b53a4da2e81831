use axum::extract::DefaultBodyLimit;
use axum::routing::any;
use axum::Router;
use log::info;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::handlers::{backup, restore, status};
use crate::resolver::MAX_BODY_BYTES;
use crate::AppState;

/// HTTP front end for the backup and restore triggers.
pub struct HttpServer {
    listen_addr: String,
    router: Router,
}

impl HttpServer {
    pub fn new(listen_addr: impl Into<String>, state: AppState) -> Self {
        Self {
            listen_addr: listen_addr.into(),
            router: router(Arc::new(state)),
        }
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serves until `shutdown` resolves, then drains in-flight requests.
    pub async fn start<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self.listen_addr.parse()?;
        let listener = TcpListener::bind(addr).await?;

        info!("HTTP server listening on http://{addr}");
        info!("Endpoints: /status, /backup, /restore?file=<name>");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Routes every trigger; method dispatch happens inside the handlers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", any(status::status))
        .route("/backup", any(backup::backup))
        .route("/restore", any(restore::restore))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
