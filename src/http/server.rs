//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (timeout, request ID, tracing)
//! - Bind server to listener and stop on the shutdown signal

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::http::handlers;
use crate::http::request::{request_id, UuidRequestId};
use crate::query::QueryEngine;
use crate::store::MemoryStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QueryEngine<MemoryStore>>,
}

/// HTTP server for the query API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `engine`.
    pub fn new(config: ApiConfig, engine: Arc<QueryEngine<MemoryStore>>) -> Self {
        Self {
            router: Self::build_router(&config, AppState { engine }),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ApiConfig, state: AppState) -> Router {
        Router::new()
            .route("/classes", get(handlers::list_classes))
            .route("/classes/search/{term}", get(handlers::search_classes))
            .route("/classes/{mod}", get(handlers::list_mod_classes))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %request_id(req),
                    )
                }),
            )
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router, for driving without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, accepting connections on `listener`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
