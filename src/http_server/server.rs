//! # HTTP Server
//!
//! Builds the trivia router once from explicit configuration and serves it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{trivia_routes, ApiError, TriviaHandler, TriviaState};
use crate::store::TriviaStore;

use super::config::HttpServerConfig;
use super::health_routes::health_routes;

/// Methods advertised to browsers on every response
const CORS_METHODS: [Method; 5] = [
    Method::GET,
    Method::PATCH,
    Method::POST,
    Method::DELETE,
    Method::OPTIONS,
];

/// HTTP server for the trivia API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given store
    pub fn with_store<S: TriviaStore + 'static>(config: HttpServerConfig, store: S) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router<S: TriviaStore + 'static>(config: &HttpServerConfig, store: S) -> Router {
        let state = Arc::new(TriviaState::new(
            TriviaHandler::new(store),
            config.store_timeout(),
        ));

        Router::new()
            .merge(health_routes())
            .merge(trivia_routes(state))
            .fallback(route_not_found)
            .layer(middleware::map_response(json_method_not_allowed))
            .layer(cors_layer(config))
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server and run until Ctrl+C or SIGTERM
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "Trivia API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// CORS policy: any origin unless a list is configured
fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
    let origins = if config.cors_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        match config.cors_header_values() {
            Ok(origins) => AllowOrigin::list(origins),
            Err(e) => {
                tracing::error!(error = %e, "Rejecting all cross-origin requests");
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        }
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Resource not found".to_string())
}

/// Give the router's bare 405 responses the standard JSON error body
async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rewritten = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(header::ALLOW, allow);
    }
    rewritten
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
