//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with one handler per supported verb
//! - Wire up middleware (tracing, request ID, body limit)
//! - Bind server to listener and serve until shutdown
//! - Hand each request to the forwarder

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    http::Method,
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::csrf::{CsrfTokenSource, RemoteTokenSource};
use crate::forwarder::{backend_client, ForwardError, ForwardRequest, Forwarder, QueryMode};
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::response::relay_outcome;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    /// Mount prefix with its trailing slash, stripped from inbound paths.
    pub path_prefix: Arc<str>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    /// Create a server whose tokens come from the backend's CSRF endpoint.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let client = backend_client()?;
        let tokens = Arc::new(RemoteTokenSource::new(client.clone(), config.backend.csrf_url()));
        let forwarder = Forwarder::with_client(&config.backend, client, tokens);
        Ok(Self::with_forwarder(config, forwarder))
    }

    /// Create a server with a custom token source.
    pub fn with_token_source(
        config: ProxyConfig,
        tokens: Arc<dyn CsrfTokenSource>,
    ) -> Result<Self, reqwest::Error> {
        let forwarder = Forwarder::new(&config.backend, tokens)?;
        Ok(Self::with_forwarder(config, forwarder))
    }

    fn with_forwarder(config: ProxyConfig, forwarder: Forwarder) -> Self {
        let state = AppState {
            forwarder: Arc::new(forwarder),
            path_prefix: format!("{}/", config.backend.mount_prefix).into(),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config: Arc::new(config),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let prefix = &config.backend.mount_prefix;
        let verbs = || {
            get(get_handler)
                .post(post_handler)
                .put(put_handler)
                .patch(patch_handler)
                .delete(delete_handler)
        };

        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request)
                )
            }))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size));

        Router::new()
            .route(&format!("{prefix}/{{*path}}"), verbs())
            .route(&format!("{prefix}/"), verbs())
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend.origin,
            prefix = %self.config.backend.mount_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn get_handler(State(state): State<AppState>, request: Request) -> Response {
    relay(state, request, QueryMode::AppendJsonFormat, false).await
}

async fn post_handler(State(state): State<AppState>, request: Request) -> Response {
    relay(state, request, QueryMode::PassThrough, false).await
}

async fn put_handler(State(state): State<AppState>, request: Request) -> Response {
    relay(state, request, QueryMode::PassThrough, false).await
}

async fn patch_handler(State(state): State<AppState>, request: Request) -> Response {
    relay(state, request, QueryMode::PassThrough, false).await
}

async fn delete_handler(State(state): State<AppState>, request: Request) -> Response {
    relay(state, request, QueryMode::PassThrough, false).await
}

/// Detach the inbound request and hand it to the forwarder.
async fn relay(
    state: AppState,
    request: Request,
    query_mode: QueryMode,
    require_trailing_slash: bool,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&request).to_string();
    let method = request.method().clone();

    let (parts, body) = request.into_parts();
    // Raw path, so percent-encoding reaches the backend untouched.
    let path = parts
        .uri
        .path()
        .strip_prefix(&*state.path_prefix)
        .unwrap_or_default()
        .to_string();

    tracing::debug!(request_id = %request_id, method = %method, path = %path, "Proxying request");

    let outcome = async {
        let body = if method == Method::GET || method == Method::HEAD {
            None
        } else {
            let bytes = axum::body::to_bytes(body, usize::MAX)
                .await
                .map_err(ForwardError::from_body_error)?;
            Some(bytes)
        };

        let forward = ForwardRequest {
            method: method.clone(),
            path,
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body,
            query_mode,
            require_trailing_slash,
        };
        state.forwarder.forward(forward).await
    }
    .await;

    relay_outcome(outcome, &method, &request_id, start)
}
