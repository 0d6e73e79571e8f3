//! HTTP server setup and the forwarding handler.
//!
//! # Responsibilities
//! - Create the Axum router for the mount point
//! - Wire up middleware (request ID, tracing, CORS headers)
//! - Answer preflight requests locally
//! - Forward everything else to the backend origin and relay the result

use axum::{
    body::Body,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderValue, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::request::{
    carries_body, encode_body, path_segments, request_id, strip_mount, target_url, MakeRequestUuid,
};
use crate::http::response::{decode_backend_body, relay, ForwardError};
use crate::security::with_cors;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let config = Arc::new(config);
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            config: config.clone(),
            client,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mount = config.backend.normalized_mount_path();

        let mut router = Router::new()
            .route(&format!("{}/", mount), any(forward_handler))
            .route(&format!("{}/{{*path}}", mount), any(forward_handler));
        if !mount.is_empty() {
            router = router.route(mount, any(forward_handler));
        }

        with_cors(router.with_state(state)).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend.normalized_origin(),
            mount_path = %self.config.backend.mount_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Wildcard handler: preflights are answered here, everything else is forwarded.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let request_id = request_id(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match forward(&state, request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %e.message(),
                "Proxy error"
            );
            e.into_response()
        }
    }
}

async fn forward(state: &AppState, request: Request<Body>) -> Result<Response, ForwardError> {
    let backend = &state.config.backend;
    let (parts, body) = request.into_parts();

    let segments = path_segments(strip_mount(parts.uri.path(), backend.normalized_mount_path()));
    let target = target_url(backend.normalized_origin(), &segments, parts.uri.query());
    let uri: Uri = target.parse().map_err(|source| ForwardError::InvalidTarget {
        url: target.clone(),
        source,
    })?;

    tracing::info!(method = %parts.method, target = %target, "Proxying request");

    let outbound_body = if carries_body(&parts.method) {
        let bytes = axum::body::to_bytes(body, state.config.security.max_body_size)
            .await
            .map_err(ForwardError::ReadRequest)?;
        let content_type = parts.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
        encode_body(content_type, &bytes).map_err(ForwardError::RequestBody)?
    } else {
        None
    };

    let outbound = Request::builder()
        .method(parts.method)
        .uri(uri)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .body(outbound_body.map(Body::from).unwrap_or_else(Body::empty))?;

    let exchange = exchange(state, outbound);
    match state.config.timeouts.upstream_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), exchange)
            .await
            .map_err(|_| ForwardError::Timeout(secs))?,
        None => exchange.await,
    }
}

/// Send the outbound request and turn the backend reply into a relayed response.
async fn exchange(state: &AppState, outbound: Request<Body>) -> Result<Response, ForwardError> {
    let response = state.client.request(outbound).await?;

    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let bytes = axum::body::to_bytes(Body::new(response.into_body()), usize::MAX)
        .await
        .map_err(ForwardError::ReadResponse)?;
    let data = decode_backend_body(content_type.as_deref(), &bytes).map_err(ForwardError::ResponseBody)?;

    tracing::debug!(status = status.as_u16(), bytes = bytes.len(), "Upstream responded");
    Ok(relay(status, data))
}
