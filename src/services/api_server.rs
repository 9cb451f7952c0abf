// src/services/api_server.rs
//! API Server for the certificate verification endpoint
//!
//! Exposes a single read-only route:
//! - `GET /api/verify?name=<string>&serial=<string>` looks a certificate up
//! - `OPTIONS /api/verify` answers CORS preflight
//!
//! Every response, including errors, 404s and caught panics, passes through the
//! CORS middleware and leaves with the same four CORS headers. Every JSON body
//! uses the `{matched, item?, error?}` envelope.

use crate::error::{VerifyError, GENERIC_SERVER_ERROR};
use crate::models::certificate::VerificationResult;
use crate::models::query::{NormalizedQuery, VerifyQuery};
use crate::services::cors::CorsPolicy;
use crate::services::verifier::Verifier;
use crate::settings::Settings;
use crate::storage::framer_client::FramerClient;
use anyhow::Context;
use axum::{
    extract::{Query, Request, State},
    http::{header::ORIGIN, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

/// Path of the verification endpoint.
pub const VERIFY_PATH: &str = "/api/verify";

/// API server state shared by all requests.
#[derive(Clone)]
pub struct ApiServer {
    /// Certificate lookup; `None` when CMS credentials are not configured
    verifier: Option<Arc<Verifier>>,

    /// Origin allow-list applied to every response
    cors: Arc<CorsPolicy>,
}

impl ApiServer {
    /// Creates a new instance of the API server
    ///
    /// # Arguments
    /// * `verifier` - Certificate lookup, or `None` if the backend is unconfigured
    /// * `cors` - CORS policy for all responses
    pub fn new(verifier: Option<Verifier>, cors: CorsPolicy) -> Self {
        ApiServer {
            verifier: verifier.map(Arc::new),
            cors: Arc::new(cors),
        }
    }

    /// Builds the server from startup settings.
    ///
    /// Missing credentials are logged and tolerated; an unusable API base URL is not.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let cors = CorsPolicy::from_allow_list(settings.allowed_origins());
        let api_base = settings.api_base()?;

        let verifier = match settings.credentials() {
            Some(credentials) => {
                let client = FramerClient::new(&api_base, &credentials)
                    .context("failed to initialize Framer client")?;
                log::info!("reading certificates from {}", client.endpoint());
                Some(Verifier::new(client))
            }
            None => {
                log::warn!("FRAMER_SITE_ID or FRAMER_API_KEY is not set; verification requests will fail");
                None
            }
        };

        if cors.rules().is_empty() {
            log::warn!("ALLOWED_ORIGINS is empty; browsers will be denied cross-origin access");
        }

        Ok(Self::new(verifier, cors))
    }

    /// Builds the router with CORS and panic handling applied.
    pub fn router(&self) -> Router {
        let state = Arc::new(self.clone());

        Router::new()
            .route(VERIFY_PATH, any(Self::verify_handler))
            .fallback(Self::not_found_handler)
            .layer(CatchPanicLayer::custom(Self::panic_response))
            .layer(middleware::from_fn_with_state(state.clone(), Self::cors_middleware))
            .with_state(state)
    }

    /// Starts the API server and serves requests until Ctrl-C.
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "127.0.0.1:3000")
    pub async fn run(&self, addr: SocketAddr) -> anyhow::Result<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        log::info!("API server running at http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        log::info!("API server stopped");
        Ok(())
    }

    /// Runs the verification pipeline after preflight handling.
    ///
    /// Order matters: configuration, then method, then input, then the
    /// collection fetch. Each step can end the request.
    async fn verify(&self, method: &Method, query: &VerifyQuery) -> Result<VerificationResult, VerifyError> {
        let verifier = self.verifier.as_ref().ok_or(VerifyError::MissingConfig)?;

        if *method != Method::GET {
            return Err(VerifyError::MethodNotAllowed);
        }

        let query = NormalizedQuery::parse(query)?;

        let result = match verifier.find_certificate(&query).await? {
            Some(record) => VerificationResult::found(&record),
            None => VerificationResult::not_found(),
        };
        Ok(result)
    }

    // =====================
    // Handlers
    // =====================

    /// Verifies a claimed certificate
    ///
    /// # Endpoint
    /// GET /api/verify?name=<string>&serial=<string>
    ///
    /// # Responses
    /// - 200 OK: `{matched: true, item}` or `{matched: false}`
    /// - 204 No Content: CORS preflight
    /// - 400 Bad Request: missing parameters or invalid serial format
    /// - 405 Method Not Allowed: anything but GET / OPTIONS
    /// - 500 Internal Server Error: missing configuration or unexpected failure
    /// - 502 Bad Gateway: collection store returned an error
    async fn verify_handler(
        State(state): State<Arc<ApiServer>>,
        method: Method,
        query: Option<Query<Vec<(String, String)>>>,
    ) -> Response {
        if method == Method::OPTIONS {
            return StatusCode::NO_CONTENT.into_response();
        }

        let query = query
            .map(|Query(pairs)| VerifyQuery::from_pairs(pairs))
            .unwrap_or_default();

        match state.verify(&method, &query).await {
            Ok(result) => (StatusCode::OK, Json(result)).into_response(),
            Err(err) => {
                log_failure(&err);
                (err.status_code(), Json(VerificationResult::failure(err.client_message()))).into_response()
            }
        }
    }

    async fn not_found_handler() -> Response {
        (StatusCode::NOT_FOUND, Json(VerificationResult::failure("Not found"))).into_response()
    }

    /// Stamps CORS headers on every outgoing response.
    async fn cors_middleware(State(state): State<Arc<ApiServer>>, request: Request, next: Next) -> Response {
        let headers = state.cors.headers(request.headers().get(ORIGIN));

        let mut response = next.run(request).await;
        for (name, value) in headers {
            response.headers_mut().insert(name, value);
        }
        response
    }

    /// Converts a handler panic into the generic 500 envelope.
    fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
        let detail = err
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| err.downcast_ref::<&str>().copied())
            .unwrap_or("unknown panic");
        log::error!("verification handler panicked: {}", detail);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(VerificationResult::failure(GENERIC_SERVER_ERROR)),
        )
            .into_response()
    }
}

/// Logs a failed request at a level matching who is at fault.
fn log_failure(err: &VerifyError) {
    match err {
        VerifyError::Upstream { status, body } => log::error!("Framer API error: {} {}", status, body),
        VerifyError::MissingConfig => log::warn!("rejected verification request: {}", err),
        e if e.is_client_error() => log::debug!("rejected verification request: {}", e),
        e => log::error!("verification failed: {}", e),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("shutdown signal received");
}
