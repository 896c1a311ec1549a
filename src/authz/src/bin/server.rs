//! # Authorization HTTP Server
//!
//! HTTP facade over the Haven authorization engine. Exposes the
//! decision API for services that cannot link the engine directly,
//! plus health monitoring and metrics.
//!
//! ## Endpoints
//!
//! - `POST /v1/evaluate` - Evaluate a policy for a caller identity
//! - `GET /v1/policies` - List generated policy names
//! - `GET /health` - Health check
//! - `GET /metrics` - Prometheus metrics (separate listener)
//!
//! ## Configuration
//!
//! Environment variables:
//! - `PORT` - HTTP server port (default: 8080)
//! - `METRICS_PORT` - Metrics server port (default: 9090)
//! - `RUST_LOG` - Log level (default: info)
//! - `AUDIT_BUFFER` - Decision record channel capacity (default: 1024)

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    serve, Router,
};
use haven_authz::{AccessEngine, AuthzError, ChannelSink, EngineConfig, PermissionMatrix};
use haven_core::Identity;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shared application state
#[derive(Clone)]
struct AppState {
    engine: Arc<AccessEngine>,
    start_time: std::time::Instant,
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// Application error type
#[derive(Debug)]
enum AppError {
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "policy_not_found", msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<AuthzError> for AppError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::PolicyNotFound(name) => AppError::NotFound(name),
            AuthzError::DuplicatePolicy(_) => AppError::Internal(err.to_string()),
        }
    }
}

/// Caller identity as posted by upstream services
///
/// `display_name` defaults to the subject and `authenticated` to true:
/// by the time a request reaches this server the gateway has already
/// validated the session, and anonymous probes say so explicitly.
#[derive(Debug, Deserialize)]
struct IdentityPayload {
    subject: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default = "default_authenticated")]
    authenticated: bool,
    #[serde(default)]
    role_claims: Vec<String>,
}

fn default_authenticated() -> bool {
    true
}

impl From<IdentityPayload> for Identity {
    fn from(payload: IdentityPayload) -> Self {
        let display_name = payload.display_name.unwrap_or_else(|| payload.subject.clone());
        Identity {
            subject: payload.subject,
            display_name,
            authenticated: payload.authenticated,
            role_claims: payload.role_claims,
        }
    }
}

/// Evaluation request
#[derive(Debug, Deserialize)]
struct EvaluateRequest {
    policy: String,
    identity: IdentityPayload,
}

/// Evaluation response
///
/// Deliberately just the boolean: attempted roles and requirement
/// details stay in the decision log and are never echoed to callers.
#[derive(Debug, Serialize)]
struct EvaluateResponse {
    granted: bool,
}

/// Policy listing response
#[derive(Debug, Serialize)]
struct PoliciesResponse {
    policies: Vec<String>,
    total: usize,
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    uptime_seconds: u64,
    version: String,
    policies: usize,
}

/// Metrics response (Prometheus format)
struct MetricsResponse {
    metrics: String,
}

impl IntoResponse for MetricsResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            self.metrics,
        )
            .into_response()
    }
}

/// POST /v1/evaluate - Evaluate a policy for a caller
async fn evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    debug!(policy = %req.policy, subject = %req.identity.subject, "Evaluation request");

    let identity: Identity = req.identity.into();
    let decision = state.engine.evaluate(&req.policy, &identity)?;

    Ok(Json(EvaluateResponse {
        granted: decision.granted,
    }))
}

/// GET /v1/policies - List generated policy names
async fn list_policies(State(state): State<AppState>) -> Json<PoliciesResponse> {
    let policies = state.engine.registry().names();
    let total = policies.len();

    Json(PoliciesResponse { policies, total })
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();

    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: uptime,
        version: haven_authz::VERSION.to_string(),
        policies: state.engine.registry().len(),
    })
}

/// GET /metrics - Prometheus metrics endpoint
async fn metrics(State(state): State<AppState>) -> MetricsResponse {
    let uptime = state.start_time.elapsed().as_secs();

    let mut body = state.engine.export_prometheus();
    body.push_str(&format!(
        "\n# HELP authz_uptime_seconds Server uptime in seconds\n\
         # TYPE authz_uptime_seconds gauge\n\
         authz_uptime_seconds {}\n\
         \n\
         # HELP authz_version Server version info\n\
         # TYPE authz_version gauge\n\
         authz_version{{version=\"{}\"}} 1\n",
        uptime,
        haven_authz::VERSION
    ));

    MetricsResponse { metrics: body }
}

/// Create the HTTP router with all endpoints
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/v1/evaluate", post(evaluate))
        .route("/v1/policies", get(list_policies))
        .route("/health", get(health_check))
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
        .with_state(state)
}

/// Create the metrics router
fn create_metrics_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }

    info!("Starting graceful shutdown");
}

/// Main server entrypoint
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Haven Authorization Server v{}", haven_authz::VERSION);

    // Load configuration from environment
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let metrics_port: u16 = std::env::var("METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9090);

    let audit_buffer: usize = std::env::var("AUDIT_BUFFER")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1024);

    info!("Configuration:");
    info!("  Port: {}", port);
    info!("  Metrics Port: {}", metrics_port);
    info!("  Audit Buffer: {}", audit_buffer);

    // Initialize the engine; a broken policy set must abort start-up.
    let (sink, mut rx) = ChannelSink::new(audit_buffer);
    let engine = AccessEngine::with_sink(
        PermissionMatrix::builtin(),
        EngineConfig::default(),
        Arc::new(sink),
    )
    .context("engine initialization failed")?;

    info!("Authorization engine initialized successfully");

    // Drain decision records into structured JSON log lines
    tokio::spawn(async move {
        while let Some(record) = rx.recv().await {
            match serde_json::to_string(&record) {
                Ok(line) => info!(record = %line, "Decision recorded"),
                Err(err) => warn!(error = %err, "Failed to serialize decision record"),
            }
        }
    });

    // Create shared state
    let state = AppState {
        engine: Arc::new(engine),
        start_time: std::time::Instant::now(),
    };

    // Create routers
    let app = create_router(state.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let metrics_app = create_metrics_router(state.clone());
    let metrics_addr = SocketAddr::from(([0, 0, 0, 0], metrics_port));

    info!("Starting HTTP server on {}", addr);
    info!("Starting metrics server on {}", metrics_addr);

    // Create TCP listeners
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP server on {}", addr))?;

    let metrics_listener = tokio::net::TcpListener::bind(metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics server on {}", metrics_addr))?;

    // Start both servers concurrently
    let server = serve(listener, app.into_make_service()).with_graceful_shutdown(shutdown_signal());

    let metrics_server = serve(metrics_listener, metrics_app.into_make_service())
        .with_graceful_shutdown(shutdown_signal());

    let result = tokio::try_join!(
        async {
            server.await.map_err(|e| {
                error!("HTTP server error: {}", e);
                e
            })
        },
        async {
            metrics_server.await.map_err(|e| {
                error!("Metrics server error: {}", e);
                e
            })
        }
    );

    match result {
        Ok(_) => {
            info!("Servers shut down gracefully");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
