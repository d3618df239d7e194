//! Kakeibo Web Server
//!
//! Axum-based page and JSON API for the Kakeibo budgeting advisor.
//!
//! - `GET /` starts a session and redirects to its page
//! - `/sessions/:id` renders the ledger, summary and conversation log
//! - `/api/...` exposes the same operations as JSON
//!
//! Security features:
//! - Restrictive CORS policy
//! - Security headers (nosniff, frame DENY, CSP)
//! - HTML-escaped rendering of all user and model text
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use kakeibo_core::ai::AIBackend;
use kakeibo_core::{Advisor, Database};

mod handlers;
mod page;
mod sessions;

pub use sessions::{SessionManager, UiSession};

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub advisor: Advisor,
    /// Live interactive sessions and their conversation logs
    pub sessions: SessionManager,
}

/// Create the application router
pub fn create_router(db: Database, advisor: Advisor, config: ServerConfig) -> Router {
    info!(
        "Advice backend: {} (model: {})",
        advisor.ai().host(),
        advisor.ai().model()
    );

    let state = Arc::new(AppState {
        db,
        advisor,
        sessions: SessionManager::new(),
    });

    let api_routes = Router::new()
        // Ledger
        .route("/transactions", get(handlers::list_transactions))
        .route("/summary", get(handlers::get_summary))
        .route("/prompt", get(handlers::get_prompt))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/:id", get(handlers::get_session))
        .route("/sessions/:id/advice", post(handlers::request_advice))
        .route("/sessions/:id/questions", post(handlers::submit_question));

    let page_routes = Router::new()
        .route("/", get(handlers::start_page))
        .route("/sessions/:id", get(handlers::show_page))
        .route("/sessions/:id/advice", post(handlers::page_advice))
        .route("/sessions/:id/questions", post(handlers::page_question));

    // CSP: no scripts at all, inline styles for the single page
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'none'; style-src 'self' 'unsafe-inline'; form-action 'self'; frame-ancestors 'none'",
    );

    Router::new()
        .merge(page_routes)
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins))
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ))
}

/// Same-origin unless explicit origins are configured
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        layer
    } else {
        layer.allow_origin(origins)
    }
}

/// Start the server
pub async fn serve(db: Database, advisor: Advisor, host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(db, advisor, host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    advisor: Advisor,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    check_ai_connection(&advisor).await;

    let app = create_router(db, advisor, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log advice backend reachability
///
/// An unreachable backend is not fatal: each advice request reports its own failure.
async fn check_ai_connection(advisor: &Advisor) {
    let ai = advisor.ai();
    if ai.health_check().await {
        info!("✅ Advice backend reachable: {} (model: {})", ai.host(), ai.model());
    } else {
        warn!(
            "⚠️  Advice backend not responding: {} (model: {})",
            ai.host(),
            ai.model()
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
