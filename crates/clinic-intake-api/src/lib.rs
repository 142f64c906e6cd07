//! # Clinic Intake API
//!
//! REST surface over `clinic-intake-core`.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Bearer JWT authentication and role checks
//! - REST-specific concerns (JSON bodies, status codes, CORS, request tracing)

#![warn(rust_2018_idioms)]

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use clinic_intake_core::{IntakeCore, IntakeError};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::JwtKeys;
use crate::error::{ApiError, ApiResult};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub core: IntakeCore,
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    pub fn new(core: IntakeCore, jwt: JwtKeys) -> Self {
        Self {
            core,
            jwt: Arc::new(jwt),
        }
    }

    /// Run a core operation off the async runtime; SQLite calls block.
    pub async fn run<T, F>(&self, op: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&IntakeCore) -> Result<T, IntakeError> + Send + 'static,
    {
        let core = self.core.clone();
        tokio::task::spawn_blocking(move || op(&core))
            .await
            .map_err(|e| ApiError::internal(format!("Worker task failed: {}", e)))?
            .map_err(ApiError::from)
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/api/forms/templates",
            get(routes::templates::list_templates).post(routes::templates::create_template),
        )
        .route(
            "/api/forms/templates/:id",
            get(routes::templates::get_template)
                .put(routes::templates::update_template)
                .delete(routes::templates::delete_template),
        )
        .route(
            "/api/forms/templates/:id/submissions",
            get(routes::submissions::list_template_submissions),
        )
        .route(
            "/api/forms/submissions",
            post(routes::submissions::create_submission),
        )
        .route(
            "/api/forms/submissions/mine",
            get(routes::submissions::list_my_submissions),
        )
        .route(
            "/api/forms/submissions/triage",
            get(routes::submissions::triage_queue),
        )
        .route(
            "/api/forms/submissions/:id",
            get(routes::submissions::get_submission),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
