//! HTTP API around a shared braille engine.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/state` - Engine snapshot
//! - `POST /api/events` - Apply one event or a batch, in order
//! - `POST /api/clear` - Clear grid, cursor and chord
//! - `PUT /api/policy` - Change the boundary policy
//! - `GET /api/text` - Grid as braille text

pub mod api;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::engine::{BoundaryPolicy, Engine, EngineSnapshot, GridSettings, InputEvent};
use crate::export;

pub use api::{ApiError, EventRequest, EventsResponse, HealthResponse, PolicyRequest};
use api::{bad_request, ApiFailure};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
///
/// Requests hold the engine lock for their whole duration, so concurrent
/// clients observe events in arrival order.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<Engine>>,
}

impl AppState {
    /// Creates a state around a fresh engine.
    #[must_use]
    pub fn new(settings: GridSettings) -> Self {
        Self {
            engine: Arc::new(Mutex::new(Engine::new(settings))),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Engine>, ApiFailure> {
        self.engine.lock().map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("Engine state is unavailable")),
            )
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/state
async fn get_state(State(state): State<AppState>) -> Result<Json<EngineSnapshot>, ApiFailure> {
    Ok(Json(state.lock()?.snapshot()))
}

/// POST /api/events
async fn post_events(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<EventsResponse>, ApiFailure> {
    let events = api::parse_events(body).map_err(bad_request)?;

    let mut engine = state.lock()?;
    let outcomes = events.into_iter().map(|event| engine.apply(event)).collect::<Vec<_>>();
    debug!(count = outcomes.len(), "applied events");

    Ok(Json(EventsResponse {
        outcomes,
        state: engine.snapshot(),
    }))
}

/// POST /api/clear
async fn post_clear(State(state): State<AppState>) -> Result<Json<EngineSnapshot>, ApiFailure> {
    let mut engine = state.lock()?;
    engine.apply(InputEvent::ClearAll);
    Ok(Json(engine.snapshot()))
}

/// PUT /api/policy
async fn put_policy(
    State(state): State<AppState>,
    Json(request): Json<PolicyRequest>,
) -> Result<Json<EngineSnapshot>, ApiFailure> {
    let policy: BoundaryPolicy = request.policy.parse().map_err(|e: String| {
        bad_request(ApiError::with_details("Invalid boundary policy", e))
    })?;

    let mut engine = state.lock()?;
    engine.set_policy(policy);
    Ok(Json(engine.snapshot()))
}

/// GET /api/text
async fn get_text(State(state): State<AppState>) -> Result<String, ApiFailure> {
    Ok(export::grid_to_unicode(state.lock()?.grid()))
}

// ============================================================================
// Router and Server
// ============================================================================

/// Builds the router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // Meant for local use alongside a browser front end
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/state", get(get_state))
        .route("/api/events", post(post_events))
        .route("/api/clear", post(post_clear))
        .route("/api/policy", put(put_policy))
        .route("/api/text", get(get_text))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or serving fails.
pub async fn run_server(settings: GridSettings, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(AppState::new(settings));

    info!(
        rows = settings.rows,
        cols = settings.cols,
        policy = %settings.boundary_policy,
        "Starting brailler web server on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
