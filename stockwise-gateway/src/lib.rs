//! HTTP surface for the StockWise license subsystem.
//!
//! Routes:
//! - `POST /api/v1/license/issue` — superadmin-only issuance
//! - `POST /api/v1/license/activate` — superadmin-only activation
//! - `GET  /api/v1/license/heartbeat` — debounced periodic check
//! - `POST /api/v1/license/revalidate` — rate-limited, signature-verifying
//! - `GET  /api/v1/license/current` — unauthenticated overview
//!
//! Authentication itself lives in the surrounding application; this layer
//! trusts the `x-actor-id`/`x-actor-role` headers its auth proxy sets and
//! only enforces which roles may reach which operation.

pub mod ratelimit;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use stockwise_license::{
    Actor, HeartbeatValidator, IssueRequest, Issuer, LicenseConfig, LicenseError, LicenseStore,
    Revalidator, SignatureEngine, Validation,
};
use tracing::{debug, warn};

use crate::ratelimit::FixedWindowLimiter;

/// Shared state for all license routes.
#[derive(Clone)]
pub struct AppState {
    issuer: Arc<Issuer>,
    heartbeat: Arc<HeartbeatValidator>,
    revalidator: Arc<Revalidator>,
    limiter: Arc<FixedWindowLimiter>,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn LicenseStore>,
        engine: SignatureEngine,
        config: LicenseConfig,
    ) -> Self {
        Self {
            issuer: Arc::new(Issuer::new(store.clone(), engine.clone())),
            heartbeat: Arc::new(HeartbeatValidator::new(store.clone(), config.clone())),
            revalidator: Arc::new(Revalidator::new(store, engine, config)),
            limiter: Arc::new(FixedWindowLimiter::default()),
        }
    }
}

/// Build the license API router with the given state.
pub fn build_router(state: AppState) -> Router {
    let validation_surface = Router::new()
        .route("/api/v1/license/revalidate", post(revalidate_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/api/v1/license/issue", post(issue_handler))
        .route("/api/v1/license/activate", post(activate_handler))
        .route("/api/v1/license/heartbeat", get(heartbeat_handler))
        .route("/api/v1/license/current", get(current_handler))
        .merge(validation_surface)
        .with_state(state)
}

fn actor_from_headers(headers: &HeaderMap) -> Option<Actor> {
    let id = headers.get("x-actor-id")?.to_str().ok()?.to_string();
    let role = headers.get("x-actor-role")?.to_str().ok()?.parse().ok()?;
    Some(Actor { id, role })
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "superadmin role required" })),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal error" })),
    )
        .into_response()
}

async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if !state.limiter.try_acquire(addr.ip()) {
        debug!(client = %addr.ip(), "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "too many requests" })),
        )
            .into_response();
    }
    next.run(request).await
}

async fn issue_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<IssueRequest>,
) -> Response {
    match actor_from_headers(&headers) {
        Some(actor) if actor.role.can_issue() => {}
        _ => return forbidden(),
    }
    match state.issuer.issue(&request) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e @ (LicenseError::InvalidRequest(_) | LicenseError::UnknownTier(_))) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => {
            warn!("license issuance failed: {e}");
            internal_error()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivateRequest {
    license_key: String,
}

async fn activate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ActivateRequest>,
) -> Response {
    match actor_from_headers(&headers) {
        Some(actor) if actor.role.can_issue() => {}
        _ => return forbidden(),
    }
    match state.issuer.activate(&request.license_key) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e @ LicenseError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => {
            warn!("license activation failed: {e}");
            internal_error()
        }
    }
}

async fn heartbeat_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<Validation> {
    let actor = actor_from_headers(&headers);
    Json(state.heartbeat.check(actor.as_ref()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RevalidateRequest {
    license_key: String,
}

/// Wire shape of a revalidation result (`reason` goes out as `error`).
#[derive(Debug, Serialize)]
struct RevalidateResponse {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn revalidate_handler(
    State(state): State<AppState>,
    Json(request): Json<RevalidateRequest>,
) -> Json<RevalidateResponse> {
    let validation = state.revalidator.revalidate(&request.license_key);
    Json(RevalidateResponse {
        valid: validation.valid,
        error: validation.reason,
    })
}

async fn current_handler(State(state): State<AppState>) -> Response {
    match state.issuer.current() {
        Ok(overview) => Json(overview).into_response(),
        Err(e) => {
            warn!("current-license lookup failed: {e}");
            internal_error()
        }
    }
}
