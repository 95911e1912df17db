//! Axum server and routes.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use leadpool_engine::ReassignmentPool;
use leadpool_types::{
    ActionResponse, Actor, AuditAction, AuditListOptions, AuditLogEntry, AuditStore,
    BaseResponse, EligibilityResponse, LeadActionRequest, LeadResponse, PoolError, PoolResponse,
    RecordContactRequest,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub struct AppState {
    pub pool: Arc<ReassignmentPool>,
    pub audit_log: Arc<dyn AuditStore>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/leads/pool", get(handle_pool))
        .route("/leads/pool/eligibility", get(handle_eligibility))
        .route("/leads/grab", post(handle_grab))
        .route("/leads/release", post(handle_release))
        .route("/leads/contact", post(handle_contact))
        .route("/audit/list", get(handle_audit_list))
        .route("/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn error_code(e: &PoolError) -> i32 {
    match e {
        PoolError::LeadNotFound(_) => 404,
        PoolError::NotAvailable(_) | PoolError::CooldownActive { .. } => 409,
        PoolError::Store(_) => 500,
    }
}

fn pool_error<T>(e: PoolError) -> Json<BaseResponse<T>> {
    let code = error_code(&e);
    if code == 500 {
        tracing::error!(error = %e, "pool action failed");
    }
    Json(BaseResponse::error(code, e.to_string()))
}

#[derive(Debug, Deserialize)]
pub struct ActorQuery {
    #[serde(default)]
    pub actor_id: String,
    #[serde(default)]
    pub actor_name: String,
}

impl ActorQuery {
    fn actor(&self) -> Option<Actor> {
        if self.actor_id.trim().is_empty() {
            return None;
        }
        Some(Actor::display_or_id(&self.actor_id, &self.actor_name))
    }
}

async fn handle_pool(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ActorQuery>,
) -> Json<PoolResponse> {
    let Some(actor) = q.actor() else {
        return Json(BaseResponse::error(400, "actor_id is required"));
    };
    match state.pool.snapshot(&actor).await {
        Ok(snapshot) => Json(BaseResponse::success(snapshot)),
        Err(e) => pool_error(e),
    }
}

async fn handle_eligibility(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ActorQuery>,
) -> Json<EligibilityResponse> {
    let Some(actor) = q.actor() else {
        return Json(BaseResponse::error(400, "actor_id is required"));
    };
    match state.pool.eligibility(&actor).await {
        Ok(gate) => Json(BaseResponse::success(gate)),
        Err(e) => pool_error(e),
    }
}

async fn handle_grab(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LeadActionRequest>,
) -> Json<ActionResponse> {
    if req.actor_id.trim().is_empty() {
        return Json(BaseResponse::error(400, "actor_id is required"));
    }
    match state.pool.try_grab(&req.lead_id, &req.actor()).await {
        Ok(outcome) => Json(BaseResponse::success(outcome)),
        Err(e) => pool_error(e),
    }
}

async fn handle_release(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LeadActionRequest>,
) -> Json<ActionResponse> {
    if req.actor_id.trim().is_empty() {
        return Json(BaseResponse::error(400, "actor_id is required"));
    }
    match state.pool.release_by_id(&req.lead_id, &req.actor()).await {
        Ok(outcome) => Json(BaseResponse::success(outcome)),
        Err(e) => pool_error(e),
    }
}

async fn handle_contact(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecordContactRequest>,
) -> Json<LeadResponse> {
    match state.pool.record_contact(&req.lead_id, req.contacted_at).await {
        Ok(lead) => Json(BaseResponse::success(lead)),
        Err(e) => pool_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct AuditListQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub action: Option<AuditAction>,
    /// RFC 3339; an unescaped `+` offset arrives as a space and is accepted.
    #[serde(default)]
    pub since: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

fn parse_since(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(&raw.replace(' ', "+")))
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

async fn handle_audit_list(
    State(state): State<Arc<AppState>>,
    Query(q): Query<AuditListQuery>,
) -> Json<BaseResponse<Vec<AuditLogEntry>>> {
    let since = match q.since.as_deref().filter(|s| !s.trim().is_empty()) {
        None => None,
        Some(raw) => match parse_since(raw) {
            Some(t) => Some(t),
            None => {
                return Json(BaseResponse::error(
                    400,
                    format!("since must be an RFC 3339 timestamp, got {:?}", raw),
                ))
            }
        },
    };
    let opts = AuditListOptions {
        user_id: q.user_id,
        entity_id: q.entity_id,
        action: q.action,
        since,
        limit: q.limit,
        offset: q.offset,
    };
    match state.audit_log.list(&opts).await {
        Ok(entries) => Json(BaseResponse::success(entries)),
        Err(e) => Json(BaseResponse::error(500, e.to_string())),
    }
}

async fn handle_health() -> &'static str {
    "ok"
}
