//! Digest preferences and the externally triggered digest job.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use coinfolio_core::digest::{DigestPreference, DigestPreferenceUpdate, DigestRunSummary};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
struct SendDigestsResponse {
    success: bool,
    sent: usize,
    errors: usize,
    total: usize,
}

/// True when the request carries `Authorization: Bearer <secret>`.
/// Always false when no secret is configured.
fn is_authorized(headers: &HeaderMap, secret: Option<&str>) -> bool {
    let Some(secret) = secret else {
        return false;
    };
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == secret)
}

/// Runs one digest pass over all users. Fails with a conflict while another
/// run holds the lock.
pub async fn run_digest_job(state: &AppState) -> ApiResult<DigestRunSummary> {
    let Ok(_guard) = state.digest_lock.try_lock() else {
        warn!("Digest run already in progress, skipping");
        return Err(ApiError::Conflict(
            "Digest run already in progress".to_string(),
        ));
    };
    let summary = state
        .digest_service
        .send_digests(Utc::now())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    info!(
        "Digest run finished: {} sent, {} errors, {} eligible",
        summary.sent, summary.errors, summary.total
    );
    Ok(summary)
}

async fn send_digests(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<SendDigestsResponse>> {
    if !is_authorized(&headers, state.cron_secret.as_deref()) {
        warn!("Rejected digest trigger: missing or invalid bearer token");
        return Err(ApiError::Unauthorized);
    }
    let summary = run_digest_job(&state).await?;
    Ok(Json(SendDigestsResponse {
        success: true,
        sent: summary.sent,
        errors: summary.errors,
        total: summary.total,
    }))
}

async fn get_preference(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DigestPreference>> {
    let preference = state.digest_service.get_preference(&user_id)?;
    Ok(Json(preference))
}

async fn update_preference(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<DigestPreferenceUpdate>,
) -> ApiResult<Json<DigestPreference>> {
    let preference = state
        .digest_service
        .update_preference(&user_id, update)
        .await?;
    Ok(Json(preference))
}

pub fn preferences_router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/users/{id}/digest-preferences",
        get(get_preference).put(update_preference),
    )
}

pub fn cron_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/cron/send-digests", get(send_digests))
}
