use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use coinfolio_core::{
    insights::Insight,
    portfolio::analytics::PortfolioAnalytics,
    users::{UserProfile, UserProfileInput},
};

use crate::{error::ApiResult, main_lib::AppState};

async fn upsert_user(
    State(state): State<Arc<AppState>>,
    Json(input): Json<UserProfileInput>,
) -> ApiResult<Json<UserProfile>> {
    let user = state.user_service.upsert_user(input).await?;
    Ok(Json(user))
}

async fn get_user(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<UserProfile>> {
    let user = state.user_service.get_user(&user_id)?;
    Ok(Json(user))
}

async fn get_analytics(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortfolioAnalytics>> {
    let analytics = state.analytics_service.get_analytics(&user_id).await?;
    Ok(Json(analytics))
}

async fn get_insight(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Insight>> {
    let insight = state.insight_service.get_insight(&user_id).await?;
    Ok(Json(insight))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(upsert_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/analytics", get(get_analytics))
        .route("/users/{id}/insights", get(get_insight))
}
