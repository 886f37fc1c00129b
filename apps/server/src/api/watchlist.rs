use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use coinfolio_core::watchlist::{NewWatchlistItem, WatchlistItem, WatchlistQuote};

use crate::{error::ApiResult, main_lib::AppState};

async fn get_watchlist(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<WatchlistItem>>> {
    let items = state.watchlist_service.get_watchlist(&user_id)?;
    Ok(Json(items))
}

async fn add_to_watchlist(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(item): Json<NewWatchlistItem>,
) -> ApiResult<Json<WatchlistItem>> {
    let item = state
        .watchlist_service
        .add_to_watchlist(&user_id, item)
        .await?;
    Ok(Json(item))
}

async fn remove_from_watchlist(
    Path((user_id, coin_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state
        .watchlist_service
        .remove_from_watchlist(&user_id, &coin_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_watchlist_quotes(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<WatchlistQuote>>> {
    let quotes = state
        .watchlist_service
        .get_watchlist_quotes(&user_id)
        .await?;
    Ok(Json(quotes))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/{id}/watchlist",
            get(get_watchlist).post(add_to_watchlist),
        )
        .route("/users/{id}/watchlist/quotes", get(get_watchlist_quotes))
        .route(
            "/users/{id}/watchlist/{coin_id}",
            delete(remove_from_watchlist),
        )
}
