mod handlers;

use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::main_lib::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/{id}/holdings",
            get(handlers::get_holdings).post(handlers::add_holding),
        )
        .route(
            "/users/{id}/holdings/{holding_id}",
            delete(handlers::remove_holding),
        )
        .route("/users/{id}/portfolio", get(handlers::get_portfolio))
}
