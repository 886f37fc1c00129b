use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use coinfolio_core::portfolio::holdings::{Holding, NewHolding, PortfolioValuation};

use crate::{error::ApiResult, main_lib::AppState};

pub async fn get_holdings(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Holding>>> {
    let holdings = state.holdings_service.get_holdings(&user_id)?;
    Ok(Json(holdings))
}

pub async fn add_holding(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(new_holding): Json<NewHolding>,
) -> ApiResult<(StatusCode, Json<Holding>)> {
    let holding = state
        .holdings_service
        .add_holding(&user_id, new_holding)
        .await?;
    Ok((StatusCode::CREATED, Json(holding)))
}

pub async fn remove_holding(
    Path((user_id, holding_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state
        .holdings_service
        .remove_holding(&user_id, &holding_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_portfolio(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortfolioValuation>> {
    let portfolio = state.holdings_service.get_portfolio(&user_id).await?;
    Ok(Json(portfolio))
}
