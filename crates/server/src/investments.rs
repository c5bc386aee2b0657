//! Investments API endpoints

use api_types::investment::{InvestmentCreated, InvestmentNew, InvestmentView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_investment(investment: engine::Investment) -> InvestmentView {
    InvestmentView {
        id: investment.id,
        name: investment.name,
        kind: investment.kind,
        initial_value_minor: investment.initial_value_minor,
        current_value_minor: investment.current_value_minor,
        absolute_return_minor: investment.performance.absolute_return_minor,
        percentage_return: investment.performance.percentage_return,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<InvestmentNew>,
) -> Result<(StatusCode, Json<InvestmentCreated>), ServerError> {
    let id = state
        .engine
        .new_investment(
            &payload.name,
            &user.username,
            payload.kind.as_deref(),
            payload.initial_value_minor,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(InvestmentCreated { id })))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvestmentView>, ServerError> {
    let investment = state.engine.investment(id, &user.username).await?;
    Ok(Json(map_investment(investment)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<InvestmentView>>, ServerError> {
    let investments = state.engine.investments(&user.username).await?;
    Ok(Json(investments.into_iter().map(map_investment).collect()))
}
