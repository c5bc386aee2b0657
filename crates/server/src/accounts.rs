//! Accounts API endpoints

use api_types::account::{AccountCreated, AccountNew, AccountView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_account(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        balance_minor: account.balance_minor,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountCreated>), ServerError> {
    let id = state
        .engine
        .new_account(
            &payload.name,
            &user.username,
            payload.balance_minor.unwrap_or(0),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AccountCreated { id })))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(id, &user.username).await?;
    Ok(Json(map_account(account)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.accounts(&user.username).await?;
    Ok(Json(accounts.into_iter().map(map_account).collect()))
}
