//! Credit cards API endpoints

use api_types::credit_card::{CreditCardCreated, CreditCardNew, CreditCardView};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState, user};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CreditCardNew>,
) -> Result<(StatusCode, Json<CreditCardCreated>), ServerError> {
    let id = state
        .engine
        .new_credit_card(&payload.name, &user.username)
        .await?;

    Ok((StatusCode::CREATED, Json(CreditCardCreated { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CreditCardView>>, ServerError> {
    let cards = state.engine.credit_cards(&user.username).await?;
    Ok(Json(
        cards
            .into_iter()
            .map(|card| CreditCardView {
                id: card.id,
                name: card.name,
                used_minor: card.used_minor,
            })
            .collect(),
    ))
}
