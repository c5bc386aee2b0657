//! Categories API endpoints

use api_types::category::{CategoryCreated, CategoryNew, CategoryView};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState, user};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryCreated>), ServerError> {
    let id = state.engine.new_category(&payload.name, &user.username).await?;

    Ok((StatusCode::CREATED, Json(CategoryCreated { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.categories(&user.username).await?;
    Ok(Json(
        categories
            .into_iter()
            .map(|category| CategoryView {
                id: category.id,
                name: category.name,
            })
            .collect(),
    ))
}
