//! Transactions API endpoints

use api_types::transaction::{
    AttachmentView, TransactionDeleted, TransactionKind as ApiKind, TransactionListQuery,
    TransactionListResponse, TransactionNew, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{FixedOffset, Utc};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
        engine::TransactionKind::Investment => ApiKind::Investment,
    }
}

fn map_api_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
        ApiKind::Investment => engine::TransactionKind::Investment,
    }
}

fn map_transaction(tx: engine::Transaction) -> Result<TransactionView, ServerError> {
    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))?;
    Ok(TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        occurred_at: tx.occurred_at.with_timezone(&utc),
        amount_minor: tx.amount_minor,
        account_id: tx.account_id,
        category_id: tx.category_id,
        credit_card_id: tx.credit_card_id,
        investment_id: tx.investment_id,
        note: tx.note,
        attachments: tx
            .attachments
            .into_iter()
            .map(|attachment| AttachmentView {
                id: attachment.id,
                file_name: attachment.file_name,
            })
            .collect(),
    })
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = engine::CreateTransactionCmd::new(
        user.username.clone(),
        map_api_kind(payload.kind),
        payload.amount_minor,
        payload.account_id,
        payload.occurred_at.with_timezone(&Utc),
    );
    cmd.category_id = payload.category_id;
    cmd.credit_card_id = payload.credit_card_id;
    cmd.investment_id = payload.investment_id;
    cmd.note = payload.note;
    cmd.attachments = payload.attachments.unwrap_or_default();

    let tx = state.engine.create_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(map_transaction(tx)?)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let filter = engine::TransactionListFilter {
        from: query.from.map(|dt| dt.with_timezone(&Utc)),
        to: query.to.map(|dt| dt.with_timezone(&Utc)),
        kinds: query.kind.map(|kind| vec![map_api_kind(kind)]),
        account_id: query.account_id,
        category_id: query.category_id,
        credit_card_id: query.credit_card_id,
        investment_id: query.investment_id,
        page: query.page,
        limit: query.limit,
    };

    let page = state.engine.list_transactions(&user.username, &filter).await?;

    let transactions = page
        .transactions
        .into_iter()
        .map(map_transaction)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(TransactionListResponse {
        transactions,
        total: page.total,
        page: page.page,
        limit: page.limit,
        pages: page.pages,
    }))
}

pub async fn get_detail(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(id, &user.username).await?;
    Ok(Json(map_transaction(tx)?))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let mut cmd = engine::UpdateTransactionCmd::new(id, user.username.clone());
    cmd.kind = payload.kind.map(map_api_kind);
    cmd.amount_minor = payload.amount_minor;
    cmd.account_id = payload.account_id;
    cmd.category_id = payload.category_id;
    cmd.credit_card_id = payload.credit_card_id;
    cmd.investment_id = payload.investment_id;
    cmd.note = payload.note;
    cmd.occurred_at = payload.occurred_at.map(|dt| dt.with_timezone(&Utc));

    let tx = state.engine.update_transaction(cmd).await?;
    Ok(Json(map_transaction(tx)?))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionDeleted>, ServerError> {
    let success = state.engine.delete_transaction(id, &user.username).await?;
    Ok(Json(TransactionDeleted { success }))
}

pub async fn remove_attachment(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((id, attachment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .remove_attachment(id, &user.username, attachment_id)
        .await?;
    Ok(Json(map_transaction(tx)?))
}

pub async fn list_for_investment(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let txs = state
        .engine
        .transactions_for_investment(&user.username, id)
        .await?;
    let transactions = txs
        .into_iter()
        .map(map_transaction)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(transactions))
}
