use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Attachment, EngineError, ResultEngine, Transaction, attachments, transactions};

use super::{Engine, with_tx};

mod list;
mod write;

pub use list::{TransactionListFilter, TransactionPage};

impl Engine {
    pub(super) async fn require_transaction(
        &self,
        db: &DatabaseTransaction,
        transaction_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(transaction_id.to_string())
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
    }

    pub(super) async fn populate_attachments(
        &self,
        db: &DatabaseTransaction,
        model: transactions::Model,
    ) -> ResultEngine<Transaction> {
        let attachment_models: Vec<attachments::Model> = attachments::Entity::find()
            .filter(attachments::Column::TransactionId.eq(model.id.clone()))
            .order_by_asc(attachments::Column::Id)
            .all(db)
            .await?;

        let mut tx = Transaction::try_from(model)?;
        tx.attachments = attachment_models
            .into_iter()
            .map(Attachment::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok(tx)
    }

    /// Return a transaction (with attachments) owned by the user.
    pub async fn transaction(
        &self,
        transaction_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, transaction_id, user_id)
                .await?;
            self.populate_attachments(&db_tx, model).await
        })
    }
}
