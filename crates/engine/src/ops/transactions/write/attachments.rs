use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Transaction, attachments};

use super::super::super::{Engine, with_tx};

impl Engine {
    /// Removes one attachment from a transaction.
    ///
    /// Fails with not-found when the transaction has no attachments at all,
    /// or when none of them matches `attachment_id`.
    pub async fn remove_attachment(
        &self,
        transaction_id: Uuid,
        user_id: &str,
        attachment_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, transaction_id, user_id)
                .await?;

            let attachment_models: Vec<attachments::Model> = attachments::Entity::find()
                .filter(attachments::Column::TransactionId.eq(model.id.clone()))
                .all(&db_tx)
                .await?;
            if attachment_models.is_empty() {
                return Err(EngineError::KeyNotFound(
                    "transaction has no attachments".to_string(),
                ));
            }
            if !attachment_models
                .iter()
                .any(|a| a.id == attachment_id.to_string())
            {
                return Err(EngineError::KeyNotFound(
                    "attachment not exists".to_string(),
                ));
            }

            attachments::Entity::delete_by_id(attachment_id.to_string())
                .exec(&db_tx)
                .await?;

            self.populate_attachments(&db_tx, model).await
        })
    }
}
