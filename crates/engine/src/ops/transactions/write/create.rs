use sea_orm::{TransactionTrait, prelude::*};

use crate::{
    Attachment, CreateTransactionCmd, EngineError, ResultEngine, Transaction, attachments,
    transactions,
};

use super::super::super::{Engine, balances::signed_account_delta, normalize_optional_text, with_tx};

impl Engine {
    /// Creates a transaction and applies its balance effect in one unit.
    ///
    /// The effect target follows the payload shape:
    /// - expense with `credit_card_id`: the card is charged, the account is
    ///   untouched
    /// - investment with `investment_id`: the account is debited and the
    ///   investment valuation is credited
    /// - anything else: the account is credited (income) or debited
    ///   (expense/investment)
    pub async fn create_transaction(&self, cmd: CreateTransactionCmd) -> ResultEngine<Transaction> {
        let note = normalize_optional_text(cmd.note.as_deref());
        let tx = Transaction::new(
            cmd.user_id.clone(),
            cmd.kind,
            cmd.occurred_at,
            cmd.amount_minor,
            cmd.account_id,
            cmd.category_id,
            cmd.credit_card_id,
            cmd.investment_id,
            note,
        )?;

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, &cmd.user_id).await?;
            if let Some(category_id) = tx.category_id {
                self.require_category(&db_tx, category_id, &cmd.user_id)
                    .await?;
            }

            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            for file_name in &cmd.attachments {
                let attachment = Attachment::new(tx.id, file_name.clone());
                attachments::ActiveModel::from(&attachment)
                    .insert(&db_tx)
                    .await?;
            }

            if let Some(card_id) = tx.credit_card_id {
                self.apply_credit_card_delta(&db_tx, card_id, &cmd.user_id, tx.amount_minor)
                    .await?;
            } else {
                self.apply_account_delta(
                    &db_tx,
                    tx.account_id,
                    &cmd.user_id,
                    signed_account_delta(tx.kind, tx.amount_minor),
                    "account not exists",
                )
                .await?;

                if let Some(investment_id) = tx.investment_id {
                    let applied = self
                        .apply_investment_delta(&db_tx, investment_id, &cmd.user_id, tx.amount_minor)
                        .await?;
                    if !applied {
                        return Err(EngineError::KeyNotFound(
                            "investment not exists".to_string(),
                        ));
                    }
                }
            }

            let model = self.require_transaction(&db_tx, tx.id, &cmd.user_id).await?;
            self.populate_attachments(&db_tx, model).await
        })
    }
}
